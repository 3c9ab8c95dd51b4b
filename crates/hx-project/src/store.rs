//! On-disk project storage keyed by project name.

use crate::hash::name_key;
use crate::schema::Project;
use crate::validate::validate_project;
use crate::{ProjectError, ProjectResult, load_yaml};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory of YAML project files, one per project name.
#[derive(Clone)]
pub struct ProjectStore {
    root_dir: PathBuf,
}

impl ProjectStore {
    pub fn new(root_dir: PathBuf) -> ProjectResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn project_path(&self, name: &str) -> PathBuf {
        self.root_dir.join(format!("{}.yaml", name_key(name)))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.project_path(name).exists()
    }

    /// Create or replace the project stored under `project.name`.
    pub fn save(&self, project: &Project) -> ProjectResult<()> {
        validate_project(project)?;
        let path = self.project_path(&project.name);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, serde_yaml::to_string(project)?)?;
        fs::rename(&tmp, &path)?;
        debug!(name = %project.name, path = %path.display(), "project saved");
        Ok(())
    }

    pub fn load(&self, name: &str) -> ProjectResult<Project> {
        let path = self.project_path(name);
        if !path.exists() {
            return Err(ProjectError::ProjectNotFound {
                name: name.to_string(),
            });
        }
        load_yaml(&path)
    }

    pub fn delete(&self, name: &str) -> ProjectResult<()> {
        let path = self.project_path(name);
        if !path.exists() {
            return Err(ProjectError::ProjectNotFound {
                name: name.to_string(),
            });
        }
        fs::remove_file(&path)?;
        debug!(name, "project deleted");
        Ok(())
    }

    /// Names of all readable projects, sorted.
    pub fn list_names(&self) -> ProjectResult<Vec<String>> {
        let mut names = Vec::new();

        if !self.root_dir.exists() {
            return Ok(names);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            match load_yaml(&path) {
                Ok(project) => names.push(project.name),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable project"),
            }
        }

        names.sort();
        Ok(names)
    }
}
