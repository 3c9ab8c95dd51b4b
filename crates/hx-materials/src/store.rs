//! Material storage API.

use crate::curve::KtCurve;
use crate::error::{MaterialError, MaterialResult};
use crate::material::{Material, MaterialId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read/write access to a set of materials keyed by id.
pub trait MaterialStore {
    fn get(&self, id: MaterialId) -> MaterialResult<Material>;

    /// All materials, sorted by name.
    fn list(&self) -> MaterialResult<Vec<Material>>;

    fn insert(&mut self, material: Material) -> MaterialResult<()>;

    fn update(&mut self, material: Material) -> MaterialResult<()>;

    fn delete(&mut self, id: MaterialId) -> MaterialResult<()>;

    fn set_points(&mut self, id: MaterialId, points: KtCurve) -> MaterialResult<()> {
        let mut material = self.get(id)?;
        material.points = points;
        self.update(material)
    }

    /// Case-insensitive lookup by name.
    fn find_by_name(&self, name: &str) -> MaterialResult<Option<Material>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|m| m.name.eq_ignore_ascii_case(name)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMaterialStore {
    materials: BTreeMap<MaterialId, Material>,
}

impl InMemoryMaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl FromIterator<Material> for InMemoryMaterialStore {
    fn from_iter<I: IntoIterator<Item = Material>>(iter: I) -> Self {
        Self {
            materials: iter.into_iter().map(|m| (m.id, m)).collect(),
        }
    }
}

impl MaterialStore for InMemoryMaterialStore {
    fn get(&self, id: MaterialId) -> MaterialResult<Material> {
        self.materials
            .get(&id)
            .cloned()
            .ok_or(MaterialError::NotFound { id })
    }

    fn list(&self) -> MaterialResult<Vec<Material>> {
        let mut all: Vec<Material> = self.materials.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    fn insert(&mut self, material: Material) -> MaterialResult<()> {
        material.validate()?;
        if self.materials.contains_key(&material.id) {
            return Err(MaterialError::DuplicateId { id: material.id });
        }
        self.materials.insert(material.id, material);
        Ok(())
    }

    fn update(&mut self, material: Material) -> MaterialResult<()> {
        material.validate()?;
        match self.materials.get_mut(&material.id) {
            Some(slot) => {
                *slot = material;
                Ok(())
            }
            None => Err(MaterialError::NotFound { id: material.id }),
        }
    }

    fn delete(&mut self, id: MaterialId) -> MaterialResult<()> {
        self.materials
            .remove(&id)
            .map(|_| ())
            .ok_or(MaterialError::NotFound { id })
    }
}

const MATERIALS_FILE: &str = "materials.json";
const MATERIALS_FILE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct MaterialsFile {
    version: u32,
    #[serde(default)]
    materials: Vec<Material>,
}

/// Material store persisted as `materials.json` under an explicit directory.
///
/// The whole file is loaded on open and rewritten after every mutation.
#[derive(Debug, Clone)]
pub struct JsonMaterialStore {
    root_dir: PathBuf,
    cache: InMemoryMaterialStore,
}

impl JsonMaterialStore {
    pub fn open(root_dir: PathBuf) -> MaterialResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        let path = root_dir.join(MATERIALS_FILE);
        let cache = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let file: MaterialsFile = serde_json::from_str(&content)?;
            for material in &file.materials {
                material.validate()?;
            }
            debug!(
                path = %path.display(),
                count = file.materials.len(),
                "loaded materials"
            );
            file.materials.into_iter().collect()
        } else {
            InMemoryMaterialStore::new()
        };
        Ok(Self { root_dir, cache })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn flush(&self, materials: &InMemoryMaterialStore) -> MaterialResult<()> {
        let file = MaterialsFile {
            version: MATERIALS_FILE_VERSION,
            materials: materials.list()?,
        };
        let json = serde_json::to_string_pretty(&file)?;
        let path = self.root_dir.join(MATERIALS_FILE);
        let tmp = self.root_dir.join(format!("{MATERIALS_FILE}.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), count = file.materials.len(), "saved materials");
        Ok(())
    }

    /// Apply `change` to a copy of the cache and keep it only once the file
    /// has been written.
    fn commit(
        &mut self,
        change: impl FnOnce(&mut InMemoryMaterialStore) -> MaterialResult<()>,
    ) -> MaterialResult<()> {
        let mut next = self.cache.clone();
        change(&mut next)?;
        self.flush(&next)?;
        self.cache = next;
        Ok(())
    }
}

impl MaterialStore for JsonMaterialStore {
    fn get(&self, id: MaterialId) -> MaterialResult<Material> {
        self.cache.get(id)
    }

    fn list(&self) -> MaterialResult<Vec<Material>> {
        self.cache.list()
    }

    fn insert(&mut self, material: Material) -> MaterialResult<()> {
        self.commit(|cache| cache.insert(material))
    }

    fn update(&mut self, material: Material) -> MaterialResult<()> {
        self.commit(|cache| cache.update(material))
    }

    fn delete(&mut self, id: MaterialId) -> MaterialResult<()> {
        self.commit(|cache| cache.delete(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::KtPoint;

    #[test]
    fn in_memory_crud() {
        let mut store = InMemoryMaterialStore::new();
        let mut m = Material::new("Calcium silicate", Some(0.06), vec![]).unwrap();
        store.insert(m.clone()).unwrap();
        assert!(matches!(
            store.insert(m.clone()),
            Err(MaterialError::DuplicateId { .. })
        ));

        m.k_const = Some(0.065);
        store.update(m.clone()).unwrap();
        assert_eq!(store.get(m.id).unwrap().k_const, Some(0.065));

        store.delete(m.id).unwrap();
        assert!(matches!(store.get(m.id), Err(MaterialError::NotFound { .. })));
        assert!(matches!(store.delete(m.id), Err(MaterialError::NotFound { .. })));
    }

    #[test]
    fn update_rejects_invalid_constant() {
        let mut store = InMemoryMaterialStore::new();
        let mut m = Material::new("Perlite", Some(0.05), vec![]).unwrap();
        store.insert(m.clone()).unwrap();
        m.k_const = Some(0.0);
        assert!(store.update(m).is_err());
    }

    #[test]
    fn list_is_sorted_by_name_and_find_ignores_case() {
        let store: InMemoryMaterialStore = ["Rock wool", "Aerogel", "Glass wool"]
            .into_iter()
            .map(|name| Material::new(name, Some(0.04), vec![]).unwrap())
            .collect();
        let names: Vec<String> = store.list().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, ["Aerogel", "Glass wool", "Rock wool"]);
        assert!(store.find_by_name("aerogel").unwrap().is_some());
        assert!(store.find_by_name("steel").unwrap().is_none());
    }

    #[test]
    fn set_points_replaces_curve() {
        let mut store = InMemoryMaterialStore::new();
        let m = Material::new("Microporous", None, vec![]).unwrap();
        store.insert(m.clone()).unwrap();
        let curve = KtCurve::new(vec![KtPoint::new(0.0, 0.02), KtPoint::new(400.0, 0.03)]).unwrap();
        store.set_points(m.id, curve.clone()).unwrap();
        assert_eq!(store.get(m.id).unwrap().points, curve);
    }

    #[test]
    fn failed_write_leaves_cache_untouched() {
        let dir = std::env::temp_dir().join("hx_materials_test_failed_write");
        let _ = fs::remove_dir_all(&dir);
        let mut store = JsonMaterialStore::open(dir.clone()).unwrap();
        let kept = Material::new("Perlite", Some(0.05), vec![]).unwrap();
        store.insert(kept.clone()).unwrap();

        fs::remove_dir_all(&dir).unwrap();

        let added = Material::new("Vermiculite", Some(0.07), vec![]).unwrap();
        assert!(matches!(store.insert(added.clone()), Err(MaterialError::Io(_))));
        assert!(matches!(store.get(added.id), Err(MaterialError::NotFound { .. })));

        assert!(store.delete(kept.id).is_err());
        assert_eq!(store.get(kept.id).unwrap(), kept);
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
