//! Content-based hashing for stored results and project file names.

use crate::schema::Project;
use hx_materials::MaterialStore;
use sha2::{Digest, Sha256};

/// Fingerprint of everything that affects a solution: layers, boundary and
/// settings. Name, version and any stored result are ignored.
pub fn compute_input_hash(project: &Project) -> String {
    let mut hasher = Sha256::new();

    let layers_json = serde_json::to_string(&project.layers).unwrap_or_default();
    hasher.update(layers_json.as_bytes());

    let boundary_json = serde_json::to_string(&project.boundary).unwrap_or_default();
    hasher.update(boundary_json.as_bytes());

    let settings_json = serde_json::to_string(&project.settings).unwrap_or_default();
    hasher.update(settings_json.as_bytes());

    format!("{:x}", hasher.finalize())
}

/// Fingerprint of the conductivity data of every material the project
/// references. A missing material hashes as its id, so deleting one also
/// changes the value.
pub fn compute_materials_hash(project: &Project, materials: &dyn MaterialStore) -> String {
    let mut hasher = Sha256::new();

    for id in project.material_ids() {
        match materials.get(id) {
            Ok(material) => {
                let data = (material.id, material.k_const, &material.points);
                let json = serde_json::to_string(&data).unwrap_or_default();
                hasher.update(json.as_bytes());
            }
            Err(_) => hasher.update(format!("missing:{id}").as_bytes()),
        }
    }

    format!("{:x}", hasher.finalize())
}

/// File-system safe key for a project name.
pub fn name_key(name: &str) -> String {
    format!("{:x}", Sha256::digest(name.as_bytes()))
}
