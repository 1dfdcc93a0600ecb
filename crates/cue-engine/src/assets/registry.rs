use std::collections::HashMap;
use crate::assets::manifest::SceneManifest;

/// Numeric model handle written into render instances.
/// The host resolves it to the mesh it imported for the same manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModelId(pub u32);

/// Registry of named models, built from a SceneManifest.
/// IDs follow the manifest's sorted name order so both sides agree on them.
pub struct ModelRegistry {
    ids: HashMap<String, ModelId>,
    names: Vec<String>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            names: Vec::new(),
        }
    }

    /// Build a registry from a parsed SceneManifest.
    pub fn from_manifest(manifest: &SceneManifest) -> Self {
        let names: Vec<String> = manifest.models.keys().cloned().collect();
        let ids = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), ModelId(i as u32)))
            .collect();
        Self { ids, names }
    }

    /// Look up a model by name. Returns None if not found.
    pub fn get(&self, name: &str) -> Option<ModelId> {
        self.ids.get(name).copied()
    }

    /// Reverse lookup.
    pub fn name(&self, id: ModelId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_sorted_names() {
        let json = r#"{
            "models": {
                "table": { "path": "models/table/gTable.obj" },
                "ball": { "path": "models/ball/ball.obj" },
                "pin": { "path": "models/pin/scaledPin.obj" }
            }
        }"#;
        let manifest = SceneManifest::from_json(json).unwrap();
        let reg = ModelRegistry::from_manifest(&manifest);

        assert_eq!(reg.len(), 3);
        assert_eq!(reg.get("ball"), Some(ModelId(0)));
        assert_eq!(reg.get("pin"), Some(ModelId(1)));
        assert_eq!(reg.get("table"), Some(ModelId(2)));
        assert_eq!(reg.name(ModelId(1)), Some("pin"));
    }

    #[test]
    fn unknown_returns_none() {
        let reg = ModelRegistry::new();
        assert!(reg.is_empty());
        assert!(reg.get("nonexistent").is_none());
        assert!(reg.name(ModelId(0)).is_none());
    }
}
