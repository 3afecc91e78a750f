use std::collections::HashSet;
use std::path::Path;

use live2d_pet_protocol::ModelDescriptor;
use serde::Deserialize;

use crate::error::CatalogError;

/// Catalog compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../assets/models.json");

/// On-disk catalog layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    models: Vec<ModelDescriptor>,
}

/// Read-only set of available models, in declaration order.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    /// Builds a catalog from descriptors.
    ///
    /// Fails when the list is empty or two models share a key.
    pub fn new(models: Vec<ModelDescriptor>) -> Result<Self, CatalogError> {
        if models.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.key.as_str()) {
                return Err(CatalogError::DuplicateKey(model.key.clone()));
            }
        }
        Ok(Self { models })
    }

    /// Returns the catalog shipped with the application.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parses a catalog from JSON text (`{"models": [...]}`).
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.models)
    }

    /// Reads a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            models = catalog.models.len(),
            "model catalog loaded"
        );
        Ok(catalog)
    }

    /// Looks up a model by key.
    pub fn get_model(&self, key: &str) -> Result<&ModelDescriptor, CatalogError> {
        self.models
            .iter()
            .find(|m| m.key == key)
            .ok_or_else(|| CatalogError::ModelNotFound(key.to_string()))
    }

    /// Returns true if `key` names a model in the catalog.
    pub fn contains(&self, key: &str) -> bool {
        self.models.iter().any(|m| m.key == key)
    }

    /// Model keys in declaration order.
    pub fn list_model_keys(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.key.as_str()).collect()
    }

    /// All descriptors in declaration order.
    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    /// Key of the first declared model, used when no valid initial model is
    /// configured.
    pub fn default_key(&self) -> &str {
        // `new` rejects empty catalogs.
        &self.models[0].key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(key: &str) -> ModelDescriptor {
        ModelDescriptor {
            key: key.into(),
            name: key.to_uppercase(),
            path: format!("models/{key}/{key}.model3.json"),
            motions: Vec::new(),
            expressions: Vec::new(),
            sounds: Vec::new(),
        }
    }

    #[test]
    fn builtin_catalog_parses() {
        let catalog = ModelCatalog::builtin().unwrap();
        assert!(catalog.contains("idol"));
        assert_eq!(catalog.default_key(), "idol");
        let idol = catalog.get_model("idol").unwrap();
        assert_eq!(idol.expressions[0].file, "1.exp3.json");
        assert_eq!(idol.expressions[0].index, 0);
    }

    #[test]
    fn builtin_expression_indices_are_ordinals() {
        let catalog = ModelCatalog::builtin().unwrap();
        for model in catalog.models() {
            for (i, exp) in model.expressions.iter().enumerate() {
                assert_eq!(exp.index as usize, i, "model {}", model.key);
            }
        }
    }

    #[test]
    fn keys_keep_declaration_order() {
        let catalog = ModelCatalog::new(vec![model("b"), model("a"), model("c")]).unwrap();
        assert_eq!(catalog.list_model_keys(), vec!["b", "a", "c"]);
    }

    #[test]
    fn unknown_key_is_not_found() {
        let catalog = ModelCatalog::new(vec![model("a")]).unwrap();
        let err = catalog.get_model("missing").unwrap_err();
        assert!(matches!(err, CatalogError::ModelNotFound(ref k) if k == "missing"));
        assert!(!catalog.contains("missing"));
    }

    #[test]
    fn empty_catalog_rejected() {
        assert!(matches!(ModelCatalog::new(Vec::new()), Err(CatalogError::Empty)));
    }

    #[test]
    fn duplicate_keys_rejected() {
        let err = ModelCatalog::new(vec![model("a"), model("a")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey(ref k) if k == "a"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.json");
        std::fs::write(
            &path,
            r#"{"models":[{"key":"x","name":"X","path":"x.model3.json"}]}"#,
        )
        .unwrap();

        let catalog = ModelCatalog::load(&path).unwrap();
        assert_eq!(catalog.list_model_keys(), vec!["x"]);
        assert!(catalog.get_model("x").unwrap().motions.is_empty());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelCatalog::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
