//! Built-in model registry
//!
//! The table of selectable models is compiled into the binary from
//! `builtin_models.toml` and parsed once on first use.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::error::NotFoundError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub display_name: String,
    /// Token ceiling for one completion.
    pub max_tokens: u32,
    pub developer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelRegistry {
    #[serde(rename = "default")]
    default_id: String,
    models: Vec<ModelDescriptor>,
}

impl ModelRegistry {
    /// The registry shipped with the binary.
    pub fn builtin() -> &'static ModelRegistry {
        static REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            const CONFIG_CONTENT: &str = include_str!("../builtin_models.toml");
            ModelRegistry::from_toml(CONFIG_CONTENT).expect("Failed to parse builtin_models.toml")
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn list(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn ids(&self) -> Vec<String> {
        self.models.iter().map(|model| model.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Result<&ModelDescriptor, NotFoundError> {
        self.models
            .iter()
            .find(|model| model.id == id)
            .ok_or_else(|| NotFoundError {
                id: id.to_string(),
                known: self.ids(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.iter().any(|model| model.id == id)
    }

    pub fn default_model(&self) -> &ModelDescriptor {
        self.get(&self.default_id)
            .ok()
            .or_else(|| self.models.first())
            .expect("model registry is empty")
    }

    /// Model after `id` in picker order, wrapping around.
    pub fn next(&self, id: &str) -> &ModelDescriptor {
        self.offset(id, 1)
    }

    /// Model before `id` in picker order, wrapping around.
    pub fn previous(&self, id: &str) -> &ModelDescriptor {
        self.offset(id, self.models.len().saturating_sub(1))
    }

    fn offset(&self, id: &str, by: usize) -> &ModelDescriptor {
        match self.models.iter().position(|model| model.id == id) {
            Some(index) => &self.models[(index + by) % self.models.len()],
            None => self.default_model(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_lists_models_in_order() {
        let registry = ModelRegistry::builtin();
        assert_eq!(
            registry.ids(),
            vec![
                "gemma-7b-it",
                "llama2-70b-4096",
                "llama3-70b-8192",
                "llama3-8b-8192",
                "mixtral-8x7b-32768",
            ]
        );
    }

    #[test]
    fn get_returns_every_listed_model_unchanged() {
        let registry = ModelRegistry::builtin();
        for model in registry.list() {
            assert_eq!(registry.get(&model.id).unwrap(), model);
        }
    }

    #[test]
    fn descriptors_carry_ceilings_and_developers() {
        let registry = ModelRegistry::builtin();
        let llama = registry.get("llama3-8b-8192").unwrap();
        assert_eq!(llama.display_name, "LLaMA3-8b-8192");
        assert_eq!(llama.max_tokens, 8192);
        assert_eq!(llama.developer, "Meta");

        let mixtral = registry.get("mixtral-8x7b-32768").unwrap();
        assert_eq!(mixtral.max_tokens, 32768);
        assert_eq!(mixtral.developer, "Mistral");
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let err = ModelRegistry::builtin().get("gpt-4o").unwrap_err();
        assert_eq!(err.id, "gpt-4o");
        assert_eq!(err.known.len(), 5);
        assert!(err.to_string().contains("gpt-4o"));
    }

    #[test]
    fn default_is_mixtral() {
        assert_eq!(
            ModelRegistry::builtin().default_model().id,
            "mixtral-8x7b-32768"
        );
    }

    #[test]
    fn cycling_wraps_around() {
        let registry = ModelRegistry::builtin();
        assert_eq!(registry.next("mixtral-8x7b-32768").id, "gemma-7b-it");
        assert_eq!(registry.previous("gemma-7b-it").id, "mixtral-8x7b-32768");
        assert_eq!(registry.next("gemma-7b-it").id, "llama2-70b-4096");
        assert_eq!(registry.next("unknown").id, "mixtral-8x7b-32768");
    }

    #[test]
    fn parses_custom_tables() {
        let registry = ModelRegistry::from_toml(
            r#"
default = "b"

[[models]]
id = "a"
display_name = "A"
max_tokens = 1024
developer = "X"

[[models]]
id = "b"
display_name = "B"
max_tokens = 2048
developer = "Y"
"#,
        )
        .unwrap();
        assert_eq!(registry.default_model().id, "b");
        assert!(registry.contains("a"));
        assert!(!registry.contains("c"));
    }
}
