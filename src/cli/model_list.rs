//! Model listing functionality

use crate::core::config::Config;
use crate::core::models::{ModelDescriptor, ModelRegistry};

fn render_rows(models: &[ModelDescriptor], default_id: &str) -> Vec<String> {
    let id_width = models.iter().map(|m| m.id.len()).max().unwrap_or(0);
    let name_width = models.iter().map(|m| m.display_name.len()).max().unwrap_or(0);

    models
        .iter()
        .map(|model| {
            let marker = if model.id == default_id { "*" } else { " " };
            format!(
                "{marker} {:<id_width$}  {:<name_width$}  {:>6}  {}",
                model.id, model.display_name, model.max_tokens, model.developer
            )
        })
        .collect()
}

pub fn list_models(config: &Config) {
    let registry = ModelRegistry::builtin();
    let default_id = config
        .default_model
        .as_deref()
        .filter(|id| registry.contains(id))
        .unwrap_or(&registry.default_model().id);

    println!("🤖 Available Models");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    for row in render_rows(registry.list(), default_id) {
        println!("{row}");
    }
    println!();
    println!("* = default model (change with: vers3chat set default-model <id>)");
}
