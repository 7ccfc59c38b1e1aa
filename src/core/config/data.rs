use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Model selected at startup (e.g., "llama3-70b-8192")
    pub default_model: Option<String>,
    /// Starting token budget; clamped to the selected model's range
    pub max_tokens: Option<u32>,
    /// Decorate replies with sentiment emoji
    pub emotion: Option<bool>,
    /// OpenAI-compatible endpoint, overridden by GROQ_BASE_URL
    pub base_url: Option<String>,
}

impl Config {
    pub fn emotion_enabled(&self) -> bool {
        self.emotion.unwrap_or(true)
    }

    pub fn print_all(&self) {
        println!("⚙️  Current configuration:");
        println!(
            "  default-model: {}",
            self.default_model.as_deref().unwrap_or("(unset)")
        );
        match self.max_tokens {
            Some(value) => println!("  max-tokens: {value}"),
            None => println!("  max-tokens: (unset)"),
        }
        println!("  emotion: {}", self.emotion_enabled());
        println!(
            "  base-url: {}",
            self.base_url.as_deref().unwrap_or("(unset)")
        );
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
