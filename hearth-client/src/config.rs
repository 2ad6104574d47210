use serde::{Deserialize, Serialize};
use std::path::Path;

/// Client configuration persisted under the platform config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend REST API.
    pub server_url: String,
    /// Base URL of the object-storage service avatars are uploaded to.
    pub storage_url: String,
    /// Bucket avatar objects are written into.
    pub storage_bucket: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            storage_url: "https://storage.googleapis.com".to_string(),
            storage_bucket: "hearth-avatars".to_string(),
        }
    }
}

impl Config {
    /// Load the saved configuration, falling back to defaults when missing
    /// or unreadable.
    pub fn load() -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            return Self::load_from(&config_dir.join("hearth").join("config.json"));
        }
        Self::default()
    }

    fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                if let Ok(config) = serde_json::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Persist the configuration to the platform config directory.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(config_dir) = dirs::config_dir() {
            self.save_to(&config_dir.join("hearth").join("config.json"))?;
        }
        Ok(())
    }

    fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
