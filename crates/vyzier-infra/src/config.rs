//! Configuration loader for Vyzier.
//!
//! Reads `config.toml` from the data directory (`~/.vyzier/` by default) and
//! deserializes it into [`ChatConfig`]. Falls back to defaults when the file
//! is missing or malformed.

use std::path::{Path, PathBuf};

use vyzier_types::config::ChatConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "VYZIER_DATA_DIR";

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory.
///
/// Priority:
/// 1. `VYZIER_DATA_DIR` environment variable
/// 2. `~/.vyzier`
/// 3. `.vyzier` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".vyzier");
    }

    PathBuf::from(".vyzier")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// A missing file yields [`ChatConfig::default()`]; an unreadable or
/// unparsable one logs a warning and also yields the default.
pub async fn load_chat_config(data_dir: &Path) -> ChatConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ChatConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ChatConfig::default();
        }
    };

    match toml::from_str::<ChatConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ChatConfig::default()
        }
    }
}
