//! Config file location and loading.

use crate::schema::PoseidonConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config directory.
/// Priority: `POSEIDON_CONFIG_DIR` env > `~/.poseidon/` > `./.poseidon/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("POSEIDON_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".poseidon"),
        None => PathBuf::from(".poseidon"),
    }
}

pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the config file as an untyped JSON tree, before env substitution.
///
/// A missing file or an empty document yields an empty object.
pub async fn load_config_value(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}

/// Load and parse the config without env substitution or defaults.
pub async fn load_config(path: &Path) -> Result<PoseidonConfig> {
    let value = load_config_value(path).await?;
    serde_json::from_value(value)
        .with_context(|| format!("Invalid config structure at: {}", path.display()))
}
