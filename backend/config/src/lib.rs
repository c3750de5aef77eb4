//! `poseidon-config`: runtime configuration for the Poseidon service.
//!
//! Provides:
//! - Typed config schema (server, logging, analysis labels)
//! - YAML loading
//! - `${ENV_VAR}` substitution and `PORT` / `POSEIDON_BIND` overrides
//! - Default value application
//! - Validation with field paths

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, load_config_value};
pub use schema::{AnalysisConfig, LoggingConfig, PoseidonConfig, ServerConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use poseidon_core::PoseidonError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Overrides from the command line; they win over the file and the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
}

/// A validated config plus what the caller should report once logging is up.
#[derive(Debug)]
pub struct PreparedConfig {
    pub config: PoseidonConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigValidationError>,
}

impl PreparedConfig {
    pub fn log_report(&self) {
        match &self.source {
            Some(path) => tracing::info!(path = %path.display(), "Loaded config"),
            None => tracing::debug!("No config file; using defaults"),
        }
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
    }
}

/// Load, substitute env vars, apply overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. Nothing is
/// logged here; call [`PreparedConfig::log_report`] after the logger starts.
pub async fn load_and_prepare(path: &Path, overrides: &ConfigOverrides) -> Result<PreparedConfig> {
    let value = load_config_value(path).await?;
    let mut prepared = prepare(value, &std::env::vars().collect(), overrides)?;
    prepared.source = path.exists().then(|| path.to_path_buf());
    Ok(prepared)
}

/// The processing half of [`load_and_prepare`], over an explicit env map.
///
/// Validation errors are all folded into one `PoseidonError::Config`.
pub fn prepare(
    value: serde_json::Value,
    env: &HashMap<String, String>,
    overrides: &ConfigOverrides,
) -> Result<PreparedConfig> {
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;

    let config: PoseidonConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let mut override_report = ValidationReport::default();
    let mut config = apply_env_overrides(config, env, &mut override_report);
    if let Some(port) = overrides.port {
        config.server.get_or_insert_with(ServerConfig::default).port = Some(port);
    }
    let config = apply_all_defaults(config);

    let mut report = validate(&config);
    if !report.is_valid() {
        let message = report
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(PoseidonError::Config(message).into());
    }

    let mut warnings = override_report.warnings;
    warnings.append(&mut report.warnings);
    Ok(PreparedConfig {
        config,
        source: None,
        warnings,
    })
}
