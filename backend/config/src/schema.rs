//! Poseidon runtime configuration schema.
//!
//! Every section and field is optional in YAML; `defaults::apply_all_defaults`
//! fills the gaps and the accessors below fall back to the same constants.

use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::defaults::{
    DEFAULT_ANALYSIS_MODEL, DEFAULT_ANALYSIS_PROVIDER, DEFAULT_BIND, DEFAULT_LOG_FILE_PREFIX,
    DEFAULT_LOG_LEVEL, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT,
};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseidonConfig {
    /// HTTP listener
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Remote analysis labels (the call itself is disabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Largest accepted request body, in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_upload_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `info,poseidon_gateway=debug`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// JSON console output instead of human-readable lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
    /// Directory for daily-rolling NDJSON files; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl PoseidonConfig {
    pub fn bind(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(DEFAULT_BIND)
    }

    pub fn port(&self) -> u16 {
        self.server.as_ref().and_then(|s| s.port).unwrap_or(DEFAULT_PORT)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server
            .as_ref()
            .and_then(|s| s.max_upload_bytes)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Socket address to listen on. `bind` must be an IPv4 or IPv6 literal.
    pub fn listen_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.bind().parse()?;
        Ok(SocketAddr::new(ip, self.port()))
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn log_dir(&self) -> Option<&PathBuf> {
        self.logging.as_ref().and_then(|l| l.dir.as_ref())
    }

    pub fn log_file_prefix(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.file_prefix.as_deref())
            .unwrap_or(DEFAULT_LOG_FILE_PREFIX)
    }

    pub fn analysis_provider(&self) -> &str {
        self.analysis
            .as_ref()
            .and_then(|a| a.provider.as_deref())
            .unwrap_or(DEFAULT_ANALYSIS_PROVIDER)
    }

    pub fn analysis_model(&self) -> &str {
        self.analysis
            .as_ref()
            .and_then(|a| a.model.as_deref())
            .unwrap_or(DEFAULT_ANALYSIS_MODEL)
    }
}
