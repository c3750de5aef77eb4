//! Config defaults: applies default values to parsed config.

use crate::schema::{AnalysisConfig, LoggingConfig, PoseidonConfig, ServerConfig};

pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Container port of the original deployment.
pub const DEFAULT_PORT: u16 = 10000;

/// 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_LOG_FILE_PREFIX: &str = "poseidon";

pub const DEFAULT_ANALYSIS_PROVIDER: &str = "deepseek";

pub const DEFAULT_ANALYSIS_MODEL: &str = "deepseek-chat";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: PoseidonConfig) -> PoseidonConfig {
    let config = apply_server_defaults(config);
    let config = apply_logging_defaults(config);
    apply_analysis_defaults(config)
}

fn apply_server_defaults(mut config: PoseidonConfig) -> PoseidonConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    server.bind.get_or_insert_with(|| DEFAULT_BIND.to_string());
    server.port.get_or_insert(DEFAULT_PORT);
    server.max_upload_bytes.get_or_insert(DEFAULT_MAX_UPLOAD_BYTES);
    config
}

fn apply_logging_defaults(mut config: PoseidonConfig) -> PoseidonConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    logging
        .file_prefix
        .get_or_insert_with(|| DEFAULT_LOG_FILE_PREFIX.to_string());
    config
}

fn apply_analysis_defaults(mut config: PoseidonConfig) -> PoseidonConfig {
    let analysis = config.analysis.get_or_insert_with(AnalysisConfig::default);
    analysis
        .provider
        .get_or_insert_with(|| DEFAULT_ANALYSIS_PROVIDER.to_string());
    analysis
        .model
        .get_or_insert_with(|| DEFAULT_ANALYSIS_MODEL.to_string());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let cfg = apply_all_defaults(PoseidonConfig::default());
        let server = cfg.server.unwrap();
        assert_eq!(server.port, Some(DEFAULT_PORT));
        assert_eq!(server.bind.as_deref(), Some(DEFAULT_BIND));
        assert_eq!(server.max_upload_bytes, Some(DEFAULT_MAX_UPLOAD_BYTES));
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some(DEFAULT_LOG_LEVEL));
        assert_eq!(
            cfg.analysis.unwrap().model.as_deref(),
            Some(DEFAULT_ANALYSIS_MODEL)
        );
    }

    #[test]
    fn does_not_override_user_values() {
        let cfg = PoseidonConfig {
            server: Some(ServerConfig {
                port: Some(9000),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.port(), 9000);
        assert_eq!(cfg.bind(), DEFAULT_BIND);
    }
}
