//! Config validation with field paths in every message.

use crate::schema::PoseidonConfig;
use std::net::IpAddr;
use thiserror::Error;

/// Upload limits above this are accepted but flagged.
pub const LARGE_UPLOAD_WARN_BYTES: usize = 100 * 1024 * 1024;

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &PoseidonConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_logging(config, &mut report);
    validate_analysis(config, &mut report);
    report
}

fn validate_server(config: &PoseidonConfig, report: &mut ValidationReport) {
    let Some(server) = &config.server else { return };
    if server.port == Some(0) {
        report.error("server.port", "Port must be between 1 and 65535");
    }
    if let Some(bind) = &server.bind {
        if bind.trim().is_empty() {
            report.error("server.bind", "Bind address cannot be empty");
        } else if bind.parse::<IpAddr>().is_err() {
            report.error(
                "server.bind",
                format!("Bind address '{bind}' is not an IPv4 or IPv6 address"),
            );
        }
    }
    match server.max_upload_bytes {
        Some(0) => report.error("server.maxUploadBytes", "Upload limit must be non-zero"),
        Some(n) if n > LARGE_UPLOAD_WARN_BYTES => report.warn(
            "server.maxUploadBytes",
            format!("Upload limit of {n} bytes is unusually large"),
        ),
        _ => {}
    }
}

/// Bare directives must be a known level; `target=level` directives pass through.
fn validate_logging(config: &PoseidonConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else {
        return;
    };
    for directive in level.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        if directive.contains('=') {
            continue;
        }
        if !LEVELS.contains(&directive.to_ascii_lowercase().as_str()) {
            report.error("logging.level", format!("Unknown log level '{directive}'"));
        }
    }
}

fn validate_analysis(config: &PoseidonConfig, report: &mut ValidationReport) {
    let Some(analysis) = &config.analysis else { return };
    if analysis.provider.as_deref().is_some_and(|p| p.trim().is_empty()) {
        report.error("analysis.provider", "Provider cannot be empty");
    }
    if analysis.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
        report.error("analysis.model", "Model cannot be empty");
    }
}
