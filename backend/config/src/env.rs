//! Environment variable handling for config values.
//!
//! `${VAR_NAME}` in string values is resolved at load time. Only uppercase
//! `[A-Z_][A-Z0-9_]*` names are matched, and `$${VAR}` escapes to a literal
//! `${VAR}`. Separately, a few well-known variables (`PORT`, `POSEIDON_BIND`)
//! override the server section after parsing.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{PoseidonConfig, ServerConfig};
use crate::validation::ValidationReport;

/// A var reference, optionally preceded by the escaping `$`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var pattern"));

pub const PORT_VAR: &str = "PORT";
pub const BIND_VAR: &str = "POSEIDON_BIND";

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references across a config value tree using the process env.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute `${VAR}` references using a provided map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                out.insert(k.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for caps in ENV_VAR_PATTERN.captures_iter(s) {
        let Some(whole) = caps.get(0) else { continue };
        let name = &caps[1];
        out.push_str(&s[last..whole.start()]);
        last = whole.end();

        if whole.as_str().starts_with("$$") {
            out.push_str(&format!("${{{name}}}"));
            continue;
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => out.push_str(val),
            _ => bail!(MissingEnvVarError {
                var_name: name.to_string(),
                config_path: path.to_string(),
            }),
        }
    }
    out.push_str(&s[last..]);
    Ok(out)
}

/// Apply server overrides from a provided env map.
///
/// An unparsable `PORT` is ignored and recorded as a warning in `report`.
pub fn apply_env_overrides(
    mut config: PoseidonConfig,
    env: &HashMap<String, String>,
    report: &mut ValidationReport,
) -> PoseidonConfig {
    if let Some(raw) = env.get(PORT_VAR).filter(|v| !v.trim().is_empty()) {
        match raw.trim().parse::<u16>() {
            Ok(port) => {
                config.server.get_or_insert_with(ServerConfig::default).port = Some(port);
            }
            Err(_) => report.warn(
                "server.port",
                format!("Ignoring unparsable {PORT_VAR} override '{raw}'"),
            ),
        }
    }
    if let Some(bind) = env.get(BIND_VAR).filter(|v| !v.trim().is_empty()) {
        config.server.get_or_insert_with(ServerConfig::default).bind = Some(bind.trim().to_string());
    }
    config
}
