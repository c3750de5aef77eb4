//! CLI Status Command
//!
//! Probes `/health` on the configured port.

use anyhow::Result;
use poseidon_config::PoseidonConfig;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

pub async fn run(config: &PoseidonConfig) -> Result<()> {
    let url = health_url(config);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(resp) => println!("Poseidon answered {} at {}", resp.status(), url),
        Err(_) => println!("Poseidon is not running on port {}", config.port()),
    }
    Ok(())
}

/// Wildcard bind addresses are probed through loopback.
fn health_url(config: &PoseidonConfig) -> String {
    let addr = match config.listen_addr() {
        Ok(addr) if !addr.ip().is_unspecified() => addr,
        _ => SocketAddr::new(Ipv4Addr::LOCALHOST.into(), config.port()),
    };
    format!("http://{addr}/health")
}

#[cfg(test)]
mod tests {
    use super::*;
    use poseidon_config::ServerConfig;

    #[test]
    fn wildcard_bind_uses_loopback() {
        let url = health_url(&PoseidonConfig::default());
        assert_eq!(url, "http://127.0.0.1:10000/health");
    }

    #[test]
    fn explicit_bind_is_kept() {
        let cfg = PoseidonConfig {
            server: Some(ServerConfig {
                bind: Some("10.0.0.5".into()),
                port: Some(8088),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(health_url(&cfg), "http://10.0.0.5:8088/health");
    }

    #[test]
    fn ipv6_bind_is_bracketed() {
        let cfg = PoseidonConfig {
            server: Some(ServerConfig {
                bind: Some("::1".into()),
                port: Some(8088),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(health_url(&cfg), "http://[::1]:8088/health");
    }

    #[test]
    fn ipv6_wildcard_uses_loopback() {
        let cfg = PoseidonConfig {
            server: Some(ServerConfig {
                bind: Some("::".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(health_url(&cfg), "http://127.0.0.1:10000/health");
    }
}
