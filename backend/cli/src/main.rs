mod extract_cmd;
mod status_cmd;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use poseidon_config::{config_dir, config_file_path, load_and_prepare, ConfigOverrides, PoseidonConfig};
use poseidon_core::{DynamicFallback, FallbackSource};
use poseidon_gateway::{start_server, AppState};
use poseidon_logging::{init_logger, ConsoleTarget, LogSettings};
use poseidon_understanding::{DeepSeekAnalyzer, OcrService};

#[derive(Parser)]
#[command(name = "poseidon")]
#[command(about = "Poseidon: image OCR and analysis intake service")]
#[command(version)]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, global = true, env = "POSEIDON_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query a running server's health endpoint
    Status,
    /// Run OCR on an image file and print the result
    Ocr { file: PathBuf },
    /// Run image analysis on a file and print the result
    Analyze { file: PathBuf },
}

impl Commands {
    /// Command-line values that must pass through validation with the rest of the config.
    fn overrides(&self) -> ConfigOverrides {
        match self {
            Commands::Serve { port } => ConfigOverrides { port: *port },
            _ => ConfigOverrides::default(),
        }
    }

    fn console(&self) -> ConsoleTarget {
        match self {
            Commands::Serve { .. } => ConsoleTarget::Stdout,
            _ => ConsoleTarget::Stderr,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let prepared = load_and_prepare(&path, &cli.command.overrides()).await?;

    init_logger(&log_settings(&prepared.config, cli.command.console()))?;
    prepared.log_report();
    let config = prepared.config;

    match cli.command {
        Commands::Serve { .. } => run_server(config).await?,
        Commands::Status => status_cmd::run(&config).await?,
        Commands::Ocr { file } => extract_cmd::ocr(&config, &file, &mut std::io::stdout()).await?,
        Commands::Analyze { file } => {
            extract_cmd::analyze(&config, &file, &mut std::io::stdout()).await?
        }
    }

    Ok(())
}

fn log_settings(config: &PoseidonConfig, console: ConsoleTarget) -> LogSettings {
    LogSettings {
        level: config.log_level().to_string(),
        json: config.log_json(),
        dir: config.log_dir().cloned(),
        file_prefix: config.log_file_prefix().to_string(),
        console,
    }
}

/// OCR and analysis wired over the dynamic fallback generator.
pub(crate) fn build_state(config: &PoseidonConfig) -> AppState {
    let fallback: Arc<dyn FallbackSource> = Arc::new(DynamicFallback);
    let analyzer = DeepSeekAnalyzer::new(fallback.clone())
        .with_model(config.analysis_provider(), config.analysis_model());
    AppState::new(Arc::new(OcrService::new(fallback)), Arc::new(analyzer))
}

async fn run_server(config: PoseidonConfig) -> Result<()> {
    let addr = config
        .listen_addr()
        .with_context(|| format!("Invalid listen address: {}:{}", config.bind(), config.port()))?;

    info!(
        addr = %addr,
        max_upload_bytes = config.max_upload_bytes(),
        provider = %config.analysis_provider(),
        model = %config.analysis_model(),
        "Starting Poseidon"
    );

    start_server(addr, build_state(&config), config.max_upload_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_port() {
        let cli = Cli::try_parse_from(["poseidon", "serve", "--port", "10001"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: Some(10001) }));
    }

    #[test]
    fn parses_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["poseidon", "ocr", "scan.png", "--config", "/tmp/p.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/p.yaml")));
        assert!(matches!(cli.command, Commands::Ocr { .. }));
    }

    #[test]
    fn serve_port_flag_becomes_override() {
        let cli = Cli::try_parse_from(["poseidon", "serve", "-p", "4242"]).unwrap();
        assert_eq!(cli.command.overrides().port, Some(4242));
        let status = Cli::try_parse_from(["poseidon", "status"]).unwrap();
        assert_eq!(status.command.overrides().port, None);
    }

    #[test]
    fn serve_port_zero_fails_validation() {
        let cli = Cli::try_parse_from(["poseidon", "serve", "--port", "0"]).unwrap();
        let result = poseidon_config::prepare(
            serde_json::json!({}),
            &std::collections::HashMap::new(),
            &cli.command.overrides(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn one_shot_commands_log_to_stderr() {
        let ocr = Cli::try_parse_from(["poseidon", "ocr", "scan.png"]).unwrap();
        assert_eq!(ocr.command.console(), ConsoleTarget::Stderr);
        let serve = Cli::try_parse_from(["poseidon", "serve"]).unwrap();
        assert_eq!(serve.command.console(), ConsoleTarget::Stdout);
    }

    #[test]
    fn log_settings_follow_config() {
        let cfg = poseidon_config::apply_all_defaults(PoseidonConfig::default());
        let settings = log_settings(&cfg, ConsoleTarget::Stderr);
        assert_eq!(settings.level, "info");
        assert!(!settings.json);
        assert!(settings.dir.is_none());
        assert_eq!(settings.console, ConsoleTarget::Stderr);
    }
}
