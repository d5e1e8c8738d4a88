use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hopper_core::{
    cache::DataCache,
    config::AppConfig,
    pools::PoolSelector,
    source::{HttpClient, HttpClientConfig, HttpStatsSource},
};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
use commands::{print_endpoints, print_ranking, watch, OutputFormat};

#[derive(Parser)]
#[command(name = "hopper-cli")]
#[command(about = "Hopper CLI - ranks configured mining pools by current profitability")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (defaults to `HOPPER_CONFIG` or `config/config.toml`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Account file, overriding `accounts.path` from the config
    #[arg(long, global = true)]
    accounts: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank configured pools by utility, best first
    Rank {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the ranked, flattened endpoint list
    Endpoints {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Re-rank periodically until interrupted
    Watch {
        /// Seconds between ranking passes
        #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: u64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Initializes the logging system based on the configuration.
///
/// Logs go to stderr so that stdout carries only command output.
fn init_logging(config: &AppConfig) {
    let filter = if let Ok(env_filter) = std::env::var("RUST_LOG") {
        if env_filter == "debug" {
            EnvFilter::new("warn,hopper_core=debug,hopper_cli=debug")
        } else if env_filter == "trace" {
            EnvFilter::new("warn,hopper_core=trace,hopper_cli=trace")
        } else {
            EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| EnvFilter::new("warn,hopper_core=debug,hopper_cli=debug"))
        }
    } else {
        EnvFilter::try_new(format!(
            "warn,hopper_core={level},hopper_cli={level}",
            level = config.logging.level
        ))
        .unwrap_or_else(|_| EnvFilter::new("warn,hopper_core=info,hopper_cli=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .with_target(false);
        registry.with(fmt_layer).init();
    }
}

/// Wires the HTTP sources, the shared cache and the selector together.
fn build_selector(config: &AppConfig) -> Result<PoolSelector> {
    let fetch_timeout_ms = config.cache.fetch_timeout_seconds.saturating_mul(1_000);
    let client = HttpClient::with_config(HttpClientConfig {
        request_timeout_ms: fetch_timeout_ms,
        ..HttpClientConfig::default()
    })
    .context("failed to build HTTP client")?;

    let source = HttpStatsSource::new(
        client,
        config.sources.difficulty_url.clone(),
        config.sources.stats_url.clone(),
    );
    let cache = Arc::new(DataCache::new(&config.cache, Arc::new(source)));

    let selector = PoolSelector::load(&config.accounts.path, cache)
        .with_context(|| format!("cannot load accounts from {}", config.accounts.path.display()))?;
    info!(pools = selector.pools().len(), "accounts loaded");
    Ok(selector)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .context("failed to load configuration")?;
    if let Some(accounts) = cli.accounts {
        config.accounts.path = accounts;
    }
    config.validate().map_err(|e| anyhow::anyhow!("Configuration validation failed: {e}"))?;

    init_logging(&config);
    debug!(
        difficulty_url = %config.sources.difficulty_url,
        stats_url = %config.sources.stats_url,
        accounts = %config.accounts.path.display(),
        "Configuration loaded"
    );

    let selector = build_selector(&config)?;

    match cli.command {
        Commands::Rank { json } => {
            print_ranking(&selector, OutputFormat::from_json_flag(json)).await
        }
        Commands::Endpoints { json } => {
            print_endpoints(&selector, OutputFormat::from_json_flag(json)).await
        }
        Commands::Watch { interval_secs, json } => {
            watch(&selector, Duration::from_secs(interval_secs), OutputFormat::from_json_flag(json))
                .await
        }
    }
}
