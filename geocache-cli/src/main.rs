//! geocache CLI
//!
//! Runs the caching geocoding server, or performs one-off lookups.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use geocache_api::{ApiConfig, ApiServer, AppState};

/// geocache - caching geocoding and reverse-geocoding facade
#[derive(Parser)]
#[command(name = "geocache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Commands,
}

/// Settings that take precedence over the environment defaults.
#[derive(Args, Debug, Default)]
struct ConfigOverrides {
    /// PositionStack access key
    #[arg(long, global = true, env = "POSITIONSTACK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// PositionStack base URL
    #[arg(long, global = true, env = "POSITIONSTACK_BASE_URL")]
    base_url: Option<String>,

    /// Maximum entries per cache namespace
    #[arg(long, global = true, env = "GEOCACHE_CAPACITY")]
    capacity: Option<usize>,

    /// Entry lifetime in seconds
    #[arg(long, global = true, env = "GEOCACHE_TTL_SECONDS")]
    ttl: Option<u64>,

    /// Address that always skips the cache (empty disables)
    #[arg(long, global = true, env = "GEOCACHE_BYPASS_ADDRESS")]
    bypass: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, global = true, env = "GEOCACHE_UPSTREAM_TIMEOUT_SECONDS")]
    timeout: Option<u64>,

    /// Seconds between background sweeps of expired entries
    #[arg(long, global = true, env = "GEOCACHE_SWEEP_INTERVAL_SECONDS")]
    sweep_interval: Option<u64>,
}

impl ConfigOverrides {
    fn apply(self, mut config: ApiConfig) -> ApiConfig {
        if let Some(api_key) = self.api_key {
            config.upstream.api_key = api_key;
        }
        if let Some(base_url) = self.base_url {
            config.upstream.base_url = base_url;
        }
        if let Some(capacity) = self.capacity {
            config.lookup.cache.capacity = capacity;
        }
        if let Some(ttl) = self.ttl {
            config.lookup.cache.ttl_seconds = ttl;
        }
        if let Some(bypass) = self.bypass {
            config.lookup = config.lookup.with_bypass(bypass);
        }
        if let Some(timeout) = self.timeout {
            config.upstream.timeout_seconds = timeout;
        }
        if let Some(sweep_interval) = self.sweep_interval {
            config.lookup.cache.sweep_interval_seconds = sweep_interval;
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "8080")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Resolve an address to coordinates
    Forward {
        /// Free-text address
        address: String,
    },

    /// Resolve coordinates to an address label
    Reverse {
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so `.env` values reach clap's `env` fallbacks
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let config = cli.overrides.apply(ApiConfig::from_env());
    debug!(lookup = ?config.lookup, base_url = %config.upstream.base_url, "Effective configuration");

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(config, port, &bind).await,
        Commands::Forward { address } => cmd_forward(config, &address).await,
        Commands::Reverse { latitude, longitude } => cmd_reverse(config, latitude, longitude).await,
    }
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        "geocache=debug,info"
    } else {
        "geocache=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

/// Run API server
async fn cmd_serve(config: ApiConfig, port: u16, bind: &str) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let cache = &config.lookup.cache;
    println!("{}", "🚀 Starting geocache API server...".cyan().bold());
    println!("   {} http://{}", "Listening on:".green(), addr);
    println!("   {} http://{}/health", "Health check:".dimmed(), addr);
    println!(
        "   {} {} entries, {}s TTL",
        "Cache:".dimmed(),
        cache.capacity,
        cache.ttl_seconds
    );
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config).context("Invalid server configuration")?;
    server.run(addr).await.context("API server failed")?;

    Ok(())
}

/// Resolve an address once
async fn cmd_forward(config: ApiConfig, address: &str) -> Result<()> {
    println!("{} {}", "🔍 Geocoding:".cyan().bold(), address);

    let state = AppState::new(config).context("Invalid configuration")?;
    let coordinates = state
        .service
        .lookup_forward(address)
        .await
        .context("Failed to geocode address")?;

    println!("\n{}", "✅ Resolved:".green().bold());
    println!("   {} {}", "Latitude:".dimmed(), coordinates.latitude);
    println!("   {} {}", "Longitude:".dimmed(), coordinates.longitude);
    println!("\n{}", serde_json::to_string_pretty(&coordinates)?);

    Ok(())
}

/// Resolve coordinates once
async fn cmd_reverse(config: ApiConfig, latitude: f64, longitude: f64) -> Result<()> {
    println!(
        "{} ({}, {})",
        "🔍 Reverse geocoding:".cyan().bold(),
        latitude,
        longitude
    );

    let state = AppState::new(config).context("Invalid configuration")?;
    let label = state
        .service
        .lookup_reverse(latitude, longitude)
        .await
        .context("Failed to reverse geocode coordinates")?;

    println!("\n{}", "✅ Resolved:".green().bold());
    println!("   {} {}", "Label:".dimmed(), label);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_reverse_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["geocache", "reverse", "-33.8688", "-151.2093"]).unwrap();
        match cli.command {
            Commands::Reverse { latitude, longitude } => {
                assert_eq!(latitude, -33.8688);
                assert_eq!(longitude, -151.2093);
            }
            _ => panic!("expected reverse"),
        }
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = ConfigOverrides {
            api_key: Some("key".into()),
            capacity: Some(5),
            ttl: Some(60),
            bypass: Some(String::new()),
            sweep_interval: Some(15),
            ..Default::default()
        };
        let config = overrides.apply(ApiConfig::default());

        assert_eq!(config.upstream.api_key, "key");
        assert_eq!(config.lookup.cache.capacity, 5);
        assert_eq!(config.lookup.cache.ttl_seconds, 60);
        assert_eq!(config.lookup.bypass_address, None);
        assert_eq!(config.upstream.timeout_seconds, 5);
        assert_eq!(config.lookup.cache.sweep_interval_seconds, 15);
    }

    #[test]
    fn test_sweep_interval_flag() {
        let cli = Cli::try_parse_from(["geocache", "--sweep-interval", "30", "forward", "Paris"]).unwrap();
        assert_eq!(cli.overrides.sweep_interval, Some(30));

        let config = cli.overrides.apply(ApiConfig::default());
        assert_eq!(config.lookup.cache.sweep_interval_seconds, 30);
    }
}
