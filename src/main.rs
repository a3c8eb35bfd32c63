//! catalyst - single-endpoint AI model gateway
//!
//! Relays `GET /api?model=..&q=..` to one upstream provider and serves a
//! live dashboard of request counters.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalyst::config::Config;
use catalyst::proxy::run_server;
use catalyst::router::ModelResolver;

#[derive(Parser)]
#[command(name = "catalyst")]
#[command(about = "Single-endpoint AI model gateway with live request counters")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server
    Serve {
        /// Path to configuration file (defaults to ./catalyst.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override listen address
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Validate configuration and print the effective settings
    Check {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show accepted models and the upstream model each one is sent as
    Models {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalyst=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, listen } => {
            tracing::info!(config = ?config, "Loading configuration");
            let mut config = Config::load(config.as_deref())?;

            if let Some(addr) = listen {
                tracing::info!(listen = %addr, "Override listen address");
                config.server.listen = addr;
            }

            run_server(config).await
        }

        Commands::Check { config } => {
            let config = Config::load(config.as_deref())?;
            println!("Configuration OK");
            println!("  listen:        {}", config.server.listen);
            println!("  upstream:      {}", config.upstream.url);
            println!("  timeout:       {}s", config.upstream.timeout_secs);
            println!("  default model: {}", config.models.default);
            println!("  models:        {}", config.models.available.join(", "));
            Ok(())
        }

        Commands::Models { config } => {
            let config = Config::load(config.as_deref())?;
            let resolver = ModelResolver::new(&config.models);
            println!("{:<16} {:<16}", "MODEL", "UPSTREAM MODEL");
            for model in resolver.models() {
                let marker = if model == resolver.default_model() {
                    " (default)"
                } else {
                    ""
                };
                println!(
                    "{:<16} {:<16}{}",
                    model,
                    resolver.upstream_model(model),
                    marker
                );
            }
            Ok(())
        }
    }
}
