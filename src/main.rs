use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use feed_reader::feed::{self, Fetcher};
use feed_reader::{api, Config};

#[derive(Parser, Debug)]
#[command(
    name = "feed-reader",
    version,
    about = "Reads RSS feeds and returns their items with structured descriptions"
)]
struct Args {
    /// Path to a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the listen address (e.g. 0.0.0.0:8080)
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Read one feed and print it
    Read {
        /// Feed URL
        url: String,

        /// Print the legacy `/feed/read` body instead of JSON
        #[arg(long)]
        legacy: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    Ok(config)
}

async fn read_once(config: &Config, url: &str, legacy: bool) -> Result<()> {
    let fetcher = Fetcher::new(&config.fetch).context("Failed to build HTTP client")?;
    let parsed = feed::read_feed(&fetcher, url).await?;

    let output = if legacy {
        feed::to_text(&parsed)?
    } else {
        serde_json::to_string_pretty(&feed::to_dict(&parsed))?
    };
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    tracing::debug!(?config, "Effective configuration");

    match args.command {
        Some(Command::Read { ref url, legacy }) => read_once(&config, url, legacy).await,
        Some(Command::Serve) | None => api::start_api_server(Arc::new(config))
            .await
            .context("API server failed"),
    }
}
