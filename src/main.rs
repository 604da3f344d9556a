mod benchmark;
mod config;
mod error;
mod http;
mod mirrorlist;
mod report;
mod traits;
mod types;
mod utils;

use anyhow::Result;
use clap::{ArgAction, Parser};
use config::Config;
use http::ReqwestTransport;
use std::path::PathBuf;
use types::Mirror;

#[derive(Parser, Debug)]
#[command(name = "xrankmirror")]
#[command(about = "Rank Void Linux mirrors by download speed", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print xrankmirror version
    #[arg(short, long)]
    version: bool,

    /// List the available regions
    #[arg(long)]
    list_regions: bool,

    /// Filter mirrors by regions, e.g. -r AS or -r AS,EU
    #[arg(short, long, default_value = "")]
    regions: String,

    /// Filter mirrors by tier
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    tier: Option<u8>,

    /// List the available mirrors without benchmarking
    #[arg(short, long)]
    list_mirrors: bool,

    /// Config file (default: ~/.config/xrankmirror/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the mirror list URL
    #[arg(long, value_name = "URL")]
    mirrorlist_url: Option<String>,

    /// Override the per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Override the reference package fetched from each mirror
    #[arg(long, value_name = "FILE")]
    package: Option<String>,

    /// More log output, repeat for debug detail
    #[arg(long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// File/default config with command-line overrides on top
    fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(ref url) = self.mirrorlist_url {
            config.mirrorlist_url = url.clone();
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        if let Some(ref package) = self.package {
            config.package = package.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(cli: &Cli) {
    // RUST_LOG wins over the flags
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("xrankmirror {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_tracing(&cli);
    tracing::debug!(?cli, "arguments parsed");

    let config = cli.resolve_config()?;
    let transport = ReqwestTransport::new(config.timeout())?;

    let mirrors = mirrorlist::fetch_mirrorlist(&transport, &config.mirrorlist_url).await?;
    let mirrors = mirrorlist::enabled_only(mirrors);

    if cli.list_regions {
        println!("{}", report::render_regions(&mirrorlist::available_regions(&mirrors)));
        return Ok(());
    }

    let regions = mirrorlist::parse_regions(&cli.regions);
    let mirrors = mirrorlist::apply_filters(mirrors, &regions, cli.tier)?;

    if cli.list_mirrors {
        println!("{}", report::render_mirrors(&mirrors));
        return Ok(());
    }

    handle_benchmark(&transport, mirrors, &config).await;
    Ok(())
}

async fn handle_benchmark(transport: &ReqwestTransport, mirrors: Vec<Mirror>, config: &Config) {
    println!("Found {} mirrors", mirrors.len());

    let pb = benchmark::progress_bar(mirrors.len());
    let ranked = benchmark::benchmark_mirrors(transport, mirrors, config, &pb).await;

    println!();
    println!("{}", report::render_results(&ranked));
}
