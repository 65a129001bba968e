//! site-mirror main entry point
//!
//! Command-line interface for the single-site mirroring crawler.

use clap::Parser;
use site_mirror::config::Settings;
use site_mirror::crawler::{build_http_client, CrawlEngine};
use site_mirror::seed::{SeedRules, SeedSet};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mirrors a single public website to local storage
#[derive(Parser, Debug)]
#[command(name = "site-mirror", version)]
#[command(about = "Mirrors a single website to local storage", long_about = None)]
struct Cli {
    /// Root URL of the site to mirror
    #[arg(long, env = "MIRROR_SITE_ROOT", value_name = "URL")]
    site_root: Option<String>,

    /// Directory the mirrored files are written under
    #[arg(long, default_value = ".", value_name = "DIR")]
    output_dir: PathBuf,

    /// Write log output to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log level: debug, info, warn or error
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    verbose: bool,

    /// Seconds to sleep between requests (politeness delay)
    #[arg(long, default_value_t = 0.0, value_name = "SECONDS")]
    request_interval: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let settings = Settings::new(
        cli.site_root.as_deref(),
        cli.output_dir.clone(),
        cli.request_interval,
    )?;
    tracing::info!(
        "Mirroring {} into {}",
        settings.site_root,
        settings.output_dir.display()
    );

    let client = build_http_client()?;

    tracing::info!("Building seed set from the site catalog");
    let seeds = SeedSet::discover(&client, &settings.site_root, &SeedRules::default()).await?;
    tracing::info!(
        "Seed set ready: {} start urls, {} blacklist prefixes",
        seeds.start_urls.len(),
        seeds.blacklist_prefixes.len()
    );

    let mut engine = CrawlEngine::new(&settings, seeds, client)?;
    let report = engine.run().await;
    tracing::info!(
        "Mirror finished: {} pages fetched, {} failures",
        report.fetched,
        report.failed
    );

    Ok(())
}

/// Sets up the tracing subscriber: stdout by default, a file when requested
fn setup_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.verbose {
        "debug"
    } else {
        cli.log_level.as_str()
    };
    let filter = match level {
        "debug" | "info" | "warn" | "error" => EnvFilter::new(level),
        other => anyhow::bail!("unknown log level '{}'", other),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.init(),
    }
    Ok(())
}
