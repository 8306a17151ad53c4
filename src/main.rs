//! Short Links - A file-backed short link manager
//!
//! Interactive menu over the link engine, with a background expiry sweep.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use short_links::accounts::FileAccountDirectory;
use short_links::cli::App;
use short_links::links::LinkStats;
use short_links::navigator::{EchoNavigator, Navigator, SystemNavigator};
use short_links::{spawn_sweep_task, Config, FileLinkStore, LinkEngine};

#[derive(Parser, Debug)]
#[command(name = "short_links", version, about = "Short links with lifetimes and click limits")]
struct Args {
    /// Path to the KEY=VALUE configuration file
    #[arg(long, default_value = "config.txt")]
    config: PathBuf,

    /// Print resolved targets instead of opening a browser
    #[arg(long)]
    no_browser: bool,
}

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber on stderr
/// 2. Load configuration file, then environment overrides
/// 3. Open link store and account file
/// 4. Start background expiry sweep
/// 5. Run the menu until Exit, end of input or Ctrl+C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with menu output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "short_links=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = Config::load(&args.config).with_env_overrides();
    info!(
        "Configuration loaded: base_url={}, default_ttl={}min, default_max_clicks={}, sweep_interval={}s",
        config.base_url, config.default_ttl_minutes, config.default_max_clicks, config.sweep_interval
    );

    let store = FileLinkStore::open(&config.links_dir).with_context(|| {
        format!("failed to open links directory {}", config.links_dir.display())
    })?;
    let engine = LinkEngine::new(store, config.policy(), config.base_url.clone()).into_shared();

    let accounts = FileAccountDirectory::open(&config.users_file).with_context(|| {
        format!("failed to load accounts from {}", config.users_file.display())
    })?;

    let sweep_handle = spawn_sweep_task(engine.clone(), config.sweep_interval);

    let navigator: Box<dyn Navigator> = if args.no_browser {
        Box::new(EchoNavigator)
    } else {
        Box::new(SystemNavigator)
    };

    let mut app = App::new(
        engine.clone(),
        Box::new(accounts),
        navigator,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );

    let outcome = tokio::select! {
        result = app.run() => result.context("menu loop failed"),
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            Ok(())
        }
    };

    sweep_handle.abort();
    log_stats(&engine.read().await.stats());
    outcome
}

fn log_stats(stats: &LinkStats) {
    if stats.attempts() == 0 {
        return;
    }
    info!(
        "Session stats: {} resolved, {} not found, {} expired, {} over quota, {} swept ({:.0}% success)",
        stats.resolved,
        stats.not_found,
        stats.expired,
        stats.quota_rejected,
        stats.swept,
        stats.success_rate() * 100.0
    );
    if stats.resolved == 0 {
        warn!("No link was resolved successfully this session");
    }
}
