use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use verlog::domain::{load_change_log, ChangeLog};
use verlog::{load_config, ui, VersionState};

#[derive(clap::Parser)]
#[command(
    name = "verlog",
    about = "Render a semantic-versioned change log as boxed text"
)]
struct Args {
    #[arg(help = "Change log file ([[change]] tables in TOML)")]
    changelog: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Override the current version")]
    set_version: Option<String>,

    #[arg(long, help = "Print only the current version and exit")]
    current: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() {
    init_tracing();

    if let Err(e) = run(Args::parse()) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Console logging to stderr, controlled by RUST_LOG (default: warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    if args.version {
        println!("verlog {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = load_config(args.config.as_deref()).context("Error loading config")?;

    let log = match args.changelog.as_deref() {
        Some(path) => load_change_log(path)
            .with_context(|| format!("Failed to read change log '{}'", path))?,
        None => ChangeLog::new(),
    };

    let mut state = VersionState::new();
    if let Some(version) = args.set_version.as_deref() {
        state.set(version)?;
    }

    let current = state.current_version_string(&log)?;
    if args.current {
        println!("{}", current);
        return Ok(());
    }

    ui::print_change_log(&log, &config)?;
    if !current.is_empty() {
        println!("current version: {}", current);
    }
    Ok(())
}
