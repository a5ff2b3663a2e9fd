//! boundy host binary: replay a recorded device trace through the core.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                     │
//! │                                                           │
//! │  ReplayPlatform        LogEventSink       FileConfig      │
//! │  (Location, Permission, (EventSink)       (ConfigPort)    │
//! │   Proximity, Launcher,                                    │
//! │   Display)                                                │
//! │                                                           │
//! │  ─────────────── Port Trait Boundary ──────────────────   │
//! │                                                           │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │            AppService (pure logic)                  │  │
//! │  │  GeofenceEvaluator · TapDebouncer · launch policy   │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use boundy::adapters::config_file::FileConfig;
use boundy::adapters::log_sink::LogEventSink;
use boundy::adapters::replay::{self, ReplayPlatform, Trace};
use boundy::app::ports::ConfigPort;
use boundy::app::service::AppService;
use boundy::config::AppConfig;

#[derive(Parser)]
#[command(name = "boundy", version, about = "Geofence arrival watcher and triple-tap detector")]
struct Cli {
    /// JSON configuration file (defaults are used when omitted or missing).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded device trace.
    Replay {
        /// Trace file (JSON).
        trace: PathBuf,
    },
    /// Write the default configuration to `path`.
    InitConfig {
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    info!("boundy v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::InitConfig { path } => {
            FileConfig::new(&path)
                .save(&AppConfig::default())
                .with_context(|| format!("writing {}", path.display()))?;
            println!("wrote default configuration to {}", path.display());
        }
        Command::Replay { trace } => {
            let config = match &cli.config {
                Some(path) => FileConfig::new(path)
                    .load()
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => AppConfig::default(),
            };
            let trace = Trace::from_path(&trace)
                .with_context(|| format!("reading trace {}", trace.display()))?;

            let mut app = AppService::new(config).context("building service")?;
            let mut platform = ReplayPlatform::new(&trace.device);
            let mut sink = LogEventSink::new();

            let summary = replay::run(&trace, &mut app, &mut platform, &mut sink);

            println!("arrived:             {}", summary.arrived);
            println!("opened:              {}", summary.opened.join(", "));
            println!("foreground requests: {}", summary.foreground_requests);
            println!("events dispatched:   {}", summary.dispatched);
            if summary.dropped > 0 {
                println!("events dropped:      {}", summary.dropped);
            }
        }
    }

    Ok(())
}
