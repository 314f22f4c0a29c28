//! `brixbar` command line entry point.

mod commands;
mod config;
mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "brixbar", version, about = "Brix gauge and readings client")]
struct Cli {
    /// API base URL (overrides config file and BRIXBAR_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to the config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Animate a Brix value on the gauge.
    Gauge(GaugeArgs),
    /// Manage stored readings.
    Readings {
        #[command(subcommand)]
        command: ReadingsCommand,
    },
    /// Look up plant reference data.
    Plants {
        #[command(subcommand)]
        command: PlantsCommand,
    },
    /// Show aggregate statistics.
    Stats {
        #[arg(long)]
        plant: Option<String>,
    },
    /// Check API health.
    Health,
    /// Print the effective configuration.
    Config {
        /// Write the effective configuration back to the config file.
        #[arg(long)]
        save: bool,
    },
}

#[derive(Debug, Args)]
pub(crate) struct GaugeArgs {
    /// Value to display. Defaults to the latest reading (see --plant).
    pub value: Option<f64>,
    /// Pass threshold. Defaults to the plant's healthy minimum, then the config.
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Full-scale value.
    #[arg(long)]
    pub max: Option<f64>,
    #[arg(long)]
    pub label: Option<String>,
    /// Bar height in pixels; mapped to terminal rows.
    #[arg(long)]
    pub bar_height: Option<f64>,
    /// Plant whose reference data and latest reading feed the gauge.
    #[arg(long)]
    pub plant: Option<String>,
    /// Emit frames as JSON lines instead of drawing.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub(crate) enum ReadingsCommand {
    List {
        #[arg(long)]
        plant: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        plant: String,
        #[arg(long)]
        brix: f64,
        /// Reading date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        plant: Option<String>,
        #[arg(long)]
        brix: Option<f64>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum PlantsCommand {
    List,
    Get { name: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info,brixbar=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let mut cfg = Config::load(&config_path)?;
    cfg.apply_env(|key| std::env::var(key).ok());
    if let Some(url) = cli.api_url {
        cfg.api_base_url = url;
    }
    tracing::debug!(api = %cfg.api_base_url, "configuration loaded");

    let command = cli.command;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        match command {
            Command::Gauge(args) => commands::gauge(&cfg, args).await,
            Command::Readings { command } => commands::readings(&cfg, command).await,
            Command::Plants { command } => commands::plants(&cfg, command).await,
            Command::Stats { plant } => commands::stats(&cfg, plant.as_deref()).await,
            Command::Health => commands::health(&cfg).await,
            Command::Config { save } => commands::show_config(&cfg, &config_path, save),
        }
    })
}
