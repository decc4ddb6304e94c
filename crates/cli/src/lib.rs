pub mod commands;
pub mod config;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tally_core::{Dataset, MemorySource};

use crate::commands::campaigns::CampaignArgs;
use crate::commands::customers::CustomerArgs;
use crate::commands::entities::{EntityArgs, EntityDimension};
use crate::commands::overview::OverviewArgs;
use crate::commands::regions::RegionArgs;
use crate::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "tally",
    about = "Group-buy back-office reporting CLI",
    long_about = "Run revenue, refund, trend and dimension reports over a group-buy order ledger extract.",
    after_help = "Examples:\n  tally --data extract.json overview\n  tally --data extract.json campaigns --merge --sort profit-margin\n  tally --data extract.json products --start 2025-01-01 --end 2025-06-30"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to the JSON dataset extract")]
    data: Option<PathBuf>,
    #[arg(long, global = true, help = "Path to the tally.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Global totals, launch-day trends and purchase frequency")]
    Overview(OverviewArgs),
    #[command(about = "Per-campaign report, optionally merging same-named campaigns")]
    Campaigns(CampaignArgs),
    #[command(about = "Roll-up by product")]
    Products(EntityArgs),
    #[command(about = "Roll-up by product type")]
    ProductTypes(EntityArgs),
    #[command(about = "Roll-up by supplier")]
    Suppliers(EntityArgs),
    #[command(about = "Per-customer consumption detail")]
    Customers(CustomerArgs),
    #[command(about = "Order distribution by delivery region")]
    Regions(RegionArgs),
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Loads config and dataset, then dispatches the report command. Returns
/// the rendered JSON so tests can drive the CLI without a subprocess.
pub fn execute(cli: Cli) -> anyhow::Result<String> {
    let config = AppConfig::load(LoadOptions { config_path: cli.config.clone() })?;
    init_tracing(&config);

    let data_path = cli
        .data
        .clone()
        .or_else(|| config.data.path.clone())
        .context("no dataset given: pass --data or set data.path in tally.toml")?;
    let source = load_source(&data_path)?;
    tracing::debug!(dataset = %data_path.display(), "dataset loaded");

    match &cli.command {
        Command::Overview(args) => commands::overview::run(&source, args),
        Command::Campaigns(args) => commands::campaigns::run(&source, &config, args),
        Command::Products(args) => {
            commands::entities::run(&source, &config, EntityDimension::Product, args)
        }
        Command::ProductTypes(args) => {
            commands::entities::run(&source, &config, EntityDimension::ProductType, args)
        }
        Command::Suppliers(args) => {
            commands::entities::run(&source, &config, EntityDimension::Supplier, args)
        }
        Command::Customers(args) => commands::customers::run(&source, &config, args),
        Command::Regions(args) => commands::regions::run(&source, &config, args),
    }
}

fn load_source(path: &std::path::Path) -> anyhow::Result<MemorySource> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read dataset `{}`", path.display()))?;
    let dataset: Dataset = serde_json::from_str(&raw)
        .with_context(|| format!("could not parse dataset `{}`", path.display()))?;

    Ok(MemorySource::new(dataset))
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.clone()));

    // repeated calls (tests drive execute() directly) keep the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
