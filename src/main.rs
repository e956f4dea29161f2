use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use shopify_export::config::{ShopifyConfig, initialize};
use shopify_export::fetcher::ShopifyClient;
use shopify_export::pipeline;

#[derive(Parser, Debug)]
#[command(name = "shopify-export")]
#[command(about = "Export shop products as flat JSON, CSV and SQL", long_about = None)]
struct Args {
    /// Directory receiving snapshots and exports
    #[arg(long, short = 'o', env = "OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch all products over REST and write raw and flattened outputs
    Rest,
    /// Flatten a saved REST snapshot (no credentials needed)
    Transform {
        /// Snapshot to read (default: <output-dir>/products_rest.json)
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Save a raw GraphQL product snapshot
    Graphql,
    /// Run rest, transform and graphql in sequence
    All,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    initialize(&args.output_dir).context("Failed to prepare output directory")?;

    match args.command {
        Command::Rest => {
            let (config, client) = connect()?;
            pipeline::run_rest(&config, &client, &args.output_dir)?;
        }
        Command::Transform { input } => {
            pipeline::run_transform(input.as_deref(), &args.output_dir)?;
        }
        Command::Graphql => {
            let (config, client) = connect()?;
            pipeline::run_graphql(&config, &client, &args.output_dir)?;
        }
        Command::All => {
            let (config, client) = connect()?;
            info!("Running rest...");
            pipeline::run_rest(&config, &client, &args.output_dir)?;
            info!("Running transform...");
            pipeline::run_transform(None, &args.output_dir)?;
            info!("Running graphql...");
            pipeline::run_graphql(&config, &client, &args.output_dir)?;
        }
    }

    Ok(())
}

fn connect() -> Result<(ShopifyConfig, ShopifyClient)> {
    let config = ShopifyConfig::from_env()
        .context("SHOP or SHOPIFY_ADMIN_TOKEN not set correctly; set them in a .env file or the environment")?;
    let client = ShopifyClient::new(&config)?;
    Ok((config, client))
}
