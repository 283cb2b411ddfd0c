//! sporedis demo
//!
//! Loads sample customers and sporting events into the configured store,
//! then looks events up by key, by full scan, and through both facet
//! indexes.
//!
//! Usage:
//!   sporedis-demo --config sporedis.toml --prefix oly

use anyhow::Result;
use clap::Parser;
use sporedis_demo::{Demo, SporedisConfig};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "sporedis-demo")]
#[command(about = "Faceted search over a key-value store")]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, default_value = "sporedis.toml")]
    config: PathBuf,

    /// Key prefix (overrides config)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Key part separator (overrides config)
    #[arg(short, long)]
    separator: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let mut config = SporedisConfig::load_from(&args.config);
    if let Some(prefix) = args.prefix {
        config.keys.prefix = prefix;
    }
    if let Some(separator) = args.separator {
        config.keys.separator = separator;
    }
    info!(
        "Key prefix {:?}, separator {:?}",
        config.keys.prefix, config.keys.separator
    );

    let demo = Demo::open(&config).await?;
    demo.load_samples().await?;
    let report = demo.run().await?;

    println!("customers");
    for customer in &report.customers {
        println!("  {customer}");
    }

    println!("get by key 123-ABC-723");
    println!("  {}", report.event);

    println!("greedy search Nippon Budokan");
    for sku in &report.greedy_budokan {
        println!("  {sku}");
    }

    println!("facet search Nippon Budokan");
    print_sorted(&report.facet_budokan);

    println!("hashed facet search Olympic Stadium");
    print_sorted(&report.hashed_olympic);

    Ok(())
}

fn print_sorted(ids: &HashSet<String>) {
    let mut ids: Vec<&String> = ids.iter().collect();
    ids.sort();
    for id in ids {
        println!("  {id}");
    }
}
