//! lrudemo - walk through LRU cache behaviour from the command line

mod report;
mod walkthrough;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use crate::report::Format;
use crate::walkthrough::CostMode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity in cost units
    #[arg(short, long, default_value_t = 4)]
    capacity: i64,

    /// Total number of keys to insert
    #[arg(short, long, default_value_t = 6)]
    entries: usize,

    /// How entries are weighed
    #[arg(long, value_enum, default_value_t = CostMode::Unit)]
    cost: CostMode,

    /// Also fill a sharded cache with this many shards
    #[arg(long, default_value_t = 0)]
    shards: usize,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    if args.capacity <= 0 {
        bail!("capacity must be positive, got {}", args.capacity);
    }

    info!("Starting lrudemo v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", args.capacity);
    info!("Cost mode: {:?}", args.cost);

    let format = if args.json { Format::Json } else { Format::Text };
    for line in walkthrough::run(args.capacity, args.entries, args.cost, format)? {
        println!("{}", line);
    }

    if args.shards > 0 {
        println!(
            "{}",
            walkthrough::run_sharded(args.capacity, args.shards, args.entries)?
        );
    }

    Ok(())
}
