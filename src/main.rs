use clap::Parser;
use log::LevelFilter;

use crate::network::Network;

mod demo;
mod network;

#[derive(Parser)]
#[command(about = "Public transportation station management demo")]
struct Args {
    /// Distance in km for the travel time comparison
    #[arg(long, default_value_t = 120.0)]
    distance: f64,
    /// Also log registry lookups
    #[arg(short, long)]
    verbose: bool,
    /// Only log warnings
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Print the network as JSON once the demo has run
    #[arg(long)]
    json: bool,
}

impl Args {
    fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}

/// Event log on stdout. The level comes from the flags only, never from the
/// environment.
fn logger(level: LevelFilter) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .target(env_logger::Target::Stdout)
        .format_timestamp(None)
        .format_level(false)
        .format_target(false);
    builder
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger(args.level()).init();

    let mut network = Network::new();
    demo::run(&mut network, args.distance)?;

    if args.json {
        println!("\n{}", network.snapshot_json()?);
    }

    println!("\n=== Demo complete ===");
    Ok(())
}
