//! Write a flat trade-tick stream to CSV

use clap::Parser;
use demos::{ensure_parent_dir, setup_logger};
use lobstream_rs::{CsvSink, TickConfig, TickGenerator};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gen-ticks")]
#[command(about = "Generate a random-walk trade tick stream")]
struct Args {
    #[arg(long, default_value = "data/sample_ticks_big.csv")]
    out: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks
    #[arg(long, default_value_t = 1_000_000)]
    n: u64,

    #[arg(long, default_value_t = 1_700_000_000_000_000_000)]
    start_ts: i64,

    #[arg(long, default_value_t = 1_000)]
    dt_ns: i64,

    #[arg(long, default_value_t = 100_000)]
    base_price: i64,

    /// Distance between bid and ask trade prices
    #[arg(long, default_value_t = 100)]
    spread: i64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger();

    let args = Args::parse();
    let config = TickConfig {
        seed: args.seed,
        n: args.n,
        start_ts: args.start_ts,
        dt_ns: args.dt_ns,
        base_price: args.base_price,
        spread: args.spread,
    };

    let generator = TickGenerator::new(config)?;
    ensure_parent_dir(&args.out)?;
    let mut sink = CsvSink::create(&args.out)?;
    let written = generator.write_to(&mut sink)?;

    println!("Wrote {} ticks to {}", written, args.out.display());
    Ok(())
}
