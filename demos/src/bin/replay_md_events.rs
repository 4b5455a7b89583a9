//! Rebuild the book from a generated CSV stream and report what was seen

use clap::Parser;
use demos::setup_logger;
use lobstream_rs::BookBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "replay-md-events")]
#[command(about = "Replay a market-data event stream through a reference book builder")]
struct Args {
    /// Input CSV path
    #[arg(default_value = "data/sample_md_big.csv")]
    input: PathBuf,

    /// Print the top of book every N lines (0 disables)
    #[arg(long, default_value_t = 0)]
    top_every: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger();

    let args = Args::parse();
    let reader = BufReader::with_capacity(1 << 20, File::open(&args.input)?);

    let mut builder = BookBuilder::new();
    let mut line_count = 0u64;
    for line in reader.lines() {
        builder.on_line(&line?);
        line_count += 1;

        if args.top_every > 0 && line_count % args.top_every == 0 && builder.book_valid() {
            if let Some(top) = builder.book().top() {
                info!(
                    "line {}: {}@{} / {}@{}",
                    line_count, top.bid_qty, top.bid_price, top.ask_qty, top.ask_price
                );
            }
        }
    }

    let stats = builder.stats();
    println!("lines:        {}", line_count);
    println!("state:        {:?}", builder.state());
    println!("last_seq:     {:?}", stats.last_seq);
    println!("snapshots:    {}", stats.snapshot_count);
    println!("applied:      {}", stats.applied_count);
    println!("gaps:         {}", stats.gap_count);
    println!("dup_or_old:   {}", stats.dup_or_old_count);
    println!("anomalies:    {}", stats.anomaly_count);
    println!("crossed:      {}", stats.crossed_count);
    println!("malformed:    {}", stats.malformed_count);
    if let Some(top) = builder.book().top() {
        println!(
            "top:          {}@{} / {}@{}",
            top.bid_qty, top.bid_price, top.ask_qty, top.ask_price
        );
    }
    Ok(())
}
