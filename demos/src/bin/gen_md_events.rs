//! Write a synthetic snapshot + incremental market-data stream to CSV

use clap::Parser;
use demos::{ensure_parent_dir, setup_logger};
use lobstream_rs::{CsvSink, GeneratorConfig, LobEventGenerator};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gen-md-events")]
#[command(about = "Generate a synthetic limit order book event stream")]
struct Args {
    /// Output CSV path
    #[arg(long, default_value = "data/sample_md_big.csv")]
    out: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Total incremental events, snapshot lines not included
    #[arg(long)]
    events: Option<u64>,

    /// Insert a snapshot block every N incrementals
    #[arg(long)]
    snapshot_every: Option<u64>,

    /// Levels per side of the initial book
    #[arg(long)]
    depth: Option<usize>,

    /// Levels per side written in each snapshot (defaults to --depth)
    #[arg(long)]
    snapshot_depth: Option<usize>,

    /// Soft cap for book depth during incrementals
    #[arg(long)]
    max_depth_soft: Option<usize>,

    #[arg(long)]
    base_mid: Option<i64>,

    #[arg(long)]
    tick_size: Option<i64>,

    #[arg(long)]
    spread_ticks: Option<i64>,

    #[arg(long)]
    qty_min: Option<i64>,

    #[arg(long)]
    qty_max: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    start_ts: Option<i64>,

    /// Timestamp increment per CSV line
    #[arg(long)]
    dt_ns: Option<i64>,

    #[arg(long)]
    start_seq: Option<u64>,

    #[arg(long)]
    p_new: Option<f64>,

    #[arg(long)]
    p_change: Option<f64>,

    #[arg(long)]
    p_delete: Option<f64>,

    /// Probability of the mid moving by one tick per incremental
    #[arg(long)]
    p_mid_move: Option<f64>,

    /// Skip sequence numbers every N incrementals (0 disables)
    #[arg(long)]
    gap_every: Option<u64>,

    /// Sequence numbers skipped per gap
    #[arg(long)]
    gap_size: Option<u64>,

    /// Print the final counters as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Args {
    fn build_config(&self) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)?,
            None => GeneratorConfig::default(),
        };

        override_with(&mut config.seed, self.seed);
        override_with(&mut config.events, self.events);
        override_with(&mut config.snapshot_every, self.snapshot_every);
        override_with(&mut config.init_depth, self.depth);
        override_with(&mut config.max_depth_soft, self.max_depth_soft);
        override_with(&mut config.base_mid, self.base_mid);
        override_with(&mut config.tick_size, self.tick_size);
        override_with(&mut config.spread_ticks, self.spread_ticks);
        override_with(&mut config.qty_min, self.qty_min);
        override_with(&mut config.qty_max, self.qty_max);
        override_with(&mut config.start_ts, self.start_ts);
        override_with(&mut config.dt_ns, self.dt_ns);
        override_with(&mut config.start_seq, self.start_seq);
        override_with(&mut config.p_new, self.p_new);
        override_with(&mut config.p_change, self.p_change);
        override_with(&mut config.p_delete, self.p_delete);
        override_with(&mut config.p_mid_move, self.p_mid_move);
        override_with(&mut config.gap_every, self.gap_every);
        override_with(&mut config.gap_size, self.gap_size);
        if self.snapshot_depth.is_some() {
            config.snapshot_depth = self.snapshot_depth;
        }
        Ok(config)
    }
}

fn override_with<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger();

    let args = Args::parse();
    let out = &args.out;
    let config = args.build_config()?;

    // Fail on bad parameters before touching the filesystem
    config.validate()?;
    ensure_parent_dir(out)?;
    let sink = CsvSink::create(out)?;

    let mut generator = LobEventGenerator::new(config, sink)?;
    let stats = generator.run()?;
    drop(generator.into_sink());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "Wrote {} lines to {} ({} snapshots, {} incrementals, {} gaps)",
            stats.lines + 1,
            out.display(),
            stats.snapshots,
            stats.incrementals,
            stats.gaps
        );
    }
    Ok(())
}
