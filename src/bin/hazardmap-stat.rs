use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use hazardmap::driver;
use hazardmap::input::{DEFAULT_DELIMITER, DEFAULT_INFILE, Source};
use hazardmap::parallelism;
use hazardmap::report;
use std::path::PathBuf;

/// Print the profile of an event feed without writing any files
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input file (delimited text with a header row)
    #[arg(default_value = DEFAULT_INFILE)]
    infile: PathBuf,
    /// Number of worker threads (default: number of CPUs)
    #[arg(short, long, allow_negative_numbers = true)]
    threads: Option<i64>,
    /// Field delimiter
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,
    /// How many categories and hotspots to show
    #[arg(long, default_value_t = 20)]
    top: usize,
    /// Print the full summary as JSON instead
    #[arg(long)]
    json: bool,
    /// Verbosity
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(args.verbose.log_level_filter())
        .init();
    let source = Source::read(&args.infile)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("cannot load {}", args.infile.display()))?;
    let threads = parallelism::worker_count(args.threads);
    let calculated = driver::calc_source(&source, args.delimiter, threads)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    if args.json {
        let s = serde_json::to_string_pretty(&calculated.output)?;
        println!("{s}");
    } else {
        println!("columns: {}", calculated.output.columns);
        for line in report::summary_lines(&calculated.output, args.top) {
            println!("{line}");
        }
    }
    Ok(())
}
