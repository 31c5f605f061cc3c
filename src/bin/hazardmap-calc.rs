use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use hazardmap::driver::{self, DriverArgs, ExportArgs};
use hazardmap::errors::Result;
use hazardmap::input::{DEFAULT_DELIMITER, DEFAULT_INFILE};
use hazardmap::output::OError;
use hazardmap::parallelism;
use hazardmap::report;
use hazardmap::symbols::SymbolTables;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::{error, fs, io, process};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input file (delimited text with a header row)
    #[arg(default_value = DEFAULT_INFILE)]
    infile: PathBuf,
    /// Results directory
    #[arg(short, long, default_value = "output")]
    outdir: PathBuf,
    /// Number of worker threads (default: number of CPUs)
    #[arg(short, long, allow_negative_numbers = true)]
    threads: Option<i64>,
    /// Field delimiter
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,
    /// Color and boost rules (JSON)
    #[arg(long)]
    styles: Option<PathBuf>,
    /// Also write the summary as a spreadsheet
    #[arg(long)]
    xlsx: bool,
    /// Produce compact JSON files
    #[arg(long)]
    compact: bool,
    /// How many categories and hotspots to show
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Report errors as a JSON file
    #[arg(long)]
    error_file: Option<String>,
    /// Verbosity
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn document_name(infile: &Path) -> String {
    infile
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "events".to_owned())
}

fn process(args: &Args) -> Result<()> {
    let tables = match &args.styles {
        Some(path) => {
            info!(target: "hazardmap", "read: {}", path.display());
            SymbolTables::load(path)?
        }
        None => SymbolTables::default(),
    };
    let driver_args = DriverArgs {
        infile: &args.infile,
        delimiter: args.delimiter,
        threads: parallelism::worker_count(args.threads),
    };
    let calculated = driver::calc(&driver_args)?;
    let name = document_name(&args.infile);
    let export_args = ExportArgs {
        outdir: &args.outdir,
        name: &name,
        tables: &tables,
        pretty: !args.compact,
        xlsx: args.xlsx,
    };
    driver::write_results(&export_args, &calculated)?;

    for line in report::summary_lines(&calculated.output, args.top) {
        println!("{line}");
    }
    println!("legend:");
    for line in report::legend_lines(&tables) {
        println!("  {line}");
    }
    if let Some(text) = report::side_file(&args.outdir.join(report::TOP_COUNTRIES_FILE)) {
        println!("top countries:");
        print!("{text}");
    }
    println!("markers: {}", calculated.markers());
    Ok(())
}

fn store_error(error_file: &str, e: &dyn error::Error) -> Result<()> {
    let error = OError {
        error: format!("{e}"),
    };
    let file = fs::File::create(error_file)?;
    let writer = io::BufWriter::new(file);
    serde_json::to_writer(writer, &error)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(args.verbose.log_level_filter())
        .init();
    match process(&args) {
        Ok(()) => (),
        Err(e) => {
            match &args.error_file {
                Some(filename) => match store_error(filename, &*e) {
                    Ok(()) => {
                        info!(target: "hazardmap", "error reported: {e}");
                    }
                    Err(e2) => {
                        error!(target: "hazardmap", "{e}");
                        error!(target: "hazardmap", "{e2}");
                    }
                },
                None => error!(target: "hazardmap", "{e}"),
            }
            process::exit(1);
        }
    }
}
