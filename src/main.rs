use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use excelsplit::{
    SplitEvent, SplitOptions, SplitOutcome, SplitThreshold, Splitter, DEFAULT_ROWS_PER_FILE,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "excelsplit")]
#[command(about = "Split an XLSX worksheet into files of at most N data rows", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the .xlsx file to split
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Maximum number of data rows per output file
    #[arg(
        short,
        long,
        value_name = "N",
        default_value_t = DEFAULT_ROWS_PER_FILE as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    rows_per_file: u64,

    /// Count the header row when deciding whether the file needs splitting
    #[arg(long)]
    count_header: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let rows_per_file =
        usize::try_from(cli.rows_per_file).context("Rows per file does not fit this platform")?;
    let mut options = SplitOptions::new(rows_per_file)?;
    if cli.count_header {
        options = options.with_threshold(SplitThreshold::TotalRows);
    }

    let outcome = Splitter::new(options)
        .split_with_progress(&cli.file, print_event)
        .with_context(|| "Failed to split workbook")?;

    match outcome {
        SplitOutcome::NotNeeded { total_rows } => {
            println!("No split needed: {} rows fit in a single file", total_rows);
        }
        SplitOutcome::Split { files, .. } => {
            println!("\n✓ Split complete: {} files written", files.len());
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_event(event: &SplitEvent) {
    match event {
        SplitEvent::Started {
            file_name,
            rows_per_file,
        } => {
            println!("Processing '{}'", file_name);
            println!("Each output file holds at most {} data rows", rows_per_file);
        }
        SplitEvent::Loaded {
            sheet_name,
            total_rows,
        } => {
            println!("Sheet '{}' has {} rows", sheet_name, total_rows);
        }
        SplitEvent::Planned { file_count } => {
            println!("Splitting into {} files", file_count);
        }
        SplitEvent::ChunkWritten {
            path, data_rows, ..
        } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            println!("  ✓ {} ({} rows)", name, data_rows);
        }
    }
}
