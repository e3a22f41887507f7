//! tsv-extremes - print the shortest and longest value of column 2 in a TSV file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use tsv_extremes::{ScanFlags, ScanOptions, scan_path};

/// Find the shortest and longest value (by byte length) in column 2 of a
/// tab-separated file.
#[derive(Parser)]
#[command(name = "tsv-extremes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Tab-separated input file
    path: PathBuf,

    /// Bytes requested per read
    #[arg(long, default_value_t = 1024)]
    chunk_bytes: usize,

    /// Largest target value that can be assembled, in bytes
    #[arg(long, default_value_t = 1024)]
    field_capacity: usize,

    /// Largest value that can be kept as an extreme, in bytes
    #[arg(long, default_value_t = 512)]
    value_capacity: usize,

    /// Do not capture from the first row
    #[arg(long)]
    skip_header: bool,

    /// Fail on rows that end before column 2
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let mut flags = ScanFlags::empty();
    flags.set(ScanFlags::SKIP_HEADER, cli.skip_header);
    flags.set(ScanFlags::STRICT_ROWS, cli.strict);
    let opts = ScanOptions {
        chunk_bytes: cli.chunk_bytes,
        field_capacity: cli.field_capacity,
        value_capacity: cli.value_capacity,
        flags,
    };

    info!(path = %cli.path.display(), "scanning");
    let result = scan_path(&cli.path, &opts)
        .with_context(|| format!("failed to scan {}", cli.path.display()))?;

    println!("shortest: {}", result.shortest.as_deref().unwrap_or("<none>"));
    println!("longest: {}", result.longest.as_deref().unwrap_or("<none>"));
    Ok(())
}
