use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use clap::Parser;
use log::{info, warn};
use ancestry_clusters::{
    ClusteringConfig,
    Result,
    StagedOutput,
    io::{combine_files, find_cluster_files, combine::CombineStats},
    utils::logger::init_logging,
};

/// Combine per-sample cluster files into one table tagged with a filename column.
#[derive(Parser, Debug)]
#[command(name = "combine_clusters", version)]
struct Args {
    /// Substring the cluster file names must contain
    #[arg(short = 'S', long)]
    suffix: String,

    /// Combined output table
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Directory to search
    #[arg(short = 'd', long, default_value = ".")]
    dir: PathBuf,

    /// INI configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn main() -> Result<()> {
    let started = Instant::now();
    let args = Args::parse();
    let config = ClusteringConfig::load_or_default(args.config.as_ref())?;

    init_logging(
        "combine_clusters",
        config.processor.get_log_level(),
        config.files.log_dir.as_deref(),
    )?;
    config.log_warnings();

    let mut files = find_cluster_files(&args.dir, &args.suffix)?;
    files.retain(|f| !is_same_file(f, &args.output));

    if files.is_empty() {
        warn!("No CSV files with '{}' suffix found in {:?}", args.suffix, args.dir);
        return Ok(());
    }

    let mut output = StagedOutput::new();
    let mut combined = CombineStats::default();
    output.stage(&args.output, |writer| {
        combined = combine_files(&files, writer)?;
        Ok(())
    })?;
    output.commit()?;

    info!(
        "Combined {} rows from {} files into {:?}",
        combined.rows, combined.files, args.output
    );
    info!("Total execution time: {:.2} seconds", started.elapsed().as_secs_f64());
    Ok(())
}
