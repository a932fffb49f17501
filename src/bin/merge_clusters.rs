use std::path::PathBuf;
use std::time::Instant;
use clap::Parser;
use log::info;
use ancestry_clusters::{
    ClusterMerger,
    ClusteringConfig,
    ParseMetrics,
    ProcessingManager,
    Result,
    StagedOutput,
    io::{read_clusters, write_merged},
    utils::logger::init_logging,
};

/// Combine consecutive clusters with the same ancestry, ignoring shorter
/// clusters of a different ancestry in between.
#[derive(Parser, Debug)]
#[command(name = "merge_clusters", version)]
struct Args {
    /// Tab-delimited cluster table with Chromosome, Start, End, Ancestry and filename columns
    #[arg(short = 'I', long)]
    input: PathBuf,

    /// Output table
    #[arg(short = 'O', long, default_value = "combined_clusters.txt")]
    output: PathBuf,

    /// Interlopers with End - Start below this are ignored
    #[arg(short = 'N', long, value_parser = clap::value_parser!(i64).range(0..))]
    threshold: Option<i64>,

    /// INI configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Merge groups on a thread pool
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (0 = one per CPU)
    #[arg(long)]
    threads: Option<usize>,
}

fn load_config(args: &Args) -> Result<ClusteringConfig> {
    let mut config = ClusteringConfig::load_or_default(args.config.as_ref())?;

    if let Some(threshold) = args.threshold {
        config.merger.threshold = threshold;
    }
    if args.parallel {
        config.processor.processing_mode = "parallel".to_string();
    }
    if let Some(threads) = args.threads {
        config.processor.threads = threads;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let started = Instant::now();
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(
        "merge_clusters",
        config.processor.get_log_level(),
        config.files.log_dir.as_deref(),
    )?;
    config.log_warnings();

    let metrics = ParseMetrics::new();
    let clusters = read_clusters(&args.input, &metrics)?;

    let manager = ProcessingManager::new(&config.processor)?;
    let merged = ClusterMerger::new(config.merger.threshold).merge(clusters, &manager)?;

    let mut output = StagedOutput::new();
    output.stage(&args.output, |writer| write_merged(writer, &merged.clusters))?;
    output.commit()?;

    info!("Refined clusters written in: {:?}", args.output);
    info!("Total execution time: {:.2} seconds", started.elapsed().as_secs_f64());
    Ok(())
}
