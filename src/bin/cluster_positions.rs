use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Instant;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, debug};
use ancestry_clusters::{
    ClusteringConfig,
    ParseMetrics,
    ProcessingManager,
    Result,
    StagedOutput,
    io::{PositionTable, write_segments},
    segment::{sample_output_path, segment_table},
    utils::logger::init_logging,
};

/// Cluster per-position ancestry calls into same-ancestry segments,
/// writing one segment file per sample column.
#[derive(Parser, Debug)]
#[command(name = "cluster_positions", version)]
struct Args {
    /// Tab-delimited table: chromosome, position, then one column per sample
    input: PathBuf,

    /// Base name for the per-sample output files
    output_base: PathBuf,

    /// Minimum segment length, counted as end - start + 1 (also accepted as -CLUSTER)
    #[arg(short = 'c', long = "CLUSTER", visible_alias = "cluster",
          value_parser = clap::value_parser!(i64).range(0..))]
    cluster: Option<i64>,

    /// Inserted between the output base and the sample number
    #[arg(short = 's', long)]
    suffix: Option<String>,

    /// INI configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Segment samples on a thread pool
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (0 = one per CPU)
    #[arg(long)]
    threads: Option<usize>,
}

/// Accept the single-dash `-CLUSTER` spelling, which clap would otherwise
/// read as a bundle of short flags.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(s) if s == "-CLUSTER" || s.starts_with("-CLUSTER=") => OsString::from(format!("-{}", s)),
            _ => arg,
        })
        .collect()
}

fn load_config(args: &Args) -> Result<ClusteringConfig> {
    let mut config = ClusteringConfig::load_or_default(args.config.as_ref())?;

    if let Some(min_length) = args.cluster {
        config.segmenter.min_length = min_length;
    }
    if let Some(suffix) = &args.suffix {
        config.files.output_suffix = suffix.clone();
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
    let args = Args::parse_from(normalize_args(std::env::args_os()));
    let config = load_config(&args)?;

    init_logging(
        "cluster_positions",
        config.processor.get_log_level(),
        config.files.log_dir.as_deref(),
    )?;
    config.log_warnings();
    info!(
        "Clustering {:?} with minimum length {}",
        args.input, config.segmenter.min_length
    );

    let metrics = ParseMetrics::new();
    let table = PositionTable::read(&args.input, &metrics)?;
    let manager = ProcessingManager::new(&config.processor)?;

    let progress = ProgressBar::new(table.samples().len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} samples")
    {
        progress.set_style(style);
    }

    let segments = segment_table(&table, config.segmenter.min_length, &manager, Some(&progress))?;
    progress.finish_and_clear();

    let mut output = StagedOutput::new();
    for sample in &segments {
        let path = sample_output_path(&args.output_base, &config.files.output_suffix, sample.number);
        debug!(
            "{} -> {:?}: {} clusters kept, {} discarded",
            sample.sample, path, sample.stats.emitted, sample.stats.discarded
        );
        output.stage(&path, |writer| write_segments(writer, &sample.clusters))?;
    }
    output.commit()?;

    info!("Clustering performed for individuals in {} columns", segments.len());
    info!("Total execution time: {:.2} seconds", started.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(normalize_args(args.iter().map(OsString::from)))
    }

    #[test]
    fn single_dash_cluster_flag_is_accepted() {
        let args = parse(&["cluster_positions", "in.tsv", "out", "-CLUSTER", "50"]).unwrap();
        assert_eq!(args.cluster, Some(50));

        let args = parse(&["cluster_positions", "in.tsv", "out", "-CLUSTER=7"]).unwrap();
        assert_eq!(args.cluster, Some(7));
    }

    #[test]
    fn other_cluster_spellings_still_work() {
        for flag in ["--CLUSTER", "--cluster", "-c"] {
            let args = parse(&["cluster_positions", "in.tsv", "out", flag, "3"]).unwrap();
            assert_eq!(args.cluster, Some(3));
        }
    }

    #[test]
    fn negative_cluster_is_rejected() {
        assert!(parse(&["cluster_positions", "in.tsv", "out", "-CLUSTER", "-1"]).is_err());
    }
}
