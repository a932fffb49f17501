// src/segment/samples.rs

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use indicatif::ProgressBar;
use log::debug;
use crate::error::Result;
use crate::io::PositionTable;
use crate::types::{Cluster, Coord};
use crate::utils::processing::ProcessingManager;
use super::builder::{segment_calls, SegmentStats};

/// Segments of one sample column.
#[derive(Debug, Clone)]
pub struct SampleSegments {
    /// 1-based column number among the samples.
    pub number: usize,
    pub sample: String,
    pub clusters: Vec<Cluster>,
    pub stats: SegmentStats,
}

/// `{base}{suffix}{number}.csv`, e.g. `out/run_CLUST_Individual3.csv`.
pub fn sample_output_path<P: AsRef<Path>>(base: P, suffix: &str, number: usize) -> PathBuf {
    let mut name = OsString::from(base.as_ref().as_os_str());
    name.push(format!("{}{}.csv", suffix, number));
    PathBuf::from(name)
}

/// Run the segment builder over every sample of `table`.
///
/// Samples are independent, so `manager` may spread them over threads;
/// results come back in column order.
pub fn segment_table(
    table: &PositionTable,
    min_length: Coord,
    manager: &ProcessingManager,
    progress: Option<&ProgressBar>,
) -> Result<Vec<SampleSegments>> {
    let columns: Vec<usize> = (0..table.samples().len()).collect();

    manager.run(columns, |column| {
        let (clusters, stats) = segment_calls(table.calls(column), min_length)?;
        let sample = table.samples()[column].clone();
        debug!("Sample {} ({}): {} clusters", column + 1, sample, clusters.len());

        if let Some(progress) = progress {
            progress.inc(1);
        }

        Ok(SampleSegments {
            number: column + 1,
            sample,
            clusters,
            stats,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::subsystems::ProcessorConfig;
    use crate::utils::metrics::ParseMetrics;

    const TABLE: &str = "chrom\tpos\tind1\tind2\n\
                         chr1\t1\tA\tA\n\
                         chr1\t2\tA\tB\n\
                         chr1\t3\tA\tB\n\
                         chr1\t4\tB\tB\n\
                         chr2\t1\tB\tA\n";

    fn table() -> PositionTable {
        PositionTable::from_reader(TABLE.as_bytes(), Path::new("t.tsv"), &ParseMetrics::new()).unwrap()
    }

    #[test]
    fn output_path_appends_suffix_and_number() {
        assert_eq!(
            sample_output_path("out/run", "_CLUST_Individual", 3),
            PathBuf::from("out/run_CLUST_Individual3.csv")
        );
    }

    #[test]
    fn each_sample_is_segmented_separately() {
        let segments = segment_table(&table(), 2, &ProcessingManager::sequential(), None).unwrap();
        assert_eq!(segments.len(), 2);

        assert_eq!(segments[0].number, 1);
        assert_eq!(segments[0].sample, "ind1");
        assert_eq!(segments[0].clusters, vec![Cluster::new("chr1", 1, 3, "A", "ind1")]);

        assert_eq!(segments[1].sample, "ind2");
        assert_eq!(segments[1].clusters, vec![Cluster::new("chr1", 2, 4, "B", "ind2")]);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let config = ProcessorConfig {
            processing_mode: "parallel".to_string(),
            threads: 2,
            ..ProcessorConfig::default()
        };
        let parallel = segment_table(&table(), 0, &ProcessingManager::new(&config).unwrap(), None).unwrap();
        let sequential = segment_table(&table(), 0, &ProcessingManager::sequential(), None).unwrap();

        let clusters = |s: &[SampleSegments]| s.iter().map(|x| x.clusters.clone()).collect::<Vec<_>>();
        assert_eq!(clusters(&parallel[..]), clusters(&sequential[..]));
    }
}
