// src/merge/merger.rs

use std::ops::AddAssign;
use log::{debug, info, trace};
use crate::error::{Error, Result};
use crate::types::{Cluster, Coord};
use crate::utils::processing::ProcessingManager;
use super::partition::partition_by_group;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub groups: u64,
    pub input: u64,
    pub output: u64,
    /// Same-label records folded into the active cluster.
    pub extended: u64,
    /// Short interlopers dropped as noise.
    pub absorbed: u64,
}

impl AddAssign for MergeStats {
    fn add_assign(&mut self, other: Self) {
        self.groups += other.groups;
        self.input += other.input;
        self.output += other.output;
        self.extended += other.extended;
        self.absorbed += other.absorbed;
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutput {
    pub clusters: Vec<Cluster>,
    pub stats: MergeStats,
}

/// Merges same-ancestry neighbours within each `(source, chromosome)` group.
///
/// A differently labelled record whose `end - start` is below `threshold`
/// is dropped as noise: the active cluster is not extended over it, and the
/// scan keeps comparing later records against the same active cluster. The
/// dropped record's span is therefore not covered by any output cluster.
#[derive(Debug, Clone, Copy)]
pub struct ClusterMerger {
    threshold: Coord,
}

impl ClusterMerger {
    pub fn new(threshold: Coord) -> Self {
        Self { threshold }
    }

    /// Merge one group. Records must share source and chromosome and be
    /// sorted by `start`.
    pub fn merge_group(&self, group: Vec<Cluster>) -> Result<(Vec<Cluster>, MergeStats)> {
        let mut records = group.into_iter();
        let first = match records.next() {
            Some(first) => first,
            None => return Ok((Vec::new(), MergeStats::default())),
        };

        let key = first.group_key();
        let mut stats = MergeStats {
            groups: 1,
            input: 1,
            ..MergeStats::default()
        };
        let mut previous_start = first.start;

        let (active, mut merged) = records.try_fold(
            (first, Vec::new()),
            |(mut active, mut merged), candidate| {
                stats.input += 1;

                if !candidate.in_group(&key) {
                    return Err(Error::unsorted_key(
                        &key.chromosome,
                        &key.to_string(),
                        &candidate.group_key().to_string(),
                    ));
                }
                if candidate.start < previous_start {
                    return Err(Error::unsorted_position(&key.chromosome, previous_start, candidate.start));
                }
                previous_start = candidate.start;

                if candidate.ancestry == active.ancestry {
                    active.end = candidate.end;
                    stats.extended += 1;
                } else if candidate.span() < self.threshold {
                    trace!(
                        "{}: absorbing {}-{} ({}) inside {}",
                        key, candidate.start, candidate.end, candidate.ancestry, active.ancestry
                    );
                    stats.absorbed += 1;
                } else {
                    merged.push(std::mem::replace(&mut active, candidate));
                }
                Ok((active, merged))
            },
        )?;
        merged.push(active);

        stats.output = merged.len() as u64;
        debug!(
            "{}: {} records -> {} clusters ({} extended, {} absorbed)",
            key, stats.input, stats.output, stats.extended, stats.absorbed
        );
        Ok((merged, stats))
    }

    /// Partition, merge every group, and reassemble in group-key order.
    pub fn merge(&self, clusters: Vec<Cluster>, manager: &ProcessingManager) -> Result<MergeOutput> {
        let groups = partition_by_group(clusters);
        info!(
            "Merging {} groups with noise threshold {} ({:?} mode)",
            groups.len(), self.threshold, manager.mode()
        );

        let results = manager.run(groups, |(_, group)| self.merge_group(group))?;

        let mut output = MergeOutput {
            clusters: Vec::new(),
            stats: MergeStats::default(),
        };
        for (merged, stats) in results {
            output.clusters.extend(merged);
            output.stats += stats;
        }

        info!(
            "Merged {} clusters into {} ({} absorbed as noise)",
            output.stats.input, output.stats.output, output.stats.absorbed
        );
        Ok(output)
    }
}

/// Sequential convenience wrapper around [`ClusterMerger::merge`].
pub fn merge_clusters(clusters: Vec<Cluster>, threshold: Coord) -> Result<Vec<Cluster>> {
    let output = ClusterMerger::new(threshold).merge(clusters, &ProcessingManager::sequential())?;
    Ok(output.clusters)
}
