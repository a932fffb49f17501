//! ancestry_clusters turns per-position ancestry calls into ancestry
//! segments and merges them into consolidated, noise-filtered clusters.
//!
//! The pipeline has two stages: [`SegmentBuilder`] cuts one sample's sorted
//! calls into same-label runs of a minimum length, and [`ClusterMerger`]
//! joins same-ancestry neighbours per `(source, chromosome)` while dropping
//! short interlopers.

// Module declarations
pub mod error;
pub mod types;
pub mod config;
pub mod segment;
pub mod merge;
pub mod io;
pub mod utils;

// Re-exports
pub use error::{Error, Result};
pub use types::{Cluster, Coord, GroupKey, ParseOutcome, PositionCall, SkipReason};
pub use segment::{segment_calls, SegmentBuilder};
pub use merge::{merge_clusters, ClusterMerger};
pub use utils::{
    metrics::ParseMetrics,
    processing::ProcessingManager,
    staging::StagedOutput,
};

pub use config::ClusteringConfig;
