pub mod merger;
pub mod partition;

pub use self::merger::{merge_clusters, ClusterMerger, MergeOutput, MergeStats};
pub use self::partition::partition_by_group;
