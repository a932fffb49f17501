use std::collections::BTreeMap;
use crate::types::{Cluster, GroupKey};

/// Split clusters into `(source, chromosome)` buckets.
///
/// Buckets come back in key order. Inside a bucket the records keep their
/// encounter order and are then stably sorted by `start`, so ties on `start`
/// resolve to whichever record was seen first.
pub fn partition_by_group(clusters: Vec<Cluster>) -> Vec<(GroupKey, Vec<Cluster>)> {
    let mut buckets: BTreeMap<GroupKey, Vec<Cluster>> = BTreeMap::new();
    for cluster in clusters {
        buckets.entry(cluster.group_key()).or_default().push(cluster);
    }

    buckets
        .into_iter()
        .map(|(key, mut group)| {
            group.sort_by_key(|c| c.start);
            (key, group)
        })
        .collect()
}
