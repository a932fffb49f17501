// src/segment/builder.rs

use log::{debug, trace};
use crate::error::{Error, Result};
use crate::types::{Cluster, Coord, PositionCall};

/// The run currently being extended.
#[derive(Debug, Clone)]
struct OpenRun {
    chromosome: String,
    ancestry: String,
    source_id: String,
    start: Coord,
    end: Coord,
}

impl OpenRun {
    fn open(call: PositionCall) -> Self {
        Self {
            chromosome: call.chromosome,
            ancestry: call.ancestry,
            source_id: call.source_id,
            start: call.position,
            end: call.position,
        }
    }

    fn into_cluster(self) -> Cluster {
        Cluster {
            chromosome: self.chromosome,
            start: self.start,
            end: self.end,
            ancestry: self.ancestry,
            source_id: self.source_id,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SegmentStats {
    pub calls: u64,
    pub emitted: u64,
    pub discarded: u64,
}

/// Turns one sample's sorted position calls into same-label runs.
///
/// Calls must arrive sorted by `(chromosome, position)`; a chromosome that
/// sorts before the current one, or a position that goes backwards, is
/// reported as [`Error::UnsortedInput`]. A repeated position may only repeat
/// the open run's label, anything else is [`Error::ConflictingCall`].
/// A run is kept when `end - start + 1 >= min_length`.
#[derive(Debug)]
pub struct SegmentBuilder {
    min_length: Coord,
    open: Option<OpenRun>,
    stats: SegmentStats,
}

impl SegmentBuilder {
    pub fn new(min_length: Coord) -> Self {
        Self {
            min_length,
            open: None,
            stats: SegmentStats::default(),
        }
    }

    pub fn stats(&self) -> SegmentStats {
        self.stats
    }

    /// Feed the next call. Returns the cluster closed by this call, if any.
    pub fn push(&mut self, call: PositionCall) -> Result<Option<Cluster>> {
        self.stats.calls += 1;

        let run = match self.open.as_mut() {
            Some(run) => run,
            None => {
                self.open = Some(OpenRun::open(call));
                return Ok(None);
            }
        };

        if call.chromosome < run.chromosome {
            return Err(Error::unsorted_key(&call.chromosome, &run.chromosome, &call.chromosome));
        }

        if call.chromosome == run.chromosome {
            if call.position < run.end {
                return Err(Error::unsorted_position(&call.chromosome, run.end, call.position));
            }
            // A second label at the run's last position would start an overlapping run.
            if call.position == run.end && call.ancestry != run.ancestry {
                return Err(Error::conflicting_call(&call.chromosome, call.position, &run.ancestry, &call.ancestry));
            }
            if call.ancestry == run.ancestry {
                run.end = call.position;
                return Ok(None);
            }
        }

        let closed = self.open.replace(OpenRun::open(call));
        Ok(closed.and_then(|run| self.close(run)))
    }

    /// Close the last open run. The builder can be reused afterwards.
    pub fn finish(&mut self) -> Option<Cluster> {
        self.open.take().and_then(|run| self.close(run))
    }

    fn close(&mut self, run: OpenRun) -> Option<Cluster> {
        let cluster = run.into_cluster();
        if cluster.inclusive_len() >= self.min_length {
            self.stats.emitted += 1;
            Some(cluster)
        } else {
            trace!(
                "Discarding {}:{}-{} ({}), shorter than {}",
                cluster.chromosome, cluster.start, cluster.end, cluster.ancestry, self.min_length
            );
            self.stats.discarded += 1;
            None
        }
    }
}

/// Segment a whole stream of calls in one pass.
pub fn segment_calls<I>(calls: I, min_length: Coord) -> Result<(Vec<Cluster>, SegmentStats)>
where
    I: IntoIterator<Item = PositionCall>,
{
    let mut builder = SegmentBuilder::new(min_length);

    let mut clusters = calls.into_iter().try_fold(Vec::new(), |mut acc, call| {
        acc.extend(builder.push(call)?);
        Ok::<_, Error>(acc)
    })?;
    clusters.extend(builder.finish());

    let stats = builder.stats();
    debug!(
        "Segmented {} calls into {} clusters ({} runs below {})",
        stats.calls, stats.emitted, stats.discarded, min_length
    );
    Ok((clusters, stats))
}
