use serde::{Serialize, Deserialize};
use std::fmt;

/// Genomic coordinate. Signed so `end - start` on a reversed row is negative.
pub type Coord = i64;

/// One ancestry call at a single position of one sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionCall {
    pub chromosome: String,
    pub position: Coord,
    pub ancestry: String,
    pub source_id: String,
}

impl PositionCall {
    pub fn new<C, A, S>(chromosome: C, position: Coord, ancestry: A, source_id: S) -> Self
    where
        C: Into<String>,
        A: Into<String>,
        S: Into<String>,
    {
        Self {
            chromosome: chromosome.into(),
            position,
            ancestry: ancestry.into(),
            source_id: source_id.into(),
        }
    }
}

/// A contiguous interval sharing one ancestry label.
///
/// Produced by the segment builder and consumed (and produced again) by the
/// cluster merger. The two stages measure length differently, see
/// [`Cluster::inclusive_len`] and [`Cluster::span`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cluster {
    pub chromosome: String,
    pub start: Coord,
    pub end: Coord,
    pub ancestry: String,
    pub source_id: String,
}

impl Cluster {
    pub fn new<C, A, S>(chromosome: C, start: Coord, end: Coord, ancestry: A, source_id: S) -> Self
    where
        C: Into<String>,
        A: Into<String>,
        S: Into<String>,
    {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
            ancestry: ancestry.into(),
            source_id: source_id.into(),
        }
    }

    /// `end - start + 1`, the length used when segmenting position calls.
    /// Saturates at the `Coord` bounds.
    pub fn inclusive_len(&self) -> Coord {
        self.span().saturating_add(1)
    }

    /// `end - start`, the length an interloper is tested with when merging.
    /// Saturates at the `Coord` bounds.
    pub fn span(&self) -> Coord {
        self.end.saturating_sub(self.start)
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            source_id: self.source_id.clone(),
            chromosome: self.chromosome.clone(),
        }
    }

    pub fn in_group(&self, key: &GroupKey) -> bool {
        self.source_id == key.source_id && self.chromosome == key.chromosome
    }
}

/// `(source, chromosome)` partition key. Ordering is source first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub source_id: String,
    pub chromosome: String,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source_id, self.chromosome)
    }
}

/// Why a row was dropped by a lenient reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    TooFewFields { expected: usize, found: usize },
    EmptyField { column: &'static str },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewFields { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            SkipReason::EmptyField { column } => write!(f, "empty {} field", column),
        }
    }
}

/// Result of parsing a single row leniently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    Parsed(T),
    Skipped(SkipReason),
}
