// src/io/cluster_table.rs

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::info;
use serde::Serialize;
use crate::error::{Error, Result};
use crate::types::{Cluster, Coord, ParseOutcome, SkipReason};
use crate::utils::metrics::ParseMetrics;

pub const CHROMOSOME: &str = "Chromosome";
pub const START: &str = "Start";
pub const END: &str = "End";
pub const ANCESTRY: &str = "Ancestry";
pub const FILENAME: &str = "filename";

/// Header of a per-sample segment file.
pub const SEGMENT_HEADER: [&str; 4] = [CHROMOSOME, START, END, ANCESTRY];
/// Header of a combined or merged cluster table.
pub const MERGED_HEADER: [&str; 5] = [CHROMOSOME, START, END, ANCESTRY, FILENAME];

#[derive(Serialize)]
struct SegmentRow<'a> {
    #[serde(rename = "Chromosome")]
    chromosome: &'a str,
    #[serde(rename = "Start")]
    start: Coord,
    #[serde(rename = "End")]
    end: Coord,
    #[serde(rename = "Ancestry")]
    ancestry: &'a str,
}

#[derive(Serialize)]
struct MergedRow<'a> {
    #[serde(rename = "Chromosome")]
    chromosome: &'a str,
    #[serde(rename = "Start")]
    start: Coord,
    #[serde(rename = "End")]
    end: Coord,
    #[serde(rename = "Ancestry")]
    ancestry: &'a str,
    filename: &'a str,
}

/// Positions of the required columns, looked up by header name.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    chromosome: usize,
    start: usize,
    end: usize,
    ancestry: usize,
    filename: usize,
    width: usize,
}

impl ColumnIndex {
    /// A repeated header name binds its last column.
    fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .collect::<Vec<_>>()
                .into_iter()
                .rposition(|h| h == name)
                .ok_or_else(|| Error::missing_column(name, path))
        };

        Ok(Self {
            chromosome: find(CHROMOSOME)?,
            start: find(START)?,
            end: find(END)?,
            ancestry: find(ANCESTRY)?,
            filename: find(FILENAME)?,
            width: headers.len(),
        })
    }

    fn parse(&self, record: &StringRecord, line: u64) -> Result<ParseOutcome<Cluster>> {
        if record.len() < self.width {
            return Ok(ParseOutcome::Skipped(SkipReason::TooFewFields {
                expected: self.width,
                found: record.len(),
            }));
        }

        let required = [
            (self.chromosome, CHROMOSOME),
            (self.start, START),
            (self.end, END),
            (self.ancestry, ANCESTRY),
            (self.filename, FILENAME),
        ];
        if let Some(&(_, column)) = required.iter().find(|(idx, _)| record[*idx].is_empty()) {
            return Ok(ParseOutcome::Skipped(SkipReason::EmptyField { column }));
        }

        let coord = |idx: usize, field: &str| {
            record[idx]
                .parse::<Coord>()
                .map_err(|_| Error::invalid_field(field, &record[idx], line))
        };
        let start = coord(self.start, START)?;
        let end = coord(self.end, END)?;

        // Both length measures must fit in a Coord.
        if end.checked_sub(start).and_then(|span| span.checked_add(1)).is_none() {
            return Err(Error::invalid_field(END, &record[self.end], line));
        }

        Ok(ParseOutcome::Parsed(Cluster {
            chromosome: record[self.chromosome].to_string(),
            start,
            end,
            ancestry: record[self.ancestry].to_string(),
            source_id: record[self.filename].to_string(),
        }))
    }
}

/// Read a tagged cluster table. Rows with fewer fields than the header are
/// skipped and counted in `metrics`.
pub fn read_clusters<P: AsRef<Path>>(path: P, metrics: &ParseMetrics) -> Result<Vec<Cluster>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_clusters_from(file, path, metrics)
}

pub fn read_clusters_from<R: Read>(reader: R, path: &Path, metrics: &ParseMetrics) -> Result<Vec<Cluster>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?, path)?;

    let mut clusters = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match columns.parse(&record, line)? {
            ParseOutcome::Parsed(cluster) => {
                metrics.record_parsed();
                clusters.push(cluster);
            },
            ParseOutcome::Skipped(reason) => metrics.record_skipped(line, reason),
        }
    }

    metrics.report(&path.display().to_string());
    info!("Read {} clusters from {:?}", clusters.len(), path);
    Ok(clusters)
}

fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer)
}

/// Write `Chromosome, Start, End, Ancestry` rows. The header is written even
/// when there are no clusters.
pub fn write_segments<W: Write>(writer: W, clusters: &[Cluster]) -> Result<()> {
    let mut writer = tsv_writer(writer);
    writer.write_record(SEGMENT_HEADER)?;
    for cluster in clusters {
        writer.serialize(SegmentRow {
            chromosome: &cluster.chromosome,
            start: cluster.start,
            end: cluster.end,
            ancestry: &cluster.ancestry,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `Chromosome, Start, End, Ancestry, filename` rows.
pub fn write_merged<W: Write>(writer: W, clusters: &[Cluster]) -> Result<()> {
    let mut writer = tsv_writer(writer);
    writer.write_record(MERGED_HEADER)?;
    for cluster in clusters {
        writer.serialize(MergedRow {
            chromosome: &cluster.chromosome,
            start: cluster.start,
            end: cluster.end,
            ancestry: &cluster.ancestry,
            filename: &cluster.source_id,
        })?;
    }
    writer.flush()?;
    Ok(())
}
