// src/io/position_table.rs

use std::fs::File;
use std::io::Read;
use std::path::Path;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use crate::error::{Error, Result};
use crate::types::{Coord, ParseOutcome, PositionCall, SkipReason};
use crate::utils::metrics::ParseMetrics;

#[derive(Debug, Clone)]
struct PositionRow {
    chromosome: String,
    position: Coord,
    labels: Vec<String>,
}

/// Per-position ancestry calls for many samples.
///
/// Column 1 is the chromosome, column 2 the position, and every further
/// column holds one sample's labels, named by its header cell. Rows are
/// kept sorted by `(chromosome, position)`.
#[derive(Debug, Clone)]
pub struct PositionTable {
    samples: Vec<String>,
    rows: Vec<PositionRow>,
}

impl PositionTable {
    pub fn read<P: AsRef<Path>>(path: P, metrics: &ParseMetrics) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(file, path, metrics)
    }

    pub fn from_reader<R: Read>(reader: R, path: &Path, metrics: &ParseMetrics) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.len() < 3 {
            let missing = if headers.len() < 2 { "position" } else { "sample" };
            return Err(Error::missing_column(missing, path));
        }
        let samples: Vec<String> = headers.iter().skip(2).map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            match parse_row(&record, headers.len(), line)? {
                ParseOutcome::Parsed(row) => {
                    metrics.record_parsed();
                    rows.push(row);
                },
                ParseOutcome::Skipped(reason) => metrics.record_skipped(line, reason),
            }
        }

        if !rows.windows(2).all(|w| row_key(&w[0]) <= row_key(&w[1])) {
            debug!("Sorting {} rows of {:?} by chromosome and position", rows.len(), path);
            rows.sort_by(|a, b| row_key(a).cmp(&row_key(b)));
        }

        metrics.report(&path.display().to_string());
        info!("Loaded {} positions for {} samples from {:?}", rows.len(), samples.len(), path);

        Ok(Self {
            samples,
            rows,
        })
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted calls of the sample in column `2 + sample`.
    pub fn calls(&self, sample: usize) -> impl Iterator<Item = PositionCall> + '_ {
        let source_id = self.samples.get(sample).cloned().unwrap_or_default();
        self.rows.iter().map(move |row| PositionCall {
            chromosome: row.chromosome.clone(),
            position: row.position,
            ancestry: row.labels.get(sample).cloned().unwrap_or_default(),
            source_id: source_id.clone(),
        })
    }
}

fn row_key(row: &PositionRow) -> (&str, Coord) {
    (row.chromosome.as_str(), row.position)
}

fn parse_row(record: &StringRecord, width: usize, line: u64) -> Result<ParseOutcome<PositionRow>> {
    if record.len() < width {
        return Ok(ParseOutcome::Skipped(SkipReason::TooFewFields {
            expected: width,
            found: record.len(),
        }));
    }

    let position = record[1]
        .parse::<Coord>()
        .map_err(|_| Error::invalid_field("position", &record[1], line))?;

    Ok(ParseOutcome::Parsed(PositionRow {
        chromosome: record[0].to_string(),
        position,
        labels: record.iter().skip(2).take(width - 2).map(str::to_string).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<(PositionTable, ParseMetrics)> {
        let metrics = ParseMetrics::new();
        let table = PositionTable::from_reader(text.as_bytes(), Path::new("calls.tsv"), &metrics)?;
        Ok((table, metrics))
    }

    #[test]
    fn rows_are_sorted_numerically_within_chromosome() {
        let text = "chrom\tpos\tind1\tind2\n\
                    chr2\t5\tA\tB\n\
                    chr1\t100\tA\tA\n\
                    chr1\t20\tB\tA\n";
        let (table, _) = load(text).unwrap();
        assert_eq!(table.samples(), ["ind1", "ind2"]);

        let calls: Vec<_> = table.calls(1).collect();
        assert_eq!(
            calls,
            vec![
                PositionCall::new("chr1", 20, "A", "ind2"),
                PositionCall::new("chr1", 100, "A", "ind2"),
                PositionCall::new("chr2", 5, "B", "ind2"),
            ]
        );
    }

    #[test]
    fn short_rows_are_skipped_and_counted() {
        let text = "chrom\tpos\tind1\nchr1\t1\tA\nchr1\t2\nchr1\t3\tA\n";
        let (table, metrics) = load(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(metrics.get_stats().rows_skipped, 1);
    }

    #[test]
    fn table_without_samples_is_rejected() {
        let err = load("chrom\tpos\nchr1\t1\n").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "sample"));
    }

    #[test]
    fn non_numeric_position_names_the_line() {
        let err = load("chrom\tpos\tind1\nchr1\t1\tA\nchr1\tten\tA\n").unwrap_err();
        assert!(matches!(err, Error::InvalidField { line: 3, .. }), "{err}");
    }
}
