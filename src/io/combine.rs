// src/io/combine.rs

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::{debug, info, warn};
use crate::error::Result;
use super::cluster_table::FILENAME;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CombineStats {
    pub files: usize,
    pub rows: u64,
}

/// Files in `dir` whose name contains `suffix` and ends in `.csv`, sorted by name.
pub fn find_cluster_files<P: AsRef<Path>>(dir: P, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = fs::read_dir(dir.as_ref())?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.contains(suffix) && n.ends_with(".csv"))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();
    files.sort();

    info!("Found {} files matching '{}' in {:?}", files.len(), suffix, dir.as_ref());
    Ok(files)
}

/// Name a file is tagged with in the `filename` column.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Concatenate per-sample cluster files into one table, appending each
/// file's name as a `filename` column.
///
/// The header comes from the first file; every file's own header line is
/// dropped.
pub fn combine_files<W: Write>(files: &[PathBuf], writer: W) -> Result<CombineStats> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    let mut stats = CombineStats::default();
    let mut first_header: Option<StringRecord> = None;

    for path in files {
        info!("Combining file: {:?}", path);
        let source = source_name(path);

        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(File::open(path)?);

        let header = reader.headers()?.clone();
        if first_header.is_none() {
            let mut tagged = header.clone();
            tagged.push_field(FILENAME);
            writer.write_record(&tagged)?;
            first_header = Some(header);
        } else if first_header.as_ref() != Some(&header) {
            warn!("Header of {:?} differs from the first file, columns are taken as-is", path);
        }

        let mut rows = 0u64;
        for record in reader.records() {
            let mut record = record?;
            record.push_field(&source);
            writer.write_record(&record)?;
            rows += 1;
        }
        debug!("{} rows from {:?}", rows, path);

        stats.files += 1;
        stats.rows += rows;
    }

    writer.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn files_are_filtered_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "run_CLUST_Individual2.csv", "");
        write_file(dir.path(), "run_CLUST_Individual1.csv", "");
        write_file(dir.path(), "run_CLUST_Individual1.txt", "");
        write_file(dir.path(), "other.csv", "");

        let names: Vec<String> = find_cluster_files(dir.path(), "_CLUST_")
            .unwrap()
            .iter()
            .map(|p| source_name(p))
            .collect();
        assert_eq!(names, vec!["run_CLUST_Individual1.csv", "run_CLUST_Individual2.csv"]);
    }

    #[test]
    fn every_data_row_is_tagged_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.csv", "Chromosome\tStart\tEnd\tAncestry\nchr1\t1\t5\tA\nchr1\t8\t20\tA\n");
        let b = write_file(dir.path(), "b.csv", "Chromosome\tStart\tEnd\tAncestry\nchr2\t3\t9\tB\n");

        let mut out = Vec::new();
        let stats = combine_files(&[a, b], &mut out).unwrap();

        assert_eq!(stats, CombineStats { files: 2, rows: 3 });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Chromosome\tStart\tEnd\tAncestry\tfilename\n\
             chr1\t1\t5\tA\ta.csv\n\
             chr1\t8\t20\tA\ta.csv\n\
             chr2\t3\t9\tB\tb.csv\n"
        );
    }
}
