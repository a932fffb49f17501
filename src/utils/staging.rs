// utils/staging.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use log::{debug, info};
use tempfile::NamedTempFile;
use crate::error::Result;

/// One output file written to a hidden temporary next to its destination.
///
/// Nothing appears at the destination until [`StagedFile::persist`]; dropping
/// an unpersisted file removes the temporary.
pub struct StagedFile {
    destination: PathBuf,
    temp: NamedTempFile,
}

impl StagedFile {
    /// Create the temporary in the destination's directory so the final
    /// rename stays on one filesystem.
    pub fn create<P: AsRef<Path>>(destination: P) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp = tempfile::Builder::new()
            .prefix(".staging-")
            .suffix(".tmp")
            .tempfile_in(&dir)?;
        debug!("Staging {:?} at {:?}", destination, temp.path());

        Ok(Self { destination, temp })
    }

    /// Run `write` against a buffered writer on the temporary and flush it.
    pub fn write_with<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
    {
        let mut writer = BufWriter::new(self.temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Atomically move the temporary onto the destination.
    pub fn persist(self) -> Result<PathBuf> {
        self.temp.as_file().sync_all()?;
        self.temp
            .persist(&self.destination)
            .map_err(|e| e.error)?;
        Ok(self.destination)
    }
}

/// A set of staged files published together once every one is written.
#[derive(Default)]
pub struct StagedOutput {
    files: Vec<StagedFile>,
}

impl StagedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: StagedFile) {
        self.files.push(file);
    }

    /// Stage `destination` and fill it with `write`.
    pub fn stage<P, F>(&mut self, destination: P, write: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
    {
        let mut file = StagedFile::create(destination)?;
        file.write_with(write)?;
        self.push(file);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Publish every staged file, in staging order.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let published = self
            .files
            .into_iter()
            .map(StagedFile::persist)
            .collect::<Result<Vec<_>>>()?;
        info!("Published {} output file(s)", published.len());
        Ok(published)
    }
}
