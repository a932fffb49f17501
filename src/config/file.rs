// src/config/file.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::Result;
use super::FromIni;

pub const DEFAULT_OUTPUT_SUFFIX: &str = "_CLUST_Individual";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// When set, logs go to a timestamped file in this directory instead of stderr.
    pub log_dir: Option<PathBuf>,
    /// Inserted between the output base and the sample number of per-sample files.
    pub output_suffix: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl FromIni for FileConfig {
    fn from_ini_section(&mut self, _section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        match key {
            "log_dir" => {
                self.log_dir = Some(PathBuf::from(value.trim_matches('"')));
                Some(Ok(()))
            },
            "output_suffix" => {
                self.output_suffix = value.trim_matches('"').to_string();
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.output_suffix.contains(std::path::MAIN_SEPARATOR) {
            return Err(crate::error::Error::Config(
                format!("output_suffix must not contain a path separator: {:?}", self.output_suffix)
            ));
        }

        if let Some(dir) = &self.log_dir {
            std::fs::create_dir_all(dir)?;
        }

        Ok(())
    }
}
