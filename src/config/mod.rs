pub mod file;
pub mod subsystems;

use serde::{Serialize, Deserialize};
use std::path::Path;
use std::fs;
use crate::error::Result;
use log::{warn, trace};

pub trait FromIni {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusteringConfig {
    pub files: file::FileConfig,

    pub segmenter: subsystems::SegmenterConfig,
    pub merger: subsystems::MergerConfig,
    pub processor: subsystems::ProcessorConfig,

    /// Problems found while parsing, held until a logger is installed.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

impl ClusteringConfig {
    pub fn validate(&self) -> Result<()> {
        self.files.validate()?;
        self.segmenter.validate()?;
        self.merger.validate()?;
        self.processor.validate()?;
        Ok(())
    }

    pub fn from_ini<P: AsRef<Path>>(path: P) -> Result<Self> {
        trace!("Loading configuration from: {:?}", path.as_ref());
        let content = fs::read_to_string(&path)?;
        let config = Self::from_ini_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse INI text on top of the defaults. Bad values leave the default
    /// in place and are recorded in `warnings`.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut current_section = String::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len()-1].trim().to_string();
                trace!("  Line {}: Found section: [{}]", line_num + 1, current_section);
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                let handled = match current_section.as_str() {
                    "files" => config.files.from_ini_section(&current_section, key, value),
                    "segmenter" => config.segmenter.from_ini_section(&current_section, key, value),
                    "merger" => config.merger.from_ini_section(&current_section, key, value),
                    "processor" => config.processor.from_ini_section(&current_section, key, value),
                    _ => None,
                };

                match handled {
                    Some(Err(e)) => config.warnings.push(
                        format!("Error processing config key {}={}: {}", key, value, e)
                    ),
                    Some(Ok(())) => trace!("  Line {}: {}={}", line_num + 1, key, value),
                    None => config.warnings.push(
                        format!("Unrecognized config key: {}={} in section [{}]", key, value, current_section)
                    ),
                }
            } else {
                config.warnings.push(format!("Ignoring malformed config line {}: {}", line_num + 1, line));
            }
        }

        Ok(config)
    }

    /// Emit the parse warnings through the installed logger.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }

    /// Load `path` if given, otherwise start from defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::from_ini(path),
            None => Ok(Self::default()),
        }
    }
}
