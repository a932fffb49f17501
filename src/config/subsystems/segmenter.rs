// src/config/subsystems/segmenter.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::config::FromIni;
use crate::types::Coord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Minimum inclusive run length (`end - start + 1`) kept by the builder.
    pub min_length: Coord,
}

impl FromIni for SegmenterConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "segmenter" {
            return None;
        }

        match key {
            "min_length" | "cluster_size" => {
                match value.parse() {
                    Ok(length) => {
                        self.min_length = length;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid min_length value (must be an integer): {}", value)
                    ))),
                }
            },
            _ => None,
        }
    }
}

impl SegmenterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_length < 0 {
            return Err(Error::Config(
                format!("min_length must not be negative, got {}", self.min_length)
            ));
        }
        Ok(())
    }
}
