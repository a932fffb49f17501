// src/config/subsystems/merger.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::config::FromIni;
use crate::types::Coord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergerConfig {
    /// Interlopers with `end - start` below this are absorbed as noise.
    pub threshold: Coord,
}

impl FromIni for MergerConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "merger" {
            return None;
        }

        match key {
            "threshold" => {
                match value.parse() {
                    Ok(threshold) => {
                        self.threshold = threshold;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid threshold value (must be an integer): {}", value)
                    ))),
                }
            },
            _ => None,
        }
    }
}

impl MergerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.threshold < 0 {
            return Err(Error::Config(
                format!("threshold must not be negative, got {}", self.threshold)
            ));
        }
        Ok(())
    }
}
