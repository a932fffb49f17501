use thiserror::Error;
use std::io;
use std::path::PathBuf;

use crate::types::Coord;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required column '{column}' in {path:?}")]
    MissingColumn {
        column: String,
        path: PathBuf,
    },

    #[error("Invalid value '{value}' for {field} at line {line}")]
    InvalidField {
        field: String,
        value: String,
        line: u64,
    },

    #[error("Unsorted input on {chromosome}: {current} follows {previous}")]
    UnsortedInput {
        chromosome: String,
        previous: String,
        current: String,
    },

    #[error("Conflicting calls on {chromosome} at {position}: {first} then {second}")]
    ConflictingCall {
        chromosome: String,
        position: Coord,
        first: String,
        second: String,
    },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

// Type alias for Result
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn missing_column<S: Into<String>, P: Into<PathBuf>>(column: S, path: P) -> Self {
        Error::MissingColumn {
            column: column.into(),
            path: path.into(),
        }
    }

    pub fn invalid_field<F: Into<String>, V: Into<String>>(field: F, value: V, line: u64) -> Self {
        Error::InvalidField {
            field: field.into(),
            value: value.into(),
            line,
        }
    }

    /// Two different labels at one position of one sample.
    pub fn conflicting_call(chromosome: &str, position: Coord, first: &str, second: &str) -> Self {
        Error::ConflictingCall {
            chromosome: chromosome.to_string(),
            position,
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Position went backwards within one chromosome.
    pub fn unsorted_position(chromosome: &str, previous: Coord, current: Coord) -> Self {
        Error::UnsortedInput {
            chromosome: chromosome.to_string(),
            previous: previous.to_string(),
            current: current.to_string(),
        }
    }

    /// A chromosome (or source) key sorted before the one already being scanned.
    pub fn unsorted_key(chromosome: &str, previous: &str, current: &str) -> Self {
        Error::UnsortedInput {
            chromosome: chromosome.to_string(),
            previous: previous.to_string(),
            current: current.to_string(),
        }
    }
}
