use std::fmt;
use std::str::FromStr;
use log::info;
use rayon::prelude::*;
use crate::config::subsystems::processor::ProcessorConfig;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    Sequential,
    Parallel,
}

impl FromStr for ProcessingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(ProcessingMode::Sequential),
            "parallel" => Ok(ProcessingMode::Parallel),
            other => Err(Error::config(format!(
                "Invalid processing_mode '{}' (must be sequential or parallel)", other
            ))),
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingMode::Sequential => write!(f, "sequential"),
            ProcessingMode::Parallel => write!(f, "parallel"),
        }
    }
}

/// Runs independent work items either in order on the calling thread or on
/// a dedicated rayon pool. Results always come back in input order.
pub struct ProcessingManager {
    mode: ProcessingMode,
    threads: usize,
    pool: Option<rayon::ThreadPool>,
}

impl ProcessingManager {
    pub fn new(processing_config: &ProcessorConfig) -> Result<Self> {
        let mode = processing_config.processing_mode.parse::<ProcessingMode>()?;

        if mode == ProcessingMode::Sequential {
            return Ok(Self::sequential());
        }

        let threads = if processing_config.threads == 0 {
            num_cpus::get()
        } else {
            processing_config.threads
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("cluster-worker-{}", i))
            .build()?;

        info!("Processing mode: {}, threads: {}", mode, threads);
        Ok(Self {
            mode,
            threads,
            pool: Some(pool),
        })
    }

    pub fn sequential() -> Self {
        Self {
            mode: ProcessingMode::Sequential,
            threads: 1,
            pool: None,
        }
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Apply `process` to every item. The first error aborts the run.
    pub fn run<T, R, F>(&self, items: Vec<T>, process: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Result<R> + Sync + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(|| {
                items.into_par_iter().map(&process).collect::<Result<Vec<R>>>()
            }),
            None => items.into_iter().map(process).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parallel_config(threads: usize) -> ProcessorConfig {
        ProcessorConfig {
            processing_mode: "parallel".to_string(),
            threads,
            ..ProcessorConfig::default()
        }
    }

    #[test]
    fn parallel_run_keeps_input_order() {
        let manager = ProcessingManager::new(&parallel_config(4)).unwrap();
        assert_eq!(manager.mode(), ProcessingMode::Parallel);
        let out = manager.run((0..1000).collect(), |i: u64| Ok(i * 2)).unwrap();
        assert_eq!(out, (0..1000).map(|i| i * 2).collect::<Vec<u64>>());
    }

    #[test]
    fn zero_threads_uses_every_cpu() {
        let manager = ProcessingManager::new(&parallel_config(0)).unwrap();
        assert_eq!(manager.threads(), num_cpus::get());
    }

    #[test]
    fn error_from_any_item_is_returned() {
        let manager = ProcessingManager::new(&parallel_config(2)).unwrap();
        let result = manager.run((0..10).collect(), |i: u32| {
            if i == 7 {
                Err(Error::config("boom"))
            } else {
                Ok(i)
            }
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!("threaded".parse::<ProcessingMode>().is_err());
        assert_eq!(" Parallel ".parse::<ProcessingMode>().unwrap(), ProcessingMode::Parallel);
    }
}
