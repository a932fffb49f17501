pub mod logger;
pub mod metrics;
pub mod processing;
pub mod staging;
