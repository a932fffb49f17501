pub mod segmenter;
pub mod merger;
pub mod processor;

pub use segmenter::SegmenterConfig;
pub use merger::MergerConfig;
pub use processor::ProcessorConfig;
