pub mod builder;
pub mod samples;

pub use self::builder::{segment_calls, SegmentBuilder, SegmentStats};
pub use self::samples::{sample_output_path, segment_table, SampleSegments};
