pub mod cluster_table;
pub mod combine;
pub mod position_table;

pub use self::cluster_table::{read_clusters, write_merged, write_segments};
pub use self::combine::{combine_files, find_cluster_files};
pub use self::position_table::PositionTable;
