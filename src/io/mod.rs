/// I/O operations for loading ADF images

/// Reader implementation for ADF files
pub mod reader;

pub use reader::{is_adfs_file, read_adf, sequence_tracks};
