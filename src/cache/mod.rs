//! Cache Module
//!
//! Disk-backed key/value storage with size-bounded LRU eviction.

pub mod fs;
mod info;
pub mod naming;
mod options;
mod store;


// Re-export public types
pub use fs::{FileStat, FileSystem, TokioFileSystem};
pub use info::CacheInfo;
pub use options::CacheOptions;
pub use store::FileCache;

// == Public Constants ==
/// Default maximum total bytes retained by a cache
pub const DEFAULT_CAPACITY: u64 = 1024 * 1024; // 1 MiB

/// Name of the directory created under the base path to hold entries
pub const CACHE_DIR_NAME: &str = "cache";

/// Longest backing file name, in bytes. Longer encodings fall back to a digest name
pub const MAX_FILE_NAME_LENGTH: usize = 255;
