//! LRU File Cache - A disk-backed key/value cache
//!
//! Stores each entry as a JSON file and evicts the least-recently-accessed
//! files once total disk usage exceeds a configured capacity.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{CacheInfo, CacheOptions, FileCache};
pub use config::Config;
pub use error::{CacheError, Result};
