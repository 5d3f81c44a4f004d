//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::{CacheOptions, DEFAULT_CAPACITY};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory; entries live in `<cache_dir>/cache`
    pub cache_dir: PathBuf,
    /// Maximum total bytes the cache retains
    pub capacities: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DIR` - Base directory for cache files (default: ./data)
    /// - `CACHE_CAPACITY` - Maximum total bytes (default: 1048576)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_dir: env::var_os("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            capacities: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.capacities),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Options used to open the cache store.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions::new().with_capacities(self.capacities)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./data"),
            capacities: DEFAULT_CAPACITY,
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_dir, PathBuf::from("./data"));
        assert_eq!(config.capacities, 1024 * 1024);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_DIR");
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.cache_dir, PathBuf::from("./data"));
        assert_eq!(config.capacities, 1024 * 1024);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_cache_options_carry_capacity() {
        let config = Config {
            capacities: 42,
            ..Config::default()
        };
        assert_eq!(config.cache_options().capacities, 42);
    }
}
