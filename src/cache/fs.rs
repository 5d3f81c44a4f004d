//! Filesystem Access Module
//!
//! The narrow set of filesystem capabilities the cache store depends on.
//! Missing entries are always reported as `io::ErrorKind::NotFound` so the
//! store can tell them apart from real failures.

use std::io;
use std::path::Path;
use std::time::SystemTime;

use async_trait::async_trait;
use tracing::warn;

// == File Stat ==
/// Size and access time of a single directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Size in bytes
    pub size: u64,
    /// Last access time, falling back to modification time where the
    /// platform does not record access times
    pub accessed: SystemTime,
    /// Whether the entry is a regular file
    pub is_file: bool,
}

// == File System Trait ==
/// Filesystem capabilities used by `FileCache`.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Creates `path` and all of its missing parents.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Lists the names of the entries in `path`.
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    async fn stat(&self, path: &Path) -> io::Result<FileStat>;

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Writes `data` to `path`, replacing any previous content.
    async fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Sets the access time of `path` to now, leaving its modification time alone.
    async fn touch(&self, path: &Path) -> io::Result<()>;
}

// == Tokio File System ==
/// `FileSystem` backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => warn!("Skipping non UTF-8 entry {:?} in {}", name, path.display()),
            }
        }

        Ok(names)
    }

    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = tokio::fs::metadata(path).await?;
        let accessed = metadata.accessed().or_else(|_| metadata.modified())?;

        Ok(FileStat {
            size: metadata.len(),
            accessed,
            is_file: metadata.is_file(),
        })
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    async fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, data).await
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_dir_all(path).await
    }

    async fn exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn touch(&self, path: &Path) -> io::Result<()> {
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let file = std::fs::OpenOptions::new().write(true).open(&path)?;
            file.set_times(std::fs::FileTimes::new().set_accessed(SystemTime::now()))
        })
        .await
        .map_err(io::Error::other)?
    }
}
