//! Cache Store Module
//!
//! Main cache engine: one JSON file per entry, a running byte total, and a
//! purge pass that evicts least-recently-accessed files once the total
//! exceeds capacity.
//!
//! The byte total is optimistic. `set` adds the serialized length without
//! re-statting the file, so it can drift from the true disk usage. Every
//! purge, `info` and `init` recomputes it from a directory scan, and the LRU
//! order is always derived from file access times on disk, never from an
//! in-memory index.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::fs::{FileStat, FileSystem, TokioFileSystem};
use crate::cache::naming;
use crate::cache::{CacheInfo, CacheOptions, CACHE_DIR_NAME};
use crate::error::{CacheError, Result};

// == Scanned File ==
#[derive(Debug, Clone)]
struct ScannedFile {
    name: String,
    stat: FileStat,
}

fn total_size(files: &[ScannedFile]) -> u64 {
    files.iter().map(|file| file.stat.size).sum()
}

fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

// == File Cache ==
/// Disk-backed cache with LRU eviction keyed on file access time.
///
/// Share between tasks as `Arc<FileCache>`. Mutations of the byte total
/// (`set`, `remove`, purges, `info`, `init`, `remove_all`) are serialized by
/// one mutex. `get`, `has` and `keys` never take it.
pub struct FileCache {
    /// Directory holding one file per entry
    dir: PathBuf,
    /// Maximum total bytes to retain
    capacities: u64,
    /// Running total of backing file sizes
    used_bytes: Mutex<u64>,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for FileCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCache")
            .field("dir", &self.dir)
            .field("capacities", &self.capacities)
            .finish_non_exhaustive()
    }
}

impl FileCache {
    // == Open ==
    /// Opens the cache stored under `<base>/cache`, creating it if needed.
    ///
    /// Reopening an existing directory restores every entry and recomputes
    /// the used size from disk.
    pub async fn open(base: impl AsRef<Path>, options: CacheOptions) -> Result<Self> {
        Self::open_with(base, options, Arc::new(TokioFileSystem)).await
    }

    /// Same as `open`, with an explicit filesystem backend.
    pub async fn open_with(
        base: impl AsRef<Path>,
        options: CacheOptions,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let cache = Self {
            dir: base.as_ref().join(CACHE_DIR_NAME),
            capacities: options.capacities,
            used_bytes: Mutex::new(0),
            fs,
        };

        cache.init().await?;

        info!(
            "Opened file cache at {} (capacity {} bytes)",
            cache.dir.display(),
            cache.capacities
        );
        Ok(cache)
    }

    /// Directory holding the backing files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn capacities(&self) -> u64 {
        self.capacities
    }

    // == Init ==
    /// Ensures the cache directory exists and recomputes the used size.
    ///
    /// Safe to call on a populated directory.
    pub async fn init(&self) -> Result<()> {
        let mut used = self.used_bytes.lock().await;
        self.init_locked(&mut used).await
    }

    async fn init_locked(&self, used: &mut u64) -> Result<()> {
        self.fs.create_dir_all(&self.dir).await?;
        *used = total_size(&self.scan().await?);
        debug!("Initialised {} with {} bytes used", self.dir.display(), used);
        Ok(())
    }

    // == Get ==
    /// Reads and decodes the value stored under `key`.
    ///
    /// A successful read refreshes the entry's access time, moving it to
    /// the most recently used end of the eviction order. A key that cannot
    /// name a file, such as the empty key, is `NotFound`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let Some(path) = self.lookup_path(key) else {
            return Err(CacheError::NotFound(key.to_string()));
        };

        let data = match self.fs.read(&path).await {
            Ok(data) => data,
            Err(err) if is_not_found(&err) => return Err(CacheError::NotFound(key.to_string())),
            Err(err) => return Err(err.into()),
        };

        self.refresh_access_time(&path).await;

        serde_json::from_slice(&data).map_err(|source| CacheError::Decode {
            key: key.to_string(),
            source,
        })
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value, then runs a
    /// purge pass.
    ///
    /// The entry just written is never evicted by that pass, so a value
    /// larger than the capacity is kept and leaves the cache over capacity.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.file_path(key)?;
        let data = serde_json::to_vec(value).map_err(CacheError::Encode)?;

        let mut used = self.used_bytes.lock().await;
        self.fs.write(&path, &data).await?;
        self.refresh_access_time(&path).await;

        *used += data.len() as u64;
        debug!("Set '{}' ({} bytes, {} bytes used)", key, data.len(), used);

        let keep = path.file_name().and_then(|name| name.to_str());
        self.purge_locked(&mut used, keep).await?;
        Ok(())
    }

    // == Update ==
    /// Replaces the value under `key` with `f(current)`.
    ///
    /// Fails with `NotFound` when the key is absent. Not atomic: a concurrent
    /// writer to the same key may be overwritten.
    pub async fn update<T, F>(&self, key: &str, f: F) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> T,
    {
        let current = self.get(key).await?;
        self.set(key, &f(current)).await
    }

    // == Remove ==
    /// Deletes the entry under `key`. Removing an absent key succeeds.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let Some(path) = self.lookup_path(key) else {
            return Ok(());
        };
        let mut used = self.used_bytes.lock().await;

        let stat = match self.fs.stat(&path).await {
            Ok(stat) => stat,
            Err(err) if is_not_found(&err) => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        match self.fs.remove_file(&path).await {
            Ok(()) => {}
            Err(err) if is_not_found(&err) => return Ok(()),
            Err(err) => return Err(err.into()),
        }

        *used = used.saturating_sub(stat.size);
        debug!("Removed '{}' ({} bytes, {} bytes used)", key, stat.size, used);
        Ok(())
    }

    // == Remove All ==
    /// Deletes the whole cache directory and recreates it empty.
    pub async fn remove_all(&self) -> Result<()> {
        let mut used = self.used_bytes.lock().await;

        match self.fs.remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(err) if is_not_found(&err) => {}
            Err(err) => return Err(err.into()),
        }

        self.init_locked(&mut used).await?;
        info!("Cleared file cache at {}", self.dir.display());
        Ok(())
    }

    // == Keys ==
    /// Lists the keys currently on disk, sorted.
    ///
    /// Keys too long for a file name are stored under a digest and cannot be
    /// recovered, so they are left out.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let names = self.fs.read_dir(&self.dir).await?;

        let mut keys: Vec<String> = names
            .into_iter()
            .filter_map(|name| {
                let key = naming::key_for(&name);
                if key.is_some() {
                    return key;
                }
                if naming::is_hashed_name(&name) {
                    debug!("Skipping digest-named entry {}", name);
                } else {
                    warn!("Ignoring unrecognised file {} in cache directory", name);
                }
                None
            })
            .collect();

        keys.sort();
        Ok(keys)
    }

    // == Has ==
    /// Returns whether `key` has a backing file. Does not refresh access time.
    pub async fn has(&self, key: &str) -> Result<bool> {
        let Some(path) = self.lookup_path(key) else {
            return Ok(false);
        };
        Ok(self.fs.exists(&path).await?)
    }

    // == Info ==
    /// Recomputes the used size from disk and returns it with the capacity.
    pub async fn info(&self) -> Result<CacheInfo> {
        let mut used = self.used_bytes.lock().await;
        *used = total_size(&self.scan().await?);
        Ok(CacheInfo::new(*used, self.capacities))
    }

    // == Purge ==
    /// Evicts least-recently-accessed entries until the cache fits its
    /// capacity. Returns the number of entries evicted.
    ///
    /// `set` runs this automatically.
    pub async fn purge(&self) -> Result<usize> {
        let mut used = self.used_bytes.lock().await;
        self.purge_locked(&mut used, None).await
    }

    async fn purge_locked(&self, used: &mut u64, keep: Option<&str>) -> Result<usize> {
        if *used <= self.capacities {
            return Ok(0);
        }

        let mut files = self.scan().await?;
        *used = total_size(&files);

        // Oldest access first, ties by name
        files.sort_by(|a, b| {
            a.stat
                .accessed
                .cmp(&b.stat.accessed)
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut evicted = 0;
        for file in files.iter().filter(|file| Some(file.name.as_str()) != keep) {
            if *used <= self.capacities {
                break;
            }

            match self.fs.remove_file(&self.dir.join(&file.name)).await {
                Ok(()) => {}
                Err(err) if is_not_found(&err) => {}
                Err(err) => return Err(err.into()),
            }

            *used = used.saturating_sub(file.stat.size);
            evicted += 1;
            debug!("Evicted {} ({} bytes)", file.name, file.stat.size);
        }

        if evicted > 0 {
            info!(
                "Purge evicted {} entries, {} of {} bytes used",
                evicted, used, self.capacities
            );
        }

        Ok(evicted)
    }

    // == Helpers ==
    fn file_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.dir.join(naming::file_name_for(key)?))
    }

    // None when the key can never have a backing file
    fn lookup_path(&self, key: &str) -> Option<PathBuf> {
        self.file_path(key).ok()
    }

    async fn scan(&self) -> Result<Vec<ScannedFile>> {
        let names = self.fs.read_dir(&self.dir).await?;
        let mut files = Vec::with_capacity(names.len());

        for name in names {
            match self.fs.stat(&self.dir.join(&name)).await {
                Ok(stat) if stat.is_file => files.push(ScannedFile { name, stat }),
                Ok(_) => debug!("Skipping non-file entry {}", name),
                Err(err) if is_not_found(&err) => {
                    warn!("Entry {} disappeared during scan", name)
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(files)
    }

    async fn refresh_access_time(&self, path: &Path) {
        if let Err(err) = self.fs.touch(path).await {
            warn!("Failed to refresh access time of {}: {}", path.display(), err);
        }
    }
}
