use crate::{CoreResult, IconCache, ImageFetcher};

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;
use tracing::{info, instrument, warn};

/// Write-once image cache backed by a private temporary directory.
///
/// Entries are never evicted. [`purge`](IconCache::purge) deletes the
/// files, and dropping the cache removes the directory itself.
#[derive(Debug)]
pub struct TempImageCache<F> {
    base_url: String,
    fetcher: F,
    dir: TempDir,
    entries: HashMap<String, PathBuf>,
}

impl<F: ImageFetcher> TempImageCache<F> {
    /// Cache resolving ids against `base_url` (ids start with `/`).
    #[track_caller]
    pub fn new(base_url: impl Into<String>, fetcher: F) -> CoreResult<Self> {
        let dir = tempfile::Builder::new().prefix("sync-tray-").tempdir()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fetcher,
            dir,
            entries: HashMap::new(),
        })
    }

    /// Directory the cached files live in.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn file_name_for(&self, relative_id: &str) -> String {
        let sanitized: String = relative_id
            .trim_start_matches('/')
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        // Index prefix keeps "a/b.png" and "a_b.png" apart.
        format!("{:03}-{}", self.entries.len(), sanitized)
    }
}

impl<F: ImageFetcher> IconCache for TempImageCache<F> {
    #[instrument(skip(self))]
    async fn fetch(&mut self, relative_id: &str) -> CoreResult<PathBuf> {
        if let Some(path) = self.entries.get(relative_id) {
            return Ok(path.clone());
        }

        let url = format!("{}{}", self.base_url, relative_id);
        let bytes = self.fetcher.fetch_bytes(&url).await?;

        let path = self.dir.path().join(self.file_name_for(relative_id));
        fs::write(&path, &bytes)?;

        info!(image = %relative_id, path = ?path, "Caching image");

        self.entries.insert(relative_id.to_string(), path.clone());

        Ok(path)
    }

    #[instrument(skip(self))]
    fn purge(&mut self) -> usize {
        let mut removed = 0;

        for (relative_id, path) in self.entries.drain() {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(image = %relative_id, path = ?path, error = ?e, "Failed to delete cached image"),
            }
        }

        info!(removed, "Image cache purged");

        removed
    }
}
