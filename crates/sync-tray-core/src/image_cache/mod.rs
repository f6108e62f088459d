//! Host-served images cached as local files.
//!
//! Toolkits want icon files on disk, the host serves them over HTTP. The
//! cache downloads each image once and hands out its local path from then
//! on.

mod http_fetcher;
mod temp_image_cache;

pub use {http_fetcher::HttpImageFetcher, temp_image_cache::TempImageCache};

use crate::CoreResult;

use std::{future::Future, path::PathBuf};

/// Source of raw image bytes.
pub trait ImageFetcher {
    /// Download the resource at `url`.
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = CoreResult<Vec<u8>>>;
}

/// Maps relative image identifiers to local files.
pub trait IconCache {
    /// Local path of the image `relative_id` (e.g. `/tray.png`), downloading
    /// it on first use.
    fn fetch(&mut self, relative_id: &str) -> impl Future<Output = CoreResult<PathBuf>>;

    /// Delete every cached file. Returns how many were removed.
    fn purge(&mut self) -> usize;
}
