//! Install-time manifest: the URLs precached before the worker takes control.

use offline_client::resolve;
use offline_core::config::MAX_RECENT_POSTS;
use offline_core::{AppConfig, Error, Request};
use url::Url;

/// Ordered, duplicate-free list of absolute URLs to precache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    urls: Vec<Url>,
}

impl Manifest {
    /// Resolve `entries` against `origin`, keeping the first occurrence of each URL.
    pub fn new<'a>(origin: &Url, entries: impl IntoIterator<Item = &'a str>) -> Result<Self, Error> {
        let mut urls: Vec<Url> = Vec::new();
        for entry in entries {
            let url = resolve(origin, entry).map_err(|e| Error::InvalidUrl(format!("{entry}: {e}")))?;
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        Ok(Self { urls })
    }

    /// Core URLs, then up to [`MAX_RECENT_POSTS`] recent posts, then the offline page.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let entries = config
            .precache_urls
            .iter()
            .chain(config.recent_posts.iter().take(MAX_RECENT_POSTS))
            .chain(std::iter::once(&config.offline_page))
            .map(String::as_str);
        Self::new(&config.origin, entries)
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    /// One plain `GET` per manifest URL.
    pub fn requests(&self) -> Vec<Request> {
        self.urls.iter().cloned().map(Request::get).collect()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
