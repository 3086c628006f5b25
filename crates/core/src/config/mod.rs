//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (OFFLINE_CACHE_*)
//! 2. TOML config file (`--config`, or OFFLINE_CACHE_CONFIG_FILE via the CLI)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

mod validation;

pub use validation::ConfigError;

/// Store name of the current deployment. Changing it rotates the cache.
pub const DEFAULT_CACHE_NAME: &str = "blog-cache-v1";

/// How many recent posts the manifest carries.
pub const MAX_RECENT_POSTS: usize = 10;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (OFFLINE_CACHE_*)
/// 2. TOML config file
/// 3. Built-in defaults
///
/// List values in the environment use array syntax, e.g.
/// `OFFLINE_CACHE_RECENT_POSTS='["/posts/a/", "/posts/b/"]'`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin of the site; relative URLs resolve against it and only
    /// responses from it are same-origin.
    #[serde(default = "default_origin")]
    pub origin: Url,

    /// Name of the current store.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Path to SQLite cache database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Largest response body the cache stores. Larger responses are still
    /// returned to the caller.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Core URLs precached on install: pages, stylesheets, scripts, images.
    #[serde(default = "default_precache_urls")]
    pub precache_urls: Vec<String>,

    /// Most recent post URLs, newest first, as published by the site generator.
    #[serde(default)]
    pub recent_posts: Vec<String>,

    /// Page served for navigations when the network is unreachable.
    #[serde(default = "default_offline_page")]
    pub offline_page: String,

    /// Path opened by the "explore" notification action.
    #[serde(default = "default_blog_index")]
    pub blog_index: String,

    /// Title of push notifications.
    #[serde(default = "default_notification_title")]
    pub notification_title: String,

    /// Body of push notifications whose payload is empty.
    #[serde(default = "default_push_body")]
    pub default_push_body: String,
}

fn default_origin() -> Url {
    Url::parse("http://localhost:8080/").expect("static origin parses")
}

fn default_cache_name() -> String {
    DEFAULT_CACHE_NAME.into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./offline-cache.sqlite")
}

fn default_user_agent() -> String {
    "offline-cache/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_max_redirects() -> usize {
    5
}

fn default_precache_urls() -> Vec<String> {
    ["/", "/blog/", "/css/style.css", "/js/main.js", "/images/default.jpg"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_offline_page() -> String {
    "/offline.html".into()
}

fn default_blog_index() -> String {
    "/blog/".into()
}

fn default_notification_title() -> String {
    "Blog Update".into()
}

fn default_push_body() -> String {
    "New content available!".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            cache_name: default_cache_name(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            max_redirects: default_max_redirects(),
            precache_urls: default_precache_urls(),
            recent_posts: Vec::new(),
            offline_page: default_offline_page(),
            blog_index: default_blog_index(),
            notification_title: default_notification_title(),
            default_push_body: default_push_body(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration, layering an optional TOML file and then the
    /// environment over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or parsed, or if
    /// validation fails after loading.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(
            Env::prefixed("OFFLINE_CACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
