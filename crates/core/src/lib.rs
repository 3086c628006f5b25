//! Core types and shared functionality for the offline cache.
//!
//! This crate provides:
//! - Request and response values
//! - Named request/response stores on SQLite
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod http;

pub use cache::{CacheDb, EntryKey, Store, StoreStats};
pub use config::{AppConfig, ConfigError, DEFAULT_CACHE_NAME};
pub use error::Error;
pub use http::{Destination, Request, Response, ResponseType};
