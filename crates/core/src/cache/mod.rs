//! SQLite-backed cache storage for request/response pairs.
//!
//! One database holds any number of named stores. Each store maps a request
//! (method + URL) to a full response. It supports:
//!
//! - Create-if-absent opening of a named store
//! - Enumerating and deleting whole stores (version rotation)
//! - Single and all-or-nothing bulk inserts
//! - WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;
pub mod stores;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::{EntryKey, Store};
pub use stores::StoreStats;
