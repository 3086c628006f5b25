//! Network access for the offline cache.
//!
//! This crate provides the `Network` seam the worker fetches through, its
//! reqwest implementation, and URL resolution against the site origin.

pub mod fetch;

pub use fetch::{FetchClient, FetchConfig, Network, UrlError, resolve, same_origin};
