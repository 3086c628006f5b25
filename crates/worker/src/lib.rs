//! Event handling for the offline cache.
//!
//! This crate provides:
//! - `Event`/`Outcome`: lifecycle events and their results
//! - `OfflineCache`: the dispatcher and its install, activate, fetch, sync,
//!   push and notification-click handlers
//! - `Manifest`: the URLs precached on install
//! - `SyncTask`: the hook background sync runs

pub mod event;
pub mod manifest;
pub mod notification;
pub mod sync;
pub mod worker;

pub use event::{Event, Fetched, Outcome, Source};
pub use manifest::Manifest;
pub use notification::{ACTION_CLOSE, ACTION_EXPLORE, ClickOutcome, Notification, NotificationAction};
pub use sync::{BACKGROUND_SYNC_TAG, NoopSync, SyncTask};
pub use worker::OfflineCache;
