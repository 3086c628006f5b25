//! Lifecycle events the worker reacts to, and what handling them produced.

use offline_core::{Destination, Response};
use serde::{Deserialize, Serialize};

use crate::notification::{ClickOutcome, Notification};

fn default_method() -> String {
    "GET".to_string()
}

/// One lifecycle event, tagged by `type` in its JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Precache the manifest into the current store.
    Install,
    /// Drop every store but the current one.
    Activate,
    /// A request issued by a page; `url` may be relative to the site origin.
    Fetch {
        url: String,
        #[serde(default = "default_method")]
        method: String,
        #[serde(default)]
        destination: Destination,
    },
    /// Connectivity is back for the given sync registration.
    Sync { tag: String },
    /// A push message arrived, optionally with a text payload.
    Push {
        #[serde(default)]
        text: Option<String>,
    },
    /// The user clicked a notification or one of its actions.
    NotificationClick {
        #[serde(default)]
        action: Option<String>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Install => "install",
            Event::Activate => "activate",
            Event::Fetch { .. } => "fetch",
            Event::Sync { .. } => "sync",
            Event::Push { .. } => "push",
            Event::NotificationClick { .. } => "notification_click",
        }
    }
}

/// Where a fetch result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Cache,
    Network,
    /// The offline page, substituted for a failed navigation.
    OfflineFallback,
}

/// Response produced by the fetch handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub response: Response,
    pub source: Source,
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Installed { cache: String, entries: usize },
    Activated { cache: String, deleted: Vec<String> },
    Fetched(Fetched),
    /// `ran` is false when the tag was not ours.
    Synced { tag: String, ran: bool },
    Notify(Notification),
    Clicked(ClickOutcome),
}
