//! Command-line interface definitions.
//!
//! Every subcommand except `caches` and `serve` maps to one lifecycle event.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use offline_core::Destination;
use offline_worker::{ACTION_EXPLORE, BACKGROUND_SYNC_TAG, Event};

/// Offline cache for a static blog: cache-first fetch with an offline fallback.
#[derive(Parser, Debug)]
#[command(name = "offline-cache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file layered under OFFLINE_CACHE_* environment variables
    #[arg(long, global = true, env = "OFFLINE_CACHE_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Precache the manifest into the current store
    Install,

    /// Delete every store except the current one
    Activate,

    /// Answer one request cache-first
    Fetch {
        /// Absolute URL or path relative to the site origin
        url: String,

        /// Treat the request as a page navigation (enables the offline page)
        #[arg(long)]
        navigate: bool,

        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: String,

        /// Write the response body to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Run deferred work for a sync tag
    Sync {
        #[arg(long, default_value = BACKGROUND_SYNC_TAG)]
        tag: String,
    },

    /// Build the notification for a push message
    Push {
        /// Push payload text
        text: Option<String>,
    },

    /// Handle a click on a notification
    Click {
        /// Action id, e.g. "explore" or "close"; omit for a click on the body
        #[arg(long)]
        action: Option<String>,
    },

    /// List stores with entry counts and sizes
    Caches,

    /// Read JSON events from stdin, write one JSON reply per line to stdout
    Serve,
}

impl Commands {
    /// The event this command stands for, if it is a single-event command.
    pub fn to_event(&self) -> Option<Event> {
        match self {
            Commands::Install => Some(Event::Install),
            Commands::Activate => Some(Event::Activate),
            Commands::Fetch { url, navigate, method, .. } => Some(Event::Fetch {
                url: url.clone(),
                method: method.clone(),
                destination: if *navigate { Destination::Document } else { Destination::Empty },
            }),
            Commands::Sync { tag } => Some(Event::Sync { tag: tag.clone() }),
            Commands::Push { text } => Some(Event::Push { text: text.clone() }),
            Commands::Click { action } => Some(Event::NotificationClick { action: action.clone() }),
            Commands::Caches | Commands::Serve => None,
        }
    }
}
