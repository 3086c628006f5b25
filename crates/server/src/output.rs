//! JSON shapes written to stdout, one per handled event.

use offline_core::ResponseType;
use offline_worker::{Notification, Outcome, Source};
use serde::Serialize;

use crate::error::ErrorReply;

/// Serializable summary of an [`Outcome`]. Fetch bodies are summarized by size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OutcomeView {
    Installed {
        cache: String,
        entries: usize,
    },
    Activated {
        cache: String,
        deleted: Vec<String>,
    },
    Fetched {
        source: Source,
        url: String,
        status: u16,
        response_type: ResponseType,
        content_type: Option<String>,
        bytes: usize,
        redirected: bool,
    },
    Synced {
        tag: String,
        ran: bool,
    },
    Notify {
        notification: Notification,
    },
    Clicked {
        close: bool,
        open_window: Option<String>,
    },
}

impl From<&Outcome> for OutcomeView {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Installed { cache, entries } => OutcomeView::Installed { cache: cache.clone(), entries: *entries },
            Outcome::Activated { cache, deleted } => {
                OutcomeView::Activated { cache: cache.clone(), deleted: deleted.clone() }
            }
            Outcome::Fetched(fetched) => {
                let response = &fetched.response;
                OutcomeView::Fetched {
                    source: fetched.source,
                    url: response.url.to_string(),
                    status: response.status,
                    response_type: response.response_type,
                    content_type: response.content_type().map(str::to_string),
                    bytes: response.body.len(),
                    redirected: response.redirected,
                }
            }
            Outcome::Synced { tag, ran } => OutcomeView::Synced { tag: tag.clone(), ran: *ran },
            Outcome::Notify(notification) => OutcomeView::Notify { notification: notification.clone() },
            Outcome::Clicked(click) => OutcomeView::Clicked {
                close: click.close,
                open_window: click.open_window.as_ref().map(|u| u.to_string()),
            },
        }
    }
}

/// One line of output: an outcome or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Ok(OutcomeView),
    Err { error: ErrorReply },
}

impl Reply {
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }
}

impl From<Result<Outcome, offline_core::Error>> for Reply {
    fn from(result: Result<Outcome, offline_core::Error>) -> Self {
        match result {
            Ok(outcome) => Reply::Ok(OutcomeView::from(&outcome)),
            Err(e) => Reply::Err { error: ErrorReply::from(&e) },
        }
    }
}
