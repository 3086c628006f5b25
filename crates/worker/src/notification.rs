//! Push notifications and what a click on one does.

use offline_core::{AppConfig, Error};
use serde::{Deserialize, Serialize};
use url::Url;

/// Action id that opens the blog index.
pub const ACTION_EXPLORE: &str = "explore";

/// Action id that only dismisses the notification.
pub const ACTION_CLOSE: &str = "close";

const ICON: &str = "/images/icon-192x192.png";
const BADGE: &str = "/images/badge-72x72.png";
const VIBRATE: [u32; 3] = [100, 50, 100];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    /// Milliseconds since the Unix epoch.
    pub date_of_arrival: i64,
    pub primary_key: u32,
}

/// A notification ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    /// Fill the fixed template; a missing payload gets the default body.
    pub fn from_push(config: &AppConfig, text: Option<&str>) -> Self {
        let body = text.unwrap_or(config.default_push_body.as_str()).to_string();

        Self {
            title: config.notification_title.clone(),
            body,
            icon: ICON.into(),
            badge: BADGE.into(),
            vibrate: VIBRATE.to_vec(),
            data: NotificationData { date_of_arrival: chrono::Utc::now().timestamp_millis(), primary_key: 1 },
            actions: vec![
                NotificationAction {
                    action: ACTION_EXPLORE.into(),
                    title: "Read Blog".into(),
                    icon: "/images/checkmark.png".into(),
                },
                NotificationAction { action: ACTION_CLOSE.into(), title: "Close".into(), icon: "/images/xmark.png".into() },
            ],
        }
    }
}

/// Effects of a notification click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickOutcome {
    /// The notification is always closed.
    pub close: bool,
    /// Window to open, if any.
    pub open_window: Option<Url>,
}

impl ClickOutcome {
    pub fn for_action(config: &AppConfig, action: Option<&str>) -> Result<Self, Error> {
        let open_window = match action {
            Some(ACTION_EXPLORE) => Some(
                config
                    .origin
                    .join(&config.blog_index)
                    .map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.blog_index)))?,
            ),
            _ => None,
        };
        Ok(Self { close: true, open_window })
    }
}
