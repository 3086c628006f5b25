//! JSON-lines event loop.
//!
//! Each stdin line is one [`Event`]; each produces exactly one [`Reply`] line
//! on stdout. Blank lines are skipped. Logging stays on stderr.

use anyhow::Result;
use offline_worker::{Event, OfflineCache};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::ErrorReply;
use crate::output::Reply;

/// Parse and handle one input line.
pub async fn handle_line(worker: &OfflineCache, line: &str) -> Reply {
    match serde_json::from_str::<Event>(line) {
        Ok(event) => Reply::from(worker.handle(event).await),
        Err(e) => {
            tracing::warn!(error = %e, "rejected input line");
            Reply::Err { error: ErrorReply::parse(&e) }
        }
    }
}

/// Write one reply as a JSON line.
pub async fn write_reply<W: AsyncWrite + Unpin>(out: &mut W, reply: &Reply) -> Result<()> {
    let mut json = serde_json::to_string(reply)?;
    json.push('\n');
    out.write_all(json.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

/// Serve events from stdin until EOF, then wait for background stores.
pub async fn serve_stdio(worker: &OfflineCache) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_line(worker, &line).await;
        write_reply(&mut stdout, &reply).await?;
        handled += 1;
    }

    worker.settle().await;
    tracing::info!(handled, "input closed, event loop finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use offline_client::{FetchClient, FetchConfig};
    use offline_core::{AppConfig, CacheDb};
    use std::sync::Arc;

    async fn worker() -> OfflineCache {
        let config = AppConfig::default();
        let db = CacheDb::open_in_memory().await.unwrap();
        let network = Arc::new(FetchClient::new(FetchConfig::from(&config)).unwrap());
        OfflineCache::new(config, db, network).unwrap()
    }

    #[tokio::test]
    async fn test_handle_line_push() {
        let worker = worker().await;
        let reply = handle_line(&worker, r#"{"type":"push","text":"New post"}"#).await;

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["outcome"], "notify");
        assert_eq!(value["notification"]["body"], "New post");
    }

    #[tokio::test]
    async fn test_handle_line_invalid_json() {
        let worker = worker().await;
        let reply = handle_line(&worker, "not json").await;
        assert!(matches!(reply, Reply::Err { error } if error.code == crate::error::PARSE_ERROR));
    }

    #[tokio::test]
    async fn test_handle_line_activate_empty_db() {
        let worker = worker().await;
        let reply = handle_line(&worker, r#"{"type":"activate"}"#).await;

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["outcome"], "activated");
        assert_eq!(value["deleted"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_write_reply_is_one_line() {
        let worker = worker().await;
        let reply = handle_line(&worker, r#"{"type":"notification_click","action":"close"}"#).await;

        let mut out = Vec::new();
        write_reply(&mut out, &reply).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains(r#""outcome":"clicked""#));
    }
}
