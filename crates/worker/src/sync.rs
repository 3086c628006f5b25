//! Deferred work run on background sync.

use async_trait::async_trait;
use offline_core::Error;

/// Sync tag the worker acts on; other tags are acknowledged and ignored.
pub const BACKGROUND_SYNC_TAG: &str = "background-sync";

/// Work replayed once connectivity returns.
///
/// Implementations decide what was queued while offline and how to replay it.
#[async_trait]
pub trait SyncTask: Send + Sync {
    async fn run(&self) -> Result<(), Error>;
}

/// Nothing is queued, so nothing is replayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSync;

#[async_trait]
impl SyncTask for NoopSync {
    async fn run(&self) -> Result<(), Error> {
        tracing::debug!("background sync: no queued work");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sync_succeeds() {
        assert!(NoopSync.run().await.is_ok());
    }
}
