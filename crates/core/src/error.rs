//! Unified error types for the offline cache.
//!
//! Every variant carries a stable upper-case code prefix in its message and a
//! numeric code (see [`Error::code`]) used by the JSON event loop.

use tokio_rusqlite::rusqlite;

/// Unified error types for the offline cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., storing a non-GET request).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid or unresolvable URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Stored entry could not be decoded.
    #[error("CACHE_ERROR: corrupt entry: {0}")]
    CorruptEntry(String),

    /// The network could not produce a response at all.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Response body is larger than the cache will store.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// A manifest resource was unavailable, so nothing was precached.
    #[error("INSTALL_FAILED: {0}")]
    InstallFailed(String),

    /// The deferred-work routine reported a failure.
    #[error("SYNC_FAILED: {0}")]
    SyncFailed(String),
}

impl Error {
    /// Stable numeric code for machine consumers.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidInput(_) => -32602,
            Error::InvalidUrl(_) => -32003,
            Error::Database(_) | Error::MigrationFailed(_) | Error::CorruptEntry(_) => -32002,
            Error::Network(_) => -32008,
            Error::FetchTimeout(_) => -32006,
            Error::FetchTooLarge(_) => -32007,
            Error::InstallFailed(_) => -32020,
            Error::SyncFailed(_) => -32021,
        }
    }

    /// Whether this error means the network was unreachable or gave up.
    ///
    /// These are the failures the fetch handler recovers from with the
    /// offline page on navigations.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, Error::Network(_) | Error::FetchTimeout(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::CorruptEntry(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InstallFailed("/offline.html".to_string());
        assert!(err.to_string().contains("INSTALL_FAILED"));
        assert!(err.to_string().contains("/offline.html"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::Network("down".into()).code(), -32008);
        assert_eq!(Error::InvalidInput("x".into()).code(), -32602);
        assert_eq!(Error::CorruptEntry("x".into()).code(), -32002);
    }

    #[test]
    fn test_network_failure_classification() {
        assert!(Error::Network("refused".into()).is_network_failure());
        assert!(Error::FetchTimeout("20s".into()).is_network_failure());
        assert!(!Error::InvalidUrl("::".into()).is_network_failure());
        assert!(!Error::FetchTooLarge("10 bytes exceeds 4".into()).is_network_failure());
        assert!(!Error::InstallFailed("/".into()).is_network_failure());
    }
}
