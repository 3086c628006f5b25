//! Structured error replies for the event loop.

use offline_core::Error;
use serde::Serialize;

/// Code for lines that are not a valid event.
pub const PARSE_ERROR: i32 = -32700;

/// Error half of a reply line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    pub code: i32,
    pub message: String,
}

impl ErrorReply {
    pub fn parse(err: &serde_json::Error) -> Self {
        Self { code: PARSE_ERROR, message: format!("INVALID_EVENT: {err}") }
    }
}

impl From<&Error> for ErrorReply {
    fn from(err: &Error) -> Self {
        Self { code: err.code(), message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reply_from_error() {
        let reply = ErrorReply::from(&Error::Network("connection refused".into()));
        assert_eq!(reply.code, -32008);
        assert!(reply.message.starts_with("NETWORK_ERROR"));
    }

    #[test]
    fn test_parse_error_reply() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let reply = ErrorReply::parse(&err);
        assert_eq!(reply.code, PARSE_ERROR);
        assert!(reply.message.starts_with("INVALID_EVENT"));
    }
}
