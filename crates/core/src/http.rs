//! Request and response values passed between the worker, the network and the store.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

/// What a request is for, mirroring the fetch destination of a browser request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// A full page load.
    Document,
    Script,
    Style,
    Image,
    Font,
    Manifest,
    /// No particular destination (fetch/XHR from a page).
    #[default]
    Empty,
}

impl Destination {
    /// Accept header a browser would send for this destination.
    pub fn accept(&self) -> &'static str {
        match self {
            Destination::Document => "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            Destination::Style => "text/css,*/*;q=0.1",
            Destination::Image => "image/avif,image/webp,image/*,*/*;q=0.8",
            Destination::Manifest => "application/manifest+json,*/*;q=0.8",
            Destination::Script | Destination::Font | Destination::Empty => "*/*",
        }
    }
}

/// An outgoing request issued by a page in the controlled scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: Url,
    #[serde(default)]
    pub destination: Destination,
}

impl Request {
    pub fn new(method: impl Into<String>, url: Url, destination: Destination) -> Self {
        Self { method: method.into().to_uppercase(), url, destination }
    }

    /// Plain `GET` with no particular destination.
    pub fn get(url: Url) -> Self {
        Self::new("GET", url, Destination::Empty)
    }

    /// `GET` for a full page load.
    pub fn navigate(url: Url) -> Self {
        Self::new("GET", url, Destination::Document)
    }

    pub fn is_navigation(&self) -> bool {
        self.destination == Destination::Document
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

/// Visibility of a response to the page, as the browser classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin response.
    Basic,
    /// Cross-origin response the page may read.
    Cors,
    /// Cross-origin response the page may not read.
    Opaque,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Basic => "basic",
            ResponseType::Cors => "cors",
            ResponseType::Opaque => "opaque",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(ResponseType::Basic),
            "cors" => Some(ResponseType::Cors),
            "opaque" => Some(ResponseType::Opaque),
            _ => None,
        }
    }
}

/// A full response: status line, headers and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// URL the response came from, after redirects.
    pub url: Url,
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub response_type: ResponseType,
    pub redirected: bool,
}

impl Response {
    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Only exact 200s from the site's own origin are kept by the fetch path.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.response_type == ResponseType::Basic
    }
}
