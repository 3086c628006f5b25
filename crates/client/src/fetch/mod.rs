//! HTTP fetch pipeline for requests the cache cannot answer.
//!
//! ### Response classification
//! - Any status is returned as a response; only transport failures are errors.
//! - Responses whose final URL shares the site origin are `basic`,
//!   everything else is `cors`.
//! - `redirected` is set when the final URL differs from the requested one.
//! - Past the redirect limit the last 3xx is returned as the response.
//!
//! ### Limits
//! - Max redirects: 5 (configurable)
//! - Request timeout: 20s (configurable)

pub mod url;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Method, header};
use std::time::{Duration, Instant};

pub use self::url::{UrlError, resolve, same_origin};

use offline_core::{AppConfig, Error, Request, Response, ResponseType};

/// Anything that can turn a request into a response over the network.
///
/// The worker only talks to the network through this trait, so tests can
/// swap in a scripted implementation.
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform the request. HTTP error statuses are `Ok`; only failures to
    /// get any response at all are `Err`.
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Site origin used to classify responses as same-origin.
    pub origin: reqwest::Url,

    /// User agent string (default: "offline-cache/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            origin: config.origin.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// reqwest-backed [`Network`].
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(redirect_policy(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn classify(&self, final_url: &reqwest::Url) -> ResponseType {
        if same_origin(&self.config.origin, final_url) { ResponseType::Basic } else { ResponseType::Cors }
    }
}

/// Follow up to `max` redirects, then hand back the redirect itself.
fn redirect_policy(max: usize) -> Policy {
    if max == 0 {
        return Policy::none();
    }
    Policy::custom(move |attempt| if attempt.previous().len() > max { attempt.stop() } else { attempt.follow() })
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() { Error::FetchTimeout(err.to_string()) } else { Error::Network(err.to_string()) }
}

#[async_trait]
impl Network for FetchClient {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let start = Instant::now();
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| Error::InvalidInput(format!("invalid method {}", request.method)))?;

        let response = self
            .http
            .request(method, request.url.as_str())
            .header(header::ACCEPT, request.destination.accept())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let final_url = response.url().clone();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
            .collect();

        let body = response.bytes().await.map_err(transport_error)?;

        let fetch_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            url = %request.url,
            final_url = %final_url,
            status = status.as_u16(),
            bytes = body.len(),
            fetch_ms,
            "network fetch"
        );

        Ok(Response {
            redirected: final_url != request.url,
            response_type: self.classify(&final_url),
            url: final_url,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
