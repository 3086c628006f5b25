//! The offline cache: cache-first request handling plus the lifecycle handlers.
//!
//! ### Fetch
//! - Hit in the current store → stored response, no network.
//! - Miss → network. A 200 same-origin response no larger than `max_bytes` is
//!   copied into the store by a background task the caller never waits on;
//!   anything else passes through.
//! - Network failure → the offline page for navigations, an error otherwise.
//!
//! ### Install / activate
//! - Install precaches the whole manifest or nothing.
//! - Activate deletes every store whose name is not the current one.

use std::sync::Arc;

use futures_util::future::try_join_all;
use offline_client::{Network, resolve};
use offline_core::{AppConfig, CacheDb, Error, Request, Response};
use tokio_util::task::TaskTracker;
use url::Url;

use crate::event::{Event, Fetched, Outcome, Source};
use crate::manifest::Manifest;
use crate::notification::{ClickOutcome, Notification};
use crate::sync::{BACKGROUND_SYNC_TAG, NoopSync, SyncTask};

/// Cache-first request handler bound to one store name.
///
/// Holds no cache state of its own: every event reads the database, so a
/// fresh instance over the same database behaves identically.
pub struct OfflineCache {
    config: AppConfig,
    db: CacheDb,
    network: Arc<dyn Network>,
    sync: Arc<dyn SyncTask>,
    manifest: Manifest,
    offline_page: Url,
    tasks: TaskTracker,
}

impl OfflineCache {
    /// Build a handler from configuration, resolving the manifest up front.
    pub fn new(config: AppConfig, db: CacheDb, network: Arc<dyn Network>) -> Result<Self, Error> {
        let manifest = Manifest::from_config(&config)?;
        let offline_page = resolve(&config.origin, &config.offline_page)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.offline_page)))?;

        Ok(Self {
            config,
            db,
            network,
            sync: Arc::new(NoopSync),
            manifest,
            offline_page,
            tasks: TaskTracker::new(),
        })
    }

    /// Replace the deferred-work routine run on background sync.
    pub fn with_sync_task(mut self, sync: Arc<dyn SyncTask>) -> Self {
        self.sync = sync;
        self
    }

    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Route one event to its handler.
    pub async fn handle(&self, event: Event) -> Result<Outcome, Error> {
        tracing::debug!(event = event.name(), "handling event");
        match event {
            Event::Install => {
                let entries = self.install().await?;
                Ok(Outcome::Installed { cache: self.config.cache_name.clone(), entries })
            }
            Event::Activate => {
                let deleted = self.activate().await?;
                Ok(Outcome::Activated { cache: self.config.cache_name.clone(), deleted })
            }
            Event::Fetch { url, method, destination } => {
                let url = resolve(&self.config.origin, &url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
                let request = Request::new(method, url, destination);
                self.fetch(&request).await.map(Outcome::Fetched)
            }
            Event::Sync { tag } => {
                let ran = self.sync(&tag).await?;
                Ok(Outcome::Synced { tag, ran })
            }
            Event::Push { text } => Ok(Outcome::Notify(self.push(text.as_deref()))),
            Event::NotificationClick { action } => self.notification_click(action.as_deref()).map(Outcome::Clicked),
        }
    }

    /// Precache every manifest URL into the current store.
    ///
    /// Returns the number of entries written. If any resource fails to load
    /// or answers with a non-OK status, nothing is written.
    pub async fn install(&self) -> Result<usize, Error> {
        let store = self.db.open_store(&self.config.cache_name).await?;

        let requests = self.manifest.requests();
        let pairs = try_join_all(requests.into_iter().map(|request| self.fetch_for_install(request))).await?;

        store
            .put_all(&pairs)
            .await
            .map_err(|e| Error::InstallFailed(format!("could not store manifest: {e}")))?;

        tracing::info!(cache = store.name(), entries = pairs.len(), "installed");
        Ok(pairs.len())
    }

    async fn fetch_for_install(&self, request: Request) -> Result<(Request, Response), Error> {
        let response = self
            .network
            .fetch(&request)
            .await
            .map_err(|e| Error::InstallFailed(format!("{}: {e}", request.url)))?;

        if !response.is_ok() {
            return Err(Error::InstallFailed(format!("{}: status {}", request.url, response.status)));
        }
        self.check_size(&response)
            .map_err(|e| Error::InstallFailed(format!("{}: {e}", request.url)))?;

        Ok((request, response))
    }

    fn check_size(&self, response: &Response) -> Result<(), Error> {
        if response.body.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                response.body.len(),
                self.config.max_bytes
            )));
        }
        Ok(())
    }

    /// Delete every store except the current one. Returns the deleted names.
    pub async fn activate(&self) -> Result<Vec<String>, Error> {
        let mut deleted = Vec::new();
        for name in self.db.store_names().await? {
            if name == self.config.cache_name {
                continue;
            }
            if self.db.delete_store(&name).await? {
                tracing::info!(cache = %name, "deleted old cache");
                deleted.push(name);
            }
        }
        Ok(deleted)
    }

    /// Answer a request cache-first.
    pub async fn fetch(&self, request: &Request) -> Result<Fetched, Error> {
        let store = self.db.store(&self.config.cache_name);

        match store.match_request(request).await {
            Ok(Some(response)) => {
                tracing::debug!(url = %request.url, "cache hit");
                return Ok(Fetched { response, source: Source::Cache });
            }
            Ok(None) => tracing::debug!(url = %request.url, "cache miss"),
            Err(e) => tracing::warn!(url = %request.url, error = %e, "cache lookup failed, using network"),
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    match self.check_size(&response) {
                        Ok(()) => self.store_in_background(request.clone(), response.clone()),
                        Err(e) => tracing::debug!(url = %request.url, error = %e, "not caching response"),
                    }
                }
                Ok(Fetched { response, source: Source::Network })
            }
            Err(e) if e.is_network_failure() && request.is_navigation() => self.offline_fallback(request, e).await,
            Err(e) => Err(e),
        }
    }

    async fn offline_fallback(&self, request: &Request, cause: Error) -> Result<Fetched, Error> {
        let store = self.db.store(&self.config.cache_name);
        match store.match_request(&Request::get(self.offline_page.clone())).await {
            Ok(Some(response)) => {
                tracing::debug!(url = %request.url, error = %cause, "network failed, serving offline page");
                Ok(Fetched { response, source: Source::OfflineFallback })
            }
            Ok(None) => Err(cause),
            Err(e) => {
                tracing::warn!(error = %e, "offline page lookup failed");
                Err(cause)
            }
        }
    }

    /// Copy a response into the current store without making the caller wait.
    fn store_in_background(&self, request: Request, response: Response) {
        let db = self.db.clone();
        let name = self.config.cache_name.clone();
        self.tasks.spawn(async move {
            let result = match db.open_store(&name).await {
                Ok(store) => store.put(&request, &response).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                tracing::warn!(url = %request.url, error = %e, "failed to cache response");
            }
        });
    }

    /// Run the deferred-work routine if `tag` is ours. Returns whether it ran.
    pub async fn sync(&self, tag: &str) -> Result<bool, Error> {
        if tag != BACKGROUND_SYNC_TAG {
            tracing::debug!(tag, "ignoring sync tag");
            return Ok(false);
        }
        self.sync.run().await?;
        Ok(true)
    }

    pub fn push(&self, text: Option<&str>) -> Notification {
        Notification::from_push(&self.config, text)
    }

    pub fn notification_click(&self, action: Option<&str>) -> Result<ClickOutcome, Error> {
        ClickOutcome::for_action(&self.config, action)
    }

    /// Wait until every background store started so far has finished.
    pub async fn settle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}
