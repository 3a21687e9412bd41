//! Overlay configuration synchronization client.
//!
//! [`OverlayConfigClient`] validates style changes, skips updates the server
//! has already confirmed, and POSTs the rest to `<base>/api/overlay-config`
//! with bounded retry.
//!
//! Sub-modules:
//! - [`cache`]: content fingerprints of applied updates (bounded LRU)
//! - [`delivery`]: the retrying POST primitive and its failure types
//! - [`error`]: construction errors
//! - [`outcome`]: per-call result reported to callers
//! - [`transport`]: the HTTP seam, mocked in tests

pub mod cache;
pub mod delivery;
pub mod error;
pub mod outcome;
pub mod transport;

pub use cache::Fingerprint;
pub use delivery::{DeliveryFailure, RetryPolicy, TransientCause};
pub use error::ClientError;
pub use outcome::UpdateOutcome;
pub use transport::{HttpReply, OverlayTransport, TransportError};

use crate::http::UreqTransport;
use cache::FingerprintCache;
use overlay_sync_config::{
    AnimationUpdate, ClientSettings, ColorsUpdate, FontUpdate, LayoutUpdate, OverlayConfig,
    OverlayUpdate, Section, SectionFields, ValidationError, builtin_theme, default_theme,
};
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

/// Path of the overlay configuration resource on the server.
pub const CONFIG_PATH: &str = "/api/overlay-config";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of remembered fingerprints.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Builder for [`OverlayConfigClient`].
///
/// ```rust,no_run
/// use overlay_sync::client::{OverlayConfigClient, RetryPolicy};
/// use std::time::Duration;
///
/// let client = OverlayConfigClient::builder("http://localhost:8082")
///     .timeout(Duration::from_secs(2))
///     .retry_policy(RetryPolicy::new(5, Duration::from_millis(500)))
///     .build()?;
/// # Ok::<(), overlay_sync::client::ClientError>(())
/// ```
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    enable_cache: bool,
    cache_capacity: usize,
    retry: RetryPolicy,
    transport: Option<Arc<dyn OverlayTransport>>,
    sleeper: Option<Sleeper>,
}

impl ClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            enable_cache: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            retry: RetryPolicy::default(),
            transport: None,
            sleeper: None,
        }
    }

    /// Per-request timeout for the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn enable_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Use `transport` instead of the built-in `ureq` one.
    pub fn transport(mut self, transport: Arc<dyn OverlayTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace `std::thread::sleep` for retry backoff.
    pub fn sleeper(mut self, sleeper: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleeper = Some(Arc::new(sleeper));
        self
    }

    pub fn build(self) -> Result<OverlayConfigClient, ClientError> {
        let base_url = normalize_base_url(&self.base_url)?;

        if self.timeout.is_zero() {
            return Err(ClientError::InvalidTimeout);
        }

        let cache = if self.enable_cache {
            let capacity =
                NonZeroUsize::new(self.cache_capacity).ok_or(ClientError::InvalidCacheCapacity)?;
            Some(Mutex::new(FingerprintCache::new(capacity)))
        } else {
            None
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::new(self.timeout)),
        };

        log::debug!(
            "Overlay client for {} (timeout {:?}, cache {}, {} attempts)",
            base_url,
            self.timeout,
            if cache.is_some() { "on" } else { "off" },
            self.retry.max_attempts
        );

        Ok(OverlayConfigClient {
            config_endpoint: format!("{base_url}{CONFIG_PATH}"),
            base_url,
            timeout: self.timeout,
            transport,
            cache,
            retry: self.retry,
            sleeper: self
                .sleeper
                .unwrap_or_else(|| Arc::new(std::thread::sleep) as Sleeper),
        })
    }
}

/// Check that `raw` addresses an HTTP(S) server and strip trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let invalid = |reason: String| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = url::Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "unsupported scheme '{}', expected http or https",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(raw.trim().trim_end_matches('/').to_string())
}

/// Client for the overlay server's style configuration API.
///
/// All calls block. The client is `Send + Sync`; the fingerprint cache is
/// locked only around lookups and inserts, never across a request.
pub struct OverlayConfigClient {
    base_url: String,
    config_endpoint: String,
    timeout: Duration,
    transport: Arc<dyn OverlayTransport>,
    cache: Option<Mutex<FingerprintCache>>,
    retry: RetryPolicy,
    sleeper: Sleeper,
}

impl OverlayConfigClient {
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Client with the default retry policy and cache capacity.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        enable_cache: bool,
    ) -> Result<Self, ClientError> {
        Self::builder(base_url)
            .timeout(timeout)
            .enable_cache(enable_cache)
            .build()
    }

    /// Client configured from persisted settings.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        settings.validate()?;
        Self::builder(settings.server_url.as_str())
            .timeout(settings.request_timeout())
            .enable_cache(settings.enable_cache)
            .cache_capacity(settings.cache_capacity)
            .retry_policy(RetryPolicy::new(
                settings.max_attempts,
                settings.backoff_unit(),
            ))
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Fetch the server's full configuration.
    ///
    /// With `use_cache`, a previously fetched configuration is returned
    /// without a request. Returns `None` when the server cannot provide one;
    /// the reason is logged.
    pub fn get_config(&self, use_cache: bool) -> Option<OverlayConfig> {
        if use_cache
            && let Some(cache) = &self.cache
            && let Some(config) = cache.lock().full_config()
        {
            log::debug!("Using cached overlay config");
            return Some(config.clone());
        }

        let reply = match self.transport.get(&self.config_endpoint) {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Error fetching overlay config: {}", e);
                return None;
            }
        };

        if reply.status != 200 {
            log::warn!("Failed to fetch overlay config: HTTP {}", reply.status);
            return None;
        }

        match serde_json::from_str::<OverlayConfig>(&reply.body) {
            Ok(config) => {
                if let Some(cache) = &self.cache {
                    cache.lock().store_full_config(config.clone());
                }
                Some(config)
            }
            Err(e) => {
                log::error!("Error parsing overlay config: {}", e);
                None
            }
        }
    }

    /// Update any subset of the font fields.
    pub fn update_font(&self, font: FontUpdate) -> Result<UpdateOutcome, ValidationError> {
        let fields = font.into_fields()?;
        Ok(self.apply_section(Section::Font, fields))
    }

    /// Update any subset of the text, shadow and stroke colors.
    pub fn update_colors(&self, colors: ColorsUpdate) -> Result<UpdateOutcome, ValidationError> {
        let fields = colors.into_fields()?;
        Ok(self.apply_section(Section::Colors, fields))
    }

    pub fn update_animation(
        &self,
        animation: AnimationUpdate,
    ) -> Result<UpdateOutcome, ValidationError> {
        let fields = animation.into_fields()?;
        Ok(self.apply_section(Section::Animation, fields))
    }

    pub fn update_layout(&self, layout: LayoutUpdate) -> Result<UpdateOutcome, ValidationError> {
        let fields = layout.into_fields()?;
        Ok(self.apply_section(Section::Layout, fields))
    }

    /// Send several sections in one request.
    ///
    /// Values are not validated and the fingerprint cache is neither
    /// consulted nor updated.
    pub fn update_full_config(&self, update: &OverlayUpdate) -> UpdateOutcome {
        if update.is_empty() {
            return UpdateOutcome::Empty;
        }
        let outcome = UpdateOutcome::from(self.deliver(update));
        if outcome.is_applied() {
            log::info!("Overlay config updated ({} sections)", update.sections().len());
        }
        outcome
    }

    /// Apply a built-in theme by name (case-insensitive).
    pub fn apply_theme(&self, name: &str) -> Result<UpdateOutcome, ValidationError> {
        let theme =
            builtin_theme(name).ok_or_else(|| ValidationError::UnknownTheme(name.to_string()))?;
        log::info!("Applying theme '{}'", theme.name);
        Ok(self.update_full_config(&theme.to_update()))
    }

    /// Restore the server's default style.
    pub fn reset_to_defaults(&self) -> UpdateOutcome {
        self.update_full_config(&default_theme().to_update())
    }

    /// POST `update` and wait for the server's confirmation, retrying
    /// transient failures.
    pub fn deliver(&self, update: &OverlayUpdate) -> Result<(), DeliveryFailure> {
        let body = serde_json::to_string(update)
            .map_err(|e| DeliveryFailure::Unclassified(format!("cannot encode update: {e}")))?;
        log::debug!("POST {} {}", self.config_endpoint, body);

        delivery::deliver_with_retry(
            self.transport.as_ref(),
            &self.config_endpoint,
            &body,
            &self.retry,
            self.sleeper.as_ref(),
        )
    }

    /// Forget every applied fingerprint and the cached full configuration.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
            log::info!("Overlay config cache cleared");
        }
    }

    /// Number of fingerprints currently marked as applied.
    pub fn cached_fingerprints(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().len())
    }

    /// Whether `GET <base>/` answers 200.
    pub fn is_server_healthy(&self) -> bool {
        let url = format!("{}/", self.base_url);
        matches!(self.transport.get(&url), Ok(reply) if reply.status == 200)
    }

    fn apply_section(&self, section: Section, fields: SectionFields) -> UpdateOutcome {
        if fields.is_empty() {
            log::debug!("No {} fields to update", section);
            return UpdateOutcome::Empty;
        }

        let fingerprint = Fingerprint::new(section, &fields);
        if let Some(cache) = &self.cache
            && cache.lock().contains(&fingerprint)
        {
            log::debug!("{} update already applied, skipping", section);
            return UpdateOutcome::AlreadyApplied;
        }

        match self.deliver(&OverlayUpdate::single(section, fields)) {
            Ok(()) => {
                if let Some(cache) = &self.cache {
                    cache.lock().mark_applied(fingerprint);
                }
                log::info!("Overlay {} updated", section);
                UpdateOutcome::Delivered
            }
            Err(failure) => UpdateOutcome::Failed(failure),
        }
    }
}
