//! # Client Configuration Module
//!
//! Provides configuration management for the platform client core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ClientConfig` instance that holds the application identity and all host
//! capabilities the core depends on. It enforces fail-fast validation so a
//! missing bridge surfaces at initialization, not at the first login attempt.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - Transport for API requests
//! - `KeyValueStorage` (durable) - Token persistence across restarts
//! - `KeyValueStorage` (session) - Session-scoped token persistence
//!
//! ## Optional Dependencies
//!
//! - `InAppBrowser` - Hosted login pages for third-party auth flows; flows
//!   that need it fail with a capability error when absent
//! - `DeviceBridge` - Native bridge detection
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ClientConfig;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::builder()
//!     .app_id("abcd1234")
//!     .http_client(Arc::new(MyHttpClient))
//!     .durable_storage(Arc::new(MyPreferences))
//!     .session_storage(Arc::new(MySessionStore))
//!     .in_app_browser(Arc::new(MyBrowser))
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{DeviceBridge, HttpClient, InAppBrowser, KeyValueStorage};
use std::sync::Arc;

/// Default platform API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.portico.dev";

/// Client configuration for the platform core.
///
/// This struct holds the application identity and all host capabilities
/// required to initialize the core. Use [`ClientConfigBuilder`] to construct
/// instances.
#[derive(Clone)]
pub struct ClientConfig {
    /// Application identifier issued by the platform dashboard
    pub app_id: String,

    /// Base URL of the platform API (no trailing slash)
    pub api_url: String,

    /// Default callback URL for browser-based auth flows
    pub auth_callback_url: Option<String>,

    /// HTTP client for API requests (required)
    pub http_client: Arc<dyn HttpClient>,

    /// Token storage that survives application restarts (required)
    pub durable_storage: Arc<dyn KeyValueStorage>,

    /// Token storage scoped to the current session (required)
    pub session_storage: Arc<dyn KeyValueStorage>,

    /// Embedded browser capability for hosted login pages (optional)
    pub in_app_browser: Option<Arc<dyn InAppBrowser>>,

    /// Native bridge detection (optional)
    pub device_bridge: Option<Arc<dyn DeviceBridge>>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("app_id", &self.app_id)
            .field("api_url", &self.api_url)
            .field("auth_callback_url", &self.auth_callback_url)
            .field("http_client", &"HttpClient { ... }")
            .field("durable_storage", &"KeyValueStorage { ... }")
            .field("session_storage", &"KeyValueStorage { ... }")
            .field(
                "in_app_browser",
                &self.in_app_browser.as_ref().map(|_| "InAppBrowser { ... }"),
            )
            .field(
                "device_bridge",
                &self.device_bridge.as_ref().map(|_| "DeviceBridge { ... }"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(Error::Config("Application ID cannot be empty".to_string()));
        }

        if self.api_url.trim().is_empty() {
            return Err(Error::Config("API URL cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Builder for constructing [`ClientConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then call
/// [`build()`](ClientConfigBuilder::build) to create the final config. The
/// builder validates required dependencies and provides actionable error
/// messages.
#[derive(Default)]
pub struct ClientConfigBuilder {
    app_id: Option<String>,
    api_url: Option<String>,
    auth_callback_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    durable_storage: Option<Arc<dyn KeyValueStorage>>,
    session_storage: Option<Arc<dyn KeyValueStorage>>,
    in_app_browser: Option<Arc<dyn InAppBrowser>>,
    device_bridge: Option<Arc<dyn DeviceBridge>>,
}

impl ClientConfigBuilder {
    /// Sets the application identifier (required).
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Sets the platform API base URL.
    ///
    /// Default: [`DEFAULT_API_URL`]. A trailing slash is stripped so paths
    /// can be appended uniformly.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Sets the default callback URL for browser-based auth flows.
    ///
    /// Individual auth modules may override this per provider.
    pub fn auth_callback_url(mut self, url: impl Into<String>) -> Self {
        self.auth_callback_url = Some(url.into());
        self
    }

    /// Sets the HTTP client implementation (required).
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the durable token storage implementation (required).
    ///
    /// Values written here must survive application restarts.
    pub fn durable_storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.durable_storage = Some(storage);
        self
    }

    /// Sets the session token storage implementation (required).
    ///
    /// Values written here are discarded when the host session ends.
    pub fn session_storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.session_storage = Some(storage);
        self
    }

    /// Sets the in-app browser implementation (optional).
    ///
    /// Third-party auth flows require this capability and fail fast with a
    /// capability error when it is absent.
    pub fn in_app_browser(mut self, browser: Arc<dyn InAppBrowser>) -> Self {
        self.in_app_browser = Some(browser);
        self
    }

    /// Sets the device bridge implementation (optional).
    pub fn device_bridge(mut self, bridge: Arc<dyn DeviceBridge>) -> Self {
        self.device_bridge = Some(bridge);
        self
    }

    /// Builds the final `ClientConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ClientConfig)` on success, or an error if:
    /// - Required capabilities are missing (HttpClient, both storages)
    /// - Configuration values are invalid
    pub fn build(self) -> Result<ClientConfig> {
        let app_id = self.app_id.ok_or_else(|| {
            Error::Config("Application ID is required. Use .app_id() to set it.".to_string())
        })?;

        let http_client = self.http_client.ok_or_else(|| Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "HttpClient implementation is required for API requests. \
                     Mobile: inject the platform-native HTTP adapter. \
                     Web: inject a fetch-based client."
                .to_string(),
        })?;

        let durable_storage = self
            .durable_storage
            .ok_or_else(|| Error::CapabilityMissing {
                capability: "KeyValueStorage (durable)".to_string(),
                message: "Durable storage is required for token persistence. \
                         Mobile: inject Keychain/Keystore-backed storage. \
                         Web: inject localStorage-backed storage."
                    .to_string(),
            })?;

        let session_storage = self
            .session_storage
            .ok_or_else(|| Error::CapabilityMissing {
                capability: "KeyValueStorage (session)".to_string(),
                message: "Session storage is required for session-scoped tokens. \
                         Mobile: inject in-memory storage cleared on restart. \
                         Web: inject sessionStorage-backed storage."
                    .to_string(),
            })?;

        let api_url = self
            .api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let config = ClientConfig {
            app_id,
            api_url,
            auth_callback_url: self.auth_callback_url,
            http_client,
            durable_storage,
            session_storage,
            in_app_browser: self.in_app_browser,
            device_bridge: self.device_bridge,
        };

        config.validate()?;

        tracing::debug!(
            app_id = %config.app_id,
            api_url = %config.api_url,
            has_browser = config.in_app_browser.is_some(),
            has_device_bridge = config.device_bridge.is_some(),
            "client configuration built"
        );

        Ok(config)
    }
}
