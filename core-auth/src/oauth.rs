//! Browser-Redirect Authentication
//!
//! One generic module covers every third-party provider plus the
//! application-hosted custom flow: the module differs only in the provider
//! segment of the initiation path and optional method/callback overrides.
//!
//! ## Flow
//!
//! 1. Fail fast when the host injected no in-app browser capability; no
//!    network request is attempted.
//! 2. POST (or the configured method) to `/auth/login[/provider]` carrying
//!    the app identifier, the callback URL, and caller-supplied data; the
//!    server answers with the page to open in `data.url`.
//! 3. Open a browser surface at that URL with cache reuse disabled, so each
//!    attempt is isolated from previous sessions.
//! 4. The first surface event settles the flow: `exit` and load errors abort
//!    it, a navigation to the callback URL resolves the `token` query
//!    parameter, and a navigation anywhere else aborts with an unexpected
//!    redirect. Only the callback navigation closes the surface.
//!
//! There is no timeout: settlement is driven entirely by surface events, and
//! a surface that never reports one keeps the flow pending.

use crate::error::{AuthError, Result};
use crate::module::AuthModule;
use crate::types::{AuthData, AuthModuleKind};
use async_trait::async_trait;
use bridge_traits::{HttpClient, HttpMethod, HttpRequest, InAppBrowser, PageEvent};
use core_runtime::config::ClientConfig;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Window target passed to the host browser capability.
const BROWSER_TARGET: &str = "_blank";

/// Feature string passed to the host browser capability. Disables persistent
/// and session cache reuse so every auth attempt starts clean.
const BROWSER_OPTIONS: &str = "clearcache=yes,clearsessioncache=yes";

/// Generic browser-redirect authentication module.
///
/// All third-party providers are instances of this type; they share one
/// algorithm and differ only by provider tag. `Custom` targets the bare
/// `/auth/login` path for application-hosted flows.
pub struct OAuthModule {
    kind: AuthModuleKind,
    method: HttpMethod,
    callback_url: Option<String>,
    flow: BrowserOAuthFlow,
}

impl OAuthModule {
    /// Create a module for a browser-flow kind.
    ///
    /// `kind` should be one of the third-party kinds or `Custom`; the basic
    /// module has its own implementation.
    pub fn from_config(kind: AuthModuleKind, config: &ClientConfig) -> Self {
        Self {
            kind,
            method: HttpMethod::Post,
            callback_url: None,
            flow: BrowserOAuthFlow::from_config(config),
        }
    }

    /// Override the HTTP method used for the initiation request.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Override the callback URL for this module only.
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }
}

#[async_trait]
impl AuthModule for OAuthModule {
    fn kind(&self) -> AuthModuleKind {
        self.kind
    }

    async fn authenticate(&self, data: AuthData) -> Result<String> {
        self.flow
            .run(
                self.kind.provider_path(),
                self.method,
                self.callback_url.as_deref(),
                &data,
            )
            .await
    }
}

#[derive(Debug, Deserialize)]
struct RedirectEnvelope {
    data: RedirectPayload,
}

#[derive(Debug, Deserialize)]
struct RedirectPayload {
    url: String,
}

/// Shared algorithm behind every browser-redirect module.
pub struct BrowserOAuthFlow {
    app_id: String,
    api_url: String,
    default_callback: Option<String>,
    http: Arc<dyn HttpClient>,
    browser: Option<Arc<dyn InAppBrowser>>,
}

impl BrowserOAuthFlow {
    pub fn new(
        app_id: impl Into<String>,
        api_url: impl Into<String>,
        default_callback: Option<String>,
        http: Arc<dyn HttpClient>,
        browser: Option<Arc<dyn InAppBrowser>>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            api_url: api_url.into(),
            default_callback,
            http,
            browser,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.app_id.clone(),
            config.api_url.clone(),
            config.auth_callback_url.clone(),
            config.http_client.clone(),
            config.in_app_browser.clone(),
        )
    }

    /// Run the redirect flow and resolve the token from the callback URL.
    pub async fn run(
        &self,
        provider: Option<&str>,
        method: HttpMethod,
        callback_override: Option<&str>,
        data: &AuthData,
    ) -> Result<String> {
        // Capability precondition comes before any network traffic.
        let browser = self
            .browser
            .clone()
            .ok_or_else(|| AuthError::CapabilityMissing {
                capability: "InAppBrowser".to_string(),
            })?;

        let callback = callback_override
            .or(self.default_callback.as_deref())
            .ok_or_else(|| {
                AuthError::Validation(
                    "a callback URL is required for browser login flows".to_string(),
                )
            })?;

        let body = self.initiation_body(callback, data)?;
        let path = match provider {
            Some(provider) => format!("{}/auth/login/{}", self.api_url, provider),
            None => format!("{}/auth/login", self.api_url),
        };

        debug!(
            provider = provider.unwrap_or("custom"),
            "initiating browser login"
        );

        let request = HttpRequest::new(method, path)
            .json(&body)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !response.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "unreadable response body".to_string());
            warn!(status = response.status, "login initiation rejected");
            return Err(AuthError::Server {
                status: response.status,
                message,
            });
        }

        let redirect: RedirectEnvelope = response
            .json()
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        let mut surface = browser.open(&redirect.data.url, BROWSER_TARGET, BROWSER_OPTIONS)?;
        let events = surface.events();

        let token = Self::await_redirect(events, &*surface, callback).await?;
        info!(
            provider = provider.unwrap_or("custom"),
            "browser login succeeded"
        );
        Ok(token)
    }

    /// Wait for the surface event that settles the flow.
    async fn await_redirect(
        mut events: tokio::sync::mpsc::UnboundedReceiver<PageEvent>,
        surface: &dyn bridge_traits::BrowserSurface,
        callback: &str,
    ) -> Result<String> {
        match events.recv().await {
            Some(PageEvent::Exit) => Err(AuthError::FlowAborted("auth flow exited".to_string())),
            Some(PageEvent::LoadError { message }) => {
                warn!(error = %message, "browser surface failed to load");
                Err(AuthError::FlowAborted("load error".to_string()))
            }
            Some(PageEvent::LoadStart { url }) => {
                if !url.starts_with(callback) {
                    // The surface intentionally stays open here; only the
                    // matching redirect closes it.
                    return Err(AuthError::FlowAborted("unexpected redirect URL".to_string()));
                }
                let token = Self::redirect_token(&url);
                drop(events);
                surface.close();
                token
            }
            None => Err(AuthError::FlowAborted(
                "browser surface closed without a redirect".to_string(),
            )),
        }
    }

    /// Extract the `token` query parameter from the callback redirect.
    fn redirect_token(redirect_url: &str) -> Result<String> {
        let parsed = Url::parse(redirect_url)
            .map_err(|_| AuthError::FlowAborted("malformed redirect URL".to_string()))?;

        parsed
            .query_pairs()
            .find_map(|(key, value)| (key == "token").then(|| value.into_owned()))
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AuthError::FlowAborted("redirect URL did not carry a token".to_string())
            })
    }

    /// Build the initiation request body: app identity, callback, and any
    /// caller-supplied fields (which take precedence on key collisions).
    fn initiation_body(&self, callback: &str, data: &AuthData) -> Result<serde_json::Value> {
        let mut body = serde_json::Map::new();
        body.insert("app_id".to_string(), json!(self.app_id));
        body.insert("callback".to_string(), json!(callback));

        match data {
            AuthData::None => {}
            AuthData::Basic(credentials) => {
                body.insert("email".to_string(), json!(credentials.email));
                body.insert("password".to_string(), json!(credentials.password));
            }
            AuthData::Custom(serde_json::Value::Object(fields)) => {
                for (key, value) in fields {
                    body.insert(key.clone(), value.clone());
                }
            }
            AuthData::Custom(_) => {
                return Err(AuthError::Validation(
                    "custom login data must be a JSON object".to_string(),
                ));
            }
        }

        Ok(serde_json::Value::Object(body))
    }
}
