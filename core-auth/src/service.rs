//! # Authentication Service
//!
//! Orchestrates module selection, token storage policy, user-session
//! materialization, and logout.
//!
//! ## Overview
//!
//! The `AuthService` owns the module registry (built at construction; every
//! lookup either resolves or fails at the call site), the combined token
//! context spanning both storage tiers, and the event bus used to announce
//! token changes. All login paths route token persistence through one method,
//! [`store_token`](AuthService::store_token), so a token change is observed
//! exactly once per successful login.
//!
//! ## Usage
//!
//! ```ignore
//! use core_auth::{AuthService, AuthData, AuthModuleKind, BasicCredentials, LoginOptions};
//!
//! let service = AuthService::new(&config, event_bus, user_service);
//!
//! let user = service
//!     .login(
//!         AuthModuleKind::Basic,
//!         AuthData::Basic(BasicCredentials::new("a@b.com", "secret")),
//!         LoginOptions::default(),
//!     )
//!     .await?;
//!
//! assert!(service.is_authenticated().await?);
//! ```

use crate::basic::BasicAuthModule;
use crate::error::{AuthError, Result};
use crate::module::AuthModule;
use crate::oauth::OAuthModule;
use crate::token_context::CombinedTokenContext;
use crate::types::{AuthData, AuthModuleKind, LoginOptions, StoreOptions, UserDetails};
use crate::user::{User, UserService};
use core_runtime::config::ClientConfig;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Authentication orchestrator.
///
/// State beyond the injected collaborators is limited to `auth_token`, an
/// in-memory cache of the last stored token used purely for event payloads;
/// the storage tiers remain authoritative.
pub struct AuthService {
    modules: HashMap<AuthModuleKind, Arc<dyn AuthModule>>,
    tokens: CombinedTokenContext,
    users: Arc<dyn UserService>,
    events: EventBus,
    auth_token: Mutex<Option<String>>,
}

impl AuthService {
    /// Creates an auth service with the default module registry: the basic
    /// module plus one browser-flow module per third-party provider and the
    /// custom kind.
    pub fn new(config: &ClientConfig, events: EventBus, users: Arc<dyn UserService>) -> Self {
        let mut modules: HashMap<AuthModuleKind, Arc<dyn AuthModule>> = HashMap::new();
        modules.insert(
            AuthModuleKind::Basic,
            Arc::new(BasicAuthModule::from_config(config)),
        );
        for kind in AuthModuleKind::all() {
            if kind == AuthModuleKind::Basic {
                continue;
            }
            modules.insert(kind, Arc::new(OAuthModule::from_config(kind, config)));
        }

        Self::with_modules(config, events, users, modules)
    }

    /// Creates an auth service with an explicit module registry.
    ///
    /// Intended for hosts that restrict the available providers or supply a
    /// customized module (e.g. a different initiation method).
    pub fn with_modules(
        config: &ClientConfig,
        events: EventBus,
        users: Arc<dyn UserService>,
        modules: HashMap<AuthModuleKind, Arc<dyn AuthModule>>,
    ) -> Self {
        let tokens = CombinedTokenContext::new(
            format!("auth_{}", config.app_id),
            config.durable_storage.clone(),
            config.session_storage.clone(),
        );

        debug!(module_count = modules.len(), "auth service initialized");

        Self {
            modules,
            tokens,
            users,
            events,
            auth_token: Mutex::new(None),
        }
    }

    /// Resolves a registered auth module.
    ///
    /// This lookup is synchronous so that configuration errors surface at the
    /// call site, before any asynchronous work begins.
    pub fn module(&self, kind: AuthModuleKind) -> Result<Arc<dyn AuthModule>> {
        self.modules
            .get(&kind)
            .cloned()
            .ok_or(AuthError::UnknownModule(kind))
    }

    /// Whether a token is present in either storage tier.
    ///
    /// This is a presence check only; the token is not validated against a
    /// server.
    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self
            .tokens
            .get()
            .await?
            .is_some_and(|token| !token.is_empty()))
    }

    /// The effective stored token, if any.
    pub async fn get_token(&self) -> Result<Option<String>> {
        self.tokens.get().await
    }

    /// Authenticate through the selected module, persist the resolved token,
    /// and materialize the current user.
    ///
    /// The module lookup fails before any I/O; module errors afterwards pass
    /// through unchanged. On success the token is stored according to
    /// `options.remember`, a token-changed event is emitted, and the freshly
    /// loaded user record is persisted and returned.
    #[instrument(skip(self, data, options), fields(module = %kind))]
    pub async fn login(
        &self,
        kind: AuthModuleKind,
        data: AuthData,
        options: LoginOptions,
    ) -> Result<User> {
        let module = self.module(kind)?;

        let token = module.authenticate(data).await?;
        self.store_token(&options, token).await?;

        self.users.load().await?;
        let user = self.users.current().await.ok_or_else(|| {
            AuthError::Internal("user service yielded no current user after load".to_string())
        })?;
        self.users.store().await?;

        info!("login completed");
        Ok(user)
    }

    /// Create a user account through the basic module.
    ///
    /// Fails at the call site when the basic module is not registered.
    pub async fn signup(&self, details: &UserDetails) -> Result<()> {
        let module = self.module(AuthModuleKind::Basic)?;
        module.signup(details).await?;

        let _ = self.events.emit(CoreEvent::Auth(AuthEvent::SignedUp {
            email: details.email.clone(),
        }));
        Ok(())
    }

    /// Delete the stored token from both tiers and release the current user.
    ///
    /// Purely local: no network call is made and no event is emitted.
    pub async fn logout(&self) -> Result<()> {
        self.tokens.delete().await?;
        self.users.unstore().await?;
        self.users.clear().await;

        info!("logged out");
        Ok(())
    }

    /// Persist a token and announce the change.
    ///
    /// This is the single path by which token persistence and change
    /// notification happen; all login paths route through it. The previous
    /// cache value rides along in the event payload (`None` on the first
    /// login of this service instance).
    pub async fn store_token(&self, options: &LoginOptions, token: String) -> Result<()> {
        let old = self.auth_token.lock().await.replace(token.clone());

        self.tokens
            .store(
                &token,
                &StoreOptions {
                    permanent: options.remember,
                },
            )
            .await?;

        let _ = self.events.emit(CoreEvent::Auth(AuthEvent::TokenChanged {
            old,
            new: Some(token),
        }));

        Ok(())
    }
}
