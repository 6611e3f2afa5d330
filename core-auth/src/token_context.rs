//! Token Context Storage
//!
//! Persistence abstraction for the authentication token, decoupled from
//! storage tier selection. A [`TokenContext`] is a pass-through to one
//! injected [`KeyValueStorage`] backend keyed by a label; a
//! [`CombinedTokenContext`] composes a durable and a session context and
//! routes reads and writes between them:
//!
//! - reads prefer the session tier;
//! - writes go to exactly one tier, chosen by caller intent ("remember me"
//!   vs. session-only);
//! - deletes clear both tiers unconditionally.
//!
//! Token values are never logged; log lines carry the label and tier only.

use crate::error::Result;
use crate::types::StoreOptions;
use bridge_traits::KeyValueStorage;
use std::sync::Arc;
use tracing::debug;

/// A single named token slot in one storage backend.
#[derive(Clone)]
pub struct TokenContext {
    label: String,
    storage: Arc<dyn KeyValueStorage>,
}

impl TokenContext {
    pub fn new(label: impl Into<String>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            label: label.into(),
            storage,
        }
    }

    /// The logical key this context reads and writes.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Retrieve the stored token, if any.
    pub async fn get(&self) -> Result<Option<String>> {
        Ok(self.storage.get(&self.label).await?)
    }

    /// Store a token, replacing any previous value.
    pub async fn store(&self, token: &str) -> Result<()> {
        self.storage.set(&self.label, token).await?;
        debug!(label = %self.label, "token stored");
        Ok(())
    }

    /// Delete the stored token. Idempotent.
    pub async fn delete(&self) -> Result<()> {
        self.storage.delete(&self.label).await?;
        debug!(label = %self.label, "token deleted");
        Ok(())
    }
}

/// A token slot spanning the durable and session storage tiers.
///
/// Holds at most one value per tier under the shared label. The session
/// value, when present, shadows the durable one.
#[derive(Clone)]
pub struct CombinedTokenContext {
    durable: TokenContext,
    session: TokenContext,
}

impl CombinedTokenContext {
    pub fn new(
        label: impl Into<String>,
        durable: Arc<dyn KeyValueStorage>,
        session: Arc<dyn KeyValueStorage>,
    ) -> Self {
        let label = label.into();
        Self {
            durable: TokenContext::new(label.clone(), durable),
            session: TokenContext::new(label, session),
        }
    }

    pub fn label(&self) -> &str {
        self.durable.label()
    }

    /// Retrieve the effective token: the session value if present, else the
    /// durable value, else `None`.
    pub async fn get(&self) -> Result<Option<String>> {
        if let Some(token) = self.session.get().await? {
            return Ok(Some(token));
        }
        self.durable.get().await
    }

    /// Store a token into exactly one tier.
    ///
    /// `permanent` selects the durable tier; otherwise the session tier.
    /// The other tier is left untouched.
    pub async fn store(&self, token: &str, options: &StoreOptions) -> Result<()> {
        if options.permanent {
            self.durable.store(token).await
        } else {
            self.session.store(token).await
        }
    }

    /// Delete the token from both tiers, regardless of which tier holds a
    /// value. Idempotent; succeeds when nothing was stored.
    pub async fn delete(&self) -> Result<()> {
        self.durable.delete().await?;
        self.session.delete().await?;
        Ok(())
    }
}
