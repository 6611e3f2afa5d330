//! Token Storage Abstraction
//!
//! Provides a platform-agnostic key/value store for string credentials.
//! The core is handed two independent instances: a durable store that
//! survives application restarts and a session store that the host clears
//! when the current session ends.

use async_trait::async_trait;

use crate::error::Result;

/// Key/value storage for string tokens
///
/// Abstracts the persistence mechanisms available on each host platform:
/// - iOS/Android: Keychain / Keystore-backed preferences
/// - Desktop: OS credential store or config files
/// - Web: `localStorage` (durable) and `sessionStorage` (session)
///
/// # Durable vs. session instances
///
/// The core never decides *how* values persist; it only chooses which of the
/// two injected instances to write to. Implementations must keep the two
/// instances fully independent: deleting a key from one must not affect the
/// other.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::KeyValueStorage;
///
/// async fn remember(store: &dyn KeyValueStorage, token: &str) -> Result<()> {
///     store.set("auth_myapp", token).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Retrieve a value
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, overwriting any previous value for the key
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key
    ///
    /// Idempotent: deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check whether a key exists without retrieving its value
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
