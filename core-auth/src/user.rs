//! User Session Seam
//!
//! The auth core materializes a user record after login and releases it on
//! logout, but the record's backing store (platform preferences, app
//! database, remote profile endpoint) is a host concern. This module defines
//! the narrow seam the core drives.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use serde::{Deserialize, Serialize};

/// The materialized user record.
///
/// Created by signup through the basic module and loaded after any
/// successful login. Passwords never appear here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub username: Option<String>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub custom: Option<serde_json::Value>,
}

/// Host-provided service owning the current-user singleton.
///
/// The core drives a fixed lifecycle through this seam: after a successful
/// login it calls [`load`](UserService::load) then
/// [`store`](UserService::store); on logout it calls
/// [`unstore`](UserService::unstore) then [`clear`](UserService::clear).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Refresh the current user record from the backend.
    async fn load(&self) -> BridgeResult<()>;

    /// The in-memory current user, if one has been loaded.
    async fn current(&self) -> Option<User>;

    /// Persist the current user record.
    async fn store(&self) -> BridgeResult<()>;

    /// Remove the persisted copy of the current user record.
    async fn unstore(&self) -> BridgeResult<()>;

    /// Drop the in-memory current user record.
    async fn clear(&self);
}
