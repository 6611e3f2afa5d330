//! Pluggable Authentication Modules
//!
//! An auth module is a strategy that turns caller-supplied data into an
//! opaque token string. Two families exist: the basic module performs a
//! direct credential POST, and every third-party provider shares one
//! browser-redirect implementation parametrized by its provider tag.

use crate::error::{AuthError, Result};
use crate::types::{AuthData, AuthModuleKind, UserDetails};
use async_trait::async_trait;

/// Capability contract shared by all authentication strategies.
#[async_trait]
pub trait AuthModule: Send + Sync {
    /// The identifier this module is registered under.
    fn kind(&self) -> AuthModuleKind;

    /// Authenticate with the given payload and resolve a token.
    ///
    /// Validation failures and missing capabilities are reported before any
    /// network request is made; transport and flow failures after.
    async fn authenticate(&self, data: AuthData) -> Result<String>;

    /// Create a user account.
    ///
    /// Only the basic module supports signup; every other module reports
    /// [`AuthError::SignupUnsupported`].
    async fn signup(&self, _details: &UserDetails) -> Result<()> {
        Err(AuthError::SignupUnsupported(self.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TokenOnlyModule;

    #[async_trait]
    impl AuthModule for TokenOnlyModule {
        fn kind(&self) -> AuthModuleKind {
            AuthModuleKind::Custom
        }

        async fn authenticate(&self, _data: AuthData) -> Result<String> {
            Ok("token".to_string())
        }
    }

    #[tokio::test]
    async fn test_signup_default_is_unsupported() {
        let module = TokenOnlyModule;
        let details = UserDetails::new("a@b.com", "secret");

        let err = module.signup(&details).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::SignupUnsupported(AuthModuleKind::Custom)
        ));
    }
}
