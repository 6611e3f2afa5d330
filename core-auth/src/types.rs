use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a registered authentication module.
///
/// The registry of modules is a closed set known at compile time; looking up
/// a module that was not registered fails at the call site, before any
/// asynchronous work begins.
///
/// # Examples
///
/// ```
/// use core_auth::AuthModuleKind;
///
/// assert_eq!(AuthModuleKind::parse("github"), Some(AuthModuleKind::Github));
/// assert_eq!(AuthModuleKind::parse("myspace"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthModuleKind {
    /// Email/password login against the platform API
    Basic,
    Twitter,
    Facebook,
    Github,
    Google,
    Instagram,
    Linkedin,
    /// Application-hosted browser login without a provider suffix
    Custom,
}

impl AuthModuleKind {
    /// Get the module identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthModuleKind::Basic => "basic",
            AuthModuleKind::Twitter => "twitter",
            AuthModuleKind::Facebook => "facebook",
            AuthModuleKind::Github => "github",
            AuthModuleKind::Google => "google",
            AuthModuleKind::Instagram => "instagram",
            AuthModuleKind::Linkedin => "linkedin",
            AuthModuleKind::Custom => "custom",
        }
    }

    /// Parse a module kind from a string identifier
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(AuthModuleKind::Basic),
            "twitter" => Some(AuthModuleKind::Twitter),
            "facebook" => Some(AuthModuleKind::Facebook),
            "github" => Some(AuthModuleKind::Github),
            "google" => Some(AuthModuleKind::Google),
            "instagram" => Some(AuthModuleKind::Instagram),
            "linkedin" => Some(AuthModuleKind::Linkedin),
            "custom" => Some(AuthModuleKind::Custom),
            _ => None,
        }
    }

    /// The provider segment appended to the login-initiation path.
    ///
    /// `None` for `Basic` (direct POST, no browser flow) and `Custom`
    /// (application-hosted flow at the bare `/auth/login` path).
    pub fn provider_path(&self) -> Option<&'static str> {
        match self {
            AuthModuleKind::Basic | AuthModuleKind::Custom => None,
            other => Some(other.as_str()),
        }
    }

    /// All module kinds registered by the default auth service.
    pub fn all() -> [AuthModuleKind; 8] {
        [
            AuthModuleKind::Basic,
            AuthModuleKind::Twitter,
            AuthModuleKind::Facebook,
            AuthModuleKind::Github,
            AuthModuleKind::Google,
            AuthModuleKind::Instagram,
            AuthModuleKind::Linkedin,
            AuthModuleKind::Custom,
        ]
    }
}

impl fmt::Display for AuthModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Email/password credentials for the basic module.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BasicCredentials {
    pub email: String,
    pub password: String,
}

impl BasicCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Custom Debug implementation to avoid logging passwords
impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Caller-supplied payload handed to an auth module.
///
/// The basic module requires `Basic` credentials; browser-flow modules
/// forward `Custom` object fields into the login-initiation request and
/// accept `None` when the provider needs nothing beyond the app identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthData {
    #[default]
    None,
    Basic(BasicCredentials),
    Custom(serde_json::Value),
}

/// Attributes of a user account created through signup.
///
/// `password` is write-only: it is sent in the signup payload and never
/// appears on the materialized [`User`](crate::user::User) record.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDetails {
    pub email: String,
    pub password: String,
    pub username: Option<String>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub custom: Option<serde_json::Value>,
}

impl UserDetails {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            username: None,
            image: None,
            name: None,
            custom: None,
        }
    }
}

impl fmt::Debug for UserDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDetails")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("username", &self.username)
            .field("name", &self.name)
            .finish()
    }
}

/// Options controlling a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginOptions {
    /// Persist the token across restarts (`true`, the default) or only for
    /// the current session.
    pub remember: bool,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self { remember: true }
    }
}

/// Options controlling which storage tier a token context writes to.
///
/// The same concept as [`LoginOptions::remember`], expressed at the storage
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Write to the durable tier (`true`, the default) or the session tier.
    pub permanent: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { permanent: true }
    }
}
