//! # Authentication Module
//!
//! Pluggable authentication client for the platform SDK.
//!
//! ## Overview
//!
//! This crate implements the authentication subsystem of the client core:
//! password login, third-party browser-redirect flows, token persistence
//! across a durable and a session storage tier, and user-session
//! materialization. Host capabilities (storage, HTTP, the in-app browser)
//! are injected through `bridge-traits`.
//!
//! ## Features
//!
//! - Email/password login and signup through the basic module
//! - One generic browser-redirect module covering every third-party provider
//! - Two-tier token storage with "remember me" routing
//! - Token-changed event emission on every successful login
//!
//! ## Layout
//!
//! - [`token_context`] - token persistence decoupled from tier selection
//! - [`module`] - the `AuthModule` strategy contract
//! - [`basic`] / [`oauth`] - the two module families
//! - [`service`] - the orchestrating `AuthService`
//! - [`user`] - the host-owned user-session seam

pub mod basic;
pub mod error;
pub mod module;
pub mod oauth;
pub mod service;
pub mod token_context;
pub mod types;
pub mod user;

pub use basic::{detailed_error_codes, BasicAuthModule};
pub use error::{AuthError, Result};
pub use module::AuthModule;
pub use oauth::{BrowserOAuthFlow, OAuthModule};
pub use service::AuthService;
pub use token_context::{CombinedTokenContext, TokenContext};
pub use types::{
    AuthData, AuthModuleKind, BasicCredentials, LoginOptions, StoreOptions, UserDetails,
};
pub use user::{User, UserService};
