//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the platform client core and
//! host-specific implementations. Each trait represents a capability that the
//! core requires but that must be implemented differently per platform
//! (iOS, Android, desktop, web).
//!
//! ## Traits
//!
//! ### Networking & Storage
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with TLS
//! - [`KeyValueStorage`](storage::KeyValueStorage) - String token persistence;
//!   injected twice (durable and session instances)
//!
//! ### Platform Integration
//! - [`InAppBrowser`](browser::InAppBrowser) - Embedded browser surfaces for
//!   hosted login pages (optional capability)
//! - [`DeviceBridge`](bridge::DeviceBridge) - Native bridge availability and
//!   device class detection
//!
//! ## Fail-Fast Strategy
//!
//! The core fails fast with descriptive errors when a required capability is
//! missing, at configuration time for required bridges and at the first use
//! for optional ones:
//!
//! ```ignore
//! use core_runtime::error::Error;
//!
//! let http_client = config.http_client
//!     .ok_or_else(|| Error::CapabilityMissing {
//!         capability: "HttpClient".to_string(),
//!         message: "No HTTP client implementation provided. \
//!                  Mobile: inject the platform-native adapter.".to_string(),
//!     })?;
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations should convert platform-specific errors to
//! `BridgeError` and provide actionable error messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks. Implementations must ensure thread safety.

pub mod bridge;
pub mod browser;
pub mod error;
pub mod http;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use bridge::{DeviceBridge, DeviceType};
pub use browser::{BrowserSurface, InAppBrowser, PageEvent};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::KeyValueStorage;
