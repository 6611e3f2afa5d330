//! Native Bridge Detection
//!
//! The host's bootstrap layer is responsible for injecting the native bridge
//! script and firing the device-ready signal; the core only ever asks two
//! questions about it, through this trait. Keeping the answers behind an
//! injected capability means no core module inspects ambient global state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Device class reported by the host bridge.
///
/// Used by the bootstrap layer to special-case script-source resolution; the
/// core treats it as an opaque discriminator for logging and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    Ios,
    Android,
    Web,
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Ios => "ios",
            DeviceType::Android => "android",
            DeviceType::Web => "web",
            DeviceType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Native bridge runtime detection
pub trait DeviceBridge: Send + Sync {
    /// Whether the native bridge runtime finished bootstrapping and is ready
    /// to service calls.
    fn is_available(&self) -> bool;

    /// The device class the bridge detected.
    fn device_type(&self) -> DeviceType;
}
