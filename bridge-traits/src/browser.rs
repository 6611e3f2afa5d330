//! In-App Browser Abstraction
//!
//! Provides a platform-agnostic handle to an embedded browser surface used
//! for hosted login pages:
//! - iOS/Android: in-app browser plugin (Cordova InAppBrowser or equivalent)
//! - Desktop: embedded web view window
//! - Web: a popup window
//!
//! The browser capability is optional: hosts that cannot present a surface
//! simply don't inject one, and flows that need it fail fast before touching
//! the network.

use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::Result;

/// Navigation events reported by an open browser surface.
///
/// The host forwards the surface's native navigation callbacks as a stream of
/// these events. Event timing is controlled by the user and the remote page,
/// not by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// The surface started navigating to a URL.
    LoadStart {
        /// The URL being navigated to.
        url: String,
    },
    /// The surface failed to load the requested page.
    LoadError {
        /// Host-provided failure description.
        message: String,
    },
    /// The surface was dismissed by the user or the host.
    Exit,
}

/// Factory for browser surfaces
///
/// # Example
///
/// ```ignore
/// use bridge_traits::browser::InAppBrowser;
///
/// fn launch(browser: &dyn InAppBrowser, url: &str) -> Result<()> {
///     let surface = browser.open(url, "_blank", "clearcache=yes")?;
///     // consume surface.events() until the flow settles
///     Ok(())
/// }
/// ```
pub trait InAppBrowser: Send + Sync {
    /// Open a browser surface at `url`.
    ///
    /// `target` and `options` are passed through to the host surface
    /// unmodified (`options` is the raw feature string understood by the
    /// platform plugin, e.g. `"clearcache=yes,clearsessioncache=yes"`).
    fn open(&self, url: &str, target: &str, options: &str) -> Result<Box<dyn BrowserSurface>>;
}

/// An open browser surface
///
/// Implementations deliver every navigation callback of the underlying
/// surface into the channel handed out by [`events`](BrowserSurface::events).
/// The channel has a single consumer; dropping the receiver detaches the
/// caller from all further events without closing the surface.
pub trait BrowserSurface: Send + Sync {
    /// Take the surface's event channel.
    ///
    /// May only be called once per surface; implementations return an empty,
    /// closed channel on subsequent calls.
    fn events(&mut self) -> UnboundedReceiver<PageEvent>;

    /// Close the surface.
    ///
    /// Idempotent; closing an already-dismissed surface is a no-op.
    fn close(&self);
}
