use crate::types::AuthModuleKind;
use bridge_traits::BridgeError;
use thiserror::Error;

/// Authentication error taxonomy.
///
/// Lower layers (modules, the browser flow) reject with the most specific
/// variant; the auth service never reinterprets module errors. Callers can
/// branch on the variant to distinguish configuration and validation errors
/// (raised before any I/O) from flow and transport errors (raised after I/O
/// was attempted).
#[derive(Error, Debug)]
pub enum AuthError {
    /// No module is registered under the requested identifier.
    ///
    /// Raised synchronously at the lookup site, before any asynchronous work.
    #[error("No auth module registered for '{0}'")]
    UnknownModule(AuthModuleKind),

    /// Required credential fields are missing or empty. No network request
    /// was made.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A host capability required by this flow was not injected. No network
    /// request was made.
    #[error("Capability missing: {capability}")]
    CapabilityMissing { capability: String },

    /// The request could not be delivered or no response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Signup was rejected; `codes` lists machine-readable
    /// `errorType_parameter` entries extracted from the response (empty when
    /// the response carried no parseable details).
    #[error("Signup rejected ({} error(s))", .codes.len())]
    SignupRejected { codes: Vec<String> },

    /// Signup is only available through the basic module.
    #[error("Signup is not supported by the '{0}' module")]
    SignupUnsupported(AuthModuleKind),

    /// The browser-based flow ended without producing a token.
    #[error("Auth flow aborted: {0}")]
    FlowAborted(String),

    /// A payload could not be encoded or a response could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A host bridge operation (storage, browser, user service) failed.
    #[error("Bridge operation failed: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
