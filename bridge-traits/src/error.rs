use thiserror::Error;

/// Error type shared by every bridge capability.
///
/// Host implementations convert their platform-specific failures into one of
/// these variants so the core can handle them uniformly.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
