use thiserror::Error;

use crate::lifecycle::ServerState;

/// Core error types for xref-lsp.
///
/// Every failure of the workspace view lifecycle is represented here. Errors
/// raised by a [`Session`](crate::Session) implementation use the same type
/// so the lifecycle manager can hand them to its caller unchanged.
///
/// # Examples
///
/// ```
/// use xref_core::error::{Result, XrefError};
///
/// fn remove(name: &str, known: bool) -> Result<()> {
///     if !known {
///         return Err(XrefError::ViewNotFound {
///             name: name.into(),
///             uri: "file:///work/foo".into(),
///         });
///     }
///     Ok(())
/// }
///
/// let err = remove("foo", false).unwrap_err();
/// assert_eq!(err.to_string(), "view foo for file:///work/foo not found");
/// ```
#[derive(Error, Debug)]
pub enum XrefError {
    #[error("view {name} for {uri} not found")]
    ViewNotFound { name: String, uri: String },

    #[error("addView called before server initialized")]
    NotInitialized,

    #[error("invalid server state transition from {from:?} to {to:?}")]
    InvalidTransition { from: ServerState, to: ServerState },

    #[error("view {0} already exists")]
    DuplicateView(String),

    #[error("invalid view root: {0}")]
    InvalidRoot(String),

    #[error("failed to fetch configuration for {name}: {message}")]
    ConfigFetch { name: String, message: String },

    #[error("symbol resolution failed: {0}")]
    Resolver(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl XrefError {
    /// Returns true for the "removed folder has no view" failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ViewNotFound { .. })
    }

    /// Returns true when an operation ran before the initialize handshake finished.
    pub fn is_lifecycle_violation(&self) -> bool {
        matches!(self, Self::NotInitialized | Self::InvalidTransition { .. })
    }
}

/// Convenience type alias for `Result<T, XrefError>`.
pub type Result<T> = std::result::Result<T, XrefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_not_found_display() {
        let error = XrefError::ViewNotFound {
            name: "foo".into(),
            uri: "file:///tmp/foo".into(),
        };
        assert_eq!(error.to_string(), "view foo for file:///tmp/foo not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_not_initialized_display() {
        let error = XrefError::NotInitialized;
        assert_eq!(
            error.to_string(),
            "addView called before server initialized"
        );
        assert!(error.is_lifecycle_violation());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_invalid_transition_display() {
        let error = XrefError::InvalidTransition {
            from: ServerState::ShuttingDown,
            to: ServerState::Initialized,
        };
        assert_eq!(
            error.to_string(),
            "invalid server state transition from ShuttingDown to Initialized"
        );
    }

    #[test]
    fn test_config_fetch_display() {
        let error = XrefError::ConfigFetch {
            name: "proj".into(),
            message: "timeout".into(),
        };
        assert!(error.to_string().contains("proj"));
        assert!(!error.is_lifecycle_violation());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: XrefError = io_err.into();
        assert!(error.to_string().contains("I/O error"));
    }
}
