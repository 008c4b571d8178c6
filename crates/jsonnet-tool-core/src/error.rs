//! Error types and error code constants for jsonnet-tool.
//!
//! This module provides a unified error type (`ToolError`) that bridges
//! domain-specific errors from the syntax tree crate (traversal, tree
//! loading) into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Usage errors, reported by the argument parser before any of
//!   these types exist
//! - `3`: Input errors (unreadable file, malformed or mis-shaped tree)
//! - `4`: Traversal errors (a pass aborted while walking the tree)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! Invariant violations inside the tree passes (for example a `local` with no
//! bindings) are not represented here: they panic.

use std::fmt;

use thiserror::Error;

use crate::types::LocationRange;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Input errors (file not found, malformed tree document).
    InputError = 3,
    /// A traversal aborted (hook failure, depth limit).
    TraversalError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
///
/// All subsystem errors are converted to this type before being rendered as
/// JSON output. Each variant keeps enough context (location, phase) to map
/// the failure back to a source position.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Input file not found or unreadable.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// The tree document could not be loaded or has the wrong shape.
    #[error("invalid tree: {message}")]
    InvalidTree {
        message: String,
        file: Option<String>,
        location: Option<LocationRange>,
    },

    /// A traversal over the tree aborted.
    #[error("traversal failed: {message}")]
    TraversalFailed {
        message: String,
        phase: Option<String>,
        location: Option<LocationRange>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&ToolError> for OutputErrorCode {
    fn from(err: &ToolError) -> Self {
        match err {
            ToolError::FileNotFound { .. } => OutputErrorCode::InputError,
            ToolError::InvalidTree { .. } => OutputErrorCode::InputError,
            ToolError::TraversalFailed { .. } => OutputErrorCode::TraversalError,
            ToolError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<ToolError> for OutputErrorCode {
    fn from(err: ToolError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl ToolError {
    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        ToolError::FileNotFound { path: path.into() }
    }

    /// Create an invalid tree error for a file.
    pub fn invalid_tree(message: impl Into<String>, file: Option<String>) -> Self {
        ToolError::InvalidTree {
            message: message.into(),
            file,
            location: None,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ToolError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }

    /// The source location the error points at, when one is known.
    pub fn location(&self) -> Option<&LocationRange> {
        match self {
            ToolError::TraversalFailed { location, .. } => location.as_ref(),
            ToolError::InvalidTree { location, .. } => location.as_ref(),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
