//! JSON output types and serialization for CLI responses.
//!
//! These types form the contract for consumers of the `symbols`, `imports`
//! and error outputs. Graph and unparsed outputs are plain text and do not
//! go through this module.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input -> same output (field order, array ordering)
//! 3. **Traversal order:** Symbol and import arrays keep the order in which
//!    they were found, they are never sorted
//! 4. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{OutputErrorCode, ToolError};
use crate::types::LocationRange;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Symbols
// ============================================================================

/// A referenceable symbol as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// The identifier or field name.
    pub identifier: String,
    /// One of: local, object_local, field.
    pub kind: String,
    /// Dot-joined context path rooted at `$`.
    pub context: String,
    /// Where the symbol is defined.
    pub location: LocationRange,
}

impl SymbolInfo {
    /// Create a new symbol record.
    pub fn new(
        identifier: impl Into<String>,
        kind: impl Into<String>,
        context: impl Into<String>,
        location: LocationRange,
    ) -> Self {
        SymbolInfo {
            identifier: identifier.into(),
            kind: kind.into(),
            context: context.into(),
            location,
        }
    }
}

/// Response for the `symbols` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolsResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Symbols in traversal order.
    pub symbols: Vec<SymbolInfo>,
}

impl SymbolsResponse {
    /// Create a successful symbols response.
    pub fn new(symbols: Vec<SymbolInfo>) -> Self {
        SymbolsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            symbols,
        }
    }
}

// ============================================================================
// Imports
// ============================================================================

/// An import expression found in a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInfo {
    /// One of: import, importstr.
    pub kind: String,
    /// The imported path, exactly as written.
    pub path: String,
    /// Location of the import expression.
    pub location: LocationRange,
}

/// Response for the `imports` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportsResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Imports in traversal order.
    pub imports: Vec<ImportInfo>,
}

impl ImportsResponse {
    /// Create a successful imports response.
    pub fn new(imports: Vec<ImportInfo>) -> Self {
        ImportsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            imports,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error information for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Traversal phase that failed (pre, in, post).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Where the error occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationRange>,
}

impl ErrorInfo {
    /// Create from a ToolError.
    pub fn from_error(err: &ToolError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();
        let phase = match err {
            ToolError::TraversalFailed { phase, .. } => phase.clone(),
            _ => None,
        };
        ErrorInfo {
            code,
            message,
            phase,
            location: err.location().cloned(),
        }
    }
}

/// Response emitted when a command fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a ToolError.
    pub fn from_error(err: &ToolError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
