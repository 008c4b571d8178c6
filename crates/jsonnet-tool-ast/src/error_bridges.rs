// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Error bridge implementations for syntax tree errors.
//!
//! This module provides `impl From<X> for ToolError` conversions from the
//! error types of this crate to the unified `ToolError` type, so callers can
//! propagate parse, traversal and pass failures with `?`.
//!
//! The bridges live here rather than in `jsonnet-tool-core` because core sits
//! below the syntax tree crate and cannot name its types.

use jsonnet_tool_core::error::ToolError;

use crate::nodes::LocationRange;
use crate::parser::ParseError;
use crate::passes::PassError;
use crate::traverse::TraversalError;

/// Unset ranges carry no information worth reporting.
fn known(location: &LocationRange) -> Option<LocationRange> {
    location.is_set().then(|| location.clone())
}

// ============================================================================
// Bridge: TraversalError -> ToolError
// ============================================================================

impl From<TraversalError> for ToolError {
    fn from(err: TraversalError) -> Self {
        ToolError::TraversalFailed {
            message: err.to_string(),
            phase: err.phase().map(|phase| phase.as_str().to_string()),
            location: known(err.location()),
        }
    }
}

// ============================================================================
// Bridge: ParseError -> ToolError
// ============================================================================

impl From<ParseError> for ToolError {
    fn from(err: ParseError) -> Self {
        let file = match &err {
            ParseError::Syntax { location, .. } => Some(location.file_name.clone()),
            ParseError::Json { file, .. }
            | ParseError::TooDeep { file, .. }
            | ParseError::Shape { file, .. } => Some(file.clone()),
        };
        ToolError::InvalidTree {
            message: err.to_string(),
            file,
            location: err.location().and_then(known),
        }
    }
}

// ============================================================================
// Bridge: PassError -> ToolError
// ============================================================================

impl From<PassError> for ToolError {
    fn from(err: PassError) -> Self {
        match err {
            PassError::Traversal(err) => ToolError::from(err),
            other => ToolError::InvalidTree {
                message: other.to_string(),
                file: None,
                location: other.location().and_then(known),
            },
        }
    }
}
