// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tree-to-tree transformations.
//!
//! Passes never mutate their input. Each one takes a borrowed [`Tree`] and
//! returns a new one, so traversal and unparsing of the original stay free
//! of side effects.
//!
//! - [`lower_objects`] turns raw object literals into lowered objects.
//! - [`expand`] inlines the bodies of `local` bindings at their uses.
//!
//! [`Tree`]: crate::nodes::Tree

mod expand;
mod lower;

pub use expand::expand;
pub use lower::lower_objects;

use thiserror::Error;

use crate::nodes::{LocationRange, TreeShape};
use crate::traverse::TraversalError;

/// Errors raised by transformation passes.
#[derive(Debug, Error)]
pub enum PassError {
    #[error(transparent)]
    Traversal(#[from] TraversalError),

    /// The input tree is not in the shape the pass works on.
    #[error("{pass} expects a {expected} tree, got a {found} tree")]
    WrongShape {
        pass: &'static str,
        expected: TreeShape,
        found: TreeShape,
    },

    /// An object member lacks a part its kind requires.
    #[error("object member at {location} has no {part}")]
    MalformedMember {
        part: &'static str,
        location: LocationRange,
    },
}

impl PassError {
    pub fn location(&self) -> Option<&LocationRange> {
        match self {
            PassError::Traversal(err) => Some(err.location()),
            PassError::WrongShape { .. } => None,
            PassError::MalformedMember { location, .. } => Some(location),
        }
    }
}
