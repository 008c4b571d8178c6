// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Source-faithful code generation.
//!
//! [`CodegenState`] accumulates output text. The two halves of code
//! generation are methods on it:
//!
//! - [`CodegenState::fill`] reproduces a fodder sequence (comments, blank
//!   lines, indentation) and inserts single spaces only where two tokens
//!   would otherwise run together.
//! - [`CodegenState::unparse`] re-emits the syntax of every node kind,
//!   calling `fill` for each piece of fodder in token order.
//!
//! # Round-trip
//!
//! For a raw tree whose spacing is already canonical, [`unparse_tree`]
//! reproduces the source byte for byte:
//!
//! ```
//! use jsonnet_tool_ast::builders::{desugared_object, number};
//! use jsonnet_tool_ast::codegen::{unparse_tree, UnparseOptions};
//! use jsonnet_tool_ast::nodes::Tree;
//!
//! let tree = Tree::lowered(desugared_object(vec![("a", number("1"))]));
//! let text = unparse_tree(&tree, &UnparseOptions::default()).unwrap();
//! assert_eq!(text, "{ \"a\": 1 }\n");
//! ```

mod fill;
mod unparse;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nodes::Tree;
use crate::traverse::{check_depth, TraversalError, DEFAULT_MAX_DEPTH};

/// Layout switches that are not recorded in fodder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnparseOptions {
    /// Emit `[ 1, 2 ]` instead of `[1, 2]`.
    pub pad_arrays: bool,
    /// Emit `{ a: 1 }` instead of `{a: 1}`.
    pub pad_objects: bool,
}

impl Default for UnparseOptions {
    fn default() -> Self {
        UnparseOptions {
            pad_arrays: false,
            pad_objects: true,
        }
    }
}

/// Output buffer for code generation.
#[derive(Debug, Default)]
pub struct CodegenState {
    pub tokens: String,
    pub options: UnparseOptions,
}

impl CodegenState {
    pub fn new(options: UnparseOptions) -> Self {
        CodegenState {
            tokens: String::new(),
            options,
        }
    }

    pub fn add_token(&mut self, tok: &str) {
        self.tokens.push_str(tok);
    }

    fn add_spaces(&mut self, count: usize) {
        self.tokens.push_str(&" ".repeat(count));
    }

    fn add_newlines(&mut self, count: usize) {
        self.tokens.push_str(&"\n".repeat(count));
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens)
    }
}

/// Unparse a whole tree, including the fodder after its last token.
///
/// The output always ends with a single newline.
pub fn unparse_tree(tree: &Tree, options: &UnparseOptions) -> Result<String, TraversalError> {
    unparse_tree_with_depth(tree, options, DEFAULT_MAX_DEPTH)
}

/// [`unparse_tree`] with an explicit nesting limit.
pub fn unparse_tree_with_depth(
    tree: &Tree,
    options: &UnparseOptions,
    max_depth: usize,
) -> Result<String, TraversalError> {
    check_depth(&tree.root, max_depth)?;

    let mut state = CodegenState::new(*options);
    state.unparse(&tree.root, false);
    state.fill(&tree.final_fodder, true, false);
    state.add_token("\n");

    debug!(
        shape = %tree.shape,
        bytes = state.tokens.len(),
        "unparsed tree"
    );
    Ok(state.tokens)
}
