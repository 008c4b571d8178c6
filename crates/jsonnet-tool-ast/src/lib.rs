// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Jsonnet syntax trees and the tooling passes built on them.
//!
//! The crate works on trees produced by an external parser and never
//! evaluates them. It covers:
//!
//! - **Node model**: [`nodes`] holds every expression kind with its source
//!   location and formatting metadata ("fodder").
//! - **Shape adapter**: [`shape`] defines the ordered children of each kind,
//!   for both raw and lowered trees.
//! - **Traversal**: [`traverse`] walks a tree depth-first with pre-order,
//!   in-order and post-order hooks.
//! - **Code generation**: [`codegen`] turns a tree back into source text,
//!   reproducing comments, blank lines and indentation.
//! - **Consumers**: [`visitor`] extracts symbols, renders DOT graphs, lists
//!   imports and numbers nodes.
//! - **Passes**: [`passes`] lowers objects and inlines `local` bindings.
//! - **Errors**: [`error_bridges`] converts every error of this crate into
//!   the shared `ToolError`.
//!
//! # Quick Start
//!
//! ```
//! use jsonnet_tool_ast::builders::{desugared_object, number};
//! use jsonnet_tool_ast::codegen::{unparse_tree, UnparseOptions};
//! use jsonnet_tool_ast::nodes::Tree;
//! use jsonnet_tool_ast::traverse::Traversal;
//! use jsonnet_tool_ast::visitor::{emit_graph, SymbolCollector};
//!
//! let root = desugared_object(vec![
//!     ("a", number("1")),
//!     ("b", desugared_object(vec![("c", number("2"))])),
//! ]);
//!
//! let symbols = SymbolCollector::collect(&root);
//! assert_eq!(symbols.len(), 3);
//!
//! let graph = emit_graph(&root, &Traversal::default()).unwrap();
//! assert!(graph.starts_with("digraph {\n"));
//!
//! let text = unparse_tree(&Tree::lowered(root), &UnparseOptions::default()).unwrap();
//! assert_eq!(text, "{ \"a\": 1, \"b\": { \"c\": 2 } }\n");
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

pub mod builders;
pub mod codegen;
pub mod diagnostics;
pub mod error_bridges;
pub mod nodes;
pub mod parser;
pub mod passes;
pub mod shape;
pub mod traverse;
pub mod visitor;

pub use codegen::{unparse_tree, CodegenState, UnparseOptions};
pub use nodes::{Node, NodeKind, Tree, TreeShape};
pub use parser::{JsonTreeParser, ParseError, SourceParser};
pub use passes::{expand, lower_objects, PassError};
pub use traverse::{traverse, Traversal, TraversalError, TraversalHooks};
pub use visitor::{emit_graph, extract_symbols, find_imports, Symbol, SymbolKind};
