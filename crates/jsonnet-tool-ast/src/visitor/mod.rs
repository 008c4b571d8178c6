// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only consumers of the tree.
//!
//! - [`NodeIds`] numbers nodes in pre-order for stable identity.
//! - [`SymbolCollector`] lists referenceable identifiers with their context.
//! - [`GraphEmitter`] renders parent/child edges as a DOT digraph.
//! - [`ImportCollector`] lists `import` and `importstr` literals.

mod dot;
mod imports;
mod node_ids;
mod symbols;

pub use dot::{emit_graph, GraphEmitter};
pub use imports::{find_imports, ImportCollector, ImportKind, ImportRef};
pub use node_ids::{NodeId, NodeIds};
pub use symbols::{extract_symbols, Symbol, SymbolCollector, SymbolKind};
