// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Symbol extraction for editor support.
//!
//! A symbol is anything a variable or an index can refer to: `local`
//! bindings, object-local bindings and object fields. Each one is recorded
//! with the path of field names leading to it from the root object.
//!
//! # Ordering
//!
//! Symbols come out in traversal order. For a lowered object that means:
//!
//! 1. its object-local bindings,
//! 2. its fields with literal names,
//! 3. symbols found in computed field names,
//! 4. symbols inside each field body, whose context is extended by the
//!    field's name,
//! 5. symbols inside object-local bodies and asserts.
//!
//! Field names that are not string literals produce no symbol, and bodies
//! of such fields keep the enclosing context.
//!
//! ```
//! use jsonnet_tool_ast::builders::{desugared_object, number};
//! use jsonnet_tool_ast::visitor::SymbolCollector;
//!
//! let root = desugared_object(vec![
//!     ("a", number("1")),
//!     ("b", desugared_object(vec![("c", number("2"))])),
//! ]);
//! let symbols = SymbolCollector::collect(&root);
//! let names: Vec<_> = symbols
//!     .iter()
//!     .map(|s| format!("{}.{}", s.qualified_context(), s.identifier))
//!     .collect();
//! assert_eq!(names, vec!["$.a", "$.b", "$.b.c"]);
//! ```

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::nodes::{LocationRange, Node, NodeKind};
use crate::shape::children;
use crate::traverse::{check_depth, TraversalError};

/// What introduced a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// `local x = ...;`
    Local,
    /// `{ local x = ... }`
    ObjectLocal,
    /// `{ x: ... }`
    Field,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Local => "local",
            SymbolKind::ObjectLocal => "object_local",
            SymbolKind::Field => "field",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A referenceable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub identifier: String,
    pub kind: SymbolKind,
    /// Field names from the root object down to the object holding this
    /// symbol. Empty at the root.
    pub context: Vec<String>,
    pub location: LocationRange,
}

impl Symbol {
    /// The context as a path: `$` at the root, `$.a.b` below it.
    pub fn qualified_context(&self) -> String {
        std::iter::once("$")
            .chain(self.context.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Collects [`Symbol`]s from a lowered tree.
///
/// Works by direct recursion because field bodies need a context the
/// generic traversal does not carry. Call [`check_depth`] first on untrusted
/// trees, or use [`extract_symbols`].
#[derive(Debug, Default)]
pub struct SymbolCollector {
    symbols: Vec<Symbol>,
}

impl SymbolCollector {
    /// Collect every symbol under `root`, in traversal order.
    pub fn collect(root: &Node) -> Vec<Symbol> {
        let mut collector = SymbolCollector::default();
        collector.visit(root, &[]);
        collector.symbols
    }

    fn visit(&mut self, node: &Node, context: &[String]) {
        match &node.kind {
            NodeKind::DesugaredObject(object) => {
                for bind in &object.locals {
                    self.push(
                        &bind.variable,
                        SymbolKind::ObjectLocal,
                        context,
                        bind.loc.or(&node.loc),
                    );
                }

                for field in &object.fields {
                    if let Some(name) = field.name.as_literal_string() {
                        self.push(
                            &name.value,
                            SymbolKind::Field,
                            context,
                            field.loc.or(&node.loc),
                        );
                    }
                }
                for field in &object.fields {
                    if field.name.as_literal_string().is_none() {
                        self.visit(&field.name, context);
                    }
                }

                for field in &object.fields {
                    match field.name.as_literal_string() {
                        Some(name) => {
                            let mut nested = context.to_vec();
                            nested.push(name.value.clone());
                            self.visit(&field.body, &nested);
                        }
                        None => self.visit(&field.body, context),
                    }
                }
                for bind in &object.locals {
                    self.visit(&bind.body, context);
                }
                for assertion in &object.asserts {
                    self.visit(assertion, context);
                }
            }

            NodeKind::Local(local) => {
                for bind in &local.binds {
                    self.push(
                        &bind.variable,
                        SymbolKind::Local,
                        context,
                        bind.loc.or(&node.loc),
                    );
                }
                for child in children(node) {
                    self.visit(child, context);
                }
            }

            _ => {
                for child in children(node) {
                    self.visit(child, context);
                }
            }
        }
    }

    fn push(
        &mut self,
        identifier: &str,
        kind: SymbolKind,
        context: &[String],
        location: &LocationRange,
    ) {
        self.symbols.push(Symbol {
            identifier: identifier.to_string(),
            kind,
            context: context.to_vec(),
            location: location.clone(),
        });
    }
}

/// Collect symbols after checking the tree is no deeper than `max_depth`.
pub fn extract_symbols(root: &Node, max_depth: usize) -> Result<Vec<Symbol>, TraversalError> {
    check_depth(root, max_depth)?;
    let symbols = SymbolCollector::collect(root);
    debug!(count = symbols.len(), "extracted symbols");
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;
    use crate::nodes::{BinaryOp, DesugaredObject};
    use crate::traverse::DEFAULT_MAX_DEPTH;

    fn summary(symbols: &[Symbol]) -> Vec<(String, &'static str, String)> {
        symbols
            .iter()
            .map(|s| (s.identifier.clone(), s.kind.as_str(), s.qualified_context()))
            .collect()
    }

    fn entry(id: &str, kind: &'static str, context: &str) -> (String, &'static str, String) {
        (id.to_string(), kind, context.to_string())
    }

    #[test]
    fn nested_fields_carry_their_path() {
        let root = desugared_object(vec![
            ("a", number("1")),
            ("b", desugared_object(vec![("c", number("2"))])),
        ]);
        let symbols = extract_symbols(&root, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(
            summary(&symbols),
            vec![
                entry("a", "field", "$"),
                entry("b", "field", "$"),
                entry("c", "field", "$.b"),
            ]
        );
        assert_eq!(symbols[2].context, vec!["b".to_string()]);
    }

    #[test]
    fn siblings_do_not_share_context() {
        let root = desugared_object(vec![
            ("x", desugared_object(vec![("inner", number("1"))])),
            ("y", desugared_object(vec![("other", number("2"))])),
        ]);
        let symbols = SymbolCollector::collect(&root);
        assert_eq!(symbols[2].qualified_context(), "$.x");
        assert_eq!(symbols[3].qualified_context(), "$.y");
    }

    #[test]
    fn locals_and_object_locals() {
        let object = Node::new(NodeKind::DesugaredObject(DesugaredObject {
            asserts: vec![],
            fields: vec![desugared_field(string("f"), var("v"))],
            locals: vec![local_bind("v", number("1"))],
        }));
        let root = local(vec![("top", number("0"))], object);
        assert_eq!(
            summary(&SymbolCollector::collect(&root)),
            vec![
                entry("top", "local", "$"),
                entry("v", "object_local", "$"),
                entry("f", "field", "$"),
            ]
        );
    }

    #[test]
    fn locals_inside_fields_carry_the_field_context() {
        let root = desugared_object(vec![(
            "a",
            local(vec![("tmp", number("1"))], var("tmp")),
        )]);
        let symbols = SymbolCollector::collect(&root);
        assert_eq!(symbols[1].identifier, "tmp");
        assert_eq!(symbols[1].qualified_context(), "$.a");
    }

    #[test]
    fn computed_names_are_skipped() {
        let object = Node::new(NodeKind::DesugaredObject(DesugaredObject {
            asserts: vec![],
            fields: vec![desugared_field(
                binary(string("a"), BinaryOp::Plus, string("b")),
                desugared_object(vec![("inner", number("1"))]),
            )],
            locals: vec![],
        }));
        let symbols = SymbolCollector::collect(&object);
        assert_eq!(summary(&symbols), vec![entry("inner", "field", "$")]);
    }

    #[test]
    fn field_location_falls_back_to_object() {
        let loc = LocationRange::from_coords("f.jsonnet", (1, 1), (1, 10));
        let root = desugared_object(vec![("a", number("1"))]).with_loc(loc.clone());
        let symbols = SymbolCollector::collect(&root);
        assert_eq!(symbols[0].location, loc);
    }

    #[test]
    fn symbols_serialize_with_snake_case_kinds() {
        let root = local(vec![("x", number("1"))], var("x"));
        let json = serde_json::to_value(SymbolCollector::collect(&root)).unwrap();
        assert_eq!(json[0]["kind"], "local");
        assert_eq!(json[0]["identifier"], "x");
    }
}
