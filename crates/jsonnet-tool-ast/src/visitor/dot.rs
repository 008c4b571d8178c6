// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! DOT rendering of the tree structure.
//!
//! Every node is labelled `[<location>] #<id> <Kind>[ <detail>]`, where the
//! detail is the operator, literal text or identifier for the kinds that
//! have one. Edges are emitted from the post-order hook, one per
//! (parent, child) pair, in visitation order and without deduplication.
//!
//! Lowered objects route each field through its name:
//! `object -> name` and `name -> body`. Object-local bodies and asserts hang
//! directly off the object.

use std::fmt::Write as _;

use tracing::{debug, trace};

use super::node_ids::NodeIds;
use crate::nodes::{LocationRange, Node, NodeKind};
use crate::shape::children;
use crate::traverse::{HookResult, Traversal, TraversalError, TraversalHooks};

/// Post-order hook that accumulates DOT edges.
pub struct GraphEmitter<'t> {
    ids: NodeIds<'t>,
    out: String,
    edges: usize,
}

impl<'t> GraphEmitter<'t> {
    pub fn new(ids: NodeIds<'t>) -> Self {
        GraphEmitter {
            ids,
            out: String::new(),
            edges: 0,
        }
    }

    /// The label of `node`, attributed to `loc`.
    ///
    /// Field names synthesized by lowering have no location of their own,
    /// so callers pass the field's location for them.
    pub fn label(&self, node: &Node, loc: &LocationRange) -> String {
        let id = self
            .ids
            .get(node)
            .map_or_else(|| "#?".to_string(), |id| id.to_string());
        let mut label = format!("[{}] {} {}", loc, id, node.kind_name());
        match &node.kind {
            NodeKind::Binary(n) => write_detail(&mut label, n.op.as_str()),
            NodeKind::Unary(n) => write_detail(&mut label, n.op.as_str()),
            NodeKind::LiteralString(n) => write_detail(&mut label, &n.value),
            NodeKind::LiteralNumber(n) => write_detail(&mut label, &n.original_string),
            NodeKind::LiteralBoolean(n) => {
                write_detail(&mut label, if n.value { "true" } else { "false" })
            }
            NodeKind::Var(n) => write_detail(&mut label, &n.id),
            NodeKind::Index(n) => {
                if let Some(id) = &n.id {
                    write_detail(&mut label, id);
                }
            }
            _ => {}
        }
        label
    }

    fn edge(&mut self, from: &str, to: &str) {
        trace!(from, to, "edge");
        // Writing to a String cannot fail.
        let _ = writeln!(self.out, "  \"{}\"->\"{}\"", escape(from), escape(to));
        self.edges += 1;
    }

    /// The finished graph.
    pub fn finish(self) -> String {
        debug!(edges = self.edges, nodes = self.ids.len(), "rendered graph");
        format!("digraph {{\n{}}}\n", self.out)
    }
}

impl<'t> TraversalHooks<'t> for GraphEmitter<'t> {
    fn post(&mut self, node: &'t Node) -> HookResult {
        let parent = self.label(node, &node.loc);
        match &node.kind {
            NodeKind::DesugaredObject(object) => {
                for field in &object.fields {
                    let name = self.label(&field.name, &field.loc);
                    let body = self.label(&field.body, &field.body.loc);
                    self.edge(&parent, &name);
                    self.edge(&name, &body);
                }
                for bind in &object.locals {
                    let body = self.label(&bind.body, &bind.body.loc);
                    self.edge(&parent, &body);
                }
                for assertion in &object.asserts {
                    let child = self.label(assertion, &assertion.loc);
                    self.edge(&parent, &child);
                }
            }
            _ => {
                for child in children(node) {
                    let child = self.label(child, &child.loc);
                    self.edge(&parent, &child);
                }
            }
        }
        Ok(())
    }
}

fn write_detail(label: &mut String, detail: &str) {
    label.push(' ');
    label.push_str(detail);
}

fn escape(label: &str) -> String {
    label.replace('"', "\\\"")
}

/// Render the tree under `root` as a DOT digraph.
///
/// On error nothing is returned; a partial graph is never produced.
pub fn emit_graph(root: &Node, traversal: &Traversal) -> Result<String, TraversalError> {
    let ids = NodeIds::collect(root, traversal)?;
    let mut emitter = GraphEmitter::new(ids);
    traversal.run(root, &mut emitter)?;
    Ok(emitter.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;
    use crate::nodes::BinaryOp;

    fn edges(graph: &str) -> Vec<&str> {
        graph
            .lines()
            .filter(|line| line.starts_with("  "))
            .map(str::trim)
            .collect()
    }

    #[test]
    fn leaf_has_no_edges() {
        let graph = emit_graph(&number("1"), &Traversal::default()).unwrap();
        assert_eq!(graph, "digraph {\n}\n");
    }

    #[test]
    fn binary_edges_and_labels() {
        let root = binary(var("a"), BinaryOp::Plus, number("1"));
        let graph = emit_graph(&root, &Traversal::default()).unwrap();
        assert_eq!(
            edges(&graph),
            vec![
                r#""[] #0 Binary +"->"[] #1 Var a""#,
                r#""[] #0 Binary +"->"[] #2 LiteralNumber 1""#,
            ]
        );
    }

    #[test]
    fn quotes_in_labels_are_escaped() {
        let root = array(vec![string("say \"hi\"")]);
        let graph = emit_graph(&root, &Traversal::default()).unwrap();
        assert!(graph.contains(r#"#1 LiteralString say \"hi\""#));
    }

    #[test]
    fn desugared_object_routes_through_names() {
        let root = desugared_object(vec![
            ("a", number("1")),
            ("b", desugared_object(vec![("c", number("2"))])),
        ]);
        let graph = emit_graph(&root, &Traversal::default()).unwrap();
        let edges = edges(&graph);
        // Ids: #0 outer, #1 "a", #2 "b", #3 1, #4 inner, #5 "c", #6 2.
        for expected in [
            r#""[] #0 DesugaredObject"->"[] #1 LiteralString a""#,
            r#""[] #1 LiteralString a"->"[] #3 LiteralNumber 1""#,
            r#""[] #0 DesugaredObject"->"[] #2 LiteralString b""#,
            r#""[] #2 LiteralString b"->"[] #4 DesugaredObject""#,
            r#""[] #4 DesugaredObject"->"[] #5 LiteralString c""#,
            r#""[] #5 LiteralString c"->"[] #6 LiteralNumber 2""#,
        ] {
            assert!(edges.contains(&expected), "missing {expected} in {edges:?}");
        }
        assert_eq!(edges.len(), 6);
        // Post-order: the inner object is finished before the outer one.
        assert!(edges[0].starts_with(r#""[] #4"#));
    }

    #[test]
    fn field_labels_use_field_location() {
        let mut root = desugared_object(vec![("a", number("1"))]);
        if let NodeKind::DesugaredObject(object) = &mut root.kind {
            object.fields[0].loc = LocationRange::from_coords("f", (2, 3), (2, 7));
        }
        let graph = emit_graph(&root, &Traversal::default()).unwrap();
        assert!(graph.contains(r#""[f:2:3-7] #1 LiteralString a""#));
    }
}
