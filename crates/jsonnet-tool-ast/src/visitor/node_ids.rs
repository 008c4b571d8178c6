// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Pre-order node numbering.
//!
//! Nodes have no identity of their own, so consumers that must tell two
//! structurally equal nodes apart (graph labels) number them first. Ids are
//! assigned in pre-order: parents before children, left siblings before
//! right ones. The same tree always gets the same ids.
//!
//! ```text
//! Given: a + 1
//!   #0 -> Binary
//!   #1 -> Var a
//!   #2 -> LiteralNumber 1
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::nodes::Node;
use crate::traverse::{HookResult, Traversal, TraversalError, TraversalHooks};

/// Pre-order position of a node within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ids for every node of a borrowed tree, keyed by node address.
#[derive(Debug, Default)]
pub struct NodeIds<'t> {
    ids: HashMap<*const Node, NodeId>,
    nodes: Vec<&'t Node>,
}

impl<'t> NodeIds<'t> {
    /// Number every node reachable from `root`.
    pub fn collect(root: &'t Node, traversal: &Traversal) -> Result<Self, TraversalError> {
        let mut ids = NodeIds::default();
        traversal.run(root, &mut ids)?;
        Ok(ids)
    }

    /// The id of `node`, if it belongs to the numbered tree.
    pub fn get(&self, node: &Node) -> Option<NodeId> {
        self.ids.get(&(node as *const Node)).copied()
    }

    /// The node with the given id.
    pub fn node(&self, id: NodeId) -> Option<&'t Node> {
        self.nodes.get(id.0 as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'t> TraversalHooks<'t> for NodeIds<'t> {
    fn pre(&mut self, node: &'t Node) -> HookResult {
        let id = NodeId(u32::try_from(self.nodes.len())?);
        self.ids.insert(node as *const Node, id);
        self.nodes.push(node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;
    use crate::nodes::BinaryOp;

    #[test]
    fn ids_follow_pre_order() {
        let root = binary(var("a"), BinaryOp::Plus, number("1"));
        let ids = NodeIds::collect(&root, &Traversal::default()).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.get(&root), Some(NodeId(0)));
        assert_eq!(ids.node(NodeId(1)).map(Node::kind_name), Some("Var"));
        assert_eq!(ids.node(NodeId(2)).map(Node::kind_name), Some("LiteralNumber"));
    }

    #[test]
    fn equal_nodes_get_distinct_ids() {
        let root = array(vec![number("1"), number("1")]);
        let ids = NodeIds::collect(&root, &Traversal::default()).unwrap();
        let first = ids.node(NodeId(1)).unwrap();
        let second = ids.node(NodeId(2)).unwrap();
        assert_eq!(first, second);
        assert_ne!(ids.get(first), ids.get(second));
    }

    #[test]
    fn foreign_nodes_have_no_id() {
        let root = var("a");
        let other = var("a");
        let ids = NodeIds::collect(&root, &Traversal::default()).unwrap();
        assert_eq!(ids.get(&other), None);
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
