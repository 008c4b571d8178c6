// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Depth-first traversal with pre-order, in-order and post-order hooks.
//!
//! # Hook Order
//!
//! For every node the engine fires:
//!
//! - `pre` on entry;
//! - for a leaf, `in_order` then `post` immediately;
//! - otherwise, the walk of every child but the last, then `in_order`, then
//!   the walk of the last child, then `post`.
//!
//! `in_order` therefore separates "all but the last" children from the last
//! one, and fires exactly once per node.
//!
//! # Errors
//!
//! The first hook error aborts the walk and is returned wrapped in
//! [`TraversalError::Hook`], tagged with the [`Phase`] that produced it and
//! the location of the node being visited. Exceeding the depth limit aborts
//! with [`TraversalError::DepthExceeded`].
//!
//! # Example
//!
//! ```
//! use jsonnet_tool_ast::builders::{binary, number, var};
//! use jsonnet_tool_ast::nodes::BinaryOp;
//! use jsonnet_tool_ast::traverse::{nop, traverse};
//!
//! let root = binary(var("a"), BinaryOp::Plus, number("1"));
//! let mut kinds = Vec::new();
//! traverse(&root, nop, nop, |node| {
//!     kinds.push(node.kind_name());
//!     Ok(())
//! })
//! .unwrap();
//! assert_eq!(kinds, vec!["Var", "LiteralNumber", "Binary"]);
//! ```

use std::fmt;

use thiserror::Error;

use crate::nodes::{LocationRange, Node};
use crate::shape::children;

/// Default nesting limit for traversals and recursive passes.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Error type returned by hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by hooks.
pub type HookResult = Result<(), HookError>;

// ============================================================================
// Errors
// ============================================================================

/// Which hook produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Pre,
    In,
    Post,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pre => "pre",
            Phase::In => "in",
            Phase::Post => "post",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a traversal.
#[derive(Debug, Error)]
pub enum TraversalError {
    /// A hook failed.
    #[error("{phase} error at {location}: {source}")]
    Hook {
        phase: Phase,
        location: LocationRange,
        source: HookError,
    },

    /// The tree is nested deeper than the configured limit.
    #[error("maximum nesting depth {limit} exceeded at {location}")]
    DepthExceeded {
        limit: usize,
        location: LocationRange,
    },
}

impl TraversalError {
    /// The phase of a hook failure, if this is one.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            TraversalError::Hook { phase, .. } => Some(*phase),
            TraversalError::DepthExceeded { .. } => None,
        }
    }

    /// Location of the node being visited when the walk aborted.
    pub fn location(&self) -> &LocationRange {
        match self {
            TraversalError::Hook { location, .. } => location,
            TraversalError::DepthExceeded { location, .. } => location,
        }
    }
}

// ============================================================================
// Hooks
// ============================================================================

/// Callbacks fired by [`Traversal::run`].
///
/// All three default to doing nothing. The `'t` lifetime lets
/// implementations keep references to visited nodes.
pub trait TraversalHooks<'t> {
    fn pre(&mut self, _node: &'t Node) -> HookResult {
        Ok(())
    }

    fn in_order(&mut self, _node: &'t Node) -> HookResult {
        Ok(())
    }

    fn post(&mut self, _node: &'t Node) -> HookResult {
        Ok(())
    }
}

/// Adapts three closures to [`TraversalHooks`].
pub struct FnHooks<P, I, Q> {
    pub pre: P,
    pub in_order: I,
    pub post: Q,
}

impl<'t, P, I, Q> TraversalHooks<'t> for FnHooks<P, I, Q>
where
    P: FnMut(&'t Node) -> HookResult,
    I: FnMut(&'t Node) -> HookResult,
    Q: FnMut(&'t Node) -> HookResult,
{
    fn pre(&mut self, node: &'t Node) -> HookResult {
        (self.pre)(node)
    }

    fn in_order(&mut self, node: &'t Node) -> HookResult {
        (self.in_order)(node)
    }

    fn post(&mut self, node: &'t Node) -> HookResult {
        (self.post)(node)
    }
}

/// A hook that does nothing.
pub fn nop(_node: &Node) -> HookResult {
    Ok(())
}

// ============================================================================
// Engine
// ============================================================================

/// Traversal settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    /// Deepest nesting level visited before aborting; the root is level 0.
    pub max_depth: usize,
}

impl Default for Traversal {
    fn default() -> Self {
        Traversal {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Traversal {
    pub fn new(max_depth: usize) -> Self {
        Traversal { max_depth }
    }

    /// Walk `root`, firing `hooks` in the order described in the module docs.
    pub fn run<'t, H>(&self, root: &'t Node, hooks: &mut H) -> Result<(), TraversalError>
    where
        H: TraversalHooks<'t> + ?Sized,
    {
        self.walk(root, hooks, 0)
    }

    fn walk<'t, H>(&self, node: &'t Node, hooks: &mut H, depth: usize) -> Result<(), TraversalError>
    where
        H: TraversalHooks<'t> + ?Sized,
    {
        if depth > self.max_depth {
            return Err(TraversalError::DepthExceeded {
                limit: self.max_depth,
                location: node.loc.clone(),
            });
        }

        hooks.pre(node).map_err(|e| hook_error(Phase::Pre, node, e))?;

        let kids = children(node);
        let Some((last, rest)) = kids.split_last() else {
            hooks
                .in_order(node)
                .map_err(|e| hook_error(Phase::In, node, e))?;
            hooks.post(node).map_err(|e| hook_error(Phase::Post, node, e))?;
            return Ok(());
        };

        for child in rest {
            self.walk(child, hooks, depth + 1)?;
        }
        hooks
            .in_order(node)
            .map_err(|e| hook_error(Phase::In, node, e))?;
        self.walk(last, hooks, depth + 1)?;
        hooks.post(node).map_err(|e| hook_error(Phase::Post, node, e))?;
        Ok(())
    }
}

fn hook_error(phase: Phase, node: &Node, source: HookError) -> TraversalError {
    TraversalError::Hook {
        phase,
        location: node.loc.clone(),
        source,
    }
}

/// Walk `root` with the default settings and three closure hooks.
pub fn traverse<'t, P, I, Q>(
    root: &'t Node,
    pre: P,
    in_order: I,
    post: Q,
) -> Result<(), TraversalError>
where
    P: FnMut(&'t Node) -> HookResult,
    I: FnMut(&'t Node) -> HookResult,
    Q: FnMut(&'t Node) -> HookResult,
{
    let mut hooks = FnHooks {
        pre,
        in_order,
        post,
    };
    Traversal::default().run(root, &mut hooks)
}

/// Fail if `root` is nested deeper than `limit`.
///
/// Uses an explicit stack, so it is safe to call on trees that would overflow
/// the call stack of a recursive pass. Recursive passes that do not go
/// through [`Traversal`] call this first.
pub fn check_depth(root: &Node, limit: usize) -> Result<(), TraversalError> {
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        if depth > limit {
            return Err(TraversalError::DepthExceeded {
                limit,
                location: node.loc.clone(),
            });
        }
        stack.extend(children(node).into_iter().map(|child| (child, depth + 1)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;
    use crate::nodes::BinaryOp;

    /// Records every hook call as `phase:kind`.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl<'t> TraversalHooks<'t> for Recorder {
        fn pre(&mut self, node: &'t Node) -> HookResult {
            self.events.push(format!("pre:{}", label(node)));
            Ok(())
        }

        fn in_order(&mut self, node: &'t Node) -> HookResult {
            self.events.push(format!("in:{}", label(node)));
            Ok(())
        }

        fn post(&mut self, node: &'t Node) -> HookResult {
            self.events.push(format!("post:{}", label(node)));
            Ok(())
        }
    }

    fn label(node: &Node) -> String {
        match &node.kind {
            crate::nodes::NodeKind::Var(v) => v.id.clone(),
            _ => node.kind_name().to_string(),
        }
    }

    #[test]
    fn in_order_fires_before_last_child() {
        let root = apply(var("f"), vec![var("a"), var("b")], vec![]);
        let mut recorder = Recorder::default();
        Traversal::default().run(&root, &mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec![
                "pre:Apply", "pre:f", "in:f", "post:f", "pre:a", "in:a", "post:a", "in:Apply",
                "pre:b", "in:b", "post:b", "post:Apply",
            ]
        );
    }

    #[test]
    fn every_node_visited_once_per_phase() {
        let root = local(
            vec![("x", number("1"))],
            desugared_object(vec![
                ("a", binary(var("x"), BinaryOp::Plus, number("2"))),
                ("b", array(vec![string("s"), var("x")])),
            ]),
        );

        let mut pre = 0;
        let mut ins = 0;
        let mut post = 0;
        traverse(
            &root,
            |_| {
                pre += 1;
                Ok(())
            },
            |_| {
                ins += 1;
                Ok(())
            },
            |_| {
                post += 1;
                Ok(())
            },
        )
        .unwrap();

        let mut total = 0;
        check_count(&root, &mut total);
        assert_eq!((pre, ins, post), (total, total, total));
    }

    fn check_count(node: &Node, total: &mut usize) {
        *total += 1;
        for child in children(node) {
            check_count(child, total);
        }
    }

    #[test]
    fn hook_errors_are_tagged_with_phase() {
        let root = binary(var("a"), BinaryOp::Plus, var("b"));
        let err = traverse(&root, nop, |_| Err("boom".into()), nop).unwrap_err();
        assert_eq!(err.phase(), Some(Phase::In));
        assert!(err.to_string().starts_with("in error at "));
        assert!(err.to_string().ends_with(": boom"));
    }

    #[test]
    fn first_error_aborts_walk() {
        let root = array(vec![var("a"), var("b"), var("c")]);
        let mut seen = Vec::new();
        let result = traverse(
            &root,
            |node| {
                seen.push(label(node));
                if label(node) == "b" {
                    return Err("stop".into());
                }
                Ok(())
            },
            nop,
            nop,
        );
        assert!(matches!(result, Err(TraversalError::Hook { phase: Phase::Pre, .. })));
        assert_eq!(seen, vec!["Array", "a", "b"]);
    }

    fn nested(depth: usize) -> Node {
        let mut node = number("0");
        for _ in 0..depth {
            node = parens(node);
        }
        node
    }

    #[test]
    fn depth_limit_is_enforced() {
        let root = nested(10);
        let err = Traversal::new(5)
            .run(&root, &mut Recorder::default())
            .unwrap_err();
        assert!(matches!(err, TraversalError::DepthExceeded { limit: 5, .. }));
        assert!(Traversal::new(10).run(&root, &mut Recorder::default()).is_ok());
    }

    #[test]
    fn check_depth_handles_very_deep_trees() {
        let root = nested(100_000);
        assert!(check_depth(&root, DEFAULT_MAX_DEPTH).is_err());
        assert!(check_depth(&root, 100_000).is_ok());
        // Dropping a deeply nested box chain recurses; leak it instead.
        std::mem::forget(root);
    }
}
