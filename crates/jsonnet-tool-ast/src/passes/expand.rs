// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Capture and expansion of `local` bindings.
//!
//! Expansion runs in two steps:
//!
//! 1. **Capture** walks the tree in pre-order and records the body of every
//!    `local` binding by name. A later binding of the same name replaces an
//!    earlier one. Function bindings are captured as `function(...)`
//!    literals. `import` bodies and functions are wrapped in parentheses so
//!    they stay valid wherever they are inlined.
//! 2. **Expand** copies the tree and replaces each variable naming a
//!    captured binding with a copy of its body, then keeps expanding inside
//!    the inserted copy.
//!
//! Scoping is not taken into account. Self-referential bindings would
//! expand forever; the nesting limit turns them into
//! [`TraversalError::DepthExceeded`].

use std::collections::HashMap;

use tracing::debug;

use super::PassError;
use crate::builders::parens;
use crate::nodes::{Function, Node, NodeKind, Tree};
use crate::shape::children_mut;
use crate::traverse::{check_depth, HookResult, Traversal, TraversalError, TraversalHooks};

/// Inline captured `local` bodies at their uses.
pub fn expand(tree: &Tree, max_depth: usize) -> Result<Tree, PassError> {
    check_depth(&tree.root, max_depth)?;

    let mut capturer = Capturer::default();
    Traversal::new(max_depth).run(&tree.root, &mut capturer)?;
    debug!(captured = capturer.locals.len(), "captured local bindings");

    let expander = Expander {
        locals: capturer.locals,
        max_depth,
    };
    let mut root = tree.root.clone();
    let mut replaced = 0;
    expander.expand_node(&mut root, 0, &mut replaced)?;
    debug!(replaced, "expanded variables");

    Ok(Tree {
        shape: tree.shape,
        root,
        final_fodder: tree.final_fodder.clone(),
    })
}

#[derive(Default)]
struct Capturer {
    locals: HashMap<String, Node>,
}

impl<'t> TraversalHooks<'t> for Capturer {
    fn pre(&mut self, node: &'t Node) -> HookResult {
        if let NodeKind::Local(local) = &node.kind {
            for bind in &local.binds {
                let body = match (&bind.fun, &bind.body.kind) {
                    (Some(params), _) => parens(Node::new(NodeKind::Function(Function {
                        params: params.clone(),
                        body: Box::new(bind.body.clone()),
                    }))),
                    (None, NodeKind::Import(_)) => parens(bind.body.clone()),
                    (None, _) => bind.body.clone(),
                };
                self.locals.insert(bind.variable.clone(), body);
            }
        }
        Ok(())
    }
}

struct Expander {
    locals: HashMap<String, Node>,
    max_depth: usize,
}

impl Expander {
    fn expand_node(
        &self,
        node: &mut Node,
        depth: usize,
        replaced: &mut usize,
    ) -> Result<(), TraversalError> {
        if depth > self.max_depth {
            return Err(TraversalError::DepthExceeded {
                limit: self.max_depth,
                location: node.loc.clone(),
            });
        }

        if let NodeKind::Var(var) = &node.kind {
            if let Some(body) = self.locals.get(&var.id) {
                *node = body.clone();
                *replaced += 1;
                return self.expand_node(node, depth + 1, replaced);
            }
        }

        for child in children_mut(node) {
            self.expand_node(child, depth + 1, replaced)?;
        }
        Ok(())
    }
}
