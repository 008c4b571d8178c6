// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Shape adapter: the ordered children of every node kind.
//!
//! Every consumer that walks the tree generically (traversal, graph emission,
//! passes) asks this module for children instead of matching on kinds itself,
//! so the child order is defined in exactly one place.
//!
//! Objects are the only kinds whose children depend on the tree shape:
//!
//! - A raw [`Object`](crate::nodes::Object) yields its object-local bindings
//!   first, then each field in source order (computed name, method parameter
//!   defaults, value, assert message).
//! - A [`DesugaredObject`](crate::nodes::DesugaredObject) splits its children
//!   into *direct* children (field names, usable as symbols) and *special*
//!   children (field bodies, object-local bodies, asserts) that must be
//!   recursed into but are not symbols themselves.
//!
//! [`children_mut`] mirrors [`children`] exactly for transformation passes.

use thiserror::Error;

use crate::nodes::{
    ForSpec, LocationRange, Node, NodeKind, ObjectField, ObjectFieldKind, Params, Tree, TreeShape,
};

// ============================================================================
// Read-only access
// ============================================================================

/// All children of `node`, in evaluation order.
pub fn children(node: &Node) -> Vec<&Node> {
    let mut out = direct_children(node);
    out.extend(special_children(node));
    out
}

/// Children that are not special. For a lowered object these are the field
/// names; for every other kind they are all children.
pub fn direct_children(node: &Node) -> Vec<&Node> {
    let mut out = Vec::new();
    match &node.kind {
        NodeKind::Apply(n) => {
            out.push(&*n.target);
            out.extend(n.arguments.positional.iter().map(|a| &a.expr));
            out.extend(n.arguments.named.iter().map(|a| &a.arg));
        }
        NodeKind::ApplyBrace(n) => {
            out.push(&*n.left);
            out.push(&*n.right);
        }
        NodeKind::Array(n) => out.extend(n.elements.iter().map(|e| &e.expr)),
        NodeKind::ArrayComp(n) => {
            out.push(&*n.body);
            push_spec(&n.spec, &mut out);
        }
        NodeKind::Assert(n) => {
            out.push(&*n.cond);
            out.extend(n.message.as_deref());
            out.push(&*n.rest);
        }
        NodeKind::Binary(n) => {
            out.push(&*n.left);
            out.push(&*n.right);
        }
        NodeKind::Conditional(n) => {
            out.push(&*n.cond);
            out.push(&*n.branch_true);
            out.extend(n.branch_false.as_deref());
        }
        NodeKind::Error(n) => out.push(&*n.expr),
        NodeKind::Function(n) => {
            push_params(&n.params, &mut out);
            out.push(&*n.body);
        }
        NodeKind::Index(n) => {
            out.push(&*n.target);
            out.extend(n.index.as_deref());
        }
        NodeKind::Slice(n) => {
            out.push(&*n.target);
            out.extend(n.begin_index.as_deref());
            out.extend(n.end_index.as_deref());
            out.extend(n.step.as_deref());
        }
        NodeKind::InSuper(n) => out.push(&*n.index),
        NodeKind::SuperIndex(n) => out.extend(n.index.as_deref()),
        NodeKind::Local(n) => {
            for bind in &n.binds {
                if let Some(params) = &bind.fun {
                    push_params(params, &mut out);
                }
                out.push(&bind.body);
            }
            out.push(&*n.body);
        }
        NodeKind::Object(n) => push_fields(&n.fields, &mut out),
        NodeKind::ObjectComp(n) => {
            push_fields(&n.fields, &mut out);
            push_spec(&n.spec, &mut out);
        }
        NodeKind::DesugaredObject(n) => out.extend(n.fields.iter().map(|f| &f.name)),
        NodeKind::Parens(n) => out.push(&*n.inner),
        NodeKind::Unary(n) => out.push(&*n.expr),
        // The file literal of an import is payload, not a subexpression.
        NodeKind::Import(_) | NodeKind::ImportStr(_) => {}
        NodeKind::Dollar
        | NodeKind::LiteralBoolean(_)
        | NodeKind::LiteralNull
        | NodeKind::LiteralNumber(_)
        | NodeKind::LiteralString(_)
        | NodeKind::SelfRef
        | NodeKind::Var(_) => {}
    }
    out
}

/// Special children: only lowered objects have any.
pub fn special_children(node: &Node) -> Vec<&Node> {
    match &node.kind {
        NodeKind::DesugaredObject(n) => n
            .fields
            .iter()
            .map(|f| &f.body)
            .chain(n.locals.iter().map(|l| &l.body))
            .chain(n.asserts.iter())
            .collect(),
        _ => Vec::new(),
    }
}

fn push_params<'a>(params: &'a Params, out: &mut Vec<&'a Node>) {
    out.extend(params.parameters.iter().filter_map(|p| p.default_arg.as_ref()));
}

fn push_spec<'a>(spec: &'a ForSpec, out: &mut Vec<&'a Node>) {
    if let Some(outer) = spec.outer.as_deref() {
        push_spec(outer, out);
    }
    out.push(&*spec.expr);
    out.extend(spec.conditions.iter().map(|c| &c.expr));
}

fn push_fields<'a>(fields: &'a [ObjectField], out: &mut Vec<&'a Node>) {
    let (locals, members): (Vec<_>, Vec<_>) = fields
        .iter()
        .partition(|f| f.kind == ObjectFieldKind::Local);
    for field in locals.into_iter().chain(members) {
        if matches!(field.kind, ObjectFieldKind::FieldStr | ObjectFieldKind::FieldExpr) {
            out.extend(field.expr1.as_ref());
        }
        if let Some(params) = &field.method {
            push_params(params, out);
        }
        out.extend(field.expr2.as_ref());
        out.extend(field.expr3.as_ref());
    }
}

// ============================================================================
// Mutable access
// ============================================================================

/// Mutable twin of [`children`], in the same order.
pub fn children_mut(node: &mut Node) -> Vec<&mut Node> {
    let mut out = Vec::new();
    match &mut node.kind {
        NodeKind::Apply(n) => {
            out.push(&mut *n.target);
            out.extend(n.arguments.positional.iter_mut().map(|a| &mut a.expr));
            out.extend(n.arguments.named.iter_mut().map(|a| &mut a.arg));
        }
        NodeKind::ApplyBrace(n) => {
            out.push(&mut *n.left);
            out.push(&mut *n.right);
        }
        NodeKind::Array(n) => out.extend(n.elements.iter_mut().map(|e| &mut e.expr)),
        NodeKind::ArrayComp(n) => {
            out.push(&mut *n.body);
            push_spec_mut(&mut n.spec, &mut out);
        }
        NodeKind::Assert(n) => {
            out.push(&mut *n.cond);
            out.extend(n.message.as_deref_mut());
            out.push(&mut *n.rest);
        }
        NodeKind::Binary(n) => {
            out.push(&mut *n.left);
            out.push(&mut *n.right);
        }
        NodeKind::Conditional(n) => {
            out.push(&mut *n.cond);
            out.push(&mut *n.branch_true);
            out.extend(n.branch_false.as_deref_mut());
        }
        NodeKind::Error(n) => out.push(&mut *n.expr),
        NodeKind::Function(n) => {
            push_params_mut(&mut n.params, &mut out);
            out.push(&mut *n.body);
        }
        NodeKind::Index(n) => {
            out.push(&mut *n.target);
            out.extend(n.index.as_deref_mut());
        }
        NodeKind::Slice(n) => {
            out.push(&mut *n.target);
            out.extend(n.begin_index.as_deref_mut());
            out.extend(n.end_index.as_deref_mut());
            out.extend(n.step.as_deref_mut());
        }
        NodeKind::InSuper(n) => out.push(&mut *n.index),
        NodeKind::SuperIndex(n) => out.extend(n.index.as_deref_mut()),
        NodeKind::Local(n) => {
            for bind in &mut n.binds {
                if let Some(params) = &mut bind.fun {
                    push_params_mut(params, &mut out);
                }
                out.push(&mut bind.body);
            }
            out.push(&mut *n.body);
        }
        NodeKind::Object(n) => push_fields_mut(&mut n.fields, &mut out),
        NodeKind::ObjectComp(n) => {
            push_fields_mut(&mut n.fields, &mut out);
            push_spec_mut(&mut n.spec, &mut out);
        }
        NodeKind::DesugaredObject(n) => {
            let mut bodies = Vec::new();
            for field in &mut n.fields {
                out.push(&mut field.name);
                bodies.push(&mut field.body);
            }
            out.extend(bodies);
            out.extend(n.locals.iter_mut().map(|l| &mut l.body));
            out.extend(n.asserts.iter_mut());
        }
        NodeKind::Parens(n) => out.push(&mut *n.inner),
        NodeKind::Unary(n) => out.push(&mut *n.expr),
        NodeKind::Import(_) | NodeKind::ImportStr(_) => {}
        NodeKind::Dollar
        | NodeKind::LiteralBoolean(_)
        | NodeKind::LiteralNull
        | NodeKind::LiteralNumber(_)
        | NodeKind::LiteralString(_)
        | NodeKind::SelfRef
        | NodeKind::Var(_) => {}
    }
    out
}

fn push_params_mut<'a>(params: &'a mut Params, out: &mut Vec<&'a mut Node>) {
    out.extend(
        params
            .parameters
            .iter_mut()
            .filter_map(|p| p.default_arg.as_mut()),
    );
}

fn push_spec_mut<'a>(spec: &'a mut ForSpec, out: &mut Vec<&'a mut Node>) {
    if let Some(outer) = spec.outer.as_deref_mut() {
        push_spec_mut(outer, out);
    }
    out.push(&mut *spec.expr);
    out.extend(spec.conditions.iter_mut().map(|c| &mut c.expr));
}

fn push_fields_mut<'a>(fields: &'a mut [ObjectField], out: &mut Vec<&'a mut Node>) {
    let (locals, members): (Vec<_>, Vec<_>) = fields
        .iter_mut()
        .partition(|f| f.kind == ObjectFieldKind::Local);
    for field in locals.into_iter().chain(members) {
        if matches!(field.kind, ObjectFieldKind::FieldStr | ObjectFieldKind::FieldExpr) {
            out.extend(field.expr1.as_mut());
        }
        if let Some(params) = &mut field.method {
            push_params_mut(params, out);
        }
        out.extend(field.expr2.as_mut());
        out.extend(field.expr3.as_mut());
    }
}

// ============================================================================
// Shape validation
// ============================================================================

/// A tree contains an object node that does not belong to its declared shape.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{shape} tree contains a {kind} node at {location}")]
pub struct ShapeMismatch {
    pub shape: TreeShape,
    pub kind: &'static str,
    pub location: LocationRange,
}

impl Tree {
    /// Check that the tree's objects match its declared shape.
    ///
    /// Raw trees must not contain `DesugaredObject` nodes and lowered trees
    /// must not contain `Object` nodes. The walk uses an explicit stack, so
    /// arbitrarily deep trees are accepted.
    pub fn validate_shape(&self) -> Result<(), ShapeMismatch> {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            let misplaced = matches!(
                (self.shape, &node.kind),
                (TreeShape::Raw, NodeKind::DesugaredObject(_))
                    | (TreeShape::Lowered, NodeKind::Object(_))
            );
            if misplaced {
                return Err(ShapeMismatch {
                    shape: self.shape,
                    kind: node.kind_name(),
                    location: node.loc.clone(),
                });
            }
            stack.extend(children(node));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;
    use crate::nodes::{BinaryOp, Visibility};

    fn kinds(nodes: &[&Node]) -> Vec<&'static str> {
        nodes.iter().map(|n| n.kind_name()).collect()
    }

    #[test]
    fn binary_children_are_left_then_right() {
        let node = binary(var("a"), BinaryOp::Plus, number("1"));
        assert_eq!(kinds(&children(&node)), vec!["Var", "LiteralNumber"]);
    }

    #[test]
    fn apply_children_are_target_positional_named() {
        let node = apply(var("f"), vec![number("1")], vec![("x", string("s"))]);
        assert_eq!(
            kinds(&children(&node)),
            vec!["Var", "LiteralNumber", "LiteralString"]
        );
    }

    #[test]
    fn desugared_object_splits_names_from_bodies() {
        let node = desugared_object(vec![
            ("a", number("1")),
            ("b", desugared_object(vec![("c", number("2"))])),
        ]);
        assert_eq!(
            kinds(&direct_children(&node)),
            vec!["LiteralString", "LiteralString"]
        );
        assert_eq!(
            kinds(&special_children(&node)),
            vec!["LiteralNumber", "DesugaredObject"]
        );
        assert_eq!(children(&node).len(), 4);
    }

    #[test]
    fn raw_object_yields_locals_before_fields() {
        let node = object(vec![
            field_id("a", Visibility::Inherit, number("1")),
            object_local("x", string("s")),
        ]);
        assert_eq!(kinds(&children(&node)), vec!["LiteralString", "LiteralNumber"]);
    }

    #[test]
    fn raw_object_string_names_are_children() {
        let node = object(vec![field_str("a", Visibility::Inherit, number("1"))]);
        assert_eq!(kinds(&children(&node)), vec!["LiteralString", "LiteralNumber"]);
    }

    #[test]
    fn method_fields_yield_name_defaults_then_body() {
        let mut method = field_str("f", Visibility::Hidden, var("x"));
        let mut parameters = params(&["x", "y"]);
        parameters.parameters[1].default_arg = Some(number("2"));
        method.method = Some(parameters);
        let mut node = object(vec![method, field_id("g", Visibility::Inherit, null())]);
        assert_eq!(
            kinds(&children(&node)),
            vec!["LiteralString", "LiteralNumber", "Var", "LiteralNull"]
        );
        assert_eq!(children_mut(&mut node).len(), 4);
    }

    #[test]
    fn imports_have_no_children() {
        assert!(children(&import("lib.libsonnet")).is_empty());
    }

    #[test]
    fn children_mut_matches_children() {
        let mut node = local(
            vec![("x", number("1"))],
            desugared_object(vec![("a", var("x"))]),
        );
        let expected: Vec<Node> = children(&node).into_iter().cloned().collect();
        let actual: Vec<Node> = children_mut(&mut node).into_iter().map(|n| n.clone()).collect();
        assert_eq!(expected, actual);
    }

    #[test]
    fn validate_shape_rejects_mixed_objects() {
        let raw = Tree::raw(binary(
            object(vec![]),
            BinaryOp::Plus,
            desugared_object(vec![]),
        ));
        let err = raw.validate_shape().unwrap_err();
        assert_eq!(err.kind, "DesugaredObject");

        let lowered = Tree::lowered(desugared_object(vec![("a", number("1"))]));
        assert!(lowered.validate_shape().is_ok());
    }
}
