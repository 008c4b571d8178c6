// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Object lowering.
//!
//! Every raw [`Object`] becomes a [`DesugaredObject`]:
//!
//! | Member | Lowered to |
//! |--------|------------|
//! | `id: e` | field named by a synthesized string literal |
//! | `"s": e` / `[e1]: e` | field named by the original expression |
//! | `f(x): e` | field whose body is `function(x) e` |
//! | `a+: e` | field with `plus_super` set |
//! | `local x = e` | object local |
//! | `assert c : m` | `if c then true else error m` |
//!
//! Object comprehensions stay as they are, with lowered children.

use tracing::{debug, trace};

use super::PassError;
use crate::builders::{boolean, conditional, error, string};
use crate::nodes::{
    DesugaredField, DesugaredObject, Fodder, Function, LocalBind, LocationRange, Node, NodeKind,
    Object, ObjectField, ObjectFieldKind, Tree, TreeShape,
};
use crate::shape::children_mut;
use crate::traverse::check_depth;

/// Message of an object assertion written without one.
const DEFAULT_ASSERT_MESSAGE: &str = "Object assertion failed.";

/// Lower all objects of a raw tree.
pub fn lower_objects(tree: &Tree, max_depth: usize) -> Result<Tree, PassError> {
    if tree.shape != TreeShape::Raw {
        return Err(PassError::WrongShape {
            pass: "lowering",
            expected: TreeShape::Raw,
            found: tree.shape,
        });
    }
    check_depth(&tree.root, max_depth)?;

    let mut root = tree.root.clone();
    let mut lowered = 0;
    lower_node(&mut root, &mut lowered)?;
    debug!(objects = lowered, "lowered objects");

    Ok(Tree {
        shape: TreeShape::Lowered,
        root,
        final_fodder: tree.final_fodder.clone(),
    })
}

fn lower_node(node: &mut Node, lowered: &mut usize) -> Result<(), PassError> {
    for child in children_mut(node) {
        lower_node(child, lowered)?;
    }

    if let NodeKind::Object(object) = &mut node.kind {
        let object = std::mem::take(object);
        trace!(location = %node.loc, fields = object.fields.len(), "lowering object");
        node.kind = NodeKind::DesugaredObject(desugar(object, &node.loc)?);
        *lowered += 1;
    }
    Ok(())
}

fn desugar(object: Object, loc: &LocationRange) -> Result<DesugaredObject, PassError> {
    let mut result = DesugaredObject::default();

    for field in object.fields {
        match field.kind {
            ObjectFieldKind::Local => {
                let variable = required(field.id.clone(), "name", &field.loc)?;
                let var_fodder = field.fodder2.clone();
                let eq_fodder = field.op_fodder.clone();
                let bind_loc = field.loc.clone();
                result.locals.push(LocalBind {
                    var_fodder,
                    variable,
                    eq_fodder,
                    body: value(field)?,
                    fun: None,
                    close_fodder: Fodder::new(),
                    loc: bind_loc,
                });
            }

            ObjectFieldKind::Assert => {
                let cond = required(field.expr2, "condition", &field.loc)?;
                let message = field
                    .expr3
                    .unwrap_or_else(|| string(DEFAULT_ASSERT_MESSAGE));
                let check = conditional(cond, boolean(true), Some(error(message)))
                    .with_loc(field.loc.or(loc).clone());
                result.asserts.push(check);
            }

            ObjectFieldKind::FieldId | ObjectFieldKind::FieldStr | ObjectFieldKind::FieldExpr => {
                let name = match field.kind {
                    ObjectFieldKind::FieldId => {
                        string(&required(field.id.clone(), "name", &field.loc)?)
                    }
                    _ => {
                        let mut name = required(field.expr1.clone(), "name", &field.loc)?;
                        name.fodder.clear();
                        name
                    }
                };
                let hide = field.hide;
                let plus_super = field.super_sugar;
                let field_loc = field.loc.clone();
                result.fields.push(DesugaredField {
                    hide,
                    name,
                    body: value(field)?,
                    plus_super,
                    loc: field_loc,
                });
            }
        }
    }

    Ok(result)
}

/// The value of a member, wrapped in a function for methods.
fn value(field: ObjectField) -> Result<Node, PassError> {
    let body = required(field.expr2, "value", &field.loc)?;
    Ok(match field.method {
        Some(params) => Node::new(NodeKind::Function(Function {
            params,
            body: Box::new(body),
        }))
        .with_loc(field.loc),
        None => body,
    })
}

fn required<T>(part: Option<T>, name: &'static str, loc: &LocationRange) -> Result<T, PassError> {
    part.ok_or_else(|| PassError::MalformedMember {
        part: name,
        location: loc.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;
    use crate::codegen::{unparse_tree, UnparseOptions};
    use crate::nodes::{Params, Visibility};
    use crate::traverse::DEFAULT_MAX_DEPTH;

    fn lower(root: Node) -> Tree {
        lower_objects(&Tree::raw(root), DEFAULT_MAX_DEPTH).unwrap()
    }

    fn text(tree: &Tree) -> String {
        unparse_tree(tree, &UnparseOptions::default()).unwrap()
    }

    #[test]
    fn identifier_fields_become_string_names() {
        let tree = lower(object(vec![
            field_id("a", Visibility::Inherit, number("1")),
            field_str("b", Visibility::Hidden, number("2")),
        ]));
        assert_eq!(tree.shape, TreeShape::Lowered);
        assert!(tree.validate_shape().is_ok());
        assert_eq!(text(&tree), "{ \"a\": 1, \"b\":: 2 }\n");
    }

    #[test]
    fn methods_become_functions() {
        let mut method = field_id("f", Visibility::Inherit, var("x"));
        method.method = Some(params(&["x"]));
        let tree = lower(object(vec![method]));
        assert_eq!(text(&tree), "{ \"f\": function(x) x }\n");
    }

    #[test]
    fn locals_and_asserts_move_out_of_fields() {
        let mut plus = field_id("a", Visibility::Inherit, number("1"));
        plus.super_sugar = true;
        let tree = lower(object(vec![
            plus,
            object_local("x", number("2")),
            object_assert(var("x"), None),
        ]));
        let NodeKind::DesugaredObject(object) = &tree.root.kind else {
            panic!("expected a lowered object");
        };
        assert_eq!(object.locals.len(), 1);
        assert!(object.fields[0].plus_super);
        assert_eq!(
            text(&tree),
            concat!(
                "{ local x = 2, \"a\"+: 1, ",
                "assert if x then true else error \"Object assertion failed.\" }\n"
            )
        );
    }

    #[test]
    fn synthesized_asserts_take_the_object_location() {
        let owner = LocationRange::from_coords("a.jsonnet", (1, 1), (3, 2));
        let own = LocationRange::from_coords("a.jsonnet", (2, 3), (2, 12));
        let mut located = object_assert(var("y"), None);
        located.loc = own.clone();
        let root = object(vec![object_assert(var("x"), None), located]).with_loc(owner.clone());
        let tree = lower(root);
        let NodeKind::DesugaredObject(object) = &tree.root.kind else {
            panic!("expected a lowered object");
        };
        assert_eq!(object.asserts[0].loc, owner);
        assert_eq!(object.asserts[1].loc, own);
    }

    #[test]
    fn nested_objects_are_lowered() {
        let tree = lower(object(vec![field_id(
            "outer",
            Visibility::Inherit,
            array(vec![object(vec![field_id("inner", Visibility::Inherit, null())])]),
        )]));
        assert!(tree.validate_shape().is_ok());
        assert_eq!(text(&tree), "{ \"outer\": [{ \"inner\": null }] }\n");
    }

    #[test]
    fn computed_names_keep_their_expression() {
        let tree = lower(object(vec![field_expr(
            var("k"),
            Visibility::Inherit,
            number("1"),
        )]));
        assert_eq!(text(&tree), "{ [k]: 1 }\n");
    }

    #[test]
    fn lowered_input_is_rejected() {
        let tree = Tree::lowered(desugared_object(vec![]));
        let err = lower_objects(&tree, DEFAULT_MAX_DEPTH).unwrap_err();
        assert!(matches!(err, PassError::WrongShape { .. }));
    }

    #[test]
    fn member_without_value_is_malformed() {
        let mut broken = field_id("a", Visibility::Inherit, null());
        broken.expr2 = None;
        broken.method = Some(Params::default());
        let err = lower_objects(&Tree::raw(object(vec![broken])), DEFAULT_MAX_DEPTH).unwrap_err();
        assert!(err.to_string().contains("has no value"));
    }
}
