// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Constructors for synthesized nodes.
//!
//! Nodes built here carry no location and no fodder, so they unparse in the
//! canonical layout. Passes use them for the nodes they introduce and tests
//! use them to build trees without a parser.

use crate::nodes::*;

pub fn var(id: &str) -> Node {
    Node::new(NodeKind::Var(Var { id: id.to_string() }))
}

pub fn number(original: &str) -> Node {
    Node::new(NodeKind::LiteralNumber(LiteralNumber {
        original_string: original.to_string(),
    }))
}

/// A double-quoted string literal.
pub fn string(value: &str) -> Node {
    Node::new(NodeKind::LiteralString(LiteralString::double(value)))
}

pub fn boolean(value: bool) -> Node {
    Node::new(NodeKind::LiteralBoolean(LiteralBoolean { value }))
}

pub fn null() -> Node {
    Node::new(NodeKind::LiteralNull)
}

pub fn dollar() -> Node {
    Node::new(NodeKind::Dollar)
}

pub fn self_ref() -> Node {
    Node::new(NodeKind::SelfRef)
}

pub fn binary(left: Node, op: BinaryOp, right: Node) -> Node {
    Node::new(NodeKind::Binary(Binary {
        left: Box::new(left),
        op_fodder: Fodder::new(),
        op,
        right: Box::new(right),
    }))
}

pub fn unary(op: UnaryOp, expr: Node) -> Node {
    Node::new(NodeKind::Unary(Unary {
        op,
        expr: Box::new(expr),
    }))
}

pub fn parens(inner: Node) -> Node {
    Node::new(NodeKind::Parens(Parens {
        inner: Box::new(inner),
        close_fodder: Fodder::new(),
    }))
}

pub fn error(expr: Node) -> Node {
    Node::new(NodeKind::Error(ErrorExpr {
        expr: Box::new(expr),
    }))
}

pub fn import(path: &str) -> Node {
    Node::new(NodeKind::Import(Import {
        file: Box::new(string(path)),
    }))
}

pub fn importstr(path: &str) -> Node {
    Node::new(NodeKind::ImportStr(Import {
        file: Box::new(string(path)),
    }))
}

pub fn conditional(cond: Node, branch_true: Node, branch_false: Option<Node>) -> Node {
    Node::new(NodeKind::Conditional(Conditional {
        cond: Box::new(cond),
        then_fodder: Fodder::new(),
        branch_true: Box::new(branch_true),
        else_fodder: Fodder::new(),
        branch_false: branch_false.map(Box::new),
    }))
}

pub fn assert_expr(cond: Node, message: Option<Node>, rest: Node) -> Node {
    Node::new(NodeKind::Assert(Assert {
        cond: Box::new(cond),
        colon_fodder: Fodder::new(),
        message: message.map(Box::new),
        semicolon_fodder: Fodder::new(),
        rest: Box::new(rest),
    }))
}

pub fn apply(target: Node, positional: Vec<Node>, named: Vec<(&str, Node)>) -> Node {
    Node::new(NodeKind::Apply(Apply {
        target: Box::new(target),
        fodder_left: Fodder::new(),
        arguments: Arguments {
            positional: positional
                .into_iter()
                .map(|expr| CommaSeparatedExpr {
                    expr,
                    comma_fodder: Fodder::new(),
                })
                .collect(),
            named: named
                .into_iter()
                .map(|(name, arg)| NamedArgument {
                    name_fodder: Fodder::new(),
                    name: name.to_string(),
                    eq_fodder: Fodder::new(),
                    arg,
                    comma_fodder: Fodder::new(),
                })
                .collect(),
        },
        trailing_comma: false,
        fodder_right: Fodder::new(),
        tail_strict_fodder: Fodder::new(),
        tail_strict: false,
    }))
}

pub fn array(elements: Vec<Node>) -> Node {
    Node::new(NodeKind::Array(Array {
        elements: elements
            .into_iter()
            .map(|expr| CommaSeparatedExpr {
                expr,
                comma_fodder: Fodder::new(),
            })
            .collect(),
        trailing_comma: false,
        close_fodder: Fodder::new(),
    }))
}

/// `target[index]`
pub fn index(target: Node, index: Node) -> Node {
    Node::new(NodeKind::Index(Index {
        target: Box::new(target),
        left_bracket_fodder: Fodder::new(),
        index: Some(Box::new(index)),
        right_bracket_fodder: Fodder::new(),
        id: None,
    }))
}

/// `target.id`
pub fn index_id(target: Node, id: &str) -> Node {
    Node::new(NodeKind::Index(Index {
        target: Box::new(target),
        left_bracket_fodder: Fodder::new(),
        index: None,
        right_bracket_fodder: Fodder::new(),
        id: Some(id.to_string()),
    }))
}

/// A parameter list without defaults.
pub fn params(names: &[&str]) -> Params {
    Params {
        paren_left_fodder: Fodder::new(),
        parameters: names
            .iter()
            .map(|name| Parameter {
                name_fodder: Fodder::new(),
                name: name.to_string(),
                eq_fodder: Fodder::new(),
                default_arg: None,
                comma_fodder: Fodder::new(),
                loc: LocationRange::default(),
            })
            .collect(),
        trailing_comma: false,
        paren_right_fodder: Fodder::new(),
    }
}

pub fn function(parameters: &[&str], body: Node) -> Node {
    Node::new(NodeKind::Function(Function {
        params: params(parameters),
        body: Box::new(body),
    }))
}

pub fn local_bind(name: &str, body: Node) -> LocalBind {
    LocalBind {
        var_fodder: Fodder::new(),
        variable: name.to_string(),
        eq_fodder: Fodder::new(),
        body,
        fun: None,
        close_fodder: Fodder::new(),
        loc: LocationRange::default(),
    }
}

pub fn local(binds: Vec<(&str, Node)>, body: Node) -> Node {
    Node::new(NodeKind::Local(Local {
        binds: binds
            .into_iter()
            .map(|(name, body)| local_bind(name, body))
            .collect(),
        body: Box::new(body),
    }))
}

/// `for var in expr if cond...` with no outer clause.
pub fn for_spec(var_name: &str, expr: Node, conditions: Vec<Node>) -> ForSpec {
    ForSpec {
        for_fodder: Fodder::new(),
        var_fodder: Fodder::new(),
        var_name: var_name.to_string(),
        in_fodder: Fodder::new(),
        expr: Box::new(expr),
        conditions: conditions
            .into_iter()
            .map(|expr| IfSpec {
                if_fodder: Fodder::new(),
                expr,
            })
            .collect(),
        outer: None,
    }
}

// ============================================================================
// Raw objects
// ============================================================================

fn member(kind: ObjectFieldKind, hide: Visibility) -> ObjectField {
    ObjectField {
        kind,
        hide,
        super_sugar: false,
        method: None,
        fodder1: Fodder::new(),
        expr1: None,
        id: None,
        fodder2: Fodder::new(),
        op_fodder: Fodder::new(),
        expr2: None,
        expr3: None,
        comma_fodder: Fodder::new(),
        loc: LocationRange::default(),
    }
}

pub fn object(fields: Vec<ObjectField>) -> Node {
    Node::new(NodeKind::Object(Object {
        fields,
        trailing_comma: false,
        close_fodder: Fodder::new(),
    }))
}

/// `name: body`
pub fn field_id(name: &str, hide: Visibility, body: Node) -> ObjectField {
    ObjectField {
        id: Some(name.to_string()),
        expr2: Some(body),
        ..member(ObjectFieldKind::FieldId, hide)
    }
}

/// `"name": body`
pub fn field_str(name: &str, hide: Visibility, body: Node) -> ObjectField {
    ObjectField {
        expr1: Some(string(name)),
        expr2: Some(body),
        ..member(ObjectFieldKind::FieldStr, hide)
    }
}

/// `[name]: body`
pub fn field_expr(name: Node, hide: Visibility, body: Node) -> ObjectField {
    ObjectField {
        expr1: Some(name),
        expr2: Some(body),
        ..member(ObjectFieldKind::FieldExpr, hide)
    }
}

/// `local name = body` inside an object.
pub fn object_local(name: &str, body: Node) -> ObjectField {
    ObjectField {
        id: Some(name.to_string()),
        expr2: Some(body),
        ..member(ObjectFieldKind::Local, Visibility::Inherit)
    }
}

/// `assert cond [: message]` inside an object.
pub fn object_assert(cond: Node, message: Option<Node>) -> ObjectField {
    ObjectField {
        expr2: Some(cond),
        expr3: message,
        ..member(ObjectFieldKind::Assert, Visibility::Inherit)
    }
}

// ============================================================================
// Lowered objects
// ============================================================================

pub fn desugared_field(name: Node, body: Node) -> DesugaredField {
    DesugaredField {
        hide: Visibility::Inherit,
        name,
        body,
        plus_super: false,
        loc: LocationRange::default(),
    }
}

/// A lowered object with literal field names and default visibility.
pub fn desugared_object(fields: Vec<(&str, Node)>) -> Node {
    Node::new(NodeKind::DesugaredObject(DesugaredObject {
        asserts: Vec::new(),
        fields: fields
            .into_iter()
            .map(|(name, body)| desugared_field(string(name), body))
            .collect(),
        locals: Vec::new(),
    }))
}
