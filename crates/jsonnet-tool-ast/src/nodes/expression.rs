// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Syntax tree nodes.
//!
//! A [`Node`] pairs a location and its open fodder with a [`NodeKind`], the
//! closed set of expression kinds. Kind payloads are plain structs so that
//! passes can destructure them exhaustively.
//!
//! Two tree shapes share these types:
//!
//! - **Raw** trees come straight from the parser and use [`Object`] for
//!   object literals, with all formatting metadata in place.
//! - **Lowered** trees have had objects normalized into [`DesugaredObject`],
//!   whose field names are always expressions (usually string literals).

use serde::{Deserialize, Serialize};

use super::fodder::Fodder;
use super::ops::{BinaryOp, ObjectFieldKind, StringKind, UnaryOp, Visibility};
use jsonnet_tool_core::types::LocationRange;

/// An identifier as written in source.
pub type Identifier = String;

// ============================================================================
// Node
// ============================================================================

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Source range; unset for synthesized nodes.
    #[serde(default)]
    pub loc: LocationRange,
    /// Fodder preceding the first token of this node.
    ///
    /// Left-recursive kinds (binary, apply, index, ...) keep this empty: the
    /// fodder before their first token belongs to their leftmost operand.
    #[serde(default)]
    pub fodder: Fodder,
    pub kind: NodeKind,
}

impl Node {
    /// A synthesized node with no location and no fodder.
    pub fn new(kind: NodeKind) -> Self {
        Node {
            loc: LocationRange::default(),
            fodder: Fodder::new(),
            kind,
        }
    }

    /// Attach a source location.
    pub fn with_loc(mut self, loc: LocationRange) -> Self {
        self.loc = loc;
        self
    }

    /// Attach open fodder.
    pub fn with_fodder(mut self, fodder: Fodder) -> Self {
        self.fodder = fodder;
        self
    }

    /// The kind tag, e.g. `"Binary"`.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Whether this is a string literal (the only kind usable as a symbol key).
    pub fn as_literal_string(&self) -> Option<&LiteralString> {
        match &self.kind {
            NodeKind::LiteralString(s) => Some(s),
            _ => None,
        }
    }

    /// The leftmost operand of a left-recursive node.
    ///
    /// For these kinds the open fodder is emitted by the operand, so the
    /// unparser must not emit it again for the parent.
    pub fn left_recursive(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::Apply(n) => Some(&n.target),
            NodeKind::ApplyBrace(n) => Some(&n.left),
            NodeKind::Binary(n) => Some(&n.left),
            NodeKind::Index(n) => Some(&n.target),
            NodeKind::InSuper(n) => Some(&n.index),
            NodeKind::Slice(n) => Some(&n.target),
            _ => None,
        }
    }
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Apply(Apply),
    ApplyBrace(ApplyBrace),
    Array(Array),
    ArrayComp(ArrayComp),
    Assert(Assert),
    Binary(Binary),
    Conditional(Conditional),
    Dollar,
    Error(ErrorExpr),
    Function(Function),
    Import(Import),
    ImportStr(Import),
    Index(Index),
    Slice(Slice),
    InSuper(InSuper),
    Local(Local),
    LiteralBoolean(LiteralBoolean),
    LiteralNull,
    LiteralNumber(LiteralNumber),
    LiteralString(LiteralString),
    Object(Object),
    DesugaredObject(DesugaredObject),
    ObjectComp(ObjectComp),
    Parens(Parens),
    SelfRef,
    SuperIndex(SuperIndex),
    Unary(Unary),
    Var(Var),
}

impl NodeKind {
    /// The kind tag used in graph labels and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Apply(_) => "Apply",
            NodeKind::ApplyBrace(_) => "ApplyBrace",
            NodeKind::Array(_) => "Array",
            NodeKind::ArrayComp(_) => "ArrayComp",
            NodeKind::Assert(_) => "Assert",
            NodeKind::Binary(_) => "Binary",
            NodeKind::Conditional(_) => "Conditional",
            NodeKind::Dollar => "Dollar",
            NodeKind::Error(_) => "Error",
            NodeKind::Function(_) => "Function",
            NodeKind::Import(_) => "Import",
            NodeKind::ImportStr(_) => "ImportStr",
            NodeKind::Index(_) => "Index",
            NodeKind::Slice(_) => "Slice",
            NodeKind::InSuper(_) => "InSuper",
            NodeKind::Local(_) => "Local",
            NodeKind::LiteralBoolean(_) => "LiteralBoolean",
            NodeKind::LiteralNull => "LiteralNull",
            NodeKind::LiteralNumber(_) => "LiteralNumber",
            NodeKind::LiteralString(_) => "LiteralString",
            NodeKind::Object(_) => "Object",
            NodeKind::DesugaredObject(_) => "DesugaredObject",
            NodeKind::ObjectComp(_) => "ObjectComp",
            NodeKind::Parens(_) => "Parens",
            NodeKind::SelfRef => "Self",
            NodeKind::SuperIndex(_) => "SuperIndex",
            NodeKind::Unary(_) => "Unary",
            NodeKind::Var(_) => "Var",
        }
    }
}

// ============================================================================
// Shared records
// ============================================================================

/// An expression followed by an optional comma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommaSeparatedExpr {
    pub expr: Node,
    #[serde(default)]
    pub comma_fodder: Fodder,
}

/// A `name=value` argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArgument {
    #[serde(default)]
    pub name_fodder: Fodder,
    pub name: Identifier,
    #[serde(default)]
    pub eq_fodder: Fodder,
    pub arg: Node,
    #[serde(default)]
    pub comma_fodder: Fodder,
}

/// Arguments of a function application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub positional: Vec<CommaSeparatedExpr>,
    #[serde(default)]
    pub named: Vec<NamedArgument>,
}

/// A function parameter, optionally with a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name_fodder: Fodder,
    pub name: Identifier,
    #[serde(default)]
    pub eq_fodder: Fodder,
    pub default_arg: Option<Node>,
    #[serde(default)]
    pub comma_fodder: Fodder,
    #[serde(default)]
    pub loc: LocationRange,
}

/// A parenthesized parameter list, shared by functions, methods and
/// function-valued local bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    #[serde(default)]
    pub paren_left_fodder: Fodder,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub trailing_comma: bool,
    #[serde(default)]
    pub paren_right_fodder: Fodder,
}

/// One `name = body` binding of a `local`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalBind {
    #[serde(default)]
    pub var_fodder: Fodder,
    pub variable: Identifier,
    #[serde(default)]
    pub eq_fodder: Fodder,
    pub body: Node,
    /// Present for `local f(x) = ...` bindings.
    pub fun: Option<Params>,
    /// Fodder before the following `,` or `;`.
    #[serde(default)]
    pub close_fodder: Fodder,
    #[serde(default)]
    pub loc: LocationRange,
}

/// An `if` clause of a comprehension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfSpec {
    #[serde(default)]
    pub if_fodder: Fodder,
    pub expr: Node,
}

/// A `for x in expr` clause of a comprehension with its trailing `if`s.
///
/// Specs chain innermost-last: `outer` holds the clause written before this
/// one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForSpec {
    #[serde(default)]
    pub for_fodder: Fodder,
    #[serde(default)]
    pub var_fodder: Fodder,
    pub var_name: Identifier,
    #[serde(default)]
    pub in_fodder: Fodder,
    pub expr: Box<Node>,
    #[serde(default)]
    pub conditions: Vec<IfSpec>,
    pub outer: Option<Box<ForSpec>>,
}

impl ForSpec {
    /// The clauses in source order, outermost first.
    pub fn in_source_order(&self) -> Vec<&ForSpec> {
        let mut specs = Vec::new();
        let mut current = Some(self);
        while let Some(spec) = current {
            specs.push(spec);
            current = spec.outer.as_deref();
        }
        specs.reverse();
        specs
    }
}

// ============================================================================
// Kind payloads
// ============================================================================

/// `target(args)`, optionally `tailstrict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apply {
    pub target: Box<Node>,
    #[serde(default)]
    pub fodder_left: Fodder,
    #[serde(default)]
    pub arguments: Arguments,
    #[serde(default)]
    pub trailing_comma: bool,
    #[serde(default)]
    pub fodder_right: Fodder,
    #[serde(default)]
    pub tail_strict_fodder: Fodder,
    #[serde(default)]
    pub tail_strict: bool,
}

/// `left { ... }` object-extension sugar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyBrace {
    pub left: Box<Node>,
    pub right: Box<Node>,
}

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Array {
    #[serde(default)]
    pub elements: Vec<CommaSeparatedExpr>,
    #[serde(default)]
    pub trailing_comma: bool,
    #[serde(default)]
    pub close_fodder: Fodder,
}

/// `[body for x in expr if cond]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayComp {
    pub body: Box<Node>,
    #[serde(default)]
    pub trailing_comma_fodder: Fodder,
    #[serde(default)]
    pub trailing_comma: bool,
    pub spec: ForSpec,
    #[serde(default)]
    pub close_fodder: Fodder,
}

/// `assert cond : message; rest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assert {
    pub cond: Box<Node>,
    #[serde(default)]
    pub colon_fodder: Fodder,
    pub message: Option<Box<Node>>,
    #[serde(default)]
    pub semicolon_fodder: Fodder,
    pub rest: Box<Node>,
}

/// `left op right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub left: Box<Node>,
    #[serde(default)]
    pub op_fodder: Fodder,
    pub op: BinaryOp,
    pub right: Box<Node>,
}

/// `if cond then a else b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    pub cond: Box<Node>,
    #[serde(default)]
    pub then_fodder: Fodder,
    pub branch_true: Box<Node>,
    #[serde(default)]
    pub else_fodder: Fodder,
    pub branch_false: Option<Box<Node>>,
}

/// `error expr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorExpr {
    pub expr: Box<Node>,
}

/// `function(params) body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub params: Params,
    pub body: Box<Node>,
}

/// `import "file"` and `importstr "file"`.
///
/// The file literal is payload, not a traversed child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    pub file: Box<Node>,
}

impl Import {
    /// The imported path, if the file node is a string literal.
    pub fn path(&self) -> Option<&str> {
        self.file.as_literal_string().map(|s| s.value.as_str())
    }
}

/// `target[index]` or `target.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub target: Box<Node>,
    /// Fodder before `[` (or before `.` for the dotted form).
    #[serde(default)]
    pub left_bracket_fodder: Fodder,
    pub index: Option<Box<Node>>,
    /// Fodder before `]` (or before the identifier for the dotted form).
    #[serde(default)]
    pub right_bracket_fodder: Fodder,
    pub id: Option<Identifier>,
}

/// `target[begin:end:step]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub target: Box<Node>,
    #[serde(default)]
    pub left_bracket_fodder: Fodder,
    pub begin_index: Option<Box<Node>>,
    #[serde(default)]
    pub end_colon_fodder: Fodder,
    pub end_index: Option<Box<Node>>,
    #[serde(default)]
    pub step_colon_fodder: Fodder,
    pub step: Option<Box<Node>>,
    #[serde(default)]
    pub right_bracket_fodder: Fodder,
}

/// `index in super`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InSuper {
    pub index: Box<Node>,
    #[serde(default)]
    pub in_fodder: Fodder,
    #[serde(default)]
    pub super_fodder: Fodder,
}

/// `local a = 1, b = 2; body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Local {
    pub binds: Vec<LocalBind>,
    pub body: Box<Node>,
}

/// `true` / `false`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralBoolean {
    pub value: bool,
}

/// A number, kept as its original source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralNumber {
    pub original_string: String,
}

/// A string literal in any quoting style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralString {
    pub value: String,
    pub kind: StringKind,
    /// Indentation of the first line of a `|||` block.
    #[serde(default)]
    pub block_indent: String,
    /// Indentation of the closing `|||`.
    #[serde(default)]
    pub block_term_indent: String,
}

impl LiteralString {
    /// A double-quoted literal.
    pub fn double(value: impl Into<String>) -> Self {
        LiteralString {
            value: value.into(),
            kind: StringKind::Double,
            block_indent: String::new(),
            block_term_indent: String::new(),
        }
    }
}

/// A member of a raw object literal.
///
/// Which of the optional parts are meaningful depends on `kind`, mirroring
/// the member grammar: `expr1` is the name expression of `FieldExpr` and
/// `FieldStr` members, `expr2` is the value (or the assert condition) and
/// `expr3` the assert message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectField {
    pub kind: ObjectFieldKind,
    pub hide: Visibility,
    /// `+:` merge sugar.
    #[serde(default)]
    pub super_sugar: bool,
    /// Parameters of a method field or function-valued object local.
    pub method: Option<Params>,
    #[serde(default)]
    pub fodder1: Fodder,
    pub expr1: Option<Node>,
    pub id: Option<Identifier>,
    #[serde(default)]
    pub fodder2: Fodder,
    #[serde(default)]
    pub op_fodder: Fodder,
    pub expr2: Option<Node>,
    pub expr3: Option<Node>,
    #[serde(default)]
    pub comma_fodder: Fodder,
    #[serde(default)]
    pub loc: LocationRange,
}

/// `{ ... }` as written in source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object {
    #[serde(default)]
    pub fields: Vec<ObjectField>,
    #[serde(default)]
    pub trailing_comma: bool,
    #[serde(default)]
    pub close_fodder: Fodder,
}

/// A field of a lowered object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesugaredField {
    pub hide: Visibility,
    /// Field name; a string literal unless the name was computed.
    pub name: Node,
    pub body: Node,
    #[serde(default)]
    pub plus_super: bool,
    #[serde(default)]
    pub loc: LocationRange,
}

/// An object after lowering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesugaredObject {
    #[serde(default)]
    pub asserts: Vec<Node>,
    #[serde(default)]
    pub fields: Vec<DesugaredField>,
    #[serde(default)]
    pub locals: Vec<LocalBind>,
}

/// `{ [k]: v for x in expr }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectComp {
    #[serde(default)]
    pub fields: Vec<ObjectField>,
    #[serde(default)]
    pub trailing_comma: bool,
    pub spec: ForSpec,
    #[serde(default)]
    pub close_fodder: Fodder,
}

/// `(inner)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parens {
    pub inner: Box<Node>,
    #[serde(default)]
    pub close_fodder: Fodder,
}

/// `super[index]` or `super.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperIndex {
    #[serde(default)]
    pub dot_fodder: Fodder,
    pub index: Option<Box<Node>>,
    #[serde(default)]
    pub id_fodder: Fodder,
    pub id: Option<Identifier>,
}

/// `op expr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unary {
    pub op: UnaryOp,
    pub expr: Box<Node>,
}

/// A variable reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Var {
    pub id: Identifier,
}

// ============================================================================
// Tree
// ============================================================================

/// Which of the two tree shapes a tree is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeShape {
    /// As produced by the parser.
    Raw,
    /// After object lowering.
    Lowered,
}

impl std::fmt::Display for TreeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeShape::Raw => f.write_str("raw"),
            TreeShape::Lowered => f.write_str("lowered"),
        }
    }
}

/// One parse result: a root expression plus the fodder after its last token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub shape: TreeShape,
    pub root: Node,
    #[serde(default)]
    pub final_fodder: Fodder,
}

impl Tree {
    /// A raw tree with no trailing fodder.
    pub fn raw(root: Node) -> Self {
        Tree {
            shape: TreeShape::Raw,
            root,
            final_fodder: Fodder::new(),
        }
    }

    /// A lowered tree.
    pub fn lowered(root: Node) -> Self {
        Tree {
            shape: TreeShape::Lowered,
            root,
            final_fodder: Fodder::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(id: &str) -> Node {
        Node::new(NodeKind::Var(Var { id: id.to_string() }))
    }

    #[test]
    fn left_recursive_kinds_expose_their_left_operand() {
        let binary = Node::new(NodeKind::Binary(Binary {
            left: Box::new(var("a")),
            op_fodder: Fodder::new(),
            op: BinaryOp::Plus,
            right: Box::new(var("b")),
        }));
        assert_eq!(binary.left_recursive(), Some(&var("a")));
        assert_eq!(var("a").left_recursive(), None);
    }

    #[test]
    fn for_specs_in_source_order() {
        let inner = ForSpec {
            for_fodder: Fodder::new(),
            var_fodder: Fodder::new(),
            var_name: "y".to_string(),
            in_fodder: Fodder::new(),
            expr: Box::new(var("ys")),
            conditions: vec![],
            outer: Some(Box::new(ForSpec {
                for_fodder: Fodder::new(),
                var_fodder: Fodder::new(),
                var_name: "x".to_string(),
                in_fodder: Fodder::new(),
                expr: Box::new(var("xs")),
                conditions: vec![],
                outer: None,
            })),
        };
        let names: Vec<_> = inner
            .in_source_order()
            .iter()
            .map(|s| s.var_name.as_str())
            .collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn node_json_shape() {
        let json = serde_json::to_value(var("x")).unwrap();
        assert_eq!(json["kind"]["var"]["id"], "x");

        let node: Node = serde_json::from_str(r#"{"kind":"dollar"}"#).unwrap();
        assert_eq!(node.kind, NodeKind::Dollar);
        assert!(!node.loc.is_set());
    }
}
