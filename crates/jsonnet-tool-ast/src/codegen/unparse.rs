// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::CodegenState;
use crate::nodes::{
    DesugaredObject, Fodder, ForSpec, LiteralString, Node, NodeKind, ObjectField, ObjectFieldKind,
    Params, StringKind,
};

impl CodegenState {
    /// Emit `node` and everything below it.
    ///
    /// `crowded` says whether the previous token would run into this node's
    /// first token. Left-recursive kinds leave their open fodder to their
    /// leftmost operand.
    ///
    /// # Panics
    ///
    /// Panics on a `local` with no bindings, which no parser produces.
    pub fn unparse(&mut self, node: &Node, crowded: bool) {
        if node.left_recursive().is_none() {
            self.fill(&node.fodder, crowded, true);
        }

        match &node.kind {
            NodeKind::Apply(n) => {
                self.unparse(&n.target, crowded);
                self.fill(&n.fodder_left, false, false);
                self.add_token("(");
                let mut first = true;
                for arg in &n.arguments.positional {
                    if !first {
                        self.add_token(",");
                    }
                    self.unparse(&arg.expr, !first);
                    self.fill(&arg.comma_fodder, false, false);
                    first = false;
                }
                for arg in &n.arguments.named {
                    if !first {
                        self.add_token(",");
                    }
                    self.fill(&arg.name_fodder, !first, true);
                    self.add_token(&arg.name);
                    self.fill(&arg.eq_fodder, false, false);
                    self.add_token("=");
                    self.unparse(&arg.arg, false);
                    self.fill(&arg.comma_fodder, false, false);
                    first = false;
                }
                if n.trailing_comma {
                    self.add_token(",");
                }
                self.fill(&n.fodder_right, false, false);
                self.add_token(")");
                if n.tail_strict {
                    self.fill(&n.tail_strict_fodder, true, true);
                    self.add_token("tailstrict");
                }
            }

            NodeKind::ApplyBrace(n) => {
                self.unparse(&n.left, crowded);
                self.unparse(&n.right, true);
            }

            NodeKind::Array(n) => {
                self.add_token("[");
                let mut first = true;
                for element in &n.elements {
                    if !first {
                        self.add_token(",");
                    }
                    self.unparse(&element.expr, !first || self.options.pad_arrays);
                    self.fill(&element.comma_fodder, false, false);
                    first = false;
                }
                if n.trailing_comma {
                    self.add_token(",");
                }
                self.fill(
                    &n.close_fodder,
                    !n.elements.is_empty(),
                    self.options.pad_arrays,
                );
                self.add_token("]");
            }

            NodeKind::ArrayComp(n) => {
                self.add_token("[");
                self.unparse(&n.body, self.options.pad_arrays);
                self.fill(&n.trailing_comma_fodder, false, false);
                if n.trailing_comma {
                    self.add_token(",");
                }
                self.unparse_spec(&n.spec);
                self.fill(&n.close_fodder, true, self.options.pad_arrays);
                self.add_token("]");
            }

            NodeKind::Assert(n) => {
                self.add_token("assert");
                self.unparse(&n.cond, true);
                if let Some(message) = &n.message {
                    self.fill(&n.colon_fodder, true, true);
                    self.add_token(":");
                    self.unparse(message, true);
                }
                self.fill(&n.semicolon_fodder, false, false);
                self.add_token(";");
                self.unparse(&n.rest, true);
            }

            NodeKind::Binary(n) => {
                self.unparse(&n.left, crowded);
                self.fill(&n.op_fodder, true, true);
                self.add_token(n.op.as_str());
                self.unparse(&n.right, true);
            }

            NodeKind::Conditional(n) => {
                self.add_token("if");
                self.unparse(&n.cond, true);
                self.fill(&n.then_fodder, true, true);
                self.add_token("then");
                self.unparse(&n.branch_true, true);
                if let Some(branch_false) = &n.branch_false {
                    self.fill(&n.else_fodder, true, true);
                    self.add_token("else");
                    self.unparse(branch_false, true);
                }
            }

            NodeKind::Dollar => self.add_token("$"),

            NodeKind::Error(n) => {
                self.add_token("error");
                self.unparse(&n.expr, true);
            }

            NodeKind::Function(n) => {
                self.add_token("function");
                self.unparse_params(&n.params);
                self.unparse(&n.body, true);
            }

            NodeKind::Import(n) => {
                self.add_token("import");
                self.unparse(&n.file, true);
            }

            NodeKind::ImportStr(n) => {
                self.add_token("importstr");
                self.unparse(&n.file, true);
            }

            NodeKind::Index(n) => {
                self.unparse(&n.target, crowded);
                self.fill(&n.left_bracket_fodder, false, false);
                if let Some(id) = &n.id {
                    self.add_token(".");
                    self.fill(&n.right_bracket_fodder, false, false);
                    self.add_token(id);
                } else {
                    self.add_token("[");
                    if let Some(index) = &n.index {
                        self.unparse(index, false);
                    }
                    self.fill(&n.right_bracket_fodder, false, false);
                    self.add_token("]");
                }
            }

            NodeKind::Slice(n) => {
                self.unparse(&n.target, crowded);
                self.fill(&n.left_bracket_fodder, false, false);
                self.add_token("[");
                if let Some(begin) = &n.begin_index {
                    self.unparse(begin, false);
                }
                self.fill(&n.end_colon_fodder, false, false);
                self.add_token(":");
                if let Some(end) = &n.end_index {
                    self.unparse(end, false);
                }
                if n.step.is_some() || !n.step_colon_fodder.is_empty() {
                    self.fill(&n.step_colon_fodder, false, false);
                    self.add_token(":");
                    if let Some(step) = &n.step {
                        self.unparse(step, false);
                    }
                }
                self.fill(&n.right_bracket_fodder, false, false);
                self.add_token("]");
            }

            NodeKind::InSuper(n) => {
                self.unparse(&n.index, true);
                self.fill(&n.in_fodder, true, true);
                self.add_token("in");
                self.fill(&n.super_fodder, true, true);
                self.add_token("super");
            }

            NodeKind::Local(n) => {
                self.add_token("local");
                assert!(
                    !n.binds.is_empty(),
                    "INTERNAL ERROR: local with no binds"
                );
                let mut first = true;
                for bind in &n.binds {
                    if !first {
                        self.add_token(",");
                    }
                    first = false;
                    self.fill(&bind.var_fodder, true, true);
                    self.add_token(&bind.variable);
                    if let Some(params) = &bind.fun {
                        self.unparse_params(params);
                    }
                    self.fill(&bind.eq_fodder, true, true);
                    self.add_token("=");
                    self.unparse(&bind.body, true);
                    self.fill(&bind.close_fodder, false, false);
                }
                self.add_token(";");
                self.unparse(&n.body, true);
            }

            NodeKind::LiteralBoolean(n) => {
                self.add_token(if n.value { "true" } else { "false" });
            }

            NodeKind::LiteralNull => self.add_token("null"),

            NodeKind::LiteralNumber(n) => self.add_token(&n.original_string),

            NodeKind::LiteralString(n) => self.unparse_string(n),

            NodeKind::Object(n) => {
                self.add_token("{");
                self.unparse_fields(&n.fields, self.options.pad_objects);
                if n.trailing_comma {
                    self.add_token(",");
                }
                self.fill(
                    &n.close_fodder,
                    !n.fields.is_empty(),
                    self.options.pad_objects,
                );
                self.add_token("}");
            }

            NodeKind::DesugaredObject(n) => self.unparse_desugared(n),

            NodeKind::ObjectComp(n) => {
                self.add_token("{");
                self.unparse_fields(&n.fields, self.options.pad_objects);
                if n.trailing_comma {
                    self.add_token(",");
                }
                self.unparse_spec(&n.spec);
                self.fill(&n.close_fodder, true, self.options.pad_objects);
                self.add_token("}");
            }

            NodeKind::Parens(n) => {
                self.add_token("(");
                self.unparse(&n.inner, false);
                self.fill(&n.close_fodder, false, false);
                self.add_token(")");
            }

            NodeKind::SelfRef => self.add_token("self"),

            NodeKind::SuperIndex(n) => {
                self.add_token("super");
                self.fill(&n.dot_fodder, false, false);
                if let Some(id) = &n.id {
                    self.add_token(".");
                    self.fill(&n.id_fodder, false, false);
                    self.add_token(id);
                } else {
                    self.add_token("[");
                    if let Some(index) = &n.index {
                        self.unparse(index, false);
                    }
                    self.fill(&n.id_fodder, false, false);
                    self.add_token("]");
                }
            }

            NodeKind::Unary(n) => {
                self.add_token(n.op.as_str());
                self.unparse(&n.expr, false);
            }

            NodeKind::Var(n) => self.add_token(&n.id),
        }
    }

    fn unparse_spec(&mut self, spec: &ForSpec) {
        if let Some(outer) = &spec.outer {
            self.unparse_spec(outer);
        }
        self.fill(&spec.for_fodder, true, true);
        self.add_token("for");
        self.fill(&spec.var_fodder, true, true);
        self.add_token(&spec.var_name);
        self.fill(&spec.in_fodder, true, true);
        self.add_token("in");
        self.unparse(&spec.expr, true);
        for cond in &spec.conditions {
            self.fill(&cond.if_fodder, true, true);
            self.add_token("if");
            self.unparse(&cond.expr, true);
        }
    }

    fn unparse_params(&mut self, params: &Params) {
        self.fill(&params.paren_left_fodder, false, false);
        self.add_token("(");
        let mut first = true;
        for param in &params.parameters {
            if !first {
                self.add_token(",");
            }
            self.fill(&param.name_fodder, !first, true);
            self.add_token(&param.name);
            if let Some(default) = &param.default_arg {
                self.fill(&param.eq_fodder, false, false);
                self.add_token("=");
                self.unparse(default, false);
            }
            self.fill(&param.comma_fodder, false, false);
            first = false;
        }
        if params.trailing_comma {
            self.add_token(",");
        }
        self.fill(&params.paren_right_fodder, false, false);
        self.add_token(")");
    }

    fn unparse_fields(&mut self, fields: &[ObjectField], crowded: bool) {
        let mut first = true;
        for field in fields {
            if !first {
                self.add_token(",");
            }
            let crowded = !first || crowded;

            match field.kind {
                ObjectFieldKind::Local => {
                    self.fill(&field.fodder1, crowded, true);
                    self.add_token("local");
                    self.fill(&field.fodder2, true, true);
                    self.add_id(field.id.as_deref());
                    self.unparse_method(field);
                    self.fill(&field.op_fodder, true, true);
                    self.add_token("=");
                    self.unparse_opt(field.expr2.as_ref(), true);
                }
                ObjectFieldKind::FieldId => {
                    self.fill(&field.fodder1, crowded, true);
                    self.add_id(field.id.as_deref());
                    self.unparse_field_remainder(field);
                }
                ObjectFieldKind::FieldStr => {
                    self.unparse_opt(field.expr1.as_ref(), crowded);
                    self.unparse_field_remainder(field);
                }
                ObjectFieldKind::FieldExpr => {
                    self.fill(&field.fodder1, crowded, true);
                    self.add_token("[");
                    self.unparse_opt(field.expr1.as_ref(), false);
                    self.fill(&field.fodder2, false, false);
                    self.add_token("]");
                    self.unparse_field_remainder(field);
                }
                ObjectFieldKind::Assert => {
                    self.fill(&field.fodder1, crowded, true);
                    self.add_token("assert");
                    self.unparse_opt(field.expr2.as_ref(), true);
                    if let Some(message) = &field.expr3 {
                        self.fill(&field.op_fodder, true, true);
                        self.add_token(":");
                        self.unparse(message, true);
                    }
                }
            }

            first = false;
            self.fill(&field.comma_fodder, false, false);
        }
    }

    /// Parameters, `+`, visibility and value of a named field.
    fn unparse_field_remainder(&mut self, field: &ObjectField) {
        self.unparse_method(field);
        self.fill(&field.op_fodder, false, false);
        if field.super_sugar {
            self.add_token("+");
        }
        self.add_token(field.hide.as_str());
        self.unparse_opt(field.expr2.as_ref(), true);
    }

    fn unparse_method(&mut self, field: &ObjectField) {
        if let Some(params) = &field.method {
            self.unparse_params(params);
        }
    }

    /// Lowered objects carry no fodder of their own, so they are laid out
    /// canonically: locals, then fields, then asserts.
    fn unparse_desugared(&mut self, object: &DesugaredObject) {
        let pad = self.options.pad_objects;
        self.add_token("{");
        let mut first = true;
        for bind in &object.locals {
            self.separator(first, pad);
            self.add_token("local ");
            self.add_token(&bind.variable);
            if let Some(params) = &bind.fun {
                self.unparse_params(params);
            }
            self.add_token(" =");
            self.unparse(&bind.body, true);
            first = false;
        }
        for field in &object.fields {
            let crowded = !first || pad;
            if !first {
                self.add_token(",");
            }
            match &field.name.kind {
                NodeKind::LiteralString(_) => self.unparse(&field.name, crowded),
                _ => {
                    self.fill(&Fodder::new(), crowded, true);
                    self.add_token("[");
                    self.unparse(&field.name, false);
                    self.add_token("]");
                }
            }
            if field.plus_super {
                self.add_token("+");
            }
            self.add_token(field.hide.as_str());
            self.unparse(&field.body, true);
            first = false;
        }
        for assertion in &object.asserts {
            self.separator(first, pad);
            self.add_token("assert");
            self.unparse(assertion, true);
            first = false;
        }
        let non_empty = !object.locals.is_empty()
            || !object.fields.is_empty()
            || !object.asserts.is_empty();
        self.fill(&Fodder::new(), non_empty, pad);
        self.add_token("}");
    }

    fn separator(&mut self, first: bool, pad: bool) {
        if !first {
            self.add_token(",");
        }
        self.fill(&Fodder::new(), !first || pad, true);
    }

    fn unparse_string(&mut self, literal: &LiteralString) {
        let value = literal.value.as_str();
        match literal.kind {
            // Single and double quoted values still hold their escapes.
            StringKind::Double => {
                self.add_token("\"");
                self.add_token(value);
                self.add_token("\"");
            }
            StringKind::Single => {
                self.add_token("'");
                self.add_token(value);
                self.add_token("'");
            }
            StringKind::Block => {
                self.add_token("|||\n");
                if !value.starts_with('\n') {
                    self.add_token(&literal.block_indent);
                }
                let bytes = value.as_bytes();
                for (i, c) in value.char_indices() {
                    // Always unix line endings.
                    if c == '\r' {
                        continue;
                    }
                    self.tokens.push(c);
                    if c == '\n' && i + 1 < bytes.len() && bytes[i + 1] != b'\n' {
                        self.add_token(&literal.block_indent);
                    }
                }
                self.add_token(&literal.block_term_indent);
                self.add_token("|||");
            }
            // Verbatim values were unescaped by the parser.
            StringKind::VerbatimDouble => {
                self.add_token("@\"");
                self.add_token(&value.replace('"', "\"\""));
                self.add_token("\"");
            }
            StringKind::VerbatimSingle => {
                self.add_token("@'");
                self.add_token(&value.replace('\'', "''"));
                self.add_token("'");
            }
        }
    }

    fn unparse_opt(&mut self, node: Option<&Node>, crowded: bool) {
        if let Some(node) = node {
            self.unparse(node, crowded);
        }
    }

    fn add_id(&mut self, id: Option<&str>) {
        if let Some(id) = id {
            self.add_token(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builders::*;
    use crate::codegen::{CodegenState, UnparseOptions};
    use crate::nodes::*;

    fn unparse(node: &Node) -> String {
        unparse_with(node, UnparseOptions::default())
    }

    fn unparse_with(node: &Node, options: UnparseOptions) -> String {
        let mut state = CodegenState::new(options);
        state.unparse(node, false);
        state.to_string()
    }

    #[test]
    fn binary_spaces_operator() {
        let node = binary(var("a"), BinaryOp::Plus, number("1"));
        assert_eq!(unparse(&node), "a + 1");
    }

    #[test]
    fn binary_operator_fodder_is_kept() {
        let mut node = binary(var("a"), BinaryOp::And, var("b"));
        if let NodeKind::Binary(b) = &mut node.kind {
            b.op_fodder = vec![FodderElement::line_end(None, 0, 2)];
        }
        assert_eq!(unparse(&node), "a\n  && b");
    }

    #[test]
    fn apply_with_positional_named_and_tailstrict() {
        let mut node = apply(var("f"), vec![number("1"), number("2")], vec![("x", var("y"))]);
        if let NodeKind::Apply(a) = &mut node.kind {
            a.tail_strict = true;
        }
        assert_eq!(unparse(&node), "f(1, 2, x=y) tailstrict");
    }

    #[test]
    fn arrays_follow_padding_option() {
        let node = array(vec![number("1"), number("2")]);
        assert_eq!(unparse(&node), "[1, 2]");
        let padded = UnparseOptions {
            pad_arrays: true,
            pad_objects: true,
        };
        assert_eq!(unparse_with(&node, padded), "[ 1, 2 ]");
        assert_eq!(unparse_with(&array(vec![]), padded), "[]");
    }

    #[test]
    fn raw_object_fields() {
        let node = object(vec![
            object_local("x", number("1")),
            field_id("a", Visibility::Inherit, var("x")),
            field_id("b", Visibility::Hidden, string("s")),
        ]);
        assert_eq!(unparse(&node), "{ local x = 1, a: x, b:: \"s\" }");

        let unpadded = UnparseOptions {
            pad_arrays: false,
            pad_objects: false,
        };
        assert_eq!(unparse_with(&node, unpadded), "{local x = 1, a: x, b:: \"s\"}");
        assert_eq!(unparse(&object(vec![])), "{}");
    }

    #[test]
    fn super_sugar_and_method_fields() {
        let mut plus = field_id("a", Visibility::Visible, number("1"));
        plus.super_sugar = true;
        let mut method = field_id("f", Visibility::Inherit, var("x"));
        method.method = Some(params(&["x"]));
        let node = object(vec![plus, method]);
        assert_eq!(unparse(&node), "{ a+::: 1, f(x): x }");
    }

    #[test]
    fn local_with_function_binding() {
        let mut node = local(vec![("f", var("x")), ("y", number("2"))], var("y"));
        if let NodeKind::Local(l) = &mut node.kind {
            l.binds[0].fun = Some(params(&["x"]));
        }
        assert_eq!(unparse(&node), "local f(x) = x, y = 2; y");
    }

    #[test]
    #[should_panic(expected = "INTERNAL ERROR: local with no binds")]
    fn local_without_binds_panics() {
        unparse(&local(vec![], number("1")));
    }

    #[test]
    fn string_kinds() {
        let mut s = string("a\\nb");
        assert_eq!(unparse(&s), "\"a\\nb\"");

        if let NodeKind::LiteralString(lit) = &mut s.kind {
            lit.kind = StringKind::Single;
        }
        assert_eq!(unparse(&s), "'a\\nb'");

        let verbatim = Node::new(NodeKind::LiteralString(LiteralString {
            value: "say \"hi\"".to_string(),
            kind: StringKind::VerbatimDouble,
            block_indent: String::new(),
            block_term_indent: String::new(),
        }));
        assert_eq!(unparse(&verbatim), "@\"say \"\"hi\"\"\"");
    }

    #[test]
    fn block_string_reindents_lines() {
        let block = Node::new(NodeKind::LiteralString(LiteralString {
            value: "line one\r\n\nline two\n".to_string(),
            kind: StringKind::Block,
            block_indent: "  ".to_string(),
            block_term_indent: "".to_string(),
        }));
        assert_eq!(unparse(&block), "|||\n  line one\n\n  line two\n|||");
    }

    #[test]
    fn number_keeps_original_text() {
        assert_eq!(unparse(&number("1e+03")), "1e+03");
        assert_eq!(unparse(&number("007")), "007");
    }

    #[test]
    fn index_and_slice_forms() {
        assert_eq!(unparse(&index_id(var("a"), "b")), "a.b");
        assert_eq!(unparse(&index(var("a"), number("0"))), "a[0]");

        let slice = Node::new(NodeKind::Slice(Slice {
            target: Box::new(var("a")),
            left_bracket_fodder: vec![],
            begin_index: Some(Box::new(number("1"))),
            end_colon_fodder: vec![],
            end_index: None,
            step_colon_fodder: vec![],
            step: Some(Box::new(number("2"))),
            right_bracket_fodder: vec![],
        }));
        assert_eq!(unparse(&slice), "a[1::2]");
    }

    #[test]
    fn conditional_error_and_unary() {
        let node = conditional(
            unary(UnaryOp::Not, var("ok")),
            number("1"),
            Some(error(string("bad"))),
        );
        assert_eq!(unparse(&node), "if !ok then 1 else error \"bad\"");
    }

    #[test]
    fn import_and_parens() {
        assert_eq!(unparse(&parens(import("lib.libsonnet"))), "(import \"lib.libsonnet\")");
    }

    #[test]
    fn array_comprehension() {
        let node = Node::new(NodeKind::ArrayComp(ArrayComp {
            body: Box::new(var("x")),
            trailing_comma_fodder: vec![],
            trailing_comma: false,
            spec: for_spec("x", var("xs"), vec![var("x")]),
            close_fodder: vec![],
        }));
        assert_eq!(unparse(&node), "[x for x in xs if x]");
    }

    #[test]
    fn desugared_object_canonical_layout() {
        let node = desugared_object(vec![("a", number("1")), ("b", desugared_object(vec![]))]);
        assert_eq!(unparse(&node), "{ \"a\": 1, \"b\": {} }");
    }

    #[test]
    fn interstitial_before_left_recursive_node_is_emitted_once() {
        let left = var("a").with_fodder(vec![FodderElement::interstitial("/* x */")]);
        let node = binary(left, BinaryOp::Mult, number("2"));
        assert_eq!(unparse(&node), "/* x */ a * 2");
    }
}
