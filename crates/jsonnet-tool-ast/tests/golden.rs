// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Golden file tests for the analyses run over a parsed tree.
//!
//! # Updating Golden Files
//!
//! When making intentional changes to analysis output:
//! ```bash
//! JSONNET_TOOL_UPDATE_GOLDEN=1 cargo nextest run -p jsonnet-tool-ast golden
//! git diff tests/golden/  # Review changes
//! ```
//!
//! # Test Organization
//!
//! - Serialized trees: `tests/golden/input/`
//! - Expected output: `tests/golden/output/`
//!
//! Each input has golden files for:
//! - `{name}_symbols.json` - symbols of the lowered tree
//! - `{name}.dot` - graph of the lowered tree
//! - `{name}.jsonnet` - unparsed raw tree

use std::fs;
use std::path::PathBuf;

use difference::assert_diff;
use jsonnet_tool_ast::traverse::DEFAULT_MAX_DEPTH;
use jsonnet_tool_ast::{
    emit_graph, extract_symbols, lower_objects, unparse_tree, JsonTreeParser, SourceParser,
    Traversal, Tree, UnparseOptions,
};

fn input_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("golden");
    path.push("input");
    path
}

fn output_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("golden");
    path.push("output");
    path
}

/// Check if we're in update mode.
fn update_mode() -> bool {
    std::env::var("JSONNET_TOOL_UPDATE_GOLDEN").is_ok()
}

fn load_input(name: &str) -> Tree {
    let path = input_dir().join(format!("{name}.json"));
    let json = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read input {name}: {e}"));
    JsonTreeParser::default()
        .parse_tree(&format!("{name}.json"), &json)
        .unwrap_or_else(|e| panic!("Failed to parse input {name}: {e}"))
}

fn lowered(name: &str) -> Tree {
    lower_objects(&load_input(name), DEFAULT_MAX_DEPTH)
        .unwrap_or_else(|e| panic!("Failed to lower {name}: {e}"))
}

/// Compare text output with its golden file, or rewrite it in update mode.
fn assert_golden_text(file_name: &str, actual: &str) {
    let golden_path = output_dir().join(file_name);

    if update_mode() {
        fs::create_dir_all(output_dir()).expect("Failed to create output directory");
        fs::write(&golden_path, actual).expect("Failed to write golden file");
        eprintln!("Updated golden file: {:?}", golden_path);
    } else {
        let expected = fs::read_to_string(&golden_path)
            .unwrap_or_else(|e| panic!("Failed to read golden file {:?}: {}", golden_path, e));
        assert_diff!(expected.as_ref(), actual, "\n", 0);
    }
}

/// Compare JSON output with its golden file. Formatting is not compared.
fn assert_golden_json(file_name: &str, actual: &serde_json::Value) {
    let golden_path = output_dir().join(file_name);

    if update_mode() {
        fs::create_dir_all(output_dir()).expect("Failed to create output directory");
        let json = serde_json::to_string_pretty(actual).expect("Failed to serialize");
        fs::write(&golden_path, json + "\n").expect("Failed to write golden file");
        eprintln!("Updated golden file: {:?}", golden_path);
    } else {
        let golden_content = fs::read_to_string(&golden_path)
            .unwrap_or_else(|e| panic!("Failed to read golden file {:?}: {}", golden_path, e));
        let expected: serde_json::Value = serde_json::from_str(&golden_content)
            .unwrap_or_else(|e| panic!("Failed to parse golden file {:?}: {}", golden_path, e));

        assert_eq!(actual, &expected, "Golden test failed for {}", file_name);
    }
}

// =============================================================================
// nested_object: { a: 1, b: { c: 2 } }
// =============================================================================

#[test]
fn golden_nested_object_symbols() {
    let tree = lowered("nested_object");
    let symbols = extract_symbols(&tree.root, DEFAULT_MAX_DEPTH).expect("symbols");
    let actual = serde_json::to_value(&symbols).expect("Failed to serialize");
    assert_golden_json("nested_object_symbols.json", &actual);
}

#[test]
fn golden_nested_object_dot() {
    let tree = lowered("nested_object");
    let graph = emit_graph(&tree.root, &Traversal::default()).expect("graph");
    assert_golden_text("nested_object.dot", &graph);
}

#[test]
fn golden_nested_object_unparse() {
    let tree = load_input("nested_object");
    let source = unparse_tree(&tree, &UnparseOptions::default()).expect("unparse");
    assert_golden_text("nested_object.jsonnet", &source);
}
