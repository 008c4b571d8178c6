//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Root crate
// ============================================================================

use jsonnet_tool::cli::{
    collect_symbols, load_tree, read_file, run_dot, run_expand, run_fmt, run_imports, run_lower,
    run_symbols, SymbolFormat,
};
use jsonnet_tool::{ErrorInfo, ErrorResponse, OutputErrorCode, ToolError, SCHEMA_VERSION};

// ============================================================================
// Core Infrastructure Types
// ============================================================================

use jsonnet_tool_core::error::ToolError as CoreToolError;
use jsonnet_tool_core::output::{
    emit_response, ImportInfo, ImportsResponse, SymbolInfo, SymbolsResponse,
};
use jsonnet_tool_core::types::{LocationRange, Position};

// ============================================================================
// Syntax Tree Crate
// ============================================================================

use jsonnet_tool::jsonnet_tool_ast::codegen::{
    unparse_tree, unparse_tree_with_depth, CodegenState, UnparseOptions,
};
use jsonnet_tool::jsonnet_tool_ast::diagnostics::render_diagnostic;
use jsonnet_tool::jsonnet_tool_ast::nodes::{
    Fodder, FodderElement, FodderKind, Node, NodeKind, Tree, TreeShape,
};
use jsonnet_tool::jsonnet_tool_ast::parser::{JsonTreeParser, ParseError, SourceParser};
use jsonnet_tool::jsonnet_tool_ast::passes::{expand, lower_objects, PassError};
use jsonnet_tool::jsonnet_tool_ast::shape::{
    children, children_mut, direct_children, special_children, ShapeMismatch,
};
use jsonnet_tool::jsonnet_tool_ast::traverse::{
    check_depth, nop, traverse, FnHooks, HookError, HookResult, Phase, Traversal,
    TraversalError, TraversalHooks, DEFAULT_MAX_DEPTH,
};
use jsonnet_tool::jsonnet_tool_ast::visitor::{
    emit_graph, extract_symbols, find_imports, GraphEmitter, ImportCollector, ImportKind,
    ImportRef, NodeId, NodeIds, Symbol, SymbolCollector, SymbolKind,
};

#[test]
fn api_surface_compiles() {
    // This test passes if the file compiles.
    let _: fn(ParseError) -> ToolError = ToolError::from;
    let _: fn(PassError) -> ToolError = ToolError::from;
    let _: fn(TraversalError) -> ToolError = ToolError::from;
}
