//! CLI front door.
//!
//! Each `run_*` function takes a loaded [`Tree`] and returns the text the
//! binary prints: JSON envelopes for `symbols` and `imports`, raw text for
//! graphs and unparsed source, the serialized tree for `lower`.
//!
//! ## Stack
//!
//! Unparsing and the tree passes recurse once per tree level. Commands run
//! through [`with_depth_stack`] on a thread whose stack is sized from the
//! depth limit, so every tree that loads can be processed.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, ToolError>`. Errors from the syntax tree
//! crate are converted through the bridges in
//! [`jsonnet_tool_ast::error_bridges`].

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::thread;

use tracing::{debug, info};

use jsonnet_tool_ast::codegen::unparse_tree_with_depth;
use jsonnet_tool_ast::nodes::TreeShape;
use jsonnet_tool_ast::{
    emit_graph, expand, extract_symbols, find_imports, lower_objects, JsonTreeParser,
    SourceParser, Symbol, Traversal, Tree, UnparseOptions,
};
use jsonnet_tool_core::error::ToolError;
use jsonnet_tool_core::output::{ImportInfo, ImportsResponse, SymbolInfo, SymbolsResponse};

/// Largest depth limit the CLI accepts.
pub const MAX_DEPTH_LIMIT: usize = 10_000;

/// Stack reserved per tree level on the command thread.
const STACK_BYTES_PER_LEVEL: usize = 32 * 1024;

/// Stack of the command thread before any tree levels are added.
const BASE_STACK_BYTES: usize = 8 * 1024 * 1024;

/// How `symbols` renders its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolFormat {
    /// A [`SymbolsResponse`] envelope.
    #[default]
    Json,
    /// One tab-separated line per symbol.
    Text,
}

/// Stack size for a command run with `max_depth`.
pub fn stack_size_for(max_depth: usize) -> usize {
    JsonTreeParser::new(max_depth)
        .depth_bound()
        .saturating_mul(STACK_BYTES_PER_LEVEL)
        .saturating_add(BASE_STACK_BYTES)
}

/// Run `command` on a thread with stack for trees up to `max_depth` deep.
pub fn with_depth_stack<T, F>(max_depth: usize, command: F) -> Result<T, ToolError>
where
    F: FnOnce() -> Result<T, ToolError> + Send,
    T: Send,
{
    let stack_size = stack_size_for(max_depth);
    debug!(max_depth, stack_size, "starting command thread");
    thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name("command".to_string())
            .stack_size(stack_size)
            .spawn_scoped(scope, command)
            .map_err(|err| ToolError::internal(format!("cannot start command thread: {err}")))?;
        handle
            .join()
            .unwrap_or_else(|_| Err(ToolError::internal("command thread panicked")))
    })
}

/// Read a file, mapping a missing file to [`ToolError::FileNotFound`].
pub fn read_file(path: &Path) -> Result<String, ToolError> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ToolError::file_not_found(path.display().to_string()),
        _ => ToolError::invalid_tree(
            format!("cannot read {}: {}", path.display(), err),
            Some(path.display().to_string()),
        ),
    })
}

/// Load a JSON tree document.
pub fn load_tree(path: &Path, max_depth: usize) -> Result<Tree, ToolError> {
    let json = read_file(path)?;
    let tree = JsonTreeParser::new(max_depth).parse_tree(&path.display().to_string(), &json)?;
    info!(file = %path.display(), shape = %tree.shape, "loaded tree");
    Ok(tree)
}

/// Lower `tree` unless it already is.
fn ensure_lowered(tree: &Tree, max_depth: usize) -> Result<Tree, ToolError> {
    match tree.shape {
        TreeShape::Lowered => Ok(tree.clone()),
        TreeShape::Raw => {
            debug!("lowering raw tree");
            Ok(lower_objects(tree, max_depth)?)
        }
    }
}

/// The graph of `tree` in DOT syntax.
pub fn run_dot(tree: &Tree, max_depth: usize) -> Result<String, ToolError> {
    Ok(emit_graph(&tree.root, &Traversal::new(max_depth))?)
}

/// Collect symbols. Raw trees are lowered first so field names are known.
pub fn collect_symbols(tree: &Tree, max_depth: usize) -> Result<Vec<Symbol>, ToolError> {
    let lowered = ensure_lowered(tree, max_depth)?;
    Ok(extract_symbols(&lowered.root, max_depth)?)
}

/// Symbols of `tree`, rendered as `format`.
pub fn run_symbols(
    tree: &Tree,
    max_depth: usize,
    format: SymbolFormat,
) -> Result<String, ToolError> {
    let symbols = collect_symbols(tree, max_depth)?;
    match format {
        SymbolFormat::Json => {
            let infos = symbols
                .into_iter()
                .map(|symbol| {
                    let context = symbol.qualified_context();
                    SymbolInfo::new(
                        symbol.identifier,
                        symbol.kind.as_str(),
                        context,
                        symbol.location,
                    )
                })
                .collect();
            to_json(&SymbolsResponse::new(infos))
        }
        SymbolFormat::Text => {
            let mut out = String::new();
            for symbol in &symbols {
                // Writing to a String cannot fail.
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    symbol.qualified_context(),
                    symbol.kind,
                    symbol.identifier,
                    symbol.location
                );
            }
            Ok(out)
        }
    }
}

/// Unparse `tree` with `options`.
pub fn run_fmt(
    tree: &Tree,
    options: &UnparseOptions,
    max_depth: usize,
) -> Result<String, ToolError> {
    Ok(unparse_tree_with_depth(tree, options, max_depth)?)
}

/// Inline `local` bindings and unparse the result.
pub fn run_expand(
    tree: &Tree,
    options: &UnparseOptions,
    max_depth: usize,
) -> Result<String, ToolError> {
    let expanded = expand(tree, max_depth)?;
    Ok(unparse_tree_with_depth(&expanded, options, max_depth)?)
}

/// Lower `tree` and serialize the result as a tree document.
pub fn run_lower(tree: &Tree, max_depth: usize) -> Result<String, ToolError> {
    let lowered = lower_objects(tree, max_depth)?;
    let mut json = to_json(&lowered)?;
    json.push('\n');
    Ok(json)
}

/// Imports in `tree`, as an [`ImportsResponse`].
pub fn run_imports(tree: &Tree, max_depth: usize) -> Result<String, ToolError> {
    let imports = find_imports(&tree.root, &Traversal::new(max_depth))?
        .into_iter()
        .map(|import| ImportInfo {
            kind: import.kind.as_str().to_string(),
            path: import.path,
            location: import.location,
        })
        .collect();
    to_json(&ImportsResponse::new(imports))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value)
        .map_err(|err| ToolError::internal(format!("failed to serialize output: {err}")))
}
