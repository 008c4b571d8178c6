//! Binary entry point for the jsonnet-tool CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Graph of a tree in DOT syntax
//! jsonnet-tool dot tree.json | dot -Tsvg > tree.svg
//!
//! # Symbols with their object context
//! jsonnet-tool symbols tree.json --format text
//!
//! # Reproduce the source of a raw tree
//! jsonnet-tool fmt tree.json
//! ```
//!
//! Input files are tree documents written by an external parser. Errors are
//! reported as JSON on stdout with a non-zero exit code.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use jsonnet_tool::cli::{
    load_tree, read_file, run_dot, run_expand, run_fmt, run_imports, run_lower, run_symbols,
    with_depth_stack, SymbolFormat, MAX_DEPTH_LIMIT,
};
use jsonnet_tool_ast::diagnostics::render_diagnostic;
use jsonnet_tool_ast::traverse::DEFAULT_MAX_DEPTH;
use jsonnet_tool_ast::UnparseOptions;
use jsonnet_tool_core::error::{OutputErrorCode, ToolError};
use jsonnet_tool_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Syntax tree tooling for Jsonnet.
#[derive(Parser, Debug)]
#[command(name = "jsonnet-tool", version, about = "Syntax tree tooling for Jsonnet")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Deepest tree nesting accepted before a command gives up.
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_MAX_DEPTH,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new()
            .range(..=MAX_DEPTH_LIMIT as u64)
    )]
    max_depth: usize,

    /// Source text the tree was parsed from. Located errors are rendered
    /// against it on stderr.
    #[arg(long, global = true)]
    source: Option<PathBuf>,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format for the symbols command.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// JSON envelope.
    Json,
    /// Tab-separated lines: context, kind, identifier, location.
    Text,
}

impl From<Format> for SymbolFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => SymbolFormat::Json,
            Format::Text => SymbolFormat::Text,
        }
    }
}

/// Layout flags for commands that unparse.
#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Pad the inside of array brackets with spaces.
    #[arg(long)]
    pad_arrays: bool,

    /// Do not pad the inside of object braces with spaces.
    #[arg(long)]
    no_pad_objects: bool,
}

impl LayoutArgs {
    fn options(&self) -> UnparseOptions {
        UnparseOptions {
            pad_arrays: self.pad_arrays,
            pad_objects: !self.no_pad_objects,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tree as a DOT graph.
    Dot {
        /// Tree document to read.
        tree: PathBuf,
    },

    /// List referenceable symbols with their object context.
    Symbols {
        /// Tree document to read.
        tree: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
    },

    /// Unparse the tree back to source text.
    Fmt {
        /// Tree document to read.
        tree: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Inline local bindings at their uses and print the result.
    Expand {
        /// Tree document to read.
        tree: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Lower object literals and print the lowered tree document.
    Lower {
        /// Tree document to read.
        tree: PathBuf,
    },

    /// List import expressions.
    Imports {
        /// Tree document to read.
        tree: PathBuf,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match with_depth_stack(cli.global.max_depth, || execute(&cli)) {
        Ok(output) => {
            let mut stdout = io::stdout();
            if stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .is_err()
            {
                return ExitCode::from(OutputErrorCode::InternalError.code());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(source) = &cli.global.source {
                report_with_source(source, &err);
            }

            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, diagnostics to stderr.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Render a located error against the source text on stderr.
fn report_with_source(source: &Path, err: &ToolError) {
    let Some(location) = err.location() else {
        return;
    };
    match read_file(source) {
        Ok(text) => eprintln!("{}", render_diagnostic(&text, location, &err.to_string())),
        Err(read_err) => tracing::warn!("cannot render diagnostic: {read_err}"),
    }
}

/// Execute the CLI command.
fn execute(cli: &Cli) -> Result<String, ToolError> {
    let max_depth = cli.global.max_depth;
    match &cli.command {
        Command::Dot { tree } => run_dot(&load_tree(tree, max_depth)?, max_depth),
        Command::Symbols { tree, format } => {
            run_symbols(&load_tree(tree, max_depth)?, max_depth, (*format).into())
        }
        Command::Fmt { tree, layout } => {
            run_fmt(&load_tree(tree, max_depth)?, &layout.options(), max_depth)
        }
        Command::Expand { tree, layout } => {
            run_expand(&load_tree(tree, max_depth)?, &layout.options(), max_depth)
        }
        Command::Lower { tree } => run_lower(&load_tree(tree, max_depth)?, max_depth),
        Command::Imports { tree } => run_imports(&load_tree(tree, max_depth)?, max_depth),
    }
}
