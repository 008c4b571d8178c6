//! jsonnet-tool - syntax tree tooling for Jsonnet.
//!
//! This crate provides the CLI binary and its library front door.
//!
//! ## Modules
//!
//! - `cli` - command implementations over loaded trees

pub mod cli;

// Re-export core types for convenience
pub use jsonnet_tool_core::error::{OutputErrorCode, ToolError};
pub use jsonnet_tool_core::output::{ErrorInfo, ErrorResponse, SCHEMA_VERSION};

pub use jsonnet_tool_ast;
