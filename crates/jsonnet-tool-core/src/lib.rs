//! Core infrastructure for jsonnet-tool.
//!
//! This crate provides the pieces shared by the syntax tree crate and the
//! command-line front door:
//! - Source location types
//! - Error types and error codes
//! - JSON output types for CLI responses

pub mod error;
pub mod output;
pub mod types;
