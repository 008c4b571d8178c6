// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The node model: expressions, fodder and operators.

pub mod expression;
pub mod fodder;
pub mod ops;

pub use expression::*;
pub use fodder::{Fodder, FodderElement, FodderKind};
pub use ops::{BinaryOp, ObjectFieldKind, StringKind, UnaryOp, Visibility};

pub use jsonnet_tool_core::types::{LocationRange, Position};
