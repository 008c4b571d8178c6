// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The parser contract and the JSON tree loader.
//!
//! Parsing Jsonnet text is left to an external parser. Anything that can
//! turn source text into a root node plus the fodder after its last token
//! implements [`SourceParser`]. [`JsonTreeParser`] is the implementation
//! shipped here: it reads a [`Tree`] serialized as JSON by such a parser.
//!
//! ```
//! use jsonnet_tool_ast::parser::{JsonTreeParser, SourceParser};
//! use jsonnet_tool_ast::nodes::TreeShape;
//!
//! let doc = r#"{"shape": "raw", "root": {"kind": {"var": {"id": "x"}}}}"#;
//! let tree = JsonTreeParser::default().parse_tree("x.json", doc).unwrap();
//! assert_eq!(tree.shape, TreeShape::Raw);
//! assert_eq!(tree.root.kind_name(), "Var");
//! ```

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::nodes::{Fodder, LocationRange, Node, Tree, TreeShape};
use crate::shape::ShapeMismatch;
use crate::traverse::DEFAULT_MAX_DEPTH;

/// JSON nesting levels allowed per tree level.
const JSON_LEVELS_PER_NODE: usize = 6;

/// JSON nesting levels of the most compact tree level: a node object, its
/// kind tag and the kind's fields (`{"kind":{"parens":{"inner":…}}}`).
const MIN_JSON_LEVELS_PER_NODE: usize = 3;

/// JSON nesting always accepted, however small the tree depth limit. Small
/// limits are enforced on the tree itself.
const MIN_JSON_LEVELS: usize = 128;

/// Errors produced while obtaining a tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Source text is not valid Jsonnet.
    #[error("{location}: {message}")]
    Syntax {
        location: LocationRange,
        message: String,
    },

    /// A tree document is not valid JSON or does not describe a tree.
    #[error("{file}: invalid tree document: {source}")]
    Json {
        file: String,
        source: serde_json::Error,
    },

    /// A tree document nests deeper than allowed.
    #[error("{file}: tree document nests {depth} levels deep, limit is {limit}")]
    TooDeep {
        file: String,
        depth: usize,
        limit: usize,
    },

    /// A tree document contains objects of the wrong shape.
    #[error("{file}: {source}")]
    Shape {
        file: String,
        source: ShapeMismatch,
    },
}

impl ParseError {
    pub fn location(&self) -> Option<&LocationRange> {
        match self {
            ParseError::Syntax { location, .. } => Some(location),
            ParseError::Shape { source, .. } => Some(&source.location),
            ParseError::Json { .. } | ParseError::TooDeep { .. } => None,
        }
    }
}

/// Turns source text into a syntax tree.
pub trait SourceParser {
    /// Parse `source`, returning the root and the fodder after its last
    /// token.
    fn parse(&self, file_name: &str, source: &str) -> Result<(Node, Fodder), ParseError>;

    /// Parse `source` into a [`Tree`]. Parsers produce raw trees unless they
    /// say otherwise.
    fn parse_tree(&self, file_name: &str, source: &str) -> Result<Tree, ParseError> {
        let (root, final_fodder) = self.parse(file_name, source)?;
        Ok(Tree {
            shape: TreeShape::Raw,
            root,
            final_fodder,
        })
    }
}

/// Reads JSON-serialized [`Tree`] documents.
#[derive(Debug, Clone, Copy)]
pub struct JsonTreeParser {
    /// Deepest tree nesting accepted.
    pub max_depth: usize,
}

impl Default for JsonTreeParser {
    fn default() -> Self {
        JsonTreeParser {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl JsonTreeParser {
    pub fn new(max_depth: usize) -> Self {
        JsonTreeParser { max_depth }
    }

    fn json_limit(&self) -> usize {
        self.max_depth
            .saturating_add(1)
            .saturating_mul(JSON_LEVELS_PER_NODE)
            .max(MIN_JSON_LEVELS)
    }

    /// Deepest tree a document accepted by this parser can hold.
    ///
    /// The JSON limit leaves room for verbose node kinds, so compact kinds
    /// may nest past `max_depth` until a pass checks the tree itself.
    /// Recursive passes over loaded trees need stack for this many levels.
    pub fn depth_bound(&self) -> usize {
        self.json_limit() / MIN_JSON_LEVELS_PER_NODE
    }
}

impl SourceParser for JsonTreeParser {
    fn parse(&self, file_name: &str, source: &str) -> Result<(Node, Fodder), ParseError> {
        let tree = self.parse_tree(file_name, source)?;
        Ok((tree.root, tree.final_fodder))
    }

    fn parse_tree(&self, file_name: &str, source: &str) -> Result<Tree, ParseError> {
        // The recursion limit of serde_json is far below realistic tree
        // depths, so nesting is bounded here instead and the deserializer
        // grows its stack on demand.
        let depth = json_depth(source);
        let limit = self.json_limit();
        if depth > limit {
            return Err(ParseError::TooDeep {
                file: file_name.to_string(),
                depth,
                limit,
            });
        }

        let json_error = |source| ParseError::Json {
            file: file_name.to_string(),
            source,
        };
        let mut de = serde_json::Deserializer::from_str(source);
        de.disable_recursion_limit();
        let tree = Tree::deserialize(serde_stacker::Deserializer::new(&mut de))
            .map_err(json_error)?;
        de.end().map_err(json_error)?;

        tree.validate_shape().map_err(|source| ParseError::Shape {
            file: file_name.to_string(),
            source,
        })?;
        debug!(file = file_name, shape = %tree.shape, "loaded tree document");
        Ok(tree)
    }
}

/// Deepest `{`/`[` nesting in a JSON text, ignoring brackets in strings.
fn json_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}
