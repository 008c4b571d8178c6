// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Formatting metadata ("fodder") attached to tokens.
//!
//! The parser only records comments and line structure. Spaces between two
//! tokens on the same line are never stored; the unparser regenerates them
//! from the `crowded` rules in [`crate::codegen`].

use serde::{Deserialize, Serialize};

/// The kind of a single fodder element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FodderKind {
    /// A comment on the same line as the surrounding tokens, with no newline
    /// after it (`/* like this */`).
    Interstitial,
    /// The end of a line, optionally carrying a trailing comment.
    LineEnd,
    /// One or more comment lines standing on their own.
    Paragraph,
}

/// One element of a fodder sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FodderElement {
    pub kind: FodderKind,
    /// Number of blank lines following this element.
    #[serde(default)]
    pub blanks: usize,
    /// Indentation of the line that follows this element.
    #[serde(default)]
    pub indent: usize,
    /// Comment text. Interstitials hold exactly one entry; a line end holds
    /// zero or one; a paragraph holds one entry per line.
    #[serde(default)]
    pub comment: Vec<String>,
}

impl FodderElement {
    /// An interstitial comment.
    pub fn interstitial(comment: impl Into<String>) -> Self {
        FodderElement {
            kind: FodderKind::Interstitial,
            blanks: 0,
            indent: 0,
            comment: vec![comment.into()],
        }
    }

    /// A line end, optionally with a trailing comment.
    pub fn line_end(comment: Option<&str>, blanks: usize, indent: usize) -> Self {
        FodderElement {
            kind: FodderKind::LineEnd,
            blanks,
            indent,
            comment: comment.map(str::to_string).into_iter().collect(),
        }
    }

    /// A paragraph of comment lines.
    pub fn paragraph<S: Into<String>>(
        lines: impl IntoIterator<Item = S>,
        blanks: usize,
        indent: usize,
    ) -> Self {
        FodderElement {
            kind: FodderKind::Paragraph,
            blanks,
            indent,
            comment: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// An ordered sequence of fodder elements preceding a token.
pub type Fodder = Vec<FodderElement>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_end_without_comment_has_no_text() {
        let f = FodderElement::line_end(None, 1, 2);
        assert!(f.comment.is_empty());
        assert_eq!(f.blanks, 1);
        assert_eq!(f.indent, 2);
    }

    #[test]
    fn fodder_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FodderKind::LineEnd).unwrap();
        assert_eq!(json, "\"line_end\"");
    }

    #[test]
    fn missing_counts_default_to_zero() {
        let f: FodderElement =
            serde_json::from_str(r#"{"kind":"interstitial","comment":["/* x */"]}"#).unwrap();
        assert_eq!(f, FodderElement::interstitial("/* x */"));
    }
}
