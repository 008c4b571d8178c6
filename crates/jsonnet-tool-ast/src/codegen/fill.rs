// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::CodegenState;
use crate::nodes::{FodderElement, FodderKind};

impl CodegenState {
    /// Emit a fodder sequence.
    ///
    /// `crowded` says whether the last emitted token would run into whatever
    /// comes next (true after `,`, false after `(`). `separate` asks for a
    /// single space after the fodder if the output is still crowded at the
    /// end of it.
    ///
    /// - Paragraphs write each comment line and a newline. Lines after the
    ///   first are indented by the indent in effect before the paragraph;
    ///   empty lines are not indented. Then come the blank lines and the
    ///   indent of the following line.
    /// - Line ends write `  comment` if present, `blanks + 1` newlines and
    ///   the indent of the following line.
    /// - Interstitials write a space if crowded, then the comment, and leave
    ///   the output crowded.
    pub fn fill(&mut self, fodder: &[FodderElement], mut crowded: bool, separate: bool) {
        let mut last_indent = 0;
        for fod in fodder {
            match fod.kind {
                FodderKind::Paragraph => {
                    for (i, line) in fod.comment.iter().enumerate() {
                        if !line.is_empty() {
                            if i > 0 {
                                self.add_spaces(last_indent);
                            }
                            self.add_token(line);
                        }
                        self.add_token("\n");
                    }
                    self.add_newlines(fod.blanks);
                    self.add_spaces(fod.indent);
                    last_indent = fod.indent;
                    crowded = false;
                }
                FodderKind::LineEnd => {
                    if let Some(comment) = fod.comment.first() {
                        self.add_token("  ");
                        self.add_token(comment);
                    }
                    self.add_newlines(fod.blanks + 1);
                    self.add_spaces(fod.indent);
                    last_indent = fod.indent;
                    crowded = false;
                }
                FodderKind::Interstitial => {
                    if crowded {
                        self.add_token(" ");
                    }
                    if let Some(comment) = fod.comment.first() {
                        self.add_token(comment);
                    }
                    crowded = true;
                }
            }
        }
        if separate && crowded {
            self.add_token(" ");
        }
    }
}
