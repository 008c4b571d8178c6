// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Rendering of located errors against their source text.

use std::cmp::min;

use annotate_snippets::{Level, Renderer, Snippet};

use crate::nodes::{LocationRange, Position};

/// Render `message` with the source lines covered by `location` underlined.
///
/// Unset locations, and locations that do not fit `source`, render the
/// message alone.
///
/// ```
/// use jsonnet_tool_ast::diagnostics::render_diagnostic;
/// use jsonnet_tool_ast::nodes::LocationRange;
///
/// let source = "local x = 1;\ny + x\n";
/// let loc = LocationRange::from_coords("main.jsonnet", (2, 1), (2, 2));
/// let text = render_diagnostic(source, &loc, "unknown variable: y");
/// assert!(text.contains("unknown variable: y"));
/// assert!(text.contains("main.jsonnet:2:1"));
/// ```
pub fn render_diagnostic(source: &str, location: &LocationRange, message: &str) -> String {
    let renderer = Renderer::plain();
    let Some(span) = span_of(source, location) else {
        return renderer.render(Level::Error.title(message)).to_string();
    };

    let label = location.to_string();
    let mut snippet = Snippet::source(source)
        .line_start(1)
        .fold(true)
        .annotation(Level::Error.span(span).label(&label));
    if !location.file_name.is_empty() {
        snippet = snippet.origin(&location.file_name);
    }
    let rendered = renderer
        .render(Level::Error.title(message).snippet(snippet))
        .to_string();
    rendered
}

/// Byte range of `location` within `source`.
fn span_of(source: &str, location: &LocationRange) -> Option<std::ops::Range<usize>> {
    if !location.is_set() || source.is_empty() {
        return None;
    }
    let start = offset_of(source, location.begin)?;
    let end = offset_of(source, location.end).unwrap_or(source.len());
    let end = if end <= start {
        min(start + 1, source.len())
    } else {
        end
    };
    (start < end).then_some(start..end)
}

/// Byte offset of a 1-indexed line and column. Columns past the end of a
/// line are clamped to it.
fn offset_of(source: &str, position: Position) -> Option<usize> {
    let line_index = usize::try_from(position.line).ok()?.checked_sub(1)?;
    let column_index = usize::try_from(position.column).ok()?.saturating_sub(1);

    let mut line_start = 0;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        if index == line_index {
            let content = line.trim_end_matches(['\n', '\r']);
            let within = content
                .char_indices()
                .nth(column_index)
                .map_or(content.len(), |(offset, _)| offset);
            return Some(line_start + within);
        }
        line_start += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underlines_the_located_text() {
        let source = "{\n  a: oops,\n}\n";
        let loc = LocationRange::from_coords("f.jsonnet", (2, 6), (2, 10));
        let text = render_diagnostic(source, &loc, "unknown variable");
        assert!(text.starts_with("error: unknown variable"));
        assert!(text.contains("f.jsonnet:2:6"));
        assert!(text.contains("a: oops,"));
        assert!(text.contains("^^^^"));
    }

    #[test]
    fn anonymous_source_renders_without_origin() {
        let loc = LocationRange::from_coords("", (1, 7), (1, 8));
        let text = render_diagnostic("1 + 2 +", &loc, "unexpected end of file");
        assert!(text.starts_with("error: unexpected end of file"));
        assert!(!text.contains("-->"));
        assert!(text.contains("1 + 2 +"));
    }

    #[test]
    fn unset_location_renders_message_only() {
        let text = render_diagnostic("x", &LocationRange::default(), "boom");
        assert_eq!(text, "error: boom");
    }

    #[test]
    fn out_of_range_location_renders_message_only() {
        let loc = LocationRange::from_coords("f", (9, 1), (9, 2));
        assert_eq!(render_diagnostic("x\n", &loc, "boom"), "error: boom");
    }

    #[test]
    fn offsets_count_characters() {
        let source = "é = 1\nb";
        assert_eq!(offset_of(source, Position::new(1, 2)), Some(2));
        assert_eq!(offset_of(source, Position::new(2, 1)), Some(7));
        assert_eq!(offset_of(source, Position::new(1, 99)), Some(6));
        assert_eq!(offset_of(source, Position::new(0, 1)), None);
    }
}
