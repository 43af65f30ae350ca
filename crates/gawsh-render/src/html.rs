//! Line-numbered, syntax-highlighted HTML table renderer.

use std::path::Path;

use syntect::html::{line_tokens_to_classed_spans, ClassStyle};
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::traits::ContentRenderer;

/// Prefix on every class the renderer emits, highlight classes included.
pub const CLASS_PREFIX: &str = "gawsh-";

/// Class naming shared by the highlighter and the stylesheet.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
    prefix: CLASS_PREFIX,
};

/// Bytes inspected for a NUL when deciding whether a blob is binary, the
/// same window git uses.
const BINARY_SNIFF_LEN: usize = 8000;

/// Renders text blobs as a table with one anchored row per line.
///
/// Every line gets a `L<n>` id and a self-link, so a rendered blob can be
/// linked to a line. Line content is highlighted into `<span>`s carrying
/// `gawsh-` prefixed scope classes; [`stylesheet`](crate::stylesheet)
/// produces the matching CSS. Each row closes the spans it opened and
/// reopens the ones still live from the previous line, so a multi-line
/// comment stays highlighted across rows.
pub struct HtmlTableRenderer {
    syntax_set: SyntaxSet,
    max_bytes: Option<usize>,
}

impl HtmlTableRenderer {
    /// Renderer over syntect's bundled syntax definitions.
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            max_bytes: None,
        }
    }

    /// Refuse blobs larger than `limit` bytes.
    pub fn with_max_bytes(mut self, limit: usize) -> Self {
        self.max_bytes = Some(limit);
        self
    }

    /// Syntax for a blob: the first line decides (shebangs, modelines), then
    /// the filename's extension, then the whole filename (`Makefile`), then
    /// plain text.
    pub fn syntax_for(&self, text: &str, filename: &str) -> &SyntaxReference {
        let ss = &self.syntax_set;
        ss.find_syntax_by_first_line(text)
            .or_else(|| {
                Path::new(filename)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(|ext| ss.find_syntax_by_extension(ext))
            })
            .or_else(|| ss.find_syntax_by_extension(filename))
            .unwrap_or_else(|| ss.find_syntax_plain_text())
    }

    fn highlight_rows(&self, text: &str, syntax: &SyntaxReference) -> RenderResult<Vec<String>> {
        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut rows = Vec::new();
        for line in LinesWithEndings::from(text) {
            let ops = state
                .parse_line(line, &self.syntax_set)
                .map_err(|e| RenderError::Highlight(e.to_string()))?;

            let mut row = String::new();
            for scope in stack.as_slice() {
                row.push_str(&open_span(*scope));
            }
            let (spans, _) = line_tokens_to_classed_spans(line, &ops, CLASS_STYLE, &mut stack)
                .map_err(|e| RenderError::Highlight(e.to_string()))?;
            row.extend(spans.chars().filter(|c| !matches!(c, '\n' | '\r')));
            for _ in 0..stack.len() {
                row.push_str("</span>");
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

impl Default for HtmlTableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRenderer for HtmlTableRenderer {
    fn render(&self, content: &[u8], filename: &str) -> RenderResult<String> {
        if let Some(limit) = self.max_bytes {
            if content.len() > limit {
                return Err(RenderError::TooLarge {
                    size: content.len(),
                    limit,
                });
            }
        }

        if is_binary(content) {
            debug!(filename, size = content.len(), "binary blob");
            return Ok(format!(
                "<p class=\"{CLASS_PREFIX}binary\">Binary file, {} bytes</p>\n",
                content.len()
            ));
        }

        // Some repositories carry non-UTF-8 text; those bytes become
        // replacement characters.
        let text = String::from_utf8_lossy(content);
        let syntax = self.syntax_for(&text, filename);
        debug!(filename, syntax = %syntax.name, "highlighting blob");
        let rows = self.highlight_rows(&text, syntax)?;

        let mut html = String::with_capacity(content.len() * 4 + 256);
        html.push_str(&format!(
            "<table class=\"{CLASS_PREFIX}blob\" data-filename=\"{}\" data-syntax=\"{}\">\n",
            escape_html(filename),
            escape_html(&syntax.name)
        ));
        for (idx, row) in rows.iter().enumerate() {
            let n = idx + 1;
            html.push_str(&format!(
                "<tr id=\"L{n}\"><td class=\"{CLASS_PREFIX}line-number\"><a href=\"#L{n}\"><pre>{n}</pre></a></td>\
                 <td class=\"{CLASS_PREFIX}line-content-wrapper\"><pre class=\"{CLASS_PREFIX}line-content\">{row}</pre></td></tr>\n"
            ));
        }
        html.push_str("</table>\n");
        Ok(html)
    }
}

/// Opening tag for a scope still live from an earlier line, named the same
/// way syntect names spans it opens itself.
fn open_span(scope: Scope) -> String {
    let classes: Vec<String> = scope
        .build_string()
        .split('.')
        .map(|atom| format!("{CLASS_PREFIX}{atom}"))
        .collect();
    format!("<span class=\"{}\">", classes.join(" "))
}

/// A NUL byte near the start marks a blob as binary.
pub fn is_binary(content: &[u8]) -> bool {
    content[..content.len().min(BINARY_SNIFF_LEN)].contains(&0)
}

/// Escape HTML special characters for attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
