//! Syntax highlighting for the source block, delegated to syntect.
//!
//! The overlay needs one self-contained HTML fragment per source line so
//! comment blocks can be slotted in between lines. Highlighting state still
//! carries across lines (block comments, strings), only the output is split.

use anyhow::{Context, Result};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;

use crate::markup::escape_html;

const DEFAULT_THEME: &str = "InspiredGitHub";

pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new() -> Self {
        let themes = ThemeSet::load_defaults();
        Self {
            syntax_set: two_face::syntax::extra_newlines(),
            theme: themes.themes[DEFAULT_THEME].clone(),
        }
    }

    /// Highlight a source block into per-line HTML fragments.
    ///
    /// `language` is the token the post declares (extension or language
    /// name); unknown or missing languages fall back to escaped plain text.
    pub fn highlight_lines(&self, source: &str, language: Option<&str>) -> Result<Vec<String>> {
        let syntax = language.and_then(|token| self.syntax_set.find_syntax_by_token(token));
        let Some(syntax) = syntax else {
            tracing::debug!(?language, "no syntax found, rendering plain text");
            return Ok(source.lines().map(escape_html).collect());
        };

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut fragments = Vec::new();
        for line in source.lines() {
            let regions = highlighter
                .highlight_line(line, &self.syntax_set)
                .context("Failed to highlight source line")?;
            let html = styled_line_to_highlighted_html(&regions, IncludeBackground::No)
                .context("Failed to render highlighted line")?;
            fragments.push(html);
        }
        Ok(fragments)
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_escaped_text() {
        let highlighter = Highlighter::new();
        let lines = highlighter
            .highlight_lines("<b>not code</b>\nsecond line", Some("no-such-language"))
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "&lt;b&gt;not code&lt;/b&gt;");
        assert_eq!(lines[1], "second line");
    }

    #[test]
    fn known_language_keeps_line_count() {
        let highlighter = Highlighter::new();
        let source = "fn main() {\n    println!(\"hi\");\n}";
        let lines = highlighter.highlight_lines(source, Some("rs")).unwrap();
        assert_eq!(lines.len(), 3);
        // Highlighted output still escapes the quotes around the string
        assert!(lines[1].contains("println"));
        assert!(lines[1].contains("&quot;"));
        assert!(lines[1].contains("<span"));
    }

    #[test]
    fn empty_source_yields_no_lines() {
        let highlighter = Highlighter::new();
        assert!(highlighter.highlight_lines("", None).unwrap().is_empty());
    }
}
