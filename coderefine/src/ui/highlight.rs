//! Syntax highlighting for refactored and converted code.
//!
//! syntect is too slow to run on every 33 ms frame, so highlighted lines are
//! cached per pane and rebuilt only when the code or its language changes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use similar::ChangeTag;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use coderefine_core::review::DiffLine;

use crate::theme::Theme;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Highlighted lines for one pane, keyed by a hash of (extension, code).
#[derive(Debug, Default)]
pub struct HighlightCache {
    key: Option<u64>,
    lines: Vec<Line<'static>>,
}

impl HighlightCache {
    /// Returns highlighted lines for `code`, rebuilding only on change.
    pub fn lines(&mut self, code: &str, extension: &str) -> &[Line<'static>] {
        let mut hasher = DefaultHasher::new();
        extension.hash(&mut hasher);
        code.hash(&mut hasher);
        let key = hasher.finish();
        if self.key != Some(key) {
            self.lines = highlight_code(code, extension);
            self.key = Some(key);
        }
        &self.lines
    }
}

/// Highlights `code` using the syntax registered for `extension`, falling
/// back to plain text when syntect has no such syntax.
pub fn highlight_code(code: &str, extension: &str) -> Vec<Line<'static>> {
    let syntax = PS.find_syntax_by_extension(extension).unwrap_or_else(|| PS.find_syntax_plain_text());
    let Some(theme) = TS.themes.get("base16-ocean.dark").or_else(|| TS.themes.values().next()) else {
        return code.lines().map(|l| Line::from(l.to_owned())).collect();
    };
    let mut h = HighlightLines::new(syntax, theme);
    LinesWithEndings::from(code)
        .map(|line| {
            let ranges = h.highlight_line(line, &PS).unwrap_or_default();
            let spans: Vec<Span<'static>> =
                ranges.into_iter().map(|(style, text)| syntect_to_span(style, text)).collect();
            if spans.is_empty() {
                Line::from(line.trim_end_matches('\n').to_owned())
            } else {
                Line::from(spans)
            }
        })
        .collect()
}

/// Converts a syntect (Style, &str) pair into an owned ratatui Span.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::{Color as SC, FontStyle};
    let to_color = |c: SC| -> Option<Color> {
        if c.a > 0 { Some(Color::Rgb(c.r, c.g, c.b)) } else { None }
    };
    // Background is left to the terminal so the pane keeps the theme's base.
    let mut ratatui_style = Style::default();
    if let Some(fg) = to_color(style.foreground) {
        ratatui_style = ratatui_style.fg(fg);
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.trim_end_matches('\n').to_owned(), ratatui_style)
}

/// Renders a buffer-vs-refactored line diff with `+`/`-` gutters.
pub fn diff_lines(diff: &[DiffLine], theme: &Theme) -> Vec<Line<'static>> {
    diff.iter()
        .map(|line| {
            let (prefix, color) = match line.tag {
                ChangeTag::Insert => ("+ ", theme.diff_added),
                ChangeTag::Delete => ("- ", theme.diff_removed),
                ChangeTag::Equal => ("  ", theme.diff_context),
            };
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(line.text.clone(), Style::default().fg(color)),
            ])
        })
        .collect()
}
