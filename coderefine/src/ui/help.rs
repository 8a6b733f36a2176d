//! Help overlay.
//!
//! Drawn in the same `terminal.draw()` closure as everything else: `Clear`
//! erases the area first, then a bordered `Paragraph` goes on top.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the keybinding reference as a centred modal, scrolled by `help_scroll`.
///
/// Skipped below 60 columns, where the modal would collapse to nothing.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame.area().centered(Constraint::Percentage(80), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help (j/k scroll, ? or Esc to close) ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme)).block(block).wrap(Wrap { trim: false }).scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    let heading = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)))
    };
    Text::from(vec![
        heading("Global"),
        Line::from("  1-4 / Tab       Switch section (Shift-Tab goes back)"),
        Line::from("  u               Account menu and log out"),
        Line::from("  ?               Open / close this help"),
        Line::from("  q / Ctrl-c      Quit"),
        Line::from(""),
        heading("Dashboard"),
        Line::from("  j / k           Select a recent review"),
        Line::from("  Enter           Open it in the review workspace"),
        Line::from("  r               Refresh statistics"),
        Line::from(""),
        heading("Code Review"),
        Line::from("  i               Edit code (Esc to stop, Ctrl-s to submit)"),
        Line::from("  s               Submit for review"),
        Line::from("  [ / ]           Previous / next language"),
        Line::from("  h / l           Previous / next result tab"),
        Line::from("  j / k           Scroll results"),
        Line::from("  d               Toggle diff of refactored code"),
        Line::from("  a               Apply refactored code to the editor"),
        Line::from("  y               Copy refactored code"),
        Line::from("  w               Save refactored code to the download folder"),
        Line::from("  o               Open a file into the editor"),
        Line::from("  c               Clear editor and results"),
        Line::from(""),
        heading("Converter"),
        Line::from("  i / s / o / c   Edit, convert, open file, clear"),
        Line::from("  [ / ]           Previous / next target language"),
        Line::from("  y / w           Copy / save converted code"),
        Line::from(""),
        heading("History"),
        Line::from("  j / k / g / G   Move selection"),
        Line::from("  Enter           Open review"),
        Line::from("  d / Delete      Delete review (asks first)"),
        Line::from("  r               Reload"),
    ])
}
