//! Small modals drawn on top of the current section.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};

use crate::app::{AppState, PromptKind};
use crate::ui::layout::column_after;
use crate::theme::Theme;

/// Account card with the profile from `/auth/me` and the logout key.
pub fn render_user_menu(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let Some(session) = &state.session else {
        return;
    };
    let area = frame.area().centered(Constraint::Length(46), Constraint::Length(8));
    frame.render_widget(Clear, area);

    let label = Style::default().fg(theme.muted);
    let mut lines = vec![
        Line::from(Span::styled(
            session.user.username.as_str(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::styled("Email    ", label), Span::raw(session.user.email.as_str())]),
    ];
    match &state.profile {
        Some(profile) => {
            lines.push(Line::from(vec![
                Span::styled("Reviews  ", label),
                Span::raw(profile.review_count.to_string()),
            ]));
            if !profile.created_at.is_empty() {
                let joined = profile.created_at.split('T').next().unwrap_or_default();
                lines.push(Line::from(vec![Span::styled("Joined   ", label), Span::raw(joined.to_owned())]));
            }
        }
        None => lines.push(Line::from(Span::styled("Loading profile...", label))),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("l", Style::default().fg(theme.notice_error).add_modifier(Modifier::BOLD)),
        Span::raw(" log out   "),
        Span::styled("Esc", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
        Span::raw(" close"),
    ]));

    let block = Block::bordered().title(" Account ").border_style(Style::default().fg(theme.border_active));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Single-line prompt for a file path to load into a workspace.
pub fn render_path_prompt(frame: &mut Frame, kind: PromptKind, input: &str, theme: &Theme) {
    let width = frame.area().width.saturating_sub(4).min(72);
    let area = frame.area().centered(Constraint::Length(width), Constraint::Length(3));
    frame.render_widget(Clear, area);

    let title = match kind {
        PromptKind::UploadReview => " Open file for review ",
        PromptKind::UploadConverter => " Open file to convert ",
    };
    let block = Block::bordered().title(title).border_style(Style::default().fg(theme.border_active));

    // Keep the tail of long paths visible.
    let visible = usize::from(width.saturating_sub(3));
    let count = input.chars().count();
    let shown: String = input.chars().skip(count.saturating_sub(visible)).collect();
    let cursor_x = column_after(area.x + 1, shown.chars().count());

    frame.render_widget(Paragraph::new(shown).style(Style::default().fg(theme.text)).block(block), area);
    frame.set_cursor_position((cursor_x, area.y + 1));
}
