//! Sign-in / registration screen shown while no session exists.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Tabs},
};

use coderefine_core::auth::{AuthField, AuthForm, AuthTab};

use crate::theme::Theme;
use crate::ui::layout::{column_after, inner_rect, panel_block, spinner_frame};

pub fn render_auth(frame: &mut Frame, area: Rect, form: &AuthForm, tick: u64, theme: &Theme) {
    let height = 6 + 3 * form.fields().len() as u16;
    let card = area.centered(Constraint::Length(56.min(area.width)), Constraint::Length(height.min(area.height)));
    frame.render_widget(Clear, card);
    frame.render_widget(panel_block(" CodeRefine ", true, theme), card);
    let inner = inner_rect(card);

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(form.fields().iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Fill(1));
    let rows = Layout::vertical(constraints).split(inner);

    let selected = match form.tab {
        AuthTab::Login => 0,
        AuthTab::Register => 1,
    };
    frame.render_widget(
        Tabs::new(["Sign in", "Create account"])
            .select(selected)
            .style(Style::default().fg(theme.muted))
            .highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
        rows[0],
    );

    for (field, rect) in form.fields().iter().zip(rows.iter().skip(1)) {
        render_field(frame, *rect, form, *field, theme);
    }

    let footer = if form.is_busy() {
        let verb = match form.tab {
            AuthTab::Login => "Signing in",
            AuthTab::Register => "Creating account",
        };
        Line::from(Span::styled(
            format!("{} {verb}...", spinner_frame(tick)),
            Style::default().fg(theme.accent),
        ))
    } else if let Some(error) = &form.error {
        Line::from(Span::styled(error.clone(), Style::default().fg(theme.notice_error)))
    } else {
        Line::from(Span::styled(
            "Enter submit  Ctrl-t switch form",
            Style::default().fg(theme.muted),
        ))
    };
    if let Some(last) = rows.last() {
        frame.render_widget(Paragraph::new(footer), *last);
    }
}

fn render_field(frame: &mut Frame, area: Rect, form: &AuthForm, field: AuthField, theme: &Theme) {
    let (title, value) = match field {
        AuthField::Username => (" Username ", form.username.clone()),
        AuthField::Email => (" Email ", form.email.clone()),
        AuthField::Password => (" Password ", "*".repeat(form.password.chars().count())),
    };
    let focused = form.field == field;
    frame.render_widget(
        Paragraph::new(value.as_str())
            .style(Style::default().fg(theme.text))
            .block(panel_block(title, focused, theme)),
        area,
    );
    if focused && !form.is_busy() {
        let x = column_after(area.x + 1, value.chars().count());
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}
