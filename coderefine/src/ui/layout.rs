//! Layout arithmetic and shared chrome: panel borders, sidebar and status bar.
//!
//! Recomputed inside `terminal.draw()` on every frame, so the layout always
//! follows the current terminal size. Rects are never stored across frames
//! except the sidebar area cached for mouse hit-testing.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, Paragraph},
};

use crate::app::{AppState, Mode, NoticeLevel, Section};
use crate::theme::Theme;

/// Sidebar width in columns; hidden below [`SIDEBAR_MIN_WIDTH`].
const SIDEBAR_WIDTH: u16 = 24;
const SIDEBAR_MIN_WIDTH: u16 = 80;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Returns `[sidebar, main, status_bar]`. The sidebar collapses to zero
/// width on narrow terminals.
pub fn compute_layout(area: Rect) -> [Rect; 3] {
    let [body, status_bar] = area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));
    let sidebar_width = if area.width >= SIDEBAR_MIN_WIDTH { SIDEBAR_WIDTH } else { 0 };
    let [sidebar, main] =
        body.layout(&Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Fill(1)]));
    [sidebar, main, status_bar]
}

/// Strips the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered block; focused panels get a thick accent border.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered().title(title).border_type(border_type).border_style(border_style)
}

/// Column `chars` cells right of `base`, clamped to the terminal's range.
pub fn column_after(base: u16, chars: usize) -> u16 {
    base.saturating_add(u16::try_from(chars).unwrap_or(u16::MAX))
}

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

/// Section list plus the signed-in user at the bottom.
pub fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    if area.width == 0 {
        return;
    }
    let block = panel_block(" CodeRefine ", false, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let [nav, user] = inner.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(2)]));

    let items: Vec<ListItem> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let label = format!(" {} {}", i + 1, section.label());
            let style = if *section == state.section {
                Style::default().fg(theme.accent).bg(theme.selection_bg).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(Span::styled(label, style)))
        })
        .collect();
    frame.render_widget(List::new(items), nav);

    if let Some(session) = &state.session {
        let lines = vec![
            Line::from(Span::styled(
                session.user.username.clone(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("u: account", Style::default().fg(theme.muted))),
        ];
        frame.render_widget(Paragraph::new(lines), user);
    }
}

/// Maps a click inside the sidebar to a section.
pub fn section_at(sidebar: Rect, column: u16, row: u16) -> Option<Section> {
    let inner = inner_rect(sidebar);
    if inner.width == 0 || !inner.contains(ratatui::layout::Position { x: column, y: row }) {
        return None;
    }
    Section::ALL.get(usize::from(row - inner.y)).copied()
}

/// One-row status bar: mode, busy spinner, current notice or key hint.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::PathPrompt(_) => (" OPEN ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay | Mode::ConfirmDelete | Mode::UserMenu => {
            (" NORMAL ", theme.status_mode_normal)
        }
    };

    let mut spans = vec![Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD))];

    if is_busy(state) {
        spans.push(Span::styled(
            format!(" {} working ", spinner_frame(state.tick_count)),
            Style::default().fg(theme.accent),
        ));
    }

    match &state.notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => theme.notice_info,
                NoticeLevel::Error => theme.notice_error,
            };
            spans.push(Span::styled(format!(" {}", notice.text), Style::default().fg(color)));
        }
        None => spans.push(Span::styled(
            format!(" {}", key_hint(state)),
            Style::default().fg(theme.muted),
        )),
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

fn is_busy(state: &AppState) -> bool {
    state.auth.is_busy()
        || state.review.is_busy()
        || state.converter.is_busy()
        || state.history.loading
        || !state.history.deleting.is_empty()
        || state.dashboard.is_loading()
}

fn key_hint(state: &AppState) -> &'static str {
    if !state.is_logged_in() {
        return "Tab next field  Ctrl-t login/register  Enter submit  Ctrl-c quit";
    }
    match (state.mode, state.section) {
        (Mode::Insert, _) => "Esc stop editing  Ctrl-s submit",
        (Mode::PathPrompt(_), _) => "Enter open  Esc cancel",
        (Mode::ConfirmDelete, _) => "y delete  n cancel",
        (_, Section::Dashboard) => "j/k select  Enter open  r refresh  ? help",
        (_, Section::Review) => "i edit  s submit  [/] language  h/l view  ? help",
        (_, Section::Converter) => "i edit  s convert  [/] target  y copy  ? help",
        (_, Section::History) => "j/k select  Enter open  d delete  r refresh  ? help",
    }
}
