//! History list and the delete confirmation dialog.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use coderefine_core::history::HistoryBrowser;

use crate::theme::Theme;
use crate::ui::dashboard::record_row;
use crate::ui::layout::{inner_rect, panel_block, spinner_frame};

pub fn render_history(frame: &mut Frame, area: Rect, history: &HistoryBrowser, tick: u64, theme: &Theme) {
    let title = format!(" History ({}) ", history.records.len());
    let [list, preview] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(8)]));

    frame.render_widget(panel_block(title, true, theme), list);
    let inner = inner_rect(list);

    if history.records.is_empty() {
        let (text, color) = if history.loading {
            (format!("{} Loading history...", spinner_frame(tick)), theme.accent)
        } else if let Some(error) = &history.error {
            (format!("Could not load history: {error}"), theme.notice_error)
        } else {
            ("No reviews yet.".to_owned(), theme.muted)
        };
        frame.render_widget(Paragraph::new(text).style(Style::default().fg(color)), inner);
    } else {
        let items: Vec<ListItem> = history
            .records
            .iter()
            .map(|r| {
                if history.deleting.contains(&r.id) {
                    ListItem::new(Line::from(Span::styled(
                        format!("  deleting #{}...", r.id),
                        Style::default().fg(theme.muted),
                    )))
                } else {
                    record_row(r, theme)
                }
            })
            .collect();
        let mut list_state = ListState::default().with_selected(Some(history.selected));
        frame.render_stateful_widget(
            List::new(items)
                .highlight_style(Style::default().bg(theme.selection_bg))
                .highlight_symbol("> "),
            inner,
            &mut list_state,
        );
    }

    frame.render_widget(panel_block(" Preview ", false, theme), preview);
    if let Some(record) = history.selected_record() {
        let lines: Vec<Line> = record
            .original_code
            .lines()
            .take(usize::from(inner_rect(preview).height))
            .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text))))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner_rect(preview));
    }
}

/// Modal asking to confirm deletion of `history.pending_delete`.
pub fn render_confirm_delete(frame: &mut Frame, history: &HistoryBrowser, theme: &Theme) {
    let Some(id) = history.pending_delete else {
        return;
    };
    let area = frame.area().centered(Constraint::Length(44), Constraint::Length(5));
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Delete review ")
        .border_style(Style::default().fg(theme.notice_error));
    let body = vec![
        Line::from(format!("Delete review #{id}? This cannot be undone.")),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.notice_error).add_modifier(Modifier::BOLD)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]),
    ];
    frame.render_widget(Paragraph::new(body).block(block).wrap(Wrap { trim: true }).centered(), area);
}
