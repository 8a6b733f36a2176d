//! Dashboard: stat cards, recent reviews and the language breakdown.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, List, ListItem, ListState, Paragraph},
};

use coderefine_core::dashboard::Dashboard;
use coderefine_core::types::ReviewHistoryRecord;
use coderefine_core::Language;

use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

pub fn render_dashboard(frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme) {
    let [cards, body] = area.layout(&Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]));
    let [recent, languages] =
        body.layout(&Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]));

    render_cards(frame, cards, dashboard, theme);
    render_recent(frame, recent, dashboard, theme);
    render_languages(frame, languages, dashboard, theme);
}

fn render_cards(frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme) {
    let [total, avg, issues] = area.layout(&Layout::horizontal([Constraint::Fill(1); 3]));
    let placeholder = if dashboard.stats_loading { "..." } else { "-" };

    let (total_text, avg_text, avg_color, issues_text) = match &dashboard.stats {
        Some(stats) => {
            let avg = dashboard.average_score().unwrap_or(0);
            (stats.total.to_string(), format!("{avg}/100"), theme.score(avg), stats.total_issues.to_string())
        }
        None => (placeholder.to_owned(), placeholder.to_owned(), theme.muted, placeholder.to_owned()),
    };

    stat_card(frame, total, " Reviews ", total_text, theme.text, theme);
    stat_card(frame, avg, " Average score ", avg_text, avg_color, theme);
    stat_card(frame, issues, " Issues found ", issues_text, theme.text, theme);
}

fn stat_card(
    frame: &mut Frame,
    area: Rect,
    title: &'static str,
    value: String,
    color: ratatui::style::Color,
    theme: &Theme,
) {
    frame.render_widget(
        Paragraph::new(Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)))
            .block(panel_block(title, false, theme))
            .centered(),
        area,
    );
}

fn render_recent(frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme) {
    let block = panel_block(" Recent reviews ", true, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if dashboard.recent.is_empty() {
        let text = if dashboard.recent_loading {
            "Loading..."
        } else {
            "No reviews yet. Press 2 to start one."
        };
        frame.render_widget(Paragraph::new(text).style(Style::default().fg(theme.muted)), inner);
        return;
    }

    let items: Vec<ListItem> = dashboard.recent.iter().map(|r| record_row(r, theme)).collect();
    let mut list_state = ListState::default().with_selected(Some(dashboard.selected));
    frame.render_stateful_widget(
        List::new(items).highlight_style(Style::default().bg(theme.selection_bg)),
        inner,
        &mut list_state,
    );
}

/// One list row: score, language, issue total and timestamp.
pub fn record_row<'a>(record: &'a ReviewHistoryRecord, theme: &Theme) -> ListItem<'a> {
    let language = Language::from_name(&record.language);
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:>3} ", record.score),
            Style::default().fg(theme.score(record.score)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{:<11}", language.label()), Style::default().fg(theme.accent)),
        Span::styled(format!("{:>3} issues  ", record.issue_total()), Style::default().fg(theme.text)),
        Span::styled(record.created_display(), Style::default().fg(theme.muted)),
    ]))
}

fn render_languages(frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme) {
    let block = panel_block(" Languages ", false, theme);
    let langs = dashboard.stats.as_ref().map(|s| s.languages_by_count()).unwrap_or_default();
    if langs.is_empty() {
        let inner = inner_rect(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new("No data").style(Style::default().fg(theme.muted)), inner);
        return;
    }

    let bars: Vec<Bar> = langs
        .iter()
        .map(|(name, count)| {
            Bar::default()
                .value(u64::from(*count))
                .label(Line::from(Language::from_name(name).label().to_owned()))
                .style(Style::default().fg(theme.accent))
        })
        .collect();
    frame.render_widget(
        BarChart::default()
            .block(block)
            .direction(ratatui::layout::Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .data(BarGroup::default().bars(&bars)),
        area,
    );
}
