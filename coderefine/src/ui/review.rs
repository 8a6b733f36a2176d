//! Code review workspace: editor on the left, result tabs on the right.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Tabs, Wrap},
};

use coderefine_core::review::{ResultView, ReviewPhase};
use coderefine_core::types::{Issue, ReviewResult, Severity};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use crate::ui::editor::render_editor;
use crate::ui::highlight;
use crate::ui::layout::{inner_rect, panel_block, spinner_frame};

pub fn render_review(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let [editor, results] =
        area.layout(&Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]));

    let title = Line::from(vec![
        Span::raw(" Code "),
        Span::styled(
            format!("[{}]", state.review.language.label()),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ]);
    let editing = state.mode == Mode::Insert;
    render_editor(frame, editor, title, &state.review.code, editing, &mut state.editor_offset, theme);

    render_results(frame, results, state, theme);
}

fn render_results(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    frame.render_widget(panel_block(" Results ", state.mode != Mode::Insert, theme), area);
    let inner = inner_rect(area);

    if let Some(id) = state.review.loading_id {
        let text = format!("{} Loading review #{id}...", spinner_frame(state.tick_count));
        frame.render_widget(Paragraph::new(text).style(Style::default().fg(theme.accent)), inner);
        return;
    }

    match &state.review.phase {
        ReviewPhase::Idle => {
            frame.render_widget(
                Paragraph::new("Write some code and press s to review it.")
                    .style(Style::default().fg(theme.muted)),
                inner,
            );
            return;
        }
        ReviewPhase::Submitting => {
            let text = format!("{} Analysing your code...", spinner_frame(state.tick_count));
            frame.render_widget(Paragraph::new(text).style(Style::default().fg(theme.accent)), inner);
            return;
        }
        ReviewPhase::Failed(message) => {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled("Review failed", Style::default().fg(theme.notice_error).add_modifier(Modifier::BOLD))),
                    Line::from(message.as_str()),
                ])
                .wrap(Wrap { trim: false }),
                inner,
            );
            return;
        }
        ReviewPhase::ResultReady => {}
    }

    let [tabs, body] = inner.layout(&Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]));
    let selected = ResultView::ALL.iter().position(|v| *v == state.review.view).unwrap_or(0);
    frame.render_widget(
        Tabs::new(ResultView::ALL.iter().map(|v| v.label()))
            .select(selected)
            .style(Style::default().fg(theme.muted))
            .highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
        tabs,
    );

    let Some(result) = state.review.result.as_ref() else {
        return;
    };

    match state.review.view {
        ResultView::Analysis => render_analysis(frame, body, result, state.result_scroll, theme),
        ResultView::Refactored => {
            let lines: Vec<Line> = if state.show_diff {
                highlight::diff_lines(&state.review.refactored_diff(), theme)
            } else if result.has_refactored_code() {
                state
                    .refactored_highlight
                    .lines(&result.refactored_code, state.review.language.file_extension())
                    .to_vec()
            } else {
                vec![Line::from(Span::styled(
                    "No refactored code was returned.",
                    Style::default().fg(theme.muted),
                ))]
            };
            frame.render_widget(Paragraph::new(lines).scroll((state.result_scroll, 0)), body);
        }
        ResultView::Improvements => {
            let lines: Vec<Line> = if result.improvements.is_empty() {
                vec![Line::from(Span::styled("No improvements listed.", Style::default().fg(theme.muted)))]
            } else {
                result
                    .improvements
                    .iter()
                    .map(|item| {
                        Line::from(vec![
                            Span::styled("* ", Style::default().fg(theme.score_pass)),
                            Span::styled(item.as_str(), Style::default().fg(theme.text)),
                        ])
                    })
                    .collect()
            };
            frame.render_widget(
                Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((state.result_scroll, 0)),
                body,
            );
        }
    }
}

fn render_analysis(frame: &mut Frame, area: Rect, result: &ReviewResult, scroll: u16, theme: &Theme) {
    let [gauge, badges, rest] = area.layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ]));

    let score = result.summary.score;
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(theme.score(score)))
            .percent(u16::from(score))
            .label(format!("Score {score}/100")),
        gauge,
    );

    let mut spans = Vec::new();
    for severity in Severity::ALL {
        spans.push(severity_badge(severity, result.summary.count(severity), theme));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), badges);

    let mut lines = Vec::new();
    if !result.summary.overview.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(result.summary.overview.as_str(), Style::default().fg(theme.text))));
    }
    lines.push(Line::from(""));
    if result.issues.is_empty() {
        lines.push(Line::from(Span::styled("No issues found.", Style::default().fg(theme.score_pass))));
    }
    for issue in &result.issues {
        lines.extend(issue_lines(issue, theme));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((scroll, 0)), rest);
}

fn severity_badge(severity: Severity, count: u32, theme: &Theme) -> Span<'static> {
    Span::styled(
        format!(" {} {count} ", severity.label()),
        Style::default().fg(theme.background).bg(theme.severity(severity)).add_modifier(Modifier::BOLD),
    )
}

fn issue_lines<'a>(issue: &'a Issue, theme: &Theme) -> Vec<Line<'a>> {
    let mut header = vec![
        Span::styled(
            format!("[{}] ", issue.severity.label()),
            Style::default().fg(theme.severity(issue.severity)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(issue.title.as_str(), Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
    ];
    if let Some(hint) = &issue.line_hint {
        header.push(Span::styled(format!("  ({hint})"), Style::default().fg(theme.muted)));
    }

    let mut lines = vec![Line::from(header)];
    if !issue.category.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", issue.category),
            Style::default().fg(theme.accent),
        )));
    }
    if !issue.description.is_empty() {
        lines.push(Line::from(format!("  {}", issue.description)));
    }
    if let Some(suggestion) = &issue.suggestion {
        lines.push(Line::from(Span::styled(
            format!("  Fix: {suggestion}"),
            Style::default().fg(theme.score_pass),
        )));
    }
    lines.push(Line::from(""));
    lines
}
