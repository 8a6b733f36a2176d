//! Converter workspace: source on the left, converted code and complexity on the right.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use coderefine_core::convert::ConvertPhase;
use coderefine_core::types::ComplexityAnalysis;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use crate::ui::editor::render_editor;
use crate::ui::layout::{inner_rect, panel_block, spinner_frame};

pub fn render_converter(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let [source, output] =
        area.layout(&Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]));

    let editing = state.mode == Mode::Insert;
    render_editor(
        frame,
        source,
        Line::from(" Source "),
        &state.converter.code,
        editing,
        &mut state.editor_offset,
        theme,
    );

    let title = Line::from(vec![
        Span::raw(" Output "),
        Span::styled(
            format!("[{}]", state.converter.target.label()),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ]);
    frame.render_widget(panel_block(title, !editing, theme), output);
    let inner = inner_rect(output);

    match &state.converter.phase {
        ConvertPhase::Idle => {
            frame.render_widget(
                Paragraph::new("Pick a target with [ and ], then press s to convert.")
                    .style(Style::default().fg(theme.muted)),
                inner,
            );
        }
        ConvertPhase::Converting => {
            let text = format!("{} Converting...", spinner_frame(state.tick_count));
            frame.render_widget(Paragraph::new(text).style(Style::default().fg(theme.accent)), inner);
        }
        ConvertPhase::Failed(message) => {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(
                        "Conversion failed",
                        Style::default().fg(theme.notice_error).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(message.as_str()),
                ])
                .wrap(Wrap { trim: false }),
                inner,
            );
        }
        ConvertPhase::Ready => {
            let Some(result) = state.converter.result.as_ref() else {
                return;
            };
            let [code, footer] =
                inner.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(4)]));
            let lines = state
                .converted_highlight
                .lines(&result.converted_code, state.converter.target.file_extension())
                .to_vec();
            frame.render_widget(Paragraph::new(lines).scroll((state.result_scroll, 0)), code);
            frame.render_widget(
                Paragraph::new(complexity_lines(&result.complexity_analysis, &result.explanation, theme))
                    .wrap(Wrap { trim: true }),
                footer,
            );
        }
    }
}

fn complexity_lines<'a>(c: &'a ComplexityAnalysis, explanation: &'a str, theme: &Theme) -> Vec<Line<'a>> {
    let label = Style::default().fg(theme.muted);
    let value = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Time   ", label),
            Span::styled(c.original_time.as_str(), value),
            Span::styled(" -> ", label),
            Span::styled(c.new_time.as_str(), value),
        ]),
        Line::from(vec![
            Span::styled("Space  ", label),
            Span::styled(c.original_space.as_str(), value),
            Span::styled(" -> ", label),
            Span::styled(c.new_space.as_str(), value),
        ]),
    ];
    if !explanation.is_empty() {
        lines.push(Line::from(Span::styled(explanation, Style::default().fg(theme.text))));
    }
    lines
}
