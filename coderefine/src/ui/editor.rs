//! Code editor pane shared by the review and converter screens.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use coderefine_core::buffer::CodeBuffer;

use crate::theme::Theme;
use crate::ui::layout::{column_after, inner_rect, panel_block};

/// Width of the line-number gutter including the trailing space.
const GUTTER: u16 = 5;

/// Draws `buffer` with a line-number gutter.
///
/// `offset` is the first visible line; it is moved so the cursor row stays on
/// screen. The terminal cursor is placed only while `editing`.
pub fn render_editor(
    frame: &mut Frame,
    area: Rect,
    title: Line<'_>,
    buffer: &CodeBuffer,
    editing: bool,
    offset: &mut usize,
    theme: &Theme,
) {
    frame.render_widget(panel_block(title, editing, theme), area);
    let inner = inner_rect(area);
    if inner.height == 0 || inner.width <= GUTTER {
        return;
    }

    let (row, col) = buffer.cursor_pos();
    *offset = scroll_to_cursor(*offset, row, usize::from(inner.height));

    if buffer.text().is_empty() && !editing {
        frame.render_widget(
            Paragraph::new("Paste or type code here (i to edit, o to open a file)")
                .style(Style::default().fg(theme.muted)),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = buffer
        .text()
        .split('\n')
        .enumerate()
        .skip(*offset)
        .take(usize::from(inner.height))
        .map(|(i, text)| {
            Line::from(vec![
                Span::styled(format!("{:>4} ", i + 1), Style::default().fg(theme.muted)),
                Span::styled(text, Style::default().fg(theme.text)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    if editing {
        let x = column_after(inner.x + GUTTER, col);
        let y = column_after(inner.y, row - *offset);
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), y));
    }
}

/// Smallest change to `offset` that keeps `row` within a window of `height`.
pub fn scroll_to_cursor(offset: usize, row: usize, height: usize) -> usize {
    if height == 0 {
        return offset;
    }
    if row < offset {
        row
    } else if row >= offset + height {
        row + 1 - height
    } else {
        offset
    }
}
