//! UI rendering for coderefine.
//!
//! `render()` is the single entry point called from the event loop's
//! `terminal.draw()` closure. Layout arithmetic and shared chrome live in
//! `layout.rs`; each section has its own file.

pub mod auth;
pub mod converter;
pub mod dashboard;
pub mod editor;
pub mod help;
pub mod highlight;
pub mod history;
pub mod keybindings;
pub mod layout;
pub mod overlay;
pub mod review;

use ratatui::{Frame, style::Style, widgets::Block};

use crate::app::{AppState, Mode, Section};
use crate::theme::Theme;
use layout::{compute_layout, render_sidebar, render_status_bar};

/// Renders one complete frame.
///
/// Without a session only the auth card and the status bar are drawn. The
/// sidebar rect is written back into `state` for mouse hit-testing on the
/// next event.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    frame.render_widget(Block::default().style(Style::default().bg(theme.background)), frame.area());
    let [sidebar, main, status_bar] = compute_layout(frame.area());

    if !state.is_logged_in() {
        state.sidebar_area = ratatui::layout::Rect::default();
        auth::render_auth(frame, sidebar.union(main), &state.auth, state.tick_count, theme);
        render_status_bar(frame, status_bar, state, theme);
        return;
    }

    state.sidebar_area = sidebar;
    render_sidebar(frame, sidebar, state, theme);

    match state.section {
        Section::Dashboard => dashboard::render_dashboard(frame, main, &state.dashboard, theme),
        Section::Review => review::render_review(frame, main, state, theme),
        Section::Converter => converter::render_converter(frame, main, state, theme),
        Section::History => history::render_history(frame, main, &state.history, state.tick_count, theme),
    }

    render_status_bar(frame, status_bar, state, theme);

    // Overlays go last so they sit on top.
    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::ConfirmDelete => history::render_confirm_delete(frame, &state.history, theme),
        Mode::UserMenu => overlay::render_user_menu(frame, state, theme),
        Mode::PathPrompt(kind) => overlay::render_path_prompt(frame, kind, &state.prompt, theme),
        Mode::Normal | Mode::Insert => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    use coderefine_core::history::HistoryBrowser;
    use coderefine_core::types::{ReviewHistoryRecord, ReviewResult, ReviewSummary, Session, User};

    fn draw(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
        terminal.draw(|frame| render(frame, state, &Theme::dark())).unwrap();
        terminal.backend().buffer().content.iter().map(|c| c.symbol()).collect()
    }

    fn logged_in() -> AppState {
        let mut state = AppState::default();
        state.bootstrap(Some(Session {
            token: "t".into(),
            user: User { username: "ada".into(), email: "ada@example.com".into() },
        }));
        state.drain_outbox();
        state
    }

    #[test]
    fn logged_out_shows_auth_card() {
        let mut state = AppState::default();
        let content = draw(&mut state);
        assert!(content.contains("Sign in"));
        assert!(content.contains("Password"));
        assert!(!content.contains("Dashboard"));
    }

    #[test]
    fn review_result_shows_score_and_badges() {
        let mut state = logged_in();
        state.goto(Section::Review);
        state.review.code.set_text("print(1)");
        let ticket = state.review.begin_submit().unwrap();
        state.review.complete_submit(
            ticket.seq,
            Ok(ReviewResult {
                review_id: Some(1),
                summary: ReviewSummary { score: 85, high: 2, ..Default::default() },
                issues: Vec::new(),
                refactored_code: String::new(),
                improvements: Vec::new(),
            }),
        );
        let content = draw(&mut state);
        assert!(content.contains("Score 85/100"));
        assert!(content.contains("High 2"));
        assert!(content.contains("print(1)"));
    }

    #[test]
    fn editing_a_very_long_line_keeps_cursor_on_screen() {
        let mut state = logged_in();
        state.goto(Section::Review);
        state.review.code.set_text("x".repeat(70_000));
        state.mode = Mode::Insert;

        let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
        terminal.draw(|frame| render(frame, &mut state, &Theme::dark())).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        assert!(cursor.x < 120);
        assert!(cursor.y < 32);
    }

    #[test]
    fn delete_confirmation_is_drawn_over_history() {
        let mut state = logged_in();
        state.section = Section::History;
        state.history = HistoryBrowser::default();
        let ticket = state.history.begin_refresh(50);
        state.history.complete_refresh(
            ticket,
            Ok(vec![ReviewHistoryRecord {
                id: 7,
                language: "python".into(),
                score: 45,
                critical_count: 1,
                high_count: 0,
                medium_count: 0,
                low_count: 0,
                created_at: "2024-05-01T10:00:00".into(),
                original_code: "x = 1".into(),
                refactored_code: None,
                issues_json: None,
            }]),
        );
        state.ask_delete_selected();
        let content = draw(&mut state);
        assert!(content.contains("Delete review #7?"));
    }
}
