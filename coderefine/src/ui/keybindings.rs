//! Keybinding dispatcher for coderefine.
//!
//! Translates crossterm key, paste and mouse events into `AppState` mutations
//! and returns a `KeyAction` telling the event loop whether to continue or
//! quit. Without a session every key goes to the auth form; otherwise the
//! dispatcher branches on `state.mode`, then on `state.section`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use coderefine_core::buffer::CodeBuffer;
use coderefine_core::review::ResultView;

use crate::app::{AppState, Mode, PromptKind, Section};
use crate::clipboard;
use crate::ui::layout::section_at;

/// Control-flow signal returned from the dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Dispatches a key event to the handler matching the current screen and mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    if !state.is_logged_in() {
        return handle_auth(key, state);
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmDelete => handle_confirm_delete(key, state),
        Mode::UserMenu => handle_user_menu(key, state),
        Mode::PathPrompt(kind) => handle_prompt(key, kind, state),
        Mode::Insert => handle_insert(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Auth screen
// ---------------------------------------------------------------------------

fn handle_auth(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('t') if ctrl => state.auth.toggle_tab(),
        KeyCode::F(2) => state.auth.toggle_tab(),
        KeyCode::Tab | KeyCode::Down => state.auth.next_field(),
        KeyCode::BackTab | KeyCode::Up => state.auth.prev_field(),
        KeyCode::Enter => state.submit_auth(),
        KeyCode::Backspace => state.auth.backspace(),
        KeyCode::Char(c) if !ctrl => state.auth.insert_char(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_global_key(key, state) {
        return action;
    }
    match state.section {
        Section::Dashboard => handle_dashboard(key, state),
        Section::Review => handle_review(key, state),
        Section::Converter => handle_converter(key, state),
        Section::History => handle_history(key, state),
    }
    KeyAction::Continue
}

/// Section switching, overlays and quit. Returns `None` for keys the
/// current section should see.
fn handle_global_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    match key.code {
        KeyCode::Char('q') => Some(KeyAction::Quit),
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            Some(KeyAction::Continue)
        }
        KeyCode::Char('u') => {
            state.mode = Mode::UserMenu;
            Some(KeyAction::Continue)
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = usize::from(c as u8 - b'1');
            state.goto(Section::ALL[index]);
            Some(KeyAction::Continue)
        }
        KeyCode::Tab => {
            state.goto(state.section.next());
            Some(KeyAction::Continue)
        }
        KeyCode::BackTab => {
            state.goto(state.section.prev());
            Some(KeyAction::Continue)
        }
        _ => None,
    }
}

fn handle_dashboard(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.dashboard.select_next(),
        KeyCode::Char('k') | KeyCode::Up => state.dashboard.select_prev(),
        KeyCode::Enter => {
            if let Some(id) = state.dashboard.selected_id() {
                state.open_review(id);
            }
        }
        KeyCode::Char('r') => state.refresh_dashboard(),
        _ => {}
    }
}

fn handle_review(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('i') => state.mode = Mode::Insert,
        KeyCode::Char('s') => state.submit_review(),
        KeyCode::Char('[') => state.review.prev_language(),
        KeyCode::Char(']') => state.review.next_language(),
        KeyCode::Char('h') | KeyCode::Left => {
            state.review.prev_view();
            state.result_scroll = 0;
        }
        KeyCode::Char('l') | KeyCode::Right => {
            state.review.next_view();
            state.result_scroll = 0;
        }
        KeyCode::Char('d') => {
            state.show_diff = !state.show_diff;
            state.review.select_view(ResultView::Refactored);
            state.result_scroll = 0;
        }
        KeyCode::Char('a') => state.apply_refactored(),
        KeyCode::Char('y') => match state.review.refactored_code() {
            Some(code) => {
                clipboard::copy(code.to_owned());
                state.notify("Copied refactored code");
            }
            None => state.notify_error("No refactored code to copy"),
        },
        KeyCode::Char('w') => state.download_refactored(),
        KeyCode::Char('o') => state.open_prompt(PromptKind::UploadReview),
        KeyCode::Char('c') => state.clear_review(),
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') => state.result_scroll = 0,
        _ => {}
    }
}

fn handle_converter(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('i') => state.mode = Mode::Insert,
        KeyCode::Char('s') => state.submit_convert(),
        KeyCode::Char('[') => state.converter.prev_target(),
        KeyCode::Char(']') => state.converter.next_target(),
        KeyCode::Char('y') => {
            let code = state.converter.converted_download().map(|d| d.contents);
            match code {
                Some(code) => {
                    clipboard::copy(code);
                    state.notify("Copied converted code");
                }
                None => state.notify_error("No converted code to copy"),
            }
        }
        KeyCode::Char('w') => state.download_converted(),
        KeyCode::Char('o') => state.open_prompt(PromptKind::UploadConverter),
        KeyCode::Char('c') => state.clear_converter(),
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') => state.result_scroll = 0,
        _ => {}
    }
}

fn handle_history(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.history.select_next(),
        KeyCode::Char('k') | KeyCode::Up => state.history.select_prev(),
        KeyCode::Char('g') | KeyCode::Home => state.history.select_first(),
        KeyCode::Char('G') | KeyCode::End => state.history.select_last(),
        KeyCode::Enter => {
            if let Some(id) = state.history.selected_id() {
                state.open_review(id);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => state.ask_delete_selected(),
        KeyCode::Char('r') => state.refresh_history(),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Buffer of the section being edited; `None` on sections without an editor.
fn active_buffer(state: &mut AppState) -> Option<&mut CodeBuffer> {
    match state.section {
        Section::Review => Some(&mut state.review.code),
        Section::Converter => Some(&mut state.converter.code),
        Section::Dashboard | Section::History => None,
    }
}

fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            return KeyAction::Continue;
        }
        KeyCode::Char('s') if ctrl => {
            match state.section {
                Section::Review => state.submit_review(),
                Section::Converter => state.submit_convert(),
                Section::Dashboard | Section::History => {}
            }
            return KeyAction::Continue;
        }
        _ => {}
    }

    let Some(buffer) = active_buffer(state) else {
        state.mode = Mode::Normal;
        return KeyAction::Continue;
    };
    match key.code {
        KeyCode::Enter => buffer.insert_char('\n'),
        KeyCode::Tab => buffer.insert_str("    "),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Up => buffer.move_up(),
        KeyCode::Down => buffer.move_down(),
        KeyCode::Home => buffer.move_home(),
        KeyCode::End => buffer.move_end(),
        KeyCode::Char(c) if !ctrl => buffer.insert_char(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') | KeyCode::Up => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

fn handle_confirm_delete(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => state.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => state.cancel_delete(),
        _ => {}
    }
    KeyAction::Continue
}

fn handle_user_menu(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('l') => state.logout(),
        KeyCode::Esc | KeyCode::Char('u') | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

fn handle_prompt(key: KeyEvent, kind: PromptKind, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => state.finish_prompt(kind),
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Backspace => {
            state.prompt.pop();
        }
        KeyCode::Char(c) if !ctrl => state.prompt.push(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Paste and mouse
// ---------------------------------------------------------------------------

/// Routes bracketed-paste text to whatever currently takes typed input.
pub fn handle_paste(text: &str, state: &mut AppState) {
    if !state.is_logged_in() {
        for c in text.chars().filter(|c| !c.is_control()) {
            state.auth.insert_char(c);
        }
        return;
    }
    match state.mode {
        Mode::PathPrompt(_) => {
            let line = text.lines().next().unwrap_or_default().trim();
            state.prompt.push_str(line);
        }
        Mode::Insert | Mode::Normal => {
            if let Some(buffer) = active_buffer(state) {
                buffer.insert_str(text);
            }
        }
        Mode::HelpOverlay | Mode::ConfirmDelete | Mode::UserMenu => {}
    }
}

/// Wheel scrolls the focused list or pane; a left click on the sidebar
/// switches section.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    if !state.is_logged_in() {
        return KeyAction::Continue;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if state.mode == Mode::Normal => {
            if let Some(section) = section_at(state.sidebar_area, mouse.column, mouse.row) {
                state.goto(section);
            }
        }
        MouseEventKind::ScrollUp => scroll(state, false),
        MouseEventKind::ScrollDown => scroll(state, true),
        _ => {}
    }
    KeyAction::Continue
}

fn scroll(state: &mut AppState, down: bool) {
    if state.mode == Mode::HelpOverlay {
        state.help_scroll =
            if down { state.help_scroll.saturating_add(3) } else { state.help_scroll.saturating_sub(3) };
        return;
    }
    match (state.section, down) {
        (Section::History, true) => state.history.select_next(),
        (Section::History, false) => state.history.select_prev(),
        (Section::Dashboard, true) => state.dashboard.select_next(),
        (Section::Dashboard, false) => state.dashboard.select_prev(),
        (_, true) => state.scroll_down(3),
        (_, false) => state.scroll_up(3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::ApiRequest;
    use coderefine_core::types::{Session, User};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(state: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(press(KeyCode::Char(c)), state);
        }
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
    fn ctrl_c_quits_from_any_screen() {
        let mut state = AppState::default();
        assert_eq!(handle_key(ctrl('c'), &mut state), KeyAction::Quit);
        let mut state = logged_in();
        state.mode = Mode::Insert;
        assert_eq!(handle_key(ctrl('c'), &mut state), KeyAction::Quit);
    }

    #[test]
    fn q_is_typed_into_the_auth_form() {
        let mut state = AppState::default();
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Continue);
        assert_eq!(state.auth.email, "q");
    }

    #[test]
    fn auth_form_submits_login_request() {
        let mut state = AppState::default();
        type_str(&mut state, "ada@example.com");
        handle_key(press(KeyCode::Tab), &mut state);
        type_str(&mut state, "secret1");
        handle_key(press(KeyCode::Enter), &mut state);
        assert_eq!(
            state.drain_outbox(),
            vec![ApiRequest::Login { email: "ada@example.com".into(), password: "secret1".into() }]
        );
    }

    #[test]
    fn number_keys_switch_sections() {
        let mut state = logged_in();
        handle_key(press(KeyCode::Char('3')), &mut state);
        assert_eq!(state.section, Section::Converter);
        handle_key(press(KeyCode::Char('4')), &mut state);
        assert_eq!(state.section, Section::History);
        assert!(matches!(state.drain_outbox().as_slice(), [ApiRequest::ListHistory(_)]));
    }

    #[test]
    fn insert_mode_edits_and_submits_review() {
        let mut state = logged_in();
        handle_key(press(KeyCode::Char('2')), &mut state);
        handle_key(press(KeyCode::Char('i')), &mut state);
        type_str(&mut state, "x = 1");
        handle_key(press(KeyCode::Enter), &mut state);
        type_str(&mut state, "q");
        assert_eq!(state.review.code.text(), "x = 1\nq");

        handle_key(ctrl('s'), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        assert!(matches!(state.drain_outbox().as_slice(), [ApiRequest::SubmitReview(_)]));
    }

    #[test]
    fn delete_asks_before_sending() {
        let mut state = logged_in();
        state.goto(Section::History);
        let ticket = match state.drain_outbox().pop() {
            Some(ApiRequest::ListHistory(t)) => t,
            other => panic!("unexpected {other:?}"),
        };
        state.history.complete_refresh(ticket, Ok(vec![]));
        handle_key(press(KeyCode::Char('d')), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.outbox.is_empty());
    }

    #[test]
    fn user_menu_logs_out() {
        let mut state = logged_in();
        handle_key(press(KeyCode::Char('u')), &mut state);
        assert_eq!(state.mode, Mode::UserMenu);
        handle_key(press(KeyCode::Char('l')), &mut state);
        assert!(!state.is_logged_in());
        assert_eq!(state.drain_outbox(), vec![ApiRequest::Logout]);
    }

    #[test]
    fn paste_goes_to_the_active_buffer() {
        let mut state = logged_in();
        state.goto(Section::Converter);
        handle_paste("fn main() {\r\n}\r\n", &mut state);
        assert_eq!(state.converter.code.text(), "fn main() {\n}\n");

        state.open_prompt(PromptKind::UploadConverter);
        handle_paste("/tmp/a.py\n", &mut state);
        assert_eq!(state.prompt, "/tmp/a.py");
    }

    #[test]
    fn sidebar_click_switches_section() {
        let mut state = logged_in();
        state.sidebar_area = ratatui::layout::Rect::new(0, 0, 24, 20);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(click, &mut state);
        assert_eq!(state.section, Section::Review);
    }
}
