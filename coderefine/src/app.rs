//! Central application state for coderefine.
//!
//! `AppState` is the navigation shell: it owns the five screen state machines
//! from `coderefine-core`, the current section and input mode, and the
//! transient notice shown in the status bar. No rendering lives here. Key
//! handlers mutate it, API responses are applied to it, and requests it wants
//! sent are queued in `outbox` for the main loop to dispatch.

use std::path::{Path, PathBuf};

use ratatui::layout::Rect;

use coderefine_core::auth::AuthForm;
use coderefine_core::convert::ConverterWorkspace;
use coderefine_core::dashboard::Dashboard;
use coderefine_core::history::HistoryBrowser;
use coderefine_core::review::{Completion, Download, ReviewWorkspace};
use coderefine_core::types::{Session, UserProfile};
use coderefine_core::ApiError;

use crate::config::Config;
use crate::ui::highlight::HighlightCache;
use crate::worker::{ApiRequest, ApiResponse};

/// Ticks a notice stays visible (250 ms each).
const NOTICE_TICKS: u16 = 16;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    #[default]
    Dashboard,
    Review,
    Converter,
    History,
}

impl Section {
    pub const ALL: [Section; 4] =
        [Section::Dashboard, Section::Review, Section::Converter, Section::History];

    pub fn label(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Review => "Code Review",
            Section::Converter => "Converter",
            Section::History => "History",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Section::Dashboard => Section::Review,
            Section::Review => Section::Converter,
            Section::Converter => Section::History,
            Section::History => Section::Dashboard,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Section::Dashboard => Section::History,
            Section::Review => Section::Dashboard,
            Section::Converter => Section::Review,
            Section::History => Section::Converter,
        }
    }
}

/// Which workspace a path prompt loads into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    UploadReview,
    UploadConverter,
}

/// Input mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing into the current workspace's code buffer.
    Insert,
    HelpOverlay,
    /// Delete confirmation dialog over the history list.
    ConfirmDelete,
    PathPrompt(PromptKind),
    UserMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    ticks_left: u16,
}

pub struct AppState {
    pub section: Section,
    pub mode: Mode,

    /// Mirror of the shared session store, updated from `SessionChanged`.
    pub session: Option<Session>,
    pub profile: Option<UserProfile>,

    pub auth: AuthForm,
    pub review: ReviewWorkspace,
    pub converter: ConverterWorkspace,
    pub history: HistoryBrowser,
    pub dashboard: Dashboard,

    pub notice: Option<Notice>,
    /// Text typed into the path prompt.
    pub prompt: String,

    pub help_scroll: u16,
    /// Scroll offset of the review result pane / converter output pane.
    pub result_scroll: u16,
    /// Refactored view shows a line diff against the buffer instead of the code.
    pub show_diff: bool,
    /// First visible buffer line, kept in view of the cursor by the renderer.
    pub editor_offset: usize,
    /// Sidebar area from the last frame, for mouse hit-testing.
    pub sidebar_area: Rect,

    pub refactored_highlight: HighlightCache,
    pub converted_highlight: HighlightCache,

    /// Advanced every tick; drives the busy spinner.
    pub tick_count: u64,

    pub history_limit: usize,
    pub recent_limit: usize,
    pub download_dir: PathBuf,

    /// Requests produced by the last handled event, drained by the main loop.
    pub outbox: Vec<ApiRequest>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            section: Section::default(),
            mode: Mode::default(),
            session: None,
            profile: None,
            auth: AuthForm::default(),
            review: ReviewWorkspace::default(),
            converter: ConverterWorkspace::default(),
            history: HistoryBrowser::default(),
            dashboard: Dashboard::default(),
            notice: None,
            prompt: String::new(),
            help_scroll: 0,
            result_scroll: 0,
            show_diff: false,
            editor_offset: 0,
            sidebar_area: Rect::default(),
            refactored_highlight: HighlightCache::default(),
            converted_highlight: HighlightCache::default(),
            tick_count: 0,
            history_limit: config.history_limit,
            recent_limit: config.dashboard_recent_limit,
            download_dir: config.download_dir.clone(),
            outbox: Vec::new(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Starts the app with whatever the session store held at launch.
    ///
    /// A restored session is validated once with `/auth/me`; if the server
    /// rejects it the store is cleared and `SessionChanged(None)` follows.
    pub fn bootstrap(&mut self, session: Option<Session>) {
        if let Some(session) = session {
            tracing::info!(user = %session.user.username, "resuming session");
            self.session = Some(session);
            self.auth.restored();
            self.outbox.push(ApiRequest::Me);
            self.goto(Section::Dashboard);
        }
    }

    // -----------------------------------------------------------------------
    // Notices
    // -----------------------------------------------------------------------

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notice =
            Some(Notice { text: text.into(), level: NoticeLevel::Info, ticks_left: NOTICE_TICKS });
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!("error notice: {text}");
        self.notice = Some(Notice { text, level: NoticeLevel::Error, ticks_left: NOTICE_TICKS });
    }

    /// Errors become notices here and go no further. A session expiry is
    /// reported once by the `SessionChanged(None)` path instead.
    fn report(&mut self, context: &str, e: &ApiError) {
        if e.is_session_expired() {
            return;
        }
        self.notify_error(format!("{context}: {e}"));
    }

    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if let Some(notice) = &mut self.notice {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
            if notice.ticks_left == 0 {
                self.notice = None;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Switches section and fetches whatever that screen needs.
    ///
    /// Dashboard and history re-fetch on every entry. Re-selecting the
    /// section already shown only fetches when its data is out of date.
    pub fn goto(&mut self, section: Section) {
        let entering = self.section != section;
        self.section = section;
        self.mode = Mode::Normal;
        self.result_scroll = 0;
        match section {
            Section::Dashboard if entering || self.dashboard.stale => self.refresh_dashboard(),
            Section::History if entering || (!self.history.loaded && !self.history.loading) => {
                self.refresh_history()
            }
            _ => {}
        }
    }

    pub fn refresh_dashboard(&mut self) {
        let ticket = self.dashboard.begin_refresh();
        self.outbox.push(ApiRequest::Stats(ticket));
        self.outbox.push(ApiRequest::Recent { ticket, limit: self.recent_limit });
    }

    pub fn refresh_history(&mut self) {
        let ticket = self.history.begin_refresh(self.history_limit);
        self.outbox.push(ApiRequest::ListHistory(ticket));
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn submit_auth(&mut self) {
        match self.auth.begin() {
            Ok(request) => self.outbox.push(request.into()),
            Err(e) => self.auth.error = Some(e.to_string()),
        }
    }

    pub fn submit_review(&mut self) {
        match self.review.begin_submit() {
            Ok(ticket) => {
                self.mode = Mode::Normal;
                self.result_scroll = 0;
                self.show_diff = false;
                self.outbox.push(ApiRequest::SubmitReview(ticket));
            }
            Err(e) => self.notify_error(e.to_string()),
        }
    }

    pub fn submit_convert(&mut self) {
        match self.converter.begin_submit() {
            Ok(ticket) => {
                self.mode = Mode::Normal;
                self.result_scroll = 0;
                self.outbox.push(ApiRequest::Convert(ticket));
            }
            Err(e) => self.notify_error(e.to_string()),
        }
    }

    /// Hand-off from the dashboard or history list into the review workspace.
    pub fn open_review(&mut self, id: i64) {
        let ticket = self.review.begin_load(id);
        self.outbox.push(ApiRequest::LoadReview(ticket));
        self.section = Section::Review;
        self.mode = Mode::Normal;
        self.result_scroll = 0;
        self.show_diff = false;
    }

    pub fn ask_delete_selected(&mut self) {
        if let Some(id) = self.history.selected_id() {
            if self.history.request_delete(id) {
                self.mode = Mode::ConfirmDelete;
            }
        }
    }

    pub fn confirm_delete(&mut self) {
        self.mode = Mode::Normal;
        if let Some(id) = self.history.confirm_delete() {
            self.outbox.push(ApiRequest::DeleteReview { id });
        }
    }

    pub fn cancel_delete(&mut self) {
        self.history.cancel_delete();
        self.mode = Mode::Normal;
    }

    /// Signs out locally right away; the store is cleared in the background.
    pub fn logout(&mut self) {
        tracing::info!("logging out");
        self.session = None;
        self.reset_workspaces();
        self.outbox.push(ApiRequest::Logout);
        self.notify("Signed out");
    }

    fn reset_workspaces(&mut self) {
        self.profile = None;
        self.auth.logged_out();
        self.review.reset();
        self.converter.reset();
        self.history.reset();
        self.dashboard.reset();
        self.section = Section::Dashboard;
        self.mode = Mode::Normal;
        self.result_scroll = 0;
        self.show_diff = false;
        self.editor_offset = 0;
    }

    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt.clear();
        self.mode = Mode::PathPrompt(kind);
    }

    /// Reads the prompted file into the matching workspace.
    pub fn finish_prompt(&mut self, kind: PromptKind) {
        self.mode = Mode::Normal;
        let path = PathBuf::from(self.prompt.trim());
        if path.as_os_str().is_empty() {
            return;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
                match kind {
                    PromptKind::UploadReview => match self.review.upload(name, &contents) {
                        Some(lang) => self.notify(format!("Loaded {name} as {}", lang.label())),
                        None => self.notify(format!("Loaded {name}")),
                    },
                    PromptKind::UploadConverter => {
                        self.converter.code.set_text(contents.replace("\r\n", "\n"));
                        self.notify(format!("Loaded {name}"));
                    }
                }
                self.editor_offset = 0;
            }
            Err(e) => {
                tracing::warn!("cannot read {}: {e}", path.display());
                self.notify_error(format!("Cannot read {}: {e}", path.display()));
            }
        }
    }

    pub fn download_refactored(&mut self) {
        match self.review.refactored_download() {
            Some(download) => self.write_download(&download),
            None => self.notify_error("No refactored code to download"),
        }
    }

    pub fn download_converted(&mut self) {
        match self.converter.converted_download() {
            Some(download) => self.write_download(&download),
            None => self.notify_error("No converted code to download"),
        }
    }

    fn write_download(&mut self, download: &Download) {
        match save_download(&self.download_dir, download) {
            Ok(path) => {
                tracing::info!("saved {}", path.display());
                self.notify(format!("Saved {}", path.display()));
            }
            Err(e) => {
                tracing::warn!("download failed: {e}");
                self.notify_error(format!("Could not save {}: {e}", download.file_name));
            }
        }
    }

    pub fn apply_refactored(&mut self) {
        if self.review.apply_refactored() {
            self.editor_offset = 0;
            self.show_diff = false;
            self.notify("Refactored code applied to the editor");
        } else {
            self.notify_error("No refactored code to apply");
        }
    }

    pub fn clear_review(&mut self) {
        self.review.clear();
        self.editor_offset = 0;
        self.result_scroll = 0;
        self.show_diff = false;
    }

    pub fn clear_converter(&mut self) {
        self.converter.clear();
        self.editor_offset = 0;
        self.result_scroll = 0;
    }

    // -----------------------------------------------------------------------
    // Incoming events
    // -----------------------------------------------------------------------

    /// Mirrors a change of the shared session store.
    ///
    /// A clear that this shell did not ask for is a forced logout: every
    /// workspace is reset and the auth screen comes back with a notice.
    pub fn on_session_changed(&mut self, session: Option<Session>) {
        match session {
            Some(session) => self.session = Some(session),
            None if self.session.is_some() => {
                tracing::warn!("session cleared underneath the UI, returning to sign-in");
                self.session = None;
                self.reset_workspaces();
                self.notify_error("Session expired, please sign in again");
            }
            None => {}
        }
    }

    /// Routes an API answer to the workspace that asked for it.
    pub fn apply_response(&mut self, response: ApiResponse) {
        match response {
            ApiResponse::Auth(result) => {
                let session = result.as_ref().ok().cloned();
                self.auth.finish(result);
                if let Some(session) = session {
                    self.notify(format!("Welcome, {}", session.user.username));
                    self.session = Some(session);
                    self.outbox.push(ApiRequest::Me);
                    self.goto(Section::Dashboard);
                }
            }
            ApiResponse::Me(result) => match result {
                Ok(profile) => self.profile = Some(profile),
                Err(e) if e.is_session_expired() => {}
                Err(e) => tracing::warn!("profile fetch failed: {e}"),
            },
            ApiResponse::Review { seq, result } => {
                let failed = result.as_ref().err().cloned();
                if self.review.complete_submit(seq, result) == Completion::Applied {
                    match failed {
                        Some(e) => self.report("Review failed", &e),
                        None => {
                            // The new review shows up in both lists.
                            self.dashboard.mark_stale();
                            self.history.loaded = false;
                            self.notify("Analysis complete!");
                        }
                    }
                }
            }
            ApiResponse::ReviewLoaded { ticket, result } => {
                let failed = result.as_ref().err().cloned();
                if self.review.complete_load(ticket, result) == Completion::Applied {
                    self.editor_offset = 0;
                    if let Some(e) = failed {
                        self.report("Could not load review", &e);
                    }
                }
            }
            ApiResponse::History { ticket, result } => {
                self.history.complete_refresh(ticket, result);
            }
            ApiResponse::Deleted { id, result } => {
                let failed = result.as_ref().err().cloned();
                if self.history.complete_delete(id, result) {
                    self.dashboard.mark_stale();
                    self.notify("Review deleted");
                } else if let Some(e) = failed {
                    self.report("Delete failed", &e);
                }
            }
            ApiResponse::Stats { ticket, result } => {
                self.dashboard.apply_stats(ticket, result);
            }
            ApiResponse::Recent { ticket, result } => {
                self.dashboard.apply_recent(ticket, result);
            }
            ApiResponse::Converted { seq, result } => {
                let failed = result.as_ref().err().cloned();
                if self.converter.complete_submit(seq, result) == Completion::Applied {
                    if let Some(e) = failed {
                        self.report("Conversion failed", &e);
                    }
                }
            }
            ApiResponse::LoggedOut => {}
        }
    }

    /// Takes the queued requests.
    pub fn drain_outbox(&mut self) -> Vec<ApiRequest> {
        std::mem::take(&mut self.outbox)
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    pub fn scroll_down(&mut self, lines: u16) {
        self.result_scroll = self.result_scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.result_scroll = self.result_scroll.saturating_sub(lines);
    }
}

/// Writes `download` into `dir` and returns the full path.
///
/// # Errors
///
/// Returns an I/O error if `dir` cannot be created or the file cannot be
/// written.
pub fn save_download(dir: &Path, download: &Download) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&download.file_name);
    std::fs::write(&path, &download.contents)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coderefine_core::types::{ReviewDetail, ReviewHistoryRecord, ReviewResult, ReviewSummary, User};
    use coderefine_core::Language;

    fn session() -> Session {
        Session {
            token: "t".into(),
            user: User { username: "ada".into(), email: "ada@example.com".into() },
        }
    }

    fn logged_in() -> AppState {
        let mut app = AppState::default();
        app.bootstrap(Some(session()));
        app.drain_outbox();
        app
    }

    fn record(id: i64) -> ReviewHistoryRecord {
        ReviewHistoryRecord {
            id,
            language: "python".into(),
            score: 50,
            critical_count: 1,
            high_count: 0,
            medium_count: 0,
            low_count: 0,
            created_at: "2024-05-01T10:00:00".into(),
            original_code: "x".into(),
            refactored_code: None,
            issues_json: None,
        }
    }

    #[test]
    fn bootstrap_validates_restored_session() {
        let mut app = AppState::default();
        app.bootstrap(Some(session()));
        let sent = app.drain_outbox();
        assert_eq!(sent[0], ApiRequest::Me);
        assert!(sent.iter().any(|r| matches!(r, ApiRequest::Stats(_))));
        assert!(sent.iter().any(|r| matches!(r, ApiRequest::Recent { limit: 5, .. })));
        assert!(app.is_logged_in());
    }

    #[test]
    fn bootstrap_without_session_stays_on_auth() {
        let mut app = AppState::default();
        app.bootstrap(None);
        assert!(!app.is_logged_in());
        assert!(app.outbox.is_empty());
    }

    #[test]
    fn forced_logout_resets_everything() {
        let mut app = logged_in();
        app.review.code.set_text("print(1)");
        app.goto(Section::Review);
        app.on_session_changed(None);

        assert!(!app.is_logged_in());
        assert!(app.review.code.is_blank());
        assert_eq!(app.section, Section::Dashboard);
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.text, "Session expired, please sign in again");
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[test]
    fn explicit_logout_is_not_reported_as_expiry() {
        let mut app = logged_in();
        app.logout();
        assert_eq!(app.drain_outbox(), vec![ApiRequest::Logout]);
        app.on_session_changed(None);
        assert_eq!(app.notice.as_ref().unwrap().text, "Signed out");
    }

    #[test]
    fn successful_delete_marks_dashboard_stale() {
        let mut app = logged_in();
        app.dashboard.begin_refresh();
        let ticket = app.history.begin_refresh(50);
        app.apply_response(ApiResponse::History {
            ticket,
            result: Ok((1..=10).map(record).collect()),
        });
        assert_eq!(app.history.records.len(), 10);

        app.history.selected = 6;
        app.ask_delete_selected();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        app.confirm_delete();
        assert_eq!(app.drain_outbox(), vec![ApiRequest::DeleteReview { id: 7 }]);

        app.apply_response(ApiResponse::Deleted { id: 7, result: Ok(()) });
        assert_eq!(app.history.records.len(), 9);
        assert!(app.dashboard.stale);
    }

    #[test]
    fn failed_delete_keeps_record_and_shows_error() {
        let mut app = logged_in();
        let ticket = app.history.begin_refresh(50);
        app.apply_response(ApiResponse::History { ticket, result: Ok(vec![record(7)]) });
        app.history.request_delete(7);
        app.confirm_delete();
        app.apply_response(ApiResponse::Deleted {
            id: 7,
            result: Err(ApiError::Request { status: Some(500), message: "boom".into() }),
        });
        assert_eq!(app.history.records.len(), 1);
        assert_eq!(app.notice.as_ref().unwrap().text, "Delete failed: boom");
    }

    #[test]
    fn session_expiry_errors_do_not_stack_notices() {
        let mut app = logged_in();
        app.review.code.set_text("x");
        app.submit_review();
        let seq = match app.drain_outbox().pop() {
            Some(ApiRequest::SubmitReview(t)) => t.seq,
            other => panic!("unexpected {other:?}"),
        };
        app.apply_response(ApiResponse::Review {
            seq,
            result: Err(ApiError::SessionExpired { message: "expired".into() }),
        });
        assert!(app.notice.is_none());
    }

    #[test]
    fn blank_review_shows_validation_notice_and_sends_nothing() {
        let mut app = logged_in();
        app.submit_review();
        assert!(app.outbox.is_empty());
        assert_eq!(app.notice.as_ref().unwrap().text, "Please paste some code first");
    }

    #[test]
    fn open_review_hands_off_to_workspace() {
        let mut app = logged_in();
        app.goto(Section::History);
        app.drain_outbox();
        app.open_review(42);
        assert_eq!(app.section, Section::Review);
        let ticket = match app.drain_outbox().pop() {
            Some(ApiRequest::LoadReview(t)) => t,
            other => panic!("unexpected {other:?}"),
        };
        app.apply_response(ApiResponse::ReviewLoaded {
            ticket,
            result: Ok(ReviewDetail {
                id: 42,
                language: "python".into(),
                original_code: "print(1)".into(),
                refactored_code: String::new(),
                summary: ReviewSummary { score: 90, ..Default::default() },
                issues: Vec::new(),
                improvements: Vec::new(),
                created_at: String::new(),
            }),
        });
        assert_eq!(app.review.code.text(), "print(1)");
        assert_eq!(app.review.language, Language::Python);
    }

    #[test]
    fn lists_refetch_on_every_entry() {
        let mut app = logged_in();
        app.goto(Section::History);
        let ticket = match app.drain_outbox().pop() {
            Some(ApiRequest::ListHistory(t)) => t,
            other => panic!("unexpected {other:?}"),
        };
        app.apply_response(ApiResponse::History { ticket, result: Ok(vec![record(1)]) });

        app.goto(Section::Dashboard);
        let sent = app.drain_outbox();
        assert!(sent.iter().any(|r| matches!(r, ApiRequest::Stats(_))));
        assert!(sent.iter().any(|r| matches!(r, ApiRequest::Recent { .. })));

        app.goto(Section::History);
        assert!(matches!(app.drain_outbox().as_slice(), [ApiRequest::ListHistory(_)]));

        // Same section, data current: nothing to fetch.
        app.goto(Section::History);
        assert!(app.drain_outbox().is_empty());
    }

    #[test]
    fn new_review_invalidates_lists() {
        let mut app = logged_in();
        app.history.loaded = true;
        app.dashboard.stale = false;
        app.review.code.set_text("x");
        app.submit_review();
        let seq = match app.drain_outbox().pop() {
            Some(ApiRequest::SubmitReview(t)) => t.seq,
            other => panic!("unexpected {other:?}"),
        };
        app.apply_response(ApiResponse::Review {
            seq,
            result: Ok(ReviewResult {
                review_id: Some(3),
                summary: ReviewSummary { score: 81, ..Default::default() },
                issues: Vec::new(),
                refactored_code: String::new(),
                improvements: Vec::new(),
            }),
        });
        assert!(app.dashboard.stale);
        assert!(!app.history.loaded);
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.text, "Analysis complete!");
        assert_eq!(notice.level, NoticeLevel::Info);
    }

    #[test]
    fn notices_expire_after_ticks() {
        let mut app = AppState::default();
        app.notify("hello");
        for _ in 0..NOTICE_TICKS - 1 {
            app.on_tick();
        }
        assert!(app.notice.is_some());
        app.on_tick();
        assert!(app.notice.is_none());
    }

    #[test]
    fn upload_and_download_round_through_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let src = dir.path().join("module.ts");
        std::fs::write(&src, "let a = 1;\r\n").unwrap();

        let mut app = logged_in();
        app.download_dir = dir.path().join("out");
        app.open_prompt(PromptKind::UploadReview);
        app.prompt = src.to_string_lossy().into_owned();
        app.finish_prompt(PromptKind::UploadReview);
        assert_eq!(app.review.code.text(), "let a = 1;\n");
        assert_eq!(app.review.language, Language::JavaScript);

        app.download_refactored();
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Error);

        let saved = save_download(
            &app.download_dir,
            &Download { file_name: "refactored.js".into(), contents: "ok".into() },
        )
        .unwrap();
        assert_eq!(std::fs::read_to_string(saved).unwrap(), "ok");
    }
}
