//! Review workspace: code buffer, language, and the submit/result lifecycle.
//!
//! # Request versioning
//!
//! Every submission and every history load takes a fresh sequence number.
//! Completions carry the number they were issued with; anything but the
//! latest is dropped as [`Completion::Stale`]. Nothing is cancelled on the
//! wire, the stale answer is simply ignored when it lands.

use similar::{ChangeTag, TextDiff};

use crate::buffer::CodeBuffer;
use crate::error::{ApiError, ValidationError};
use crate::language::{language_for_path, Language, REVIEW_LANGUAGES};
use crate::score::ScoreTier;
use crate::types::{ReviewDetail, ReviewResult};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum ReviewPhase {
    #[default]
    Idle,
    Submitting,
    ResultReady,
    Failed(String),
}

/// The three result tabs. Purely local display state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ResultView {
    #[default]
    Analysis,
    Refactored,
    Improvements,
}

impl ResultView {
    pub const ALL: [ResultView; 3] =
        [ResultView::Analysis, ResultView::Refactored, ResultView::Improvements];

    pub fn label(self) -> &'static str {
        match self {
            ResultView::Analysis => "Analysis",
            ResultView::Refactored => "Refactored",
            ResultView::Improvements => "Improvements",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ResultView::Analysis => ResultView::Refactored,
            ResultView::Refactored => ResultView::Improvements,
            ResultView::Improvements => ResultView::Analysis,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ResultView::Analysis => ResultView::Improvements,
            ResultView::Refactored => ResultView::Analysis,
            ResultView::Improvements => ResultView::Refactored,
        }
    }
}

/// What a submission sends. `seq` ties the answer back to this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTicket {
    pub seq: u64,
    pub code: String,
    pub language: Language,
}

/// A history hand-off in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    pub id: i64,
}

/// Whether a completion changed the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// A file ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub contents: String,
}

/// One line of the source-vs-refactored comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub tag: ChangeTag,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ReviewWorkspace {
    pub code: CodeBuffer,
    pub language: Language,
    pub phase: ReviewPhase,
    pub result: Option<ReviewResult>,
    pub view: ResultView,
    /// Review id being loaded from history, shown while the fetch runs.
    pub loading_id: Option<i64>,
    seq: u64,
}

impl ReviewWorkspace {
    pub fn is_busy(&self) -> bool {
        self.phase == ReviewPhase::Submitting || self.loading_id.is_some()
    }

    pub fn score_tier(&self) -> Option<ScoreTier> {
        self.result.as_ref().map(|r| ScoreTier::for_score(r.summary.score))
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Validates the buffer and enters `Submitting`.
    ///
    /// Clears any previous result. A blank buffer is rejected without
    /// touching the current state.
    pub fn begin_submit(&mut self) -> Result<ReviewTicket, ValidationError> {
        if self.code.is_blank() {
            return Err(ValidationError::EmptyCode);
        }
        let seq = self.next_seq();
        self.result = None;
        self.loading_id = None;
        self.phase = ReviewPhase::Submitting;
        tracing::info!(seq, language = %self.language, "review submitted");
        Ok(ReviewTicket { seq, code: self.code.text().to_owned(), language: self.language.clone() })
    }

    /// Applies the answer to a submission.
    pub fn complete_submit(
        &mut self,
        seq: u64,
        result: Result<ReviewResult, ApiError>,
    ) -> Completion {
        if seq != self.seq {
            tracing::debug!(seq, latest = self.seq, "dropping stale review response");
            return Completion::Stale;
        }
        match result {
            Ok(result) => {
                if let Some((summary_total, issues)) = result.count_mismatch() {
                    tracing::warn!(
                        summary_total,
                        issues,
                        "review summary counts disagree with the issue list"
                    );
                }
                self.result = Some(result);
                self.view = ResultView::Analysis;
                self.phase = ReviewPhase::ResultReady;
            }
            Err(e) => {
                self.phase = ReviewPhase::Failed(e.to_string());
            }
        }
        Completion::Applied
    }

    /// Starts a hand-off from history. Supersedes any outstanding submission.
    pub fn begin_load(&mut self, id: i64) -> LoadTicket {
        let seq = self.next_seq();
        self.loading_id = Some(id);
        if self.phase == ReviewPhase::Submitting {
            self.phase = ReviewPhase::Idle;
        }
        LoadTicket { seq, id }
    }

    /// Applies a fetched history record: buffer, language, synthesised result,
    /// analysis view.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ReviewDetail, ApiError>,
    ) -> Completion {
        if ticket.seq != self.seq {
            tracing::debug!(seq = ticket.seq, latest = self.seq, "dropping stale review load");
            return Completion::Stale;
        }
        self.loading_id = None;
        match result {
            Ok(detail) => {
                self.apply_detail(&detail);
            }
            Err(e) => {
                // The buffer and any previous result stay as they were.
                tracing::warn!(id = ticket.id, "failed to load review: {e}");
                if let ReviewPhase::Submitting = self.phase {
                    self.phase = ReviewPhase::Idle;
                }
            }
        }
        Completion::Applied
    }

    fn apply_detail(&mut self, detail: &ReviewDetail) {
        self.code.set_text(detail.original_code.clone());
        self.language = Language::from_name(&detail.language);
        self.result = Some(detail.to_result());
        self.view = ResultView::Analysis;
        self.phase = ReviewPhase::ResultReady;
        tracing::info!(id = detail.id, "review loaded from history");
    }

    pub fn select_view(&mut self, view: ResultView) {
        self.view = view;
    }

    pub fn next_view(&mut self) {
        self.view = self.view.next();
    }

    pub fn prev_view(&mut self) {
        self.view = self.view.prev();
    }

    pub fn next_language(&mut self) {
        self.language = self.language.next_in(REVIEW_LANGUAGES);
    }

    pub fn prev_language(&mut self) {
        self.language = self.language.prev_in(REVIEW_LANGUAGES);
    }

    /// Replaces the buffer with an uploaded file's contents.
    ///
    /// Returns the language picked from the extension, or `None` when the
    /// extension has no rule and the selection was left alone.
    pub fn upload(&mut self, file_name: &str, contents: &str) -> Option<Language> {
        self.code.set_text(contents.replace("\r\n", "\n"));
        let detected = language_for_path(file_name);
        if let Some(lang) = &detected {
            self.language = lang.clone();
        }
        tracing::info!(file_name, detected = ?detected, "file loaded into review buffer");
        detected
    }

    /// Copies the refactored code into the buffer. The result stays.
    pub fn apply_refactored(&mut self) -> bool {
        match &self.result {
            Some(r) if r.has_refactored_code() => {
                self.code.set_text(r.refactored_code.clone());
                true
            }
            _ => false,
        }
    }

    pub fn refactored_code(&self) -> Option<&str> {
        self.result
            .as_ref()
            .filter(|r| r.has_refactored_code())
            .map(|r| r.refactored_code.as_str())
    }

    /// Refactored code packaged as `refactored.<ext>` for the selected language.
    pub fn refactored_download(&self) -> Option<Download> {
        self.refactored_code().map(|code| Download {
            file_name: format!("refactored.{}", self.language.file_extension()),
            contents: code.to_owned(),
        })
    }

    /// Line diff from the current buffer to the refactored code.
    pub fn refactored_diff(&self) -> Vec<DiffLine> {
        let Some(refactored) = self.refactored_code() else {
            return Vec::new();
        };
        let diff = TextDiff::from_lines(self.code.text(), refactored);
        diff.iter_all_changes()
            .map(|change| DiffLine {
                tag: change.tag(),
                text: change.value().trim_end_matches('\n').to_owned(),
            })
            .collect()
    }

    /// Empties the buffer and drops the result. Outstanding answers become stale.
    pub fn clear(&mut self) {
        self.next_seq();
        self.code.clear();
        self.result = None;
        self.loading_id = None;
        self.phase = ReviewPhase::Idle;
        self.view = ResultView::Analysis;
    }

    /// Back to a fresh workspace, e.g. after logout. Outstanding answers
    /// become stale.
    pub fn reset(&mut self) {
        *self = Self { seq: self.seq + 1, ..Self::default() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReviewSummary;

    fn result(score: u8) -> ReviewResult {
        ReviewResult {
            review_id: None,
            summary: ReviewSummary { score, ..Default::default() },
            issues: Vec::new(),
            refactored_code: "def f():\n    return 2\n".into(),
            improvements: vec!["Simplified".into()],
        }
    }

    fn detail() -> ReviewDetail {
        ReviewDetail {
            id: 42,
            language: "python".into(),
            original_code: "print(1)".into(),
            refactored_code: String::new(),
            summary: ReviewSummary { score: 90, ..Default::default() },
            issues: Vec::new(),
            improvements: Vec::new(),
            created_at: String::new(),
        }
    }

    #[test]
    fn blank_buffers_are_rejected_before_any_request() {
        for code in ["", " ", "\n\t  \n"] {
            let mut ws = ReviewWorkspace::default();
            ws.code.set_text(code);
            assert_eq!(ws.begin_submit(), Err(ValidationError::EmptyCode));
            assert_eq!(ws.phase, ReviewPhase::Idle);
        }
    }

    #[test]
    fn submit_clears_previous_result_and_resets_view() {
        let mut ws = ReviewWorkspace::default();
        ws.code.set_text("x = 1");
        let t = ws.begin_submit().unwrap();
        ws.complete_submit(t.seq, Ok(result(70)));
        ws.select_view(ResultView::Improvements);

        let t = ws.begin_submit().unwrap();
        assert!(ws.result.is_none());
        assert_eq!(ws.phase, ReviewPhase::Submitting);
        assert_eq!(ws.complete_submit(t.seq, Ok(result(85))), Completion::Applied);
        assert_eq!(ws.view, ResultView::Analysis);
        assert_eq!(ws.phase, ReviewPhase::ResultReady);
        assert_eq!(ws.score_tier(), Some(ScoreTier::Pass));
    }

    #[test]
    fn failure_keeps_the_buffer() {
        let mut ws = ReviewWorkspace::default();
        ws.code.set_text("x = 1");
        let t = ws.begin_submit().unwrap();
        ws.complete_submit(t.seq, Err(ApiError::Timeout));
        assert_eq!(ws.phase, ReviewPhase::Failed("The server took too long to respond".into()));
        assert_eq!(ws.code.text(), "x = 1");
        assert!(ws.result.is_none());
    }

    #[test]
    fn out_of_order_responses_are_discarded() {
        let mut ws = ReviewWorkspace::default();
        ws.code.set_text("a");
        let first = ws.begin_submit().unwrap();
        ws.code.set_text("b");
        let second = ws.begin_submit().unwrap();

        assert_eq!(ws.complete_submit(second.seq, Ok(result(85))), Completion::Applied);
        assert_eq!(ws.complete_submit(first.seq, Ok(result(45))), Completion::Stale);
        assert_eq!(ws.result.as_ref().unwrap().summary.score, 85);
    }

    #[test]
    fn history_load_populates_buffer_language_and_view() {
        let mut ws = ReviewWorkspace { language: Language::Java, ..Default::default() };
        ws.view = ResultView::Refactored;
        let ticket = ws.begin_load(42);
        assert!(ws.is_busy());
        ws.complete_load(ticket, Ok(detail()));
        assert_eq!(ws.code.text(), "print(1)");
        assert_eq!(ws.language, Language::Python);
        assert_eq!(ws.view, ResultView::Analysis);
        assert_eq!(ws.phase, ReviewPhase::ResultReady);
        assert_eq!(ws.result.as_ref().unwrap().review_id, Some(42));
        assert!(!ws.is_busy());
    }

    #[test]
    fn load_supersedes_pending_submission() {
        let mut ws = ReviewWorkspace::default();
        ws.code.set_text("a");
        let submit = ws.begin_submit().unwrap();
        let load = ws.begin_load(42);
        ws.complete_load(load, Ok(detail()));
        assert_eq!(ws.complete_submit(submit.seq, Ok(result(10))), Completion::Stale);
        assert_eq!(ws.result.as_ref().unwrap().summary.score, 90);
    }

    #[test]
    fn switching_views_leaves_result_untouched() {
        let mut ws = ReviewWorkspace::default();
        ws.code.set_text("x");
        let t = ws.begin_submit().unwrap();
        ws.complete_submit(t.seq, Ok(result(70)));
        let before = ws.result.clone();
        for _ in 0..5 {
            ws.next_view();
        }
        ws.prev_view();
        assert_eq!(ws.result, before);
        assert_eq!(ws.phase, ReviewPhase::ResultReady);
    }

    #[test]
    fn upload_detects_language_only_for_known_extensions() {
        let mut ws = ReviewWorkspace { language: Language::Java, ..Default::default() };
        assert_eq!(ws.upload("module.ts", "let a = 1;"), Some(Language::JavaScript));
        assert_eq!(ws.language, Language::JavaScript);
        assert_eq!(ws.upload("main.rs", "fn main() {}"), None);
        assert_eq!(ws.language, Language::JavaScript);
        assert_eq!(ws.code.text(), "fn main() {}");
    }

    #[test]
    fn apply_and_download_refactored() {
        let mut ws = ReviewWorkspace { language: Language::Cpp, ..Default::default() };
        ws.code.set_text("old");
        let t = ws.begin_submit().unwrap();
        ws.complete_submit(t.seq, Ok(result(70)));

        let dl = ws.refactored_download().unwrap();
        assert_eq!(dl.file_name, "refactored.cpp");
        assert!(ws.apply_refactored());
        assert_eq!(ws.code.text(), "def f():\n    return 2\n");
        assert!(ws.result.is_some());

        ws.language = Language::Other("kotlin".into());
        assert_eq!(ws.refactored_download().unwrap().file_name, "refactored.txt");
    }

    #[test]
    fn diff_marks_changed_lines() {
        let mut ws = ReviewWorkspace::default();
        ws.code.set_text("def f():\n    return 1\n");
        let t = ws.begin_submit().unwrap();
        ws.complete_submit(t.seq, Ok(result(70)));
        let diff = ws.refactored_diff();
        assert!(diff.iter().any(|l| l.tag == ChangeTag::Delete && l.text == "    return 1"));
        assert!(diff.iter().any(|l| l.tag == ChangeTag::Insert && l.text == "    return 2"));
        assert!(diff.iter().any(|l| l.tag == ChangeTag::Equal && l.text == "def f():"));
    }

    #[test]
    fn clear_makes_inflight_answers_stale() {
        let mut ws = ReviewWorkspace::default();
        ws.code.set_text("x");
        let t = ws.begin_submit().unwrap();
        ws.clear();
        assert_eq!(ws.complete_submit(t.seq, Ok(result(70))), Completion::Stale);
        assert!(ws.result.is_none());
        assert_eq!(ws.phase, ReviewPhase::Idle);
    }

    #[test]
    fn reset_restores_defaults_and_drops_inflight() {
        let mut ws = ReviewWorkspace { language: Language::Css, ..Default::default() };
        ws.code.set_text("a {}");
        let t = ws.begin_submit().unwrap();
        ws.reset();
        assert_eq!(ws.language, Language::Python);
        assert!(ws.code.is_blank());
        assert_eq!(ws.complete_submit(t.seq, Ok(result(70))), Completion::Stale);
        ws.code.set_text("x");
        let fresh = ws.begin_submit().unwrap();
        assert!(fresh.seq > t.seq);
    }
}
