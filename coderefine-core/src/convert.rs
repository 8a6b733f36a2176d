//! Code converter workspace: source buffer, target language, conversion result.

use crate::buffer::CodeBuffer;
use crate::error::{ApiError, ValidationError};
use crate::language::{Language, CONVERT_TARGETS};
use crate::review::{Completion, Download};
use crate::types::ConversionResult;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum ConvertPhase {
    #[default]
    Idle,
    Converting,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertTicket {
    pub seq: u64,
    pub code: String,
    pub target: Language,
}

#[derive(Debug)]
pub struct ConverterWorkspace {
    pub code: CodeBuffer,
    pub target: Language,
    pub phase: ConvertPhase,
    pub result: Option<ConversionResult>,
    seq: u64,
}

impl Default for ConverterWorkspace {
    fn default() -> Self {
        Self {
            code: CodeBuffer::default(),
            target: Language::JavaScript,
            phase: ConvertPhase::Idle,
            result: None,
            seq: 0,
        }
    }
}

impl ConverterWorkspace {
    pub fn is_busy(&self) -> bool {
        self.phase == ConvertPhase::Converting
    }

    pub fn next_target(&mut self) {
        self.target = self.target.next_in(CONVERT_TARGETS);
    }

    pub fn prev_target(&mut self) {
        self.target = self.target.prev_in(CONVERT_TARGETS);
    }

    pub fn begin_submit(&mut self) -> Result<ConvertTicket, ValidationError> {
        if self.code.is_blank() {
            return Err(ValidationError::EmptyCode);
        }
        self.seq += 1;
        self.result = None;
        self.phase = ConvertPhase::Converting;
        tracing::info!(seq = self.seq, target = %self.target, "conversion submitted");
        Ok(ConvertTicket { seq: self.seq, code: self.code.text().to_owned(), target: self.target.clone() })
    }

    pub fn complete_submit(
        &mut self,
        seq: u64,
        result: Result<ConversionResult, ApiError>,
    ) -> Completion {
        if seq != self.seq {
            tracing::debug!(seq, latest = self.seq, "dropping stale conversion response");
            return Completion::Stale;
        }
        match result {
            Ok(result) => {
                self.result = Some(result);
                self.phase = ConvertPhase::Ready;
            }
            Err(e) => self.phase = ConvertPhase::Failed(e.to_string()),
        }
        Completion::Applied
    }

    /// Converted code as `converted.<ext>` for the target language.
    pub fn converted_download(&self) -> Option<Download> {
        self.result
            .as_ref()
            .filter(|r| !r.converted_code.trim().is_empty())
            .map(|r| Download {
                file_name: format!("converted.{}", self.target.file_extension()),
                contents: r.converted_code.clone(),
            })
    }

    pub fn clear(&mut self) {
        self.seq += 1;
        self.code.clear();
        self.result = None;
        self.phase = ConvertPhase::Idle;
    }

    pub fn reset(&mut self) {
        *self = Self { seq: self.seq + 1, ..Self::default() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converted(code: &str) -> ConversionResult {
        ConversionResult {
            converted_code: code.into(),
            complexity_analysis: Default::default(),
            explanation: "Ported".into(),
        }
    }

    #[test]
    fn defaults_to_javascript_target() {
        assert_eq!(ConverterWorkspace::default().target, Language::JavaScript);
    }

    #[test]
    fn blank_source_is_rejected() {
        let mut ws = ConverterWorkspace::default();
        ws.code.set_text("   \n");
        assert_eq!(ws.begin_submit(), Err(ValidationError::EmptyCode));
        assert_eq!(ws.phase, ConvertPhase::Idle);
    }

    #[test]
    fn latest_submission_wins() {
        let mut ws = ConverterWorkspace::default();
        ws.code.set_text("print(1)");
        let first = ws.begin_submit().unwrap();
        ws.next_target();
        let second = ws.begin_submit().unwrap();
        assert_ne!(first.target, second.target);

        assert_eq!(ws.complete_submit(second.seq, Ok(converted("b"))), Completion::Applied);
        assert_eq!(ws.complete_submit(first.seq, Ok(converted("a"))), Completion::Stale);
        assert_eq!(ws.result.as_ref().unwrap().converted_code, "b");
        assert_eq!(ws.phase, ConvertPhase::Ready);
    }

    #[test]
    fn failure_is_reported_and_buffer_kept() {
        let mut ws = ConverterWorkspace::default();
        ws.code.set_text("print(1)");
        let t = ws.begin_submit().unwrap();
        ws.complete_submit(
            t.seq,
            Err(ApiError::Request { status: Some(500), message: "Conversion failed".into() }),
        );
        assert_eq!(ws.phase, ConvertPhase::Failed("Conversion failed".into()));
        assert_eq!(ws.code.text(), "print(1)");
    }

    #[test]
    fn download_uses_target_extension() {
        let mut ws = ConverterWorkspace { target: Language::Go, ..Default::default() };
        ws.code.set_text("print(1)");
        let t = ws.begin_submit().unwrap();
        ws.complete_submit(t.seq, Ok(converted("package main")));
        let dl = ws.converted_download().unwrap();
        assert_eq!(dl.file_name, "converted.go");
        assert_eq!(dl.contents, "package main");

        ws.clear();
        assert!(ws.converted_download().is_none());
    }
}
