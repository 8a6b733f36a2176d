//! Wire and domain types exchanged with the CodeRefine backend.
//!
//! Field names follow the backend's snake_case JSON. Records are produced by the
//! server and never mutated by the client; the workspaces hold them as-is.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Lightweight identity persisted next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
}

/// A bearer token paired with the user it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Body of a successful `/auth/login` or `/auth/register` exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub username: String,
    pub email: String,
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        Session {
            token: self.access_token,
            user: User { username: self.username, email: self.email },
        }
    }
}

/// Full user record returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub review_count: u32,
}

/// Issue importance, ordered `Critical > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] =
        [Severity::Critical, Severity::High, Severity::Medium, Severity::Low];

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        })
    }
}

// The model sometimes answers "High" or "CRITICAL"; anything unrecognised is
// shown as the lowest tier rather than failing the whole review.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            _ => Severity::Low,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    #[serde(default, deserialize_with = "de_null_string")]
    pub category: String,
    #[serde(default, deserialize_with = "de_null_string")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_hint: Option<String>,
    #[serde(default, deserialize_with = "de_null_string")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Aggregate block of a review. The four counts come from the model's summary
/// and are independent of the issue list length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewSummary {
    #[serde(default, deserialize_with = "de_score")]
    pub score: u8,
    #[serde(default, deserialize_with = "de_null_count")]
    pub critical: u32,
    #[serde(default, deserialize_with = "de_null_count")]
    pub high: u32,
    #[serde(default, deserialize_with = "de_null_count")]
    pub medium: u32,
    #[serde(default, deserialize_with = "de_null_count")]
    pub low: u32,
    #[serde(default, deserialize_with = "de_null_string")]
    pub overview: String,
}

impl ReviewSummary {
    pub fn count(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> u32 {
        self.critical.saturating_add(self.high).saturating_add(self.medium).saturating_add(self.low)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_id: Option<i64>,
    pub summary: ReviewSummary,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default, deserialize_with = "de_null_string")]
    pub refactored_code: String,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl ReviewResult {
    /// Returns `(summary_total, issues_len)` when the two disagree.
    ///
    /// The client never reconciles them; callers only log the mismatch.
    pub fn count_mismatch(&self) -> Option<(u32, usize)> {
        let total = self.summary.total();
        (total as usize != self.issues.len()).then_some((total, self.issues.len()))
    }

    pub fn has_refactored_code(&self) -> bool {
        !self.refactored_code.trim().is_empty()
    }
}

/// One row of `/reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewHistoryRecord {
    pub id: i64,
    pub language: String,
    #[serde(deserialize_with = "de_score")]
    pub score: u8,
    #[serde(default)]
    pub critical_count: u32,
    #[serde(default)]
    pub high_count: u32,
    #[serde(default)]
    pub medium_count: u32,
    #[serde(default)]
    pub low_count: u32,
    pub created_at: String,
    #[serde(default)]
    pub original_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refactored_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues_json: Option<String>,
}

impl ReviewHistoryRecord {
    pub fn issue_total(&self) -> u32 {
        self.critical_count + self.high_count + self.medium_count + self.low_count
    }

    /// Timestamp formatted for list rows, falling back to the raw string.
    pub fn created_display(&self) -> String {
        format_timestamp(&self.created_at)
    }

    /// First non-blank line of the stored source, used as a row preview.
    pub fn preview(&self) -> &str {
        self.original_code.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
    }
}

/// Body of `/reviews/{id}`: the stored record plus the summary and issue list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewDetail {
    pub id: i64,
    pub language: String,
    pub original_code: String,
    #[serde(default, deserialize_with = "de_null_string")]
    pub refactored_code: String,
    pub summary: ReviewSummary,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub created_at: String,
}

impl ReviewDetail {
    /// Synthesises the result a fresh submission would have produced.
    pub fn to_result(&self) -> ReviewResult {
        ReviewResult {
            review_id: Some(self.id),
            summary: self.summary.clone(),
            issues: self.issues.clone(),
            refactored_code: self.refactored_code.clone(),
            improvements: self.improvements.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Stats {
    pub total: u32,
    pub avg_score: f64,
    pub total_issues: u32,
    #[serde(default)]
    pub languages: BTreeMap<String, u32>,
}

impl Stats {
    /// Languages sorted by review count, most used first.
    pub fn languages_by_count(&self) -> Vec<(&str, u32)> {
        let mut langs: Vec<(&str, u32)> =
            self.languages.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        langs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        langs
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ComplexityAnalysis {
    #[serde(default)]
    pub original_time: String,
    #[serde(default)]
    pub original_space: String,
    #[serde(default)]
    pub new_time: String,
    #[serde(default)]
    pub new_space: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversionResult {
    pub converted_code: String,
    #[serde(default)]
    pub complexity_analysis: ComplexityAnalysis,
    #[serde(default)]
    pub explanation: String,
}

/// Request bodies. Kept next to the responses so the wire shapes live in one file.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ReviewRequest<'a> {
    pub code: &'a str,
    pub language: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ConvertRequest<'a> {
    pub code: &'a str,
    pub target_language: &'a str,
}

/// Scores are stored as floats server-side; the UI works with whole points.
// Summary fields are model output passed through by the backend: any of them
// may be null, and numbers may arrive as floats.
fn de_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

fn de_null_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.round().clamp(0.0, f64::from(u32::MAX)) as u32)
}

fn de_null_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_owned()
}
