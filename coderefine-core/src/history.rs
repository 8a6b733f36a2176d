//! Review history list with confirmed deletion.

use crate::error::ApiError;
use crate::review::Completion;
use crate::types::ReviewHistoryRecord;

/// Default number of records fetched for the history list.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTicket {
    pub seq: u64,
    pub limit: usize,
}

#[derive(Debug, Default)]
pub struct HistoryBrowser {
    /// Server order, never re-sorted locally.
    pub records: Vec<ReviewHistoryRecord>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    /// Record awaiting a yes/no confirmation.
    pub pending_delete: Option<i64>,
    /// Deletes sent and not yet answered.
    pub deleting: Vec<i64>,
    /// Set once a list has been applied, so entering the screen again does
    /// not refetch unless asked to.
    pub loaded: bool,
    seq: u64,
}

impl HistoryBrowser {
    pub fn begin_refresh(&mut self, limit: usize) -> ListTicket {
        self.seq += 1;
        self.loading = true;
        self.error = None;
        ListTicket { seq: self.seq, limit }
    }

    pub fn complete_refresh(
        &mut self,
        ticket: ListTicket,
        result: Result<Vec<ReviewHistoryRecord>, ApiError>,
    ) -> Completion {
        if ticket.seq != self.seq {
            return Completion::Stale;
        }
        self.loading = false;
        match result {
            Ok(records) => {
                tracing::debug!(count = records.len(), "history loaded");
                self.records = records;
                self.loaded = true;
                self.clamp_selection();
            }
            Err(e) => {
                tracing::warn!("history fetch failed: {e}");
                self.error = Some(e.to_string());
            }
        }
        Completion::Applied
    }

    pub fn selected_record(&self) -> Option<&ReviewHistoryRecord> {
        self.records.get(self.selected)
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected_record().map(|r| r.id)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.records.len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.records.len() {
            self.selected = self.records.len().saturating_sub(1);
        }
    }

    /// Arms the confirmation for `id`. Returns `false` if no such record is
    /// listed or a delete for it is already in flight.
    pub fn request_delete(&mut self, id: i64) -> bool {
        if self.deleting.contains(&id) {
            return false;
        }
        if self.records.iter().any(|r| r.id == id) {
            self.pending_delete = Some(id);
            true
        } else {
            false
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Consumes the armed confirmation and returns the id to delete.
    pub fn confirm_delete(&mut self) -> Option<i64> {
        let id = self.pending_delete.take()?;
        if self.deleting.contains(&id) {
            return None;
        }
        self.deleting.push(id);
        Some(id)
    }

    /// Applies the server's answer to a delete. The record leaves the list
    /// only on success; returns whether it was removed.
    pub fn complete_delete(&mut self, id: i64, result: Result<(), ApiError>) -> bool {
        self.deleting.retain(|d| *d != id);
        match result {
            Ok(()) => {
                let before = self.records.len();
                self.records.retain(|r| r.id != id);
                self.clamp_selection();
                let removed = self.records.len() < before;
                tracing::info!(id, removed, "review deleted");
                removed
            }
            Err(e) => {
                tracing::warn!(id, "delete failed: {e}");
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self { seq: self.seq + 1, ..Self::default() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> ReviewHistoryRecord {
        ReviewHistoryRecord {
            id,
            language: "python".into(),
            score: 70,
            critical_count: 0,
            high_count: 1,
            medium_count: 0,
            low_count: 2,
            created_at: "2024-05-01T10:00:00".into(),
            original_code: "print(1)".into(),
            refactored_code: None,
            issues_json: None,
        }
    }

    fn loaded() -> HistoryBrowser {
        let mut h = HistoryBrowser::default();
        let t = h.begin_refresh(DEFAULT_HISTORY_LIMIT);
        h.complete_refresh(t, Ok((1..=10).map(record).collect()));
        h
    }

    #[test]
    fn successful_delete_removes_only_that_record() {
        let mut h = loaded();
        assert!(h.request_delete(7));
        assert_eq!(h.confirm_delete(), Some(7));
        assert!(h.complete_delete(7, Ok(())));
        assert_eq!(h.records.len(), 9);
        assert!(h.records.iter().all(|r| r.id != 7));
        assert!(h.deleting.is_empty());
    }

    #[test]
    fn failed_delete_keeps_the_list() {
        let mut h = loaded();
        h.request_delete(7);
        let id = h.confirm_delete().unwrap();
        let err = ApiError::Request { status: Some(404), message: "Review not found".into() };
        assert!(!h.complete_delete(id, Err(err)));
        assert_eq!(h.records.len(), 10);
        assert_eq!(h.error.as_deref(), Some("Review not found"));
    }

    #[test]
    fn record_being_deleted_cannot_be_deleted_again() {
        let mut h = loaded();
        assert!(h.request_delete(7));
        assert_eq!(h.confirm_delete(), Some(7));
        assert!(!h.request_delete(7));
        assert_eq!(h.confirm_delete(), None);
        assert_eq!(h.deleting, vec![7]);

        h.complete_delete(7, Ok(()));
        assert!(!h.request_delete(7));
    }

    #[test]
    fn cancel_disarms_confirmation() {
        let mut h = loaded();
        h.request_delete(3);
        h.cancel_delete();
        assert_eq!(h.confirm_delete(), None);
        assert!(!h.request_delete(99));
    }

    #[test]
    fn selection_is_clamped_after_delete_of_last_row() {
        let mut h = loaded();
        h.select_last();
        assert_eq!(h.selected_id(), Some(10));
        h.request_delete(10);
        h.confirm_delete();
        h.complete_delete(10, Ok(()));
        assert_eq!(h.selected_id(), Some(9));
    }

    #[test]
    fn older_list_response_is_ignored() {
        let mut h = HistoryBrowser::default();
        let first = h.begin_refresh(50);
        let second = h.begin_refresh(50);
        h.complete_refresh(second, Ok(vec![record(1)]));
        assert_eq!(h.complete_refresh(first, Ok(vec![])), Completion::Stale);
        assert_eq!(h.records.len(), 1);
        assert!(!h.loading);
    }

    #[test]
    fn server_order_is_preserved() {
        let mut h = HistoryBrowser::default();
        let t = h.begin_refresh(50);
        h.complete_refresh(t, Ok(vec![record(5), record(9), record(2)]));
        let ids: Vec<i64> = h.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 9, 2]);
    }
}
