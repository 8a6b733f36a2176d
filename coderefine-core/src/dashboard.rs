//! Read-only dashboard: aggregate stats plus the most recent reviews.
//!
//! The two fetches are independent and may complete in either order. Each
//! completion is matched against the refresh it belongs to.

use crate::error::ApiError;
use crate::types::{ReviewHistoryRecord, Stats};

/// Default length of the recent-reviews list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub seq: u64,
}

#[derive(Debug)]
pub struct Dashboard {
    pub stats: Option<Stats>,
    pub recent: Vec<ReviewHistoryRecord>,
    pub selected: usize,
    pub stats_loading: bool,
    pub recent_loading: bool,
    /// Needs a refetch before it is shown again.
    pub stale: bool,
    seq: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            stats: None,
            recent: Vec::new(),
            selected: 0,
            stats_loading: false,
            recent_loading: false,
            stale: true,
            seq: 0,
        }
    }
}

impl Dashboard {
    pub fn is_loading(&self) -> bool {
        self.stats_loading || self.recent_loading
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.seq += 1;
        self.stats_loading = true;
        self.recent_loading = true;
        self.stale = false;
        RefreshTicket { seq: self.seq }
    }

    /// Returns `false` when the ticket is from a superseded refresh.
    pub fn apply_stats(&mut self, ticket: RefreshTicket, result: Result<Stats, ApiError>) -> bool {
        if ticket.seq != self.seq {
            return false;
        }
        self.stats_loading = false;
        match result {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => tracing::warn!("stats fetch failed: {e}"),
        }
        true
    }

    pub fn apply_recent(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<ReviewHistoryRecord>, ApiError>,
    ) -> bool {
        if ticket.seq != self.seq {
            return false;
        }
        self.recent_loading = false;
        match result {
            Ok(recent) => {
                self.recent = recent;
                if self.selected >= self.recent.len() {
                    self.selected = self.recent.len().saturating_sub(1);
                }
            }
            Err(e) => tracing::warn!("recent reviews fetch failed: {e}"),
        }
        true
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.recent.get(self.selected).map(|r| r.id)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.recent.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Average score rounded for display, `None` before any review exists.
    pub fn average_score(&self) -> Option<u8> {
        self.stats
            .as_ref()
            .filter(|s| s.total > 0)
            .map(|s| s.avg_score.round().clamp(0.0, 100.0) as u8)
    }

    pub fn reset(&mut self) {
        *self = Self { seq: self.seq + 1, ..Self::default() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total: u32, avg: f64) -> Stats {
        Stats { total, avg_score: avg, total_issues: 3, languages: Default::default() }
    }

    #[test]
    fn completions_apply_in_any_order() {
        let mut d = Dashboard::default();
        let t = d.begin_refresh();
        assert!(d.is_loading());
        assert!(d.apply_recent(t, Ok(vec![])));
        assert!(d.stats_loading);
        assert!(d.apply_stats(t, Ok(stats(4, 72.6))));
        assert!(!d.is_loading());
        assert_eq!(d.average_score(), Some(73));
    }

    #[test]
    fn superseded_refresh_is_ignored() {
        let mut d = Dashboard::default();
        let old = d.begin_refresh();
        let new = d.begin_refresh();
        assert!(!d.apply_stats(old, Ok(stats(1, 10.0))));
        assert!(d.stats.is_none());
        assert!(d.apply_stats(new, Ok(stats(2, 90.0))));
        assert_eq!(d.stats.as_ref().unwrap().total, 2);
    }

    #[test]
    fn failure_keeps_previous_value() {
        let mut d = Dashboard::default();
        let t = d.begin_refresh();
        d.apply_stats(t, Ok(stats(2, 50.0)));
        let t = d.begin_refresh();
        d.apply_stats(t, Err(ApiError::Timeout));
        assert_eq!(d.stats.as_ref().unwrap().total, 2);
        assert!(!d.stats_loading);
    }

    #[test]
    fn stale_until_refreshed() {
        let mut d = Dashboard::default();
        assert!(d.stale);
        d.begin_refresh();
        assert!(!d.stale);
        d.mark_stale();
        assert!(d.stale);
        assert_eq!(d.average_score(), None);
    }
}
