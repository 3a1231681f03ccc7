use std::time::Instant;

use tracing::warn;

use crate::db::SnapshotReader;
use crate::error::Result;
use crate::ranker::rank;
use crate::scorer::ScoringPolicy;
use crate::types::{ScoredToken, Snapshot};

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Ready,
    /// Database reachable but no snapshot has been ingested yet.
    Empty,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct WatchState {
    pub status: LoadStatus,
    pub db_path: String,
    pub ts: Option<i64>,
    pub ranked: Vec<ScoredToken>,
    pub last_refresh: Instant,
    policy: ScoringPolicy,
}

impl WatchState {
    pub fn new(db_path: String, policy: ScoringPolicy) -> Self {
        Self {
            status: LoadStatus::Loading,
            db_path,
            ts: None,
            ranked: Vec::new(),
            last_refresh: Instant::now(),
            policy,
        }
    }

    /// Re-read the latest snapshot. Errors are kept on screen; the previous
    /// ranking stays visible until a read succeeds.
    pub async fn refresh(&mut self, reader: &SnapshotReader) {
        let result = reader.fetch_latest().await;
        self.apply(result);
    }

    pub fn apply(&mut self, result: Result<Option<Snapshot>>) {
        self.last_refresh = Instant::now();
        match result {
            Ok(Some(snapshot)) => {
                self.ts = Some(snapshot.ts);
                self.ranked = rank(snapshot.records, &self.policy);
                self.status = LoadStatus::Ready;
            }
            Ok(None) => {
                self.ts = None;
                self.ranked.clear();
                self.status = LoadStatus::Empty;
            }
            Err(e) => {
                warn!("Watch refresh failed: {e}");
                self.status = LoadStatus::Error(e.to_string());
            }
        }
    }

    pub fn selected(&self, index: Option<usize>) -> Option<&ScoredToken> {
        index.and_then(|i| self.ranked.get(i))
    }
}

// ---------------------------------------------------------------------------
// Selection helpers
// ---------------------------------------------------------------------------

pub fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(current.map_or(0, |i| (i + 1).min(len - 1)))
}

pub fn prev_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(current.map_or(0, |i| i.saturating_sub(1).min(len - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::types::fixtures::{blank_record, healthy_record};

    fn state() -> WatchState {
        WatchState::new("test.db".to_string(), ScoringPolicy::DEFAULT)
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            ts: 7,
            records: vec![blank_record("b"), healthy_record("a")],
        }
    }

    #[test]
    fn snapshot_is_ranked_on_apply() {
        let mut s = state();
        s.apply(Ok(Some(snapshot())));
        assert_eq!(s.status, LoadStatus::Ready);
        assert_eq!(s.ts, Some(7));
        assert_eq!(s.ranked[0].record.mint, "a");
        assert_eq!(s.selected(Some(1)).map(|t| t.record.mint.as_str()), Some("b"));
        assert!(s.selected(Some(5)).is_none());
    }

    #[test]
    fn empty_database_clears_ranking() {
        let mut s = state();
        s.apply(Ok(Some(snapshot())));
        s.apply(Ok(None));
        assert_eq!(s.status, LoadStatus::Empty);
        assert!(s.ranked.is_empty());
    }

    #[test]
    fn error_keeps_previous_ranking() {
        let mut s = state();
        s.apply(Ok(Some(snapshot())));
        s.apply(Err(AppError::Config("boom".to_string())));
        assert!(matches!(s.status, LoadStatus::Error(_)));
        assert_eq!(s.ranked.len(), 2);
        assert_eq!(s.ts, Some(7));
    }

    #[test]
    fn selection_stays_in_bounds() {
        assert_eq!(next_index(None, 0), None);
        assert_eq!(next_index(None, 3), Some(0));
        assert_eq!(next_index(Some(2), 3), Some(2));
        assert_eq!(prev_index(Some(0), 3), Some(0));
        assert_eq!(prev_index(Some(2), 3), Some(1));
    }

    #[tokio::test]
    async fn refresh_reads_latest_snapshot() {
        let pool = crate::db::reader::test_support::seeded_pool().await;
        let reader = SnapshotReader::new(pool);
        let mut s = state();
        s.refresh(&reader).await;
        assert_eq!(s.status, LoadStatus::Ready);
        assert_eq!(s.ts, Some(200));
        assert_eq!(s.ranked.len(), 3);
    }
}
