//! Leaderboard storage
//!
//! The hosted store is an opaque CRUD collaborator behind `LeaderboardStore`.
//! When it fails, the game degrades to the in-memory store and a non-blocking
//! notification; a save is never allowed to crash or stall the loop.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default number of rows a query returns
pub const DEFAULT_QUERY_LIMIT: usize = 10;
/// Longest accepted player name
pub const MAX_NAME_LEN: usize = 20;

/// A single leaderboard row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub leadership_score: u32,
    /// The run's choice labels, kept opaque
    pub choices: Vec<String>,
    /// Unix timestamp (ms)
    pub created_at: f64,
}

/// Query shape: newest-first is never offered; ordering is always score
/// descending with an optional date floor
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    /// Only rows created at or after this timestamp (ms)
    pub since: Option<f64>,
    /// Row cap; `DEFAULT_QUERY_LIMIT` when unset
    pub limit: Option<usize>,
}

/// The remote CRUD seam
pub trait LeaderboardStore {
    fn insert(&mut self, entry: LeaderboardEntry) -> Result<()>;
    /// Rows ordered by score descending
    fn query(&self, options: QueryOptions) -> Result<Vec<LeaderboardEntry>>;
}

/// In-memory store. Doubles as the local fallback when the hosted store is
/// unreachable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    entries: Vec<LeaderboardEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest stored score, if any
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.leadership_score)
    }
}

impl LeaderboardStore for MemoryStore {
    fn insert(&mut self, entry: LeaderboardEntry) -> Result<()> {
        // Keep sorted by score descending; ties keep insertion order
        let pos = self
            .entries
            .iter()
            .position(|e| entry.leadership_score > e.leadership_score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        Ok(())
    }

    fn query(&self, options: QueryOptions) -> Result<Vec<LeaderboardEntry>> {
        let limit = options.limit.unwrap_or(DEFAULT_QUERY_LIMIT);
        let rows = self
            .entries
            .iter()
            .filter(|e| options.since.is_none_or(|since| e.created_at >= since))
            .take(limit)
            .cloned()
            .collect();
        Ok(rows)
    }
}

/// Trim, strip control characters, and cap the length of a player name.
/// An empty result falls back to "Anonymous".
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_NAME_LEN)
        .collect();
    if cleaned.is_empty() {
        "Anonymous".to_string()
    } else {
        cleaned
    }
}

/// Try the remote store first; on failure, keep the entry locally and report
/// which store took it. The caller surfaces the degraded path as a
/// notification, nothing more.
pub fn save_with_fallback(
    remote: &mut dyn LeaderboardStore,
    local: &mut MemoryStore,
    entry: LeaderboardEntry,
) -> SaveOutcome {
    match remote.insert(entry.clone()) {
        Ok(()) => SaveOutcome::Remote,
        Err(err) => {
            log::warn!("leaderboard save failed, keeping locally: {err:#}");
            // MemoryStore::insert is infallible in practice
            let _ = local.insert(entry);
            SaveOutcome::Local
        }
    }
}

/// Where a score ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Remote,
    Local,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn entry(name: &str, score: u32, created_at: f64) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: name.to_string(),
            leadership_score: score,
            choices: vec!["education".to_string(), "technology".to_string()],
            created_at,
        }
    }

    #[test]
    fn test_query_orders_by_score_desc() {
        let mut store = MemoryStore::new();
        store.insert(entry("a", 40, 1.0)).unwrap();
        store.insert(entry("b", 90, 2.0)).unwrap();
        store.insert(entry("c", 70, 3.0)).unwrap();

        let rows = store.query(QueryOptions::default()).unwrap();
        let scores: Vec<u32> = rows.iter().map(|e| e.leadership_score).collect();
        assert_eq!(scores, vec![90, 70, 40]);
        assert_eq!(store.top_score(), Some(90));
    }

    #[test]
    fn test_query_limit_and_date_filter() {
        let mut store = MemoryStore::new();
        for i in 0..15u32 {
            store.insert(entry("p", i, i as f64)).unwrap();
        }

        let rows = store.query(QueryOptions::default()).unwrap();
        assert_eq!(rows.len(), DEFAULT_QUERY_LIMIT);

        let rows = store
            .query(QueryOptions {
                since: Some(10.0),
                limit: Some(3),
            })
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|e| e.created_at >= 10.0));
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  Ayan  "), "Ayan");
        assert_eq!(sanitize_name("a\nb\tc"), "abc");
        assert_eq!(sanitize_name(""), "Anonymous");
        assert_eq!(sanitize_name(&"x".repeat(50)).len(), MAX_NAME_LEN);
    }

    struct DownStore;

    impl LeaderboardStore for DownStore {
        fn insert(&mut self, _entry: LeaderboardEntry) -> Result<()> {
            Err(anyhow!("503 service unavailable"))
        }
        fn query(&self, _options: QueryOptions) -> Result<Vec<LeaderboardEntry>> {
            Err(anyhow!("503 service unavailable"))
        }
    }

    #[test]
    fn test_save_degrades_to_local() {
        let mut remote = DownStore;
        let mut local = MemoryStore::new();
        let outcome = save_with_fallback(&mut remote, &mut local, entry("a", 55, 0.0));
        assert_eq!(outcome, SaveOutcome::Local);
        assert_eq!(local.len(), 1);

        let mut working = MemoryStore::new();
        let outcome = save_with_fallback(&mut working, &mut local, entry("b", 60, 0.0));
        assert_eq!(outcome, SaveOutcome::Remote);
        assert_eq!(working.len(), 1);
        assert_eq!(local.len(), 1);
    }
}
