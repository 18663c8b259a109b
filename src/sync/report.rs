use chrono::{DateTime, Utc};

/// Outcome of one reconciliation run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Number of items written into the store
    pub updated: usize,
    /// Ids written, in completion order
    pub updated_ids: Vec<String>,
    /// Detail URLs that answered with no entities
    pub empty_urls: Vec<String>,
    /// `(id, error)` for branches that failed
    pub failures: Vec<(String, String)>,
    pub pages: usize,
    pub candidates: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    /// Whether the store changed and needs to be persisted.
    pub fn has_changes(&self) -> bool {
        self.updated > 0
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
