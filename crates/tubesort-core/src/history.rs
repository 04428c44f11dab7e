//! Bounded record of submitted links, shared between request handlers.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::link::VideoLink;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub link: VideoLink,
    pub submitted_at: DateTime<Utc>,
}

/// Append-only ring of recent submissions, oldest first.
///
/// Once `capacity` entries are held, each new submission evicts the oldest.
/// Duplicates are kept.
pub struct LinkHistory {
    entries: RwLock<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl LinkHistory {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn push(&self, link: VideoLink) {
        let mut entries = self.entries.write().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(HistoryEntry {
            link,
            submitted_at: Utc::now(),
        });
    }

    pub async fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
