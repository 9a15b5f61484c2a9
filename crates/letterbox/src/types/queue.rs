//! Reading queue entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A newsletter a reader saved for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingQueueItem {
    /// Unique identifier of the queue entry
    pub id: String,
    /// Owner of the queue
    pub user_id: String,
    /// Queued newsletter
    pub newsletter_id: String,
    /// 0-based position in the queue
    pub position: u32,
    /// When the entry was added
    pub added_at: DateTime<Utc>,
}

/// Requested position of a queue entry when reordering.
///
/// Positions are signed so out-of-range input can be reported rather than
/// silently wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuePosition {
    /// Queue entry identifier
    pub id: String,
    /// Requested 0-based position
    pub position: i64,
}
