//! Reading queue service

use super::impl_service;
use crate::config::ServiceConfig;
use crate::ports::ReadingQueueRepository;
use crate::types::{QueuePosition, ReadingQueueItem};
use letterbox_core::{Envelope, Error, Result, ServiceCore, validation};
use std::collections::HashSet;
use std::sync::Arc;

/// Each reader's "read later" list.
#[derive(Clone)]
pub struct ReadingQueueService {
    repo: Arc<dyn ReadingQueueRepository>,
    core: ServiceCore,
    config: ServiceConfig,
}

impl ReadingQueueService {
    /// Create a reading queue service over `repo`.
    pub fn new(repo: Arc<dyn ReadingQueueRepository>, config: ServiceConfig) -> Self {
        Self {
            repo,
            core: ServiceCore::new("reading_queue", config.retry.clone()),
            config,
        }
    }

    /// The reader's queue, ordered by position.
    pub async fn get_queue(&self, user_id: &str) -> Result<Vec<ReadingQueueItem>> {
        let user_id = validation::required_id(user_id, "User")?;
        let (repo, user_id) = (&self.repo, user_id.as_str());
        self.core
            .read("getReadingQueue", move || repo.list(user_id))
            .await
    }

    /// Whether the newsletter is already queued for the reader.
    pub async fn is_in_queue(&self, user_id: &str, newsletter_id: &str) -> Result<bool> {
        let user_id = validation::required_id(user_id, "User")?;
        let newsletter_id = validation::required_id(newsletter_id, "Newsletter")?;
        let (repo, user_id, newsletter_id) = (&self.repo, user_id.as_str(), newsletter_id.as_str());
        self.core
            .read("isInQueue", move || repo.contains(user_id, newsletter_id))
            .await
    }

    /// Append a newsletter to the end of the reader's queue.
    pub async fn add_to_queue(
        &self,
        user_id: &str,
        newsletter_id: &str,
    ) -> Result<Envelope<ReadingQueueItem>> {
        let user_id = validation::required_id(user_id, "User")?;
        let newsletter_id = validation::required_id(newsletter_id, "Newsletter")?;
        let (repo, user_id, newsletter_id) = (&self.repo, user_id.as_str(), newsletter_id.as_str());
        Ok(self
            .core
            .mutate("addToQueue", move || repo.add(user_id, newsletter_id))
            .await)
    }

    /// Remove one entry from the queue.
    pub async fn remove_from_queue(&self, item_id: &str) -> Result<Envelope<bool>> {
        let item_id = validation::required_id(item_id, "Queue item")?;
        let (repo, item_id) = (&self.repo, item_id.as_str());
        Ok(self
            .core
            .mutate("removeFromQueue", move || repo.remove(item_id))
            .await)
    }

    /// Move entries to new positions.
    ///
    /// Positions must be non-negative and unique within the request,
    /// otherwise the call fails with `"Invalid queue position"`.
    pub async fn reorder(&self, items: &[QueuePosition]) -> Result<Envelope<()>> {
        let items = validate_positions(items)?;
        let (repo, items) = (&self.repo, items.as_slice());
        Ok(self
            .core
            .mutate("reorderQueue", move || repo.reorder(items))
            .await)
    }

    /// Empty the reader's queue. Returns how many entries were removed.
    pub async fn clear_queue(&self, user_id: &str) -> Result<Envelope<u64>> {
        let user_id = validation::required_id(user_id, "User")?;
        let (repo, user_id) = (&self.repo, user_id.as_str());
        Ok(self
            .core
            .mutate("clearQueue", move || repo.clear(user_id))
            .await)
    }
}

impl_service!(ReadingQueueService);

fn validate_positions(items: &[QueuePosition]) -> Result<Vec<QueuePosition>> {
    validation::non_empty(items, "Queue items")?;

    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(|item| {
            let id = validation::required_id(&item.id, "Queue item")?;
            if item.position < 0 || !seen.insert(item.position) {
                return Err(Error::validation("Invalid queue position"));
            }
            Ok(QueuePosition {
                id,
                position: item.position,
            })
        })
        .collect()
}
