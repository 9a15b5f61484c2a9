//! Data-access ports the services are built on.
//!
//! The application supplies one adapter per entity. Each method is a single
//! backend call that either resolves or fails with a [`RawFailure`]; the
//! services own validation, retries and error classification, so adapters
//! should report failures as they receive them and never retry on their own.
//!
//! Single-row lookups return `Ok(None)` for a missing row. Adapters whose
//! backend signals a missing row as an error may instead return
//! [`RawFailure::row_not_found`]; the services treat both the same way.

use crate::types::{
    CreateGroupParams, CreateSourceParams, CreateTagParams, CreateUserParams, Newsletter,
    NewsletterQuery, NewsletterSource, NewsletterUpdate, QueuePosition, ReadingQueueItem,
    SourceGroup, SourceUpdate, Tag, UpdateGroupParams, UpdateTagParams, User, UserChanges,
};
use async_trait::async_trait;
use letterbox_core::RawFailure;

/// Storage for reader accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by ID.
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, RawFailure>;

    /// Fetch a user by their lower-cased email.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RawFailure>;

    /// Insert a new user.
    async fn create(&self, params: &CreateUserParams) -> Result<User, RawFailure>;

    /// Apply `changes` to an existing user.
    async fn update(&self, id: &str, changes: &UserChanges) -> Result<User, RawFailure>;

    /// Delete a user. Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, RawFailure>;
}

/// Storage for received newsletters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    /// Fetch a newsletter by ID.
    async fn get_by_id(&self, id: &str) -> Result<Option<Newsletter>, RawFailure>;

    /// List newsletters matching `query`.
    async fn list(&self, query: &NewsletterQuery) -> Result<Vec<Newsletter>, RawFailure>;

    /// Full-text search within newsletters matching `query`.
    async fn search(
        &self,
        text: &str,
        query: &NewsletterQuery,
    ) -> Result<Vec<Newsletter>, RawFailure>;

    /// Apply `update` to a newsletter.
    async fn update(&self, id: &str, update: &NewsletterUpdate)
    -> Result<Newsletter, RawFailure>;

    /// Delete a newsletter. Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, RawFailure>;

    /// Replace the tags attached to a newsletter.
    async fn set_tags(&self, id: &str, tag_ids: &[String]) -> Result<Newsletter, RawFailure>;
}

/// Storage for tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Fetch a tag by ID.
    async fn get_by_id(&self, id: &str) -> Result<Option<Tag>, RawFailure>;

    /// List every tag.
    async fn list(&self) -> Result<Vec<Tag>, RawFailure>;

    /// Insert a new tag. `params.color` is always set.
    async fn create(&self, params: &CreateTagParams) -> Result<Tag, RawFailure>;

    /// Apply changes to a tag.
    async fn update(&self, id: &str, params: &UpdateTagParams) -> Result<Tag, RawFailure>;

    /// Delete a tag. Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, RawFailure>;
}

/// Storage for newsletter sources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Fetch a source by ID.
    async fn get_by_id(&self, id: &str) -> Result<Option<NewsletterSource>, RawFailure>;

    /// List sources, optionally including archived ones.
    async fn list(&self, include_archived: bool) -> Result<Vec<NewsletterSource>, RawFailure>;

    /// Insert a new source.
    async fn create(&self, params: &CreateSourceParams) -> Result<NewsletterSource, RawFailure>;

    /// Apply `update` to a source.
    async fn update(&self, id: &str, update: &SourceUpdate)
    -> Result<NewsletterSource, RawFailure>;

    /// Delete a source. Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, RawFailure>;
}

/// Storage for source groups and their membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceGroupRepository: Send + Sync {
    /// Fetch a group, with its sources, by ID.
    async fn get_by_id(&self, id: &str) -> Result<Option<SourceGroup>, RawFailure>;

    /// List every group.
    async fn list(&self) -> Result<Vec<SourceGroup>, RawFailure>;

    /// Insert a new group with its initial members.
    async fn create(&self, params: &CreateGroupParams) -> Result<SourceGroup, RawFailure>;

    /// Apply changes to a group.
    async fn update(&self, id: &str, params: &UpdateGroupParams)
    -> Result<SourceGroup, RawFailure>;

    /// Delete a group. Member sources are left untouched.
    async fn delete(&self, id: &str) -> Result<bool, RawFailure>;

    /// Add sources to a group.
    async fn add_sources(
        &self,
        group_id: &str,
        source_ids: &[String],
    ) -> Result<SourceGroup, RawFailure>;

    /// Remove sources from a group.
    async fn remove_sources(
        &self,
        group_id: &str,
        source_ids: &[String],
    ) -> Result<SourceGroup, RawFailure>;
}

/// Storage for each reader's reading queue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadingQueueRepository: Send + Sync {
    /// The reader's queue, ordered by position.
    async fn list(&self, user_id: &str) -> Result<Vec<ReadingQueueItem>, RawFailure>;

    /// Whether the newsletter is already queued for the reader.
    async fn contains(&self, user_id: &str, newsletter_id: &str) -> Result<bool, RawFailure>;

    /// Append a newsletter to the end of the reader's queue.
    async fn add(&self, user_id: &str, newsletter_id: &str)
    -> Result<ReadingQueueItem, RawFailure>;

    /// Remove one queue entry. Returns whether a row was removed.
    async fn remove(&self, item_id: &str) -> Result<bool, RawFailure>;

    /// Move entries to the given positions.
    async fn reorder(&self, positions: &[QueuePosition]) -> Result<(), RawFailure>;

    /// Remove every entry from the reader's queue. Returns how many were removed.
    async fn clear(&self, user_id: &str) -> Result<u64, RawFailure>;
}
