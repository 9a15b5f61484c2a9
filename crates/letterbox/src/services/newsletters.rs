//! Newsletter service
//!
//! Besides plain CRUD this service owns the state toggles (read, like,
//! archive), tag assignment and the bulk variants used by list views.
//!
//! Bulk operations do not agree on what `success` means:
//!
//! | Operation | Policy |
//! |---|---|
//! | [`bulk_mark_as_read`](NewsletterService::bulk_mark_as_read) | [`BulkSuccessPolicy::AllSucceeded`] |
//! | [`bulk_archive`](NewsletterService::bulk_archive) | [`BulkSuccessPolicy::Completed`] |
//! | [`bulk_update`](NewsletterService::bulk_update) | [`BulkSuccessPolicy::AllSucceeded`] |

use super::{impl_service, settle_pre_read};
use crate::config::ServiceConfig;
use crate::observability::{OperationTimer, log_bulk_outcome, log_relation_resolved};
use crate::ports::{NewsletterRepository, TagRepository};
use crate::types::{Newsletter, NewsletterQuery, NewsletterUpdate, Tag};
use letterbox_core::{
    BulkOutcome, BulkSuccessPolicy, Envelope, Error, Result, ServiceCore, validation,
};
use std::sync::Arc;

/// Newsletters, their state toggles and their tags.
#[derive(Clone)]
pub struct NewsletterService {
    repo: Arc<dyn NewsletterRepository>,
    tags: Arc<dyn TagRepository>,
    core: ServiceCore,
    config: ServiceConfig,
}

impl NewsletterService {
    /// Create a newsletter service.
    ///
    /// `tags` is only used to resolve tag IDs before they are attached.
    pub fn new(
        repo: Arc<dyn NewsletterRepository>,
        tags: Arc<dyn TagRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            tags,
            core: ServiceCore::new("newsletters", config.retry.clone()),
            config,
        }
    }

    /// Fetch a newsletter, raising `NotFoundError` when it does not exist.
    pub async fn get_newsletter(&self, id: &str) -> Result<Newsletter> {
        let newsletter_id = validation::required_id(id, "Newsletter")?;
        self.fetch_newsletter(&newsletter_id).await
    }

    /// List newsletters matching `query`. No matches is an empty list.
    pub async fn list_newsletters(&self, query: &NewsletterQuery) -> Result<Vec<Newsletter>> {
        let repo = &self.repo;
        self.core
            .read("getNewsletters", move || repo.list(query))
            .await
    }

    /// Full-text search, narrowed by `query`.
    pub async fn search_newsletters(
        &self,
        text: &str,
        query: &NewsletterQuery,
    ) -> Result<Vec<Newsletter>> {
        let text = validation::required(text, "Search query")?;
        let (repo, text) = (&self.repo, text.as_str());
        self.core
            .read("searchNewsletters", move || repo.search(text, query))
            .await
    }

    /// Update a newsletter's title, summary or flags.
    ///
    /// An update that sets no field is rejected before the backend is called.
    pub async fn update_newsletter(
        &self,
        id: &str,
        update: &NewsletterUpdate,
    ) -> Result<Envelope<Newsletter>> {
        let newsletter_id = validation::required_id(id, "Newsletter")?;
        let sanitized = NewsletterUpdate {
            title: validation::optional(update.title.as_deref(), |title| {
                validation::length_between(title, "Title", 1, 500)
            })?,
            ..update.clone()
        };
        if sanitized.is_empty() {
            return Err(Error::validation(NO_CHANGES));
        }

        self.apply("updateNewsletter", &newsletter_id, &sanitized)
            .await
    }

    /// Mark a newsletter as read.
    pub async fn mark_as_read(&self, id: &str) -> Result<Envelope<Newsletter>> {
        self.set_flag("markAsRead", id, NewsletterUpdate::read(true))
            .await
    }

    /// Mark a newsletter as unread.
    pub async fn mark_as_unread(&self, id: &str) -> Result<Envelope<Newsletter>> {
        self.set_flag("markAsUnread", id, NewsletterUpdate::read(false))
            .await
    }

    /// Archive a newsletter.
    pub async fn archive(&self, id: &str) -> Result<Envelope<Newsletter>> {
        self.set_flag("archive", id, NewsletterUpdate::archived(true))
            .await
    }

    /// Move a newsletter out of the archive.
    pub async fn unarchive(&self, id: &str) -> Result<Envelope<Newsletter>> {
        self.set_flag("unarchive", id, NewsletterUpdate::archived(false))
            .await
    }

    /// Flip the like flag.
    ///
    /// The current state is read first. If that read fails, the missing
    /// newsletter included, the failure is enveloped and no update is sent.
    pub async fn toggle_like(&self, id: &str) -> Result<Envelope<Newsletter>> {
        let newsletter_id = validation::required_id(id, "Newsletter")?;
        let current = match self.fetch_newsletter(&newsletter_id).await {
            Ok(current) => current,
            Err(error) => return Ok(Envelope::failed(error.envelope_message("toggleLike"))),
        };
        self.apply(
            "toggleLike",
            &current.id,
            &NewsletterUpdate::liked(!current.is_liked),
        )
        .await
    }

    /// Delete a newsletter.
    pub async fn delete_newsletter(&self, id: &str) -> Result<Envelope<bool>> {
        let newsletter_id = validation::required_id(id, "Newsletter")?;
        let (repo, newsletter_id) = (&self.repo, newsletter_id.as_str());
        Ok(self
            .core
            .mutate("deleteNewsletter", move || repo.delete(newsletter_id))
            .await)
    }

    /// Replace the tags on a newsletter.
    ///
    /// Every tag is resolved first. An unknown tag raises
    /// `"Tag with ID <id> not found"` and nothing is written; any other lookup
    /// failure comes back as a failed envelope.
    pub async fn update_tags<S: AsRef<str>>(
        &self,
        id: &str,
        tag_ids: &[S],
    ) -> Result<Envelope<Newsletter>> {
        let newsletter_id = validation::required_id(id, "Newsletter")?;
        let tag_ids = validation::id_list(tag_ids, "Tag IDs", "tag IDs", false)?;
        if let Err(error) = self.resolve_tags(&tag_ids).await {
            return settle_pre_read("updateNewsletterTags", error);
        }

        let (repo, newsletter_id, tag_ids) = (&self.repo, newsletter_id.as_str(), &tag_ids);
        Ok(self
            .core
            .mutate("updateNewsletterTags", move || {
                repo.set_tags(newsletter_id, tag_ids)
            })
            .await)
    }

    /// Mark many newsletters as read. Any failed item makes the batch fail.
    pub async fn bulk_mark_as_read<S: AsRef<str>>(&self, ids: &[S]) -> Result<BulkOutcome> {
        validation::non_empty(ids, "Newsletter IDs")?;
        let timer = OperationTimer::start();
        let outcome = self
            .core
            .bulk(
                "bulkMarkAsRead",
                BulkSuccessPolicy::AllSucceeded,
                owned(ids),
                self.config.batch_size,
                |id| async move { self.mark_as_read(&id).await },
            )
            .await;
        log_bulk_outcome("bulkMarkAsRead", &outcome, &timer);
        Ok(outcome)
    }

    /// Archive many newsletters. Succeeds once every item was attempted;
    /// per-item failures are reported in the counts.
    pub async fn bulk_archive<S: AsRef<str>>(&self, ids: &[S]) -> Result<BulkOutcome> {
        validation::non_empty(ids, "Newsletter IDs")?;
        let timer = OperationTimer::start();
        let outcome = self
            .core
            .bulk(
                "bulkArchive",
                BulkSuccessPolicy::Completed,
                owned(ids),
                self.config.batch_size,
                |id| async move { self.archive(&id).await },
            )
            .await;
        log_bulk_outcome("bulkArchive", &outcome, &timer);
        Ok(outcome)
    }

    /// Apply the same update to many newsletters. Any failed item makes the
    /// batch fail.
    pub async fn bulk_update<S: AsRef<str>>(
        &self,
        ids: &[S],
        update: &NewsletterUpdate,
    ) -> Result<BulkOutcome> {
        validation::non_empty(ids, "Newsletter IDs")?;
        if update.is_empty() {
            return Err(Error::validation(NO_CHANGES));
        }
        let timer = OperationTimer::start();
        let outcome = self
            .core
            .bulk(
                "bulkUpdate",
                BulkSuccessPolicy::AllSucceeded,
                owned(ids),
                self.config.batch_size,
                |id| async move { self.update_newsletter(&id, update).await },
            )
            .await;
        log_bulk_outcome("bulkUpdate", &outcome, &timer);
        Ok(outcome)
    }

    async fn fetch_newsletter(&self, newsletter_id: &str) -> Result<Newsletter> {
        let repo = &self.repo;
        self.core
            .fetch("getNewsletter", "Newsletter", newsletter_id, move || {
                repo.get_by_id(newsletter_id)
            })
            .await
    }

    async fn set_flag(
        &self,
        operation: &str,
        id: &str,
        update: NewsletterUpdate,
    ) -> Result<Envelope<Newsletter>> {
        let newsletter_id = validation::required_id(id, "Newsletter")?;
        self.apply(operation, &newsletter_id, &update).await
    }

    async fn apply(
        &self,
        operation: &str,
        newsletter_id: &str,
        update: &NewsletterUpdate,
    ) -> Result<Envelope<Newsletter>> {
        let repo = &self.repo;
        Ok(self
            .core
            .mutate(operation, move || repo.update(newsletter_id, update))
            .await)
    }

    async fn resolve_tags(&self, tag_ids: &[String]) -> Result<Vec<Tag>> {
        let mut tags = Vec::with_capacity(tag_ids.len());
        for tag_id in tag_ids {
            let (repo, tag_id) = (&self.tags, tag_id.as_str());
            let tag = self
                .core
                .fetch("getTag", "Tag", tag_id, move || repo.get_by_id(tag_id))
                .await?;
            tags.push(tag);
        }
        log_relation_resolved("updateNewsletterTags", "Tag", tags.len());
        Ok(tags)
    }
}

impl_service!(NewsletterService);

const NO_CHANGES: &str = "No newsletter fields to update";

fn owned<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    ids.iter().map(|id| id.as_ref().to_owned()).collect()
}
