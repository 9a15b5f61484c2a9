//! Newsletter source service

use super::impl_service;
use crate::config::ServiceConfig;
use crate::observability::{OperationTimer, log_bulk_outcome};
use crate::ports::SourceRepository;
use crate::types::{CreateSourceParams, NewsletterSource, SourceUpdate};
use letterbox_core::{BulkOutcome, BulkSuccessPolicy, Envelope, Result, ServiceCore, validation};
use std::sync::Arc;

/// Senders newsletters arrive from.
#[derive(Clone)]
pub struct SourceService {
    repo: Arc<dyn SourceRepository>,
    core: ServiceCore,
    config: ServiceConfig,
}

impl SourceService {
    /// Create a source service over `repo`.
    pub fn new(repo: Arc<dyn SourceRepository>, config: ServiceConfig) -> Self {
        Self {
            repo,
            core: ServiceCore::new("sources", config.retry.clone()),
            config,
        }
    }

    /// Fetch a source, raising `NotFoundError` when it does not exist.
    pub async fn get_source(&self, id: &str) -> Result<NewsletterSource> {
        let source_id = validation::required_id(id, "Source")?;
        let (repo, source_id) = (&self.repo, source_id.as_str());
        self.core
            .fetch("getSource", "Source", source_id, move || {
                repo.get_by_id(source_id)
            })
            .await
    }

    /// List sources; archived ones only when `include_archived` is set.
    pub async fn list_sources(&self, include_archived: bool) -> Result<Vec<NewsletterSource>> {
        let repo = &self.repo;
        self.core
            .read("getSources", move || repo.list(include_archived))
            .await
    }

    /// Register a new source.
    pub async fn create_source(
        &self,
        params: CreateSourceParams,
    ) -> Result<Envelope<NewsletterSource>> {
        let sanitized = CreateSourceParams {
            name: validation::length_between(&params.name, "Source name", 1, 255)?,
            from_email: validation::email(&params.from_email)?,
            url: validation::optional(params.url.as_deref(), |url| {
                validation::url(url, "source URL")
            })?,
        };

        let (repo, sanitized) = (&self.repo, &sanitized);
        Ok(self
            .core
            .mutate("createSource", move || repo.create(sanitized))
            .await)
    }

    /// Rename a source or change its URL.
    pub async fn update_source(
        &self,
        id: &str,
        update: &SourceUpdate,
    ) -> Result<Envelope<NewsletterSource>> {
        let source_id = validation::required_id(id, "Source")?;
        let sanitized = SourceUpdate {
            name: validation::optional(update.name.as_deref(), |name| {
                validation::length_between(name, "Source name", 1, 255)
            })?,
            url: validation::optional(update.url.as_deref(), |url| {
                validation::url(url, "source URL")
            })?,
            is_archived: update.is_archived,
        };

        self.apply("updateSource", &source_id, &sanitized).await
    }

    /// Archive a source.
    pub async fn archive_source(&self, id: &str) -> Result<Envelope<NewsletterSource>> {
        self.set_archived("archiveSource", id, true).await
    }

    /// Move a source out of the archive.
    pub async fn unarchive_source(&self, id: &str) -> Result<Envelope<NewsletterSource>> {
        self.set_archived("unarchiveSource", id, false).await
    }

    /// Delete a source.
    pub async fn delete_source(&self, id: &str) -> Result<Envelope<bool>> {
        let source_id = validation::required_id(id, "Source")?;
        let (repo, source_id) = (&self.repo, source_id.as_str());
        Ok(self
            .core
            .mutate("deleteSource", move || repo.delete(source_id))
            .await)
    }

    /// Archive many sources. Succeeds once every item was attempted;
    /// per-item failures are reported in the counts.
    pub async fn bulk_archive<S: AsRef<str>>(&self, ids: &[S]) -> Result<BulkOutcome> {
        validation::non_empty(ids, "Source IDs")?;
        let timer = OperationTimer::start();
        let ids = ids.iter().map(|id| id.as_ref().to_owned()).collect();
        let outcome = self
            .core
            .bulk(
                "bulkArchiveSources",
                BulkSuccessPolicy::Completed,
                ids,
                self.config.batch_size,
                |id| async move { self.archive_source(&id).await },
            )
            .await;
        log_bulk_outcome("bulkArchiveSources", &outcome, &timer);
        Ok(outcome)
    }

    async fn set_archived(
        &self,
        operation: &str,
        id: &str,
        is_archived: bool,
    ) -> Result<Envelope<NewsletterSource>> {
        let source_id = validation::required_id(id, "Source")?;
        let update = SourceUpdate {
            is_archived: Some(is_archived),
            ..Default::default()
        };
        self.apply(operation, &source_id, &update).await
    }

    async fn apply(
        &self,
        operation: &str,
        source_id: &str,
        update: &SourceUpdate,
    ) -> Result<Envelope<NewsletterSource>> {
        let repo = &self.repo;
        Ok(self
            .core
            .mutate(operation, move || repo.update(source_id, update))
            .await)
    }
}

impl_service!(SourceService);
