//! Source group service

use super::{impl_service, settle_pre_read};
use crate::config::ServiceConfig;
use crate::observability::log_relation_resolved;
use crate::ports::{SourceGroupRepository, SourceRepository};
use crate::types::{CreateGroupParams, NewsletterSource, SourceGroup, UpdateGroupParams};
use letterbox_core::{Envelope, Result, ServiceCore, validation};
use std::sync::Arc;

/// Named collections of sources.
#[derive(Clone)]
pub struct SourceGroupService {
    repo: Arc<dyn SourceGroupRepository>,
    sources: Arc<dyn SourceRepository>,
    core: ServiceCore,
    config: ServiceConfig,
}

impl SourceGroupService {
    /// Create a source group service.
    ///
    /// `sources` is used to resolve member IDs before membership changes.
    pub fn new(
        repo: Arc<dyn SourceGroupRepository>,
        sources: Arc<dyn SourceRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            sources,
            core: ServiceCore::new("source_groups", config.retry.clone()),
            config,
        }
    }

    /// Fetch a group, raising `NotFoundError` when it does not exist.
    pub async fn get_group(&self, id: &str) -> Result<SourceGroup> {
        let group_id = validation::required_id(id, "Group")?;
        let (repo, group_id) = (&self.repo, group_id.as_str());
        self.core
            .fetch("getGroup", "Group", group_id, move || repo.get_by_id(group_id))
            .await
    }

    /// List every group.
    pub async fn list_groups(&self) -> Result<Vec<SourceGroup>> {
        let repo = &self.repo;
        self.core.read("getGroups", move || repo.list()).await
    }

    /// Create a group, optionally with initial members.
    pub async fn create_group(&self, params: CreateGroupParams) -> Result<Envelope<SourceGroup>> {
        let sanitized = CreateGroupParams {
            name: validation::length_between(&params.name, "Group name", 2, 100)?,
            source_ids: validation::id_list(&params.source_ids, "Source IDs", "source IDs", false)?,
        };
        if let Err(error) = self.resolve_sources("createGroup", &sanitized.source_ids).await {
            return settle_pre_read("createGroup", error);
        }

        let (repo, sanitized) = (&self.repo, &sanitized);
        Ok(self
            .core
            .mutate("createGroup", move || repo.create(sanitized))
            .await)
    }

    /// Rename a group.
    pub async fn update_group(
        &self,
        id: &str,
        params: UpdateGroupParams,
    ) -> Result<Envelope<SourceGroup>> {
        let group_id = validation::required_id(id, "Group")?;
        let sanitized = UpdateGroupParams {
            name: validation::optional(params.name.as_deref(), |name| {
                validation::length_between(name, "Group name", 2, 100)
            })?,
        };

        let (repo, group_id, sanitized) = (&self.repo, group_id.as_str(), &sanitized);
        Ok(self
            .core
            .mutate("updateGroup", move || repo.update(group_id, sanitized))
            .await)
    }

    /// Delete a group. Its sources are kept.
    pub async fn delete_group(&self, id: &str) -> Result<Envelope<bool>> {
        let group_id = validation::required_id(id, "Group")?;
        let (repo, group_id) = (&self.repo, group_id.as_str());
        Ok(self
            .core
            .mutate("deleteGroup", move || repo.delete(group_id))
            .await)
    }

    /// Add sources to a group.
    ///
    /// Every source is resolved first; an unknown one raises
    /// `"Source with ID <id> not found"` and the group is left untouched.
    /// Other lookup failures are enveloped like a failed write.
    pub async fn add_sources<S: AsRef<str>>(
        &self,
        group_id: &str,
        source_ids: &[S],
    ) -> Result<Envelope<SourceGroup>> {
        let group_id = validation::required_id(group_id, "Group")?;
        let source_ids = validation::id_list(source_ids, "Source IDs", "source IDs", true)?;
        if let Err(error) = self.resolve_sources("addSourcesToGroup", &source_ids).await {
            return settle_pre_read("addSourcesToGroup", error);
        }

        let (repo, group_id, source_ids) = (&self.repo, group_id.as_str(), &source_ids);
        Ok(self
            .core
            .mutate("addSourcesToGroup", move || {
                repo.add_sources(group_id, source_ids)
            })
            .await)
    }

    /// Remove sources from a group.
    ///
    /// Sources are resolved the same way as in [`add_sources`](Self::add_sources).
    pub async fn remove_sources<S: AsRef<str>>(
        &self,
        group_id: &str,
        source_ids: &[S],
    ) -> Result<Envelope<SourceGroup>> {
        let group_id = validation::required_id(group_id, "Group")?;
        let source_ids = validation::id_list(source_ids, "Source IDs", "source IDs", true)?;
        if let Err(error) = self.resolve_sources("removeSourcesFromGroup", &source_ids).await {
            return settle_pre_read("removeSourcesFromGroup", error);
        }

        let (repo, group_id, source_ids) = (&self.repo, group_id.as_str(), &source_ids);
        Ok(self
            .core
            .mutate("removeSourcesFromGroup", move || {
                repo.remove_sources(group_id, source_ids)
            })
            .await)
    }

    async fn resolve_sources(
        &self,
        operation: &str,
        source_ids: &[String],
    ) -> Result<Vec<NewsletterSource>> {
        let mut sources = Vec::with_capacity(source_ids.len());
        for source_id in source_ids {
            let (repo, source_id) = (&self.sources, source_id.as_str());
            let source = self
                .core
                .fetch("getSource", "Source", source_id, move || {
                    repo.get_by_id(source_id)
                })
                .await?;
            sources.push(source);
        }
        log_relation_resolved(operation, "Source", sources.len());
        Ok(sources)
    }
}

impl_service!(SourceGroupService);
