//! Tag service

use super::impl_service;
use crate::config::ServiceConfig;
use crate::ports::TagRepository;
use crate::types::{CreateTagParams, DEFAULT_TAG_COLOR, Tag, UpdateTagParams};
use letterbox_core::{Envelope, Result, ServiceCore, validation};
use std::sync::Arc;

/// CRUD over reader-defined tags.
#[derive(Clone)]
pub struct TagService {
    repo: Arc<dyn TagRepository>,
    core: ServiceCore,
    config: ServiceConfig,
}

impl TagService {
    /// Create a tag service over `repo`.
    pub fn new(repo: Arc<dyn TagRepository>, config: ServiceConfig) -> Self {
        Self {
            repo,
            core: ServiceCore::new("tags", config.retry.clone()),
            config,
        }
    }

    /// Fetch a tag, raising `NotFoundError` when it does not exist.
    pub async fn get_tag(&self, id: &str) -> Result<Tag> {
        let tag_id = validation::required_id(id, "Tag")?;
        let (repo, tag_id) = (&self.repo, tag_id.as_str());
        self.core
            .fetch("getTag", "Tag", tag_id, move || repo.get_by_id(tag_id))
            .await
    }

    /// List every tag.
    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let repo = &self.repo;
        self.core.read("getTags", move || repo.list()).await
    }

    /// Create a tag. A missing color falls back to [`DEFAULT_TAG_COLOR`].
    pub async fn create_tag(&self, params: CreateTagParams) -> Result<Envelope<Tag>> {
        let sanitized = CreateTagParams {
            name: validation::length_between(&params.name, "Tag name", 1, 50)?,
            color: Some(match params.color.as_deref() {
                Some(color) => validation::hex_color(color, "tag color")?,
                None => DEFAULT_TAG_COLOR.to_owned(),
            }),
        };

        let (repo, sanitized) = (&self.repo, &sanitized);
        Ok(self
            .core
            .mutate("createTag", move || repo.create(sanitized))
            .await)
    }

    /// Rename or recolor a tag.
    pub async fn update_tag(&self, id: &str, params: UpdateTagParams) -> Result<Envelope<Tag>> {
        let tag_id = validation::required_id(id, "Tag")?;
        let sanitized = UpdateTagParams {
            name: validation::optional(params.name.as_deref(), |name| {
                validation::length_between(name, "Tag name", 1, 50)
            })?,
            color: validation::optional(params.color.as_deref(), |color| {
                validation::hex_color(color, "tag color")
            })?,
        };

        let (repo, tag_id, sanitized) = (&self.repo, tag_id.as_str(), &sanitized);
        Ok(self
            .core
            .mutate("updateTag", move || repo.update(tag_id, sanitized))
            .await)
    }

    /// Delete a tag.
    pub async fn delete_tag(&self, id: &str) -> Result<Envelope<bool>> {
        let tag_id = validation::required_id(id, "Tag")?;
        let (repo, tag_id) = (&self.repo, tag_id.as_str());
        Ok(self
            .core
            .mutate("deleteTag", move || repo.delete(tag_id))
            .await)
    }
}

impl_service!(TagService);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockTagRepository;
    use crate::services::Service;
    use crate::services::test_support::{config, sleeper, timestamp};
    use letterbox_core::{ErrorKind, RawFailure};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn tag(id: &str, name: &str) -> Tag {
        Tag {
            id: id.to_string(),
            name: name.to_string(),
            color: DEFAULT_TAG_COLOR.to_string(),
            created_at: timestamp(),
        }
    }

    fn service(repo: MockTagRepository) -> TagService {
        TagService::new(Arc::new(repo), config()).with_sleeper(sleeper())
    }

    #[tokio::test]
    async fn test_create_tag_trims_and_defaults_color() {
        let mut repo = MockTagRepository::new();
        repo.expect_create()
            .withf(|params| {
                params.name == "Rust" && params.color.as_deref() == Some(DEFAULT_TAG_COLOR)
            })
            .times(1)
            .returning(|params| Ok(tag("t1", &params.name)));

        let envelope = service(repo)
            .create_tag(CreateTagParams {
                name: "  Rust ".to_string(),
                color: None,
            })
            .await
            .unwrap();

        assert!(envelope.is_success());
        assert_eq!(envelope.data().map(|t| t.name.as_str()), Some("Rust"));
    }

    #[rstest]
    #[case("", None, "Tag name is required")]
    #[case(&"x".repeat(51), None, "Tag name must be between 1 and 50 characters")]
    #[case("Rust", Some("blue"), "Invalid tag color")]
    #[tokio::test]
    async fn test_create_tag_validation(
        #[case] name: &str,
        #[case] color: Option<&str>,
        #[case] expected: &str,
    ) {
        let mut repo = MockTagRepository::new();
        repo.expect_create().times(0);

        let err = service(repo)
            .create_tag(CreateTagParams {
                name: name.to_string(),
                color: color.map(str::to_string),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), expected);
    }

    #[tokio::test]
    async fn test_get_missing_tag_raises_not_found() {
        let mut repo = MockTagRepository::new();
        repo.expect_get_by_id().times(1).returning(|_| Ok(None));

        let err = service(repo).get_tag("t9").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Tag with ID t9 not found");
    }

    #[tokio::test]
    async fn test_list_tags_raises_after_retries() {
        let mut repo = MockTagRepository::new();
        repo.expect_list()
            .times(4)
            .returning(|| Err(RawFailure::message("fetch failed")));

        let err = service(repo).list_tags().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.message(), "Network error during getTags: fetch failed");
    }

    #[tokio::test]
    async fn test_delete_tag_failure_is_enveloped() {
        let mut repo = MockTagRepository::new();
        repo.expect_delete()
            .withf(|id| id == "t1")
            .times(4)
            .returning(|_| Err(RawFailure::message("constraint violated")));

        let envelope = service(repo).delete_tag(" t1 ").await.unwrap();
        assert!(!envelope.is_success());
        assert_eq!(
            envelope.error(),
            Some("Error during deleteTag: constraint violated")
        );
    }

    #[tokio::test]
    async fn test_update_tag_only_sends_given_fields() {
        let mut repo = MockTagRepository::new();
        repo.expect_update()
            .withf(|id, params| id == "t1" && params.name.is_none() && params.color.is_some())
            .times(1)
            .returning(|id, _| Ok(tag(id, "Rust")));

        let svc = service(repo);
        let envelope = svc
            .update_tag(
                "t1",
                UpdateTagParams {
                    name: None,
                    color: Some("#FF0000".to_string()),
                },
            )
            .await
            .unwrap();

        assert!(envelope.is_success());
        assert_eq!(svc.core().name(), "tags");
    }
}
