//! Common test utilities and helpers
//!
//! [`FakeBackend`] is an in-memory implementation of every repository port.
//! Failures and latency can be scripted per call name (for example
//! `"tags.create"`), and every call is counted.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use letterbox::ports::{
    NewsletterRepository, ReadingQueueRepository, SourceGroupRepository, SourceRepository,
    TagRepository, UserRepository,
};
use letterbox::{
    CreateGroupParams, CreateSourceParams, CreateTagParams, CreateUserParams, Newsletter,
    NewsletterQuery, NewsletterSource, NewsletterUpdate, QueuePosition, RawFailure,
    ReadingQueueItem, RetryPolicy, ServiceConfig, SourceGroup, SourceUpdate, SubscriptionPlan,
    SubscriptionStatus, Tag, UpdateGroupParams, UpdateTagParams, User, UserChanges,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Tables {
    next_id: u64,
    users: BTreeMap<String, User>,
    newsletters: BTreeMap<String, Newsletter>,
    tags: BTreeMap<String, Tag>,
    sources: BTreeMap<String, NewsletterSource>,
    groups: BTreeMap<String, (String, Vec<String>)>,
    queue: Vec<ReadingQueueItem>,
}

impl Tables {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn group(&self, id: &str) -> Option<SourceGroup> {
        self.groups.get(id).map(|(name, members)| SourceGroup {
            id: id.to_string(),
            name: name.clone(),
            sources: members
                .iter()
                .filter_map(|source_id| self.sources.get(source_id).cloned())
                .collect(),
            created_at: Utc::now(),
        })
    }
}

/// In-memory backend with scripted failures.
#[derive(Default)]
pub struct FakeBackend {
    tables: Mutex<Tables>,
    calls: Mutex<HashMap<String, u32>>,
    failures: Mutex<HashMap<String, VecDeque<RawFailure>>>,
    latency: Mutex<HashMap<String, Duration>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `times` calls to `call` with `failure`.
    pub fn fail(&self, call: &str, failure: RawFailure, times: usize) {
        let mut failures = self.failures.lock().unwrap();
        let queue = failures.entry(call.to_string()).or_default();
        queue.extend(std::iter::repeat_n(failure, times));
    }

    /// Delay every call to `call` by `delay` (on the tokio clock).
    pub fn delay(&self, call: &str, delay: Duration) {
        self.latency
            .lock()
            .unwrap()
            .insert(call.to_string(), delay);
    }

    /// How many times `call` reached the backend.
    pub fn calls(&self, call: &str) -> u32 {
        self.calls.lock().unwrap().get(call).copied().unwrap_or(0)
    }

    pub fn insert_newsletter(&self, id: &str, title: &str) -> Newsletter {
        let newsletter = Newsletter {
            id: id.to_string(),
            title: title.to_string(),
            summary: None,
            source_id: None,
            is_read: false,
            is_liked: false,
            is_archived: false,
            tags: Vec::new(),
            received_at: Utc::now(),
        };
        self.tables
            .lock()
            .unwrap()
            .newsletters
            .insert(id.to_string(), newsletter.clone());
        newsletter
    }

    pub fn newsletter(&self, id: &str) -> Option<Newsletter> {
        self.tables.lock().unwrap().newsletters.get(id).cloned()
    }

    pub fn insert_source(&self, id: &str, name: &str) -> NewsletterSource {
        let source = NewsletterSource {
            id: id.to_string(),
            name: name.to_string(),
            from_email: format!("{id}@senders.example"),
            url: None,
            is_archived: false,
            created_at: Utc::now(),
        };
        self.tables
            .lock()
            .unwrap()
            .sources
            .insert(id.to_string(), source.clone());
        source
    }

    async fn enter(&self, call: &str) -> Result<(), RawFailure> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(call.to_string())
            .or_default() += 1;

        let delay = self.latency.lock().unwrap().get(call).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .failures
            .lock()
            .unwrap()
            .get_mut(call)
            .and_then(VecDeque::pop_front);
        match failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

/// Config whose retries back off by milliseconds instead of seconds.
pub fn fast_config() -> ServiceConfig {
    ServiceConfig::builder()
        .retry(
            RetryPolicy::builder()
                .max_retries(3)
                .base_delay(Duration::from_millis(1))
                .build(),
        )
        .build()
}

fn missing(what: &str, id: &str) -> RawFailure {
    RawFailure::message(format!("{what} {id} does not exist"))
}

#[async_trait]
impl UserRepository for FakeBackend {
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, RawFailure> {
        self.enter("users.get_by_id").await?;
        Ok(self.tables().users.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RawFailure> {
        self.enter("users.get_by_email").await?;
        self.tables()
            .users
            .values()
            .find(|user| user.email == email)
            .cloned()
            .map(Some)
            .ok_or_else(RawFailure::row_not_found)
    }

    async fn create(&self, params: &CreateUserParams) -> Result<User, RawFailure> {
        self.enter("users.create").await?;
        let mut tables = self.tables();
        let now = Utc::now();
        let user = User {
            id: tables.id("u"),
            email: params.email.clone(),
            name: params.name.clone(),
            subscription_plan: SubscriptionPlan::Free,
            subscription_status: SubscriptionStatus::Active,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update(&self, id: &str, changes: &UserChanges) -> Result<User, RawFailure> {
        self.enter("users.update").await?;
        let mut tables = self.tables();
        let user = tables.users.get_mut(id).ok_or_else(|| missing("user", id))?;
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(plan) = changes.subscription_plan {
            user.subscription_plan = plan;
        }
        if let Some(status) = changes.subscription_status {
            user.subscription_status = status;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, RawFailure> {
        self.enter("users.delete").await?;
        Ok(self.tables().users.remove(id).is_some())
    }
}

#[async_trait]
impl NewsletterRepository for FakeBackend {
    async fn get_by_id(&self, id: &str) -> Result<Option<Newsletter>, RawFailure> {
        self.enter("newsletters.get_by_id").await?;
        Ok(self.tables().newsletters.get(id).cloned())
    }

    async fn list(&self, query: &NewsletterQuery) -> Result<Vec<Newsletter>, RawFailure> {
        self.enter("newsletters.list").await?;
        Ok(self
            .tables()
            .newsletters
            .values()
            .filter(|n| query.is_read.is_none_or(|v| n.is_read == v))
            .filter(|n| query.is_archived.is_none_or(|v| n.is_archived == v))
            .filter(|n| query.is_liked.is_none_or(|v| n.is_liked == v))
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        text: &str,
        query: &NewsletterQuery,
    ) -> Result<Vec<Newsletter>, RawFailure> {
        self.enter("newsletters.search").await?;
        let needle = text.to_lowercase();
        Ok(self
            .tables()
            .newsletters
            .values()
            .filter(|n| n.title.to_lowercase().contains(&needle))
            .filter(|n| query.is_archived.is_none_or(|v| n.is_archived == v))
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, update: &NewsletterUpdate) -> Result<Newsletter, RawFailure> {
        self.enter("newsletters.update").await?;
        let mut tables = self.tables();
        let newsletter = tables
            .newsletters
            .get_mut(id)
            .ok_or_else(|| missing("newsletter", id))?;
        if let Some(title) = &update.title {
            newsletter.title = title.clone();
        }
        if let Some(summary) = &update.summary {
            newsletter.summary = Some(summary.clone());
        }
        if let Some(is_read) = update.is_read {
            newsletter.is_read = is_read;
        }
        if let Some(is_liked) = update.is_liked {
            newsletter.is_liked = is_liked;
        }
        if let Some(is_archived) = update.is_archived {
            newsletter.is_archived = is_archived;
        }
        Ok(newsletter.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, RawFailure> {
        self.enter("newsletters.delete").await?;
        Ok(self.tables().newsletters.remove(id).is_some())
    }

    async fn set_tags(&self, id: &str, tag_ids: &[String]) -> Result<Newsletter, RawFailure> {
        self.enter("newsletters.set_tags").await?;
        let mut tables = self.tables();
        let tags: Vec<Tag> = tag_ids
            .iter()
            .filter_map(|tag_id| tables.tags.get(tag_id).cloned())
            .collect();
        let newsletter = tables
            .newsletters
            .get_mut(id)
            .ok_or_else(|| missing("newsletter", id))?;
        newsletter.tags = tags;
        Ok(newsletter.clone())
    }
}

#[async_trait]
impl TagRepository for FakeBackend {
    async fn get_by_id(&self, id: &str) -> Result<Option<Tag>, RawFailure> {
        self.enter("tags.get_by_id").await?;
        Ok(self.tables().tags.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Tag>, RawFailure> {
        self.enter("tags.list").await?;
        Ok(self.tables().tags.values().cloned().collect())
    }

    async fn create(&self, params: &CreateTagParams) -> Result<Tag, RawFailure> {
        self.enter("tags.create").await?;
        let mut tables = self.tables();
        let tag = Tag {
            id: tables.id("t"),
            name: params.name.clone(),
            color: params.color.clone().unwrap_or_default(),
            created_at: Utc::now(),
        };
        tables.tags.insert(tag.id.clone(), tag.clone());
        Ok(tag)
    }

    async fn update(&self, id: &str, params: &UpdateTagParams) -> Result<Tag, RawFailure> {
        self.enter("tags.update").await?;
        let mut tables = self.tables();
        let tag = tables.tags.get_mut(id).ok_or_else(|| missing("tag", id))?;
        if let Some(name) = &params.name {
            tag.name = name.clone();
        }
        if let Some(color) = &params.color {
            tag.color = color.clone();
        }
        Ok(tag.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, RawFailure> {
        self.enter("tags.delete").await?;
        Ok(self.tables().tags.remove(id).is_some())
    }
}

#[async_trait]
impl SourceRepository for FakeBackend {
    async fn get_by_id(&self, id: &str) -> Result<Option<NewsletterSource>, RawFailure> {
        self.enter("sources.get_by_id").await?;
        Ok(self.tables().sources.get(id).cloned())
    }

    async fn list(&self, include_archived: bool) -> Result<Vec<NewsletterSource>, RawFailure> {
        self.enter("sources.list").await?;
        Ok(self
            .tables()
            .sources
            .values()
            .filter(|source| include_archived || !source.is_archived)
            .cloned()
            .collect())
    }

    async fn create(&self, params: &CreateSourceParams) -> Result<NewsletterSource, RawFailure> {
        self.enter("sources.create").await?;
        let mut tables = self.tables();
        let source = NewsletterSource {
            id: tables.id("s"),
            name: params.name.clone(),
            from_email: params.from_email.clone(),
            url: params.url.clone(),
            is_archived: false,
            created_at: Utc::now(),
        };
        tables.sources.insert(source.id.clone(), source.clone());
        Ok(source)
    }

    async fn update(
        &self,
        id: &str,
        update: &SourceUpdate,
    ) -> Result<NewsletterSource, RawFailure> {
        self.enter("sources.update").await?;
        let mut tables = self.tables();
        let source = tables
            .sources
            .get_mut(id)
            .ok_or_else(|| missing("source", id))?;
        if let Some(name) = &update.name {
            source.name = name.clone();
        }
        if let Some(url) = &update.url {
            source.url = Some(url.clone());
        }
        if let Some(is_archived) = update.is_archived {
            source.is_archived = is_archived;
        }
        Ok(source.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, RawFailure> {
        self.enter("sources.delete").await?;
        Ok(self.tables().sources.remove(id).is_some())
    }
}

#[async_trait]
impl SourceGroupRepository for FakeBackend {
    async fn get_by_id(&self, id: &str) -> Result<Option<SourceGroup>, RawFailure> {
        self.enter("groups.get_by_id").await?;
        Ok(self.tables().group(id))
    }

    async fn list(&self) -> Result<Vec<SourceGroup>, RawFailure> {
        self.enter("groups.list").await?;
        let tables = self.tables();
        Ok(tables
            .groups
            .keys()
            .filter_map(|id| tables.group(id))
            .collect())
    }

    async fn create(&self, params: &CreateGroupParams) -> Result<SourceGroup, RawFailure> {
        self.enter("groups.create").await?;
        let mut tables = self.tables();
        let id = tables.id("g");
        tables
            .groups
            .insert(id.clone(), (params.name.clone(), params.source_ids.clone()));
        tables.group(&id).ok_or_else(|| missing("group", &id))
    }

    async fn update(
        &self,
        id: &str,
        params: &UpdateGroupParams,
    ) -> Result<SourceGroup, RawFailure> {
        self.enter("groups.update").await?;
        let mut tables = self.tables();
        let (name, _) = tables.groups.get_mut(id).ok_or_else(|| missing("group", id))?;
        if let Some(new_name) = &params.name {
            *name = new_name.clone();
        }
        tables.group(id).ok_or_else(|| missing("group", id))
    }

    async fn delete(&self, id: &str) -> Result<bool, RawFailure> {
        self.enter("groups.delete").await?;
        Ok(self.tables().groups.remove(id).is_some())
    }

    async fn add_sources(
        &self,
        group_id: &str,
        source_ids: &[String],
    ) -> Result<SourceGroup, RawFailure> {
        self.enter("groups.add_sources").await?;
        let mut tables = self.tables();
        let (_, members) = tables
            .groups
            .get_mut(group_id)
            .ok_or_else(|| missing("group", group_id))?;
        for source_id in source_ids {
            if !members.contains(source_id) {
                members.push(source_id.clone());
            }
        }
        tables
            .group(group_id)
            .ok_or_else(|| missing("group", group_id))
    }

    async fn remove_sources(
        &self,
        group_id: &str,
        source_ids: &[String],
    ) -> Result<SourceGroup, RawFailure> {
        self.enter("groups.remove_sources").await?;
        let mut tables = self.tables();
        let (_, members) = tables
            .groups
            .get_mut(group_id)
            .ok_or_else(|| missing("group", group_id))?;
        members.retain(|member| !source_ids.contains(member));
        tables
            .group(group_id)
            .ok_or_else(|| missing("group", group_id))
    }
}

#[async_trait]
impl ReadingQueueRepository for FakeBackend {
    async fn list(&self, user_id: &str) -> Result<Vec<ReadingQueueItem>, RawFailure> {
        self.enter("queue.list").await?;
        let mut items: Vec<ReadingQueueItem> = self
            .tables()
            .queue
            .iter()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.position);
        Ok(items)
    }

    async fn contains(&self, user_id: &str, newsletter_id: &str) -> Result<bool, RawFailure> {
        self.enter("queue.contains").await?;
        Ok(self
            .tables()
            .queue
            .iter()
            .any(|item| item.user_id == user_id && item.newsletter_id == newsletter_id))
    }

    async fn add(
        &self,
        user_id: &str,
        newsletter_id: &str,
    ) -> Result<ReadingQueueItem, RawFailure> {
        self.enter("queue.add").await?;
        let mut tables = self.tables();
        let position = tables
            .queue
            .iter()
            .filter(|item| item.user_id == user_id)
            .count() as u32;
        let item = ReadingQueueItem {
            id: tables.id("q"),
            user_id: user_id.to_string(),
            newsletter_id: newsletter_id.to_string(),
            position,
            added_at: Utc::now(),
        };
        tables.queue.push(item.clone());
        Ok(item)
    }

    async fn remove(&self, item_id: &str) -> Result<bool, RawFailure> {
        self.enter("queue.remove").await?;
        let mut tables = self.tables();
        let before = tables.queue.len();
        tables.queue.retain(|item| item.id != item_id);
        Ok(tables.queue.len() != before)
    }

    async fn reorder(&self, positions: &[QueuePosition]) -> Result<(), RawFailure> {
        self.enter("queue.reorder").await?;
        let mut tables = self.tables();
        for requested in positions {
            let item = tables
                .queue
                .iter_mut()
                .find(|item| item.id == requested.id)
                .ok_or_else(|| missing("queue item", &requested.id))?;
            item.position = requested.position as u32;
        }
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<u64, RawFailure> {
        self.enter("queue.clear").await?;
        let mut tables = self.tables();
        let before = tables.queue.len();
        tables.queue.retain(|item| item.user_id != user_id);
        Ok((before - tables.queue.len()) as u64)
    }
}
