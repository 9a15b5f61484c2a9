//! User service

use super::impl_service;
use crate::config::ServiceConfig;
use crate::ports::UserRepository;
use crate::types::{
    CreateUserParams, SubscriptionPlan, SubscriptionStatus, UpdateUserParams, User, UserChanges,
};
use letterbox_core::{Envelope, Error, Result, ServiceCore, validation};
use std::sync::Arc;

/// Reader accounts and their subscriptions.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    core: ServiceCore,
    config: ServiceConfig,
}

impl UserService {
    /// Create a user service over `repo`.
    pub fn new(repo: Arc<dyn UserRepository>, config: ServiceConfig) -> Self {
        Self {
            repo,
            core: ServiceCore::new("users", config.retry.clone()),
            config,
        }
    }

    /// Fetch a user, raising `NotFoundError` when it does not exist.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        let user_id = validation::required_id(id, "User")?;
        let (repo, user_id) = (&self.repo, user_id.as_str());
        self.core
            .fetch("getUser", "User", user_id, move || repo.get_by_id(user_id))
            .await
    }

    /// Look a user up by email. A missing user is `Ok(None)`, not an error.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = validation::email(email)?;
        let (repo, email) = (&self.repo, email.as_str());
        self.core
            .lookup("getUserByEmail", move || repo.get_by_email(email))
            .await
    }

    /// Create a user. The email is stored lower-cased.
    pub async fn create_user(&self, params: CreateUserParams) -> Result<Envelope<User>> {
        let sanitized = CreateUserParams {
            email: validation::email(&params.email)?,
            name: validation::length_between(&params.name, "Name", 2, 100)?,
        };

        let (repo, sanitized) = (&self.repo, &sanitized);
        Ok(self
            .core
            .mutate("createUser", move || repo.create(sanitized))
            .await)
    }

    /// Change a user's name or email.
    pub async fn update_user(&self, id: &str, params: UpdateUserParams) -> Result<Envelope<User>> {
        let user_id = validation::required_id(id, "User")?;
        let changes = UserChanges {
            name: validation::optional(params.name.as_deref(), |name| {
                validation::length_between(name, "Name", 2, 100)
            })?,
            email: validation::optional(params.email.as_deref(), validation::email)?,
            ..Default::default()
        };

        self.apply("updateUser", &user_id, &changes).await
    }

    /// Move a user to another plan and subscription state.
    ///
    /// `plan` must be one of `free`, `pro`, `enterprise`; `status` one of
    /// `active`, `cancelled`, `past_due`, `trialing`.
    pub async fn update_subscription(
        &self,
        id: &str,
        plan: &str,
        status: &str,
    ) -> Result<Envelope<User>> {
        let user_id = validation::required_id(id, "User")?;
        let changes = UserChanges {
            subscription_plan: Some(parse_plan(plan)?),
            subscription_status: Some(parse_status(status)?),
            ..Default::default()
        };

        self.apply("updateSubscription", &user_id, &changes).await
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: &str) -> Result<Envelope<bool>> {
        let user_id = validation::required_id(id, "User")?;
        let (repo, user_id) = (&self.repo, user_id.as_str());
        Ok(self
            .core
            .mutate("deleteUser", move || repo.delete(user_id))
            .await)
    }

    async fn apply(
        &self,
        operation: &str,
        user_id: &str,
        changes: &UserChanges,
    ) -> Result<Envelope<User>> {
        let repo = &self.repo;
        Ok(self
            .core
            .mutate(operation, move || repo.update(user_id, changes))
            .await)
    }
}

impl_service!(UserService);

fn parse_plan(plan: &str) -> Result<SubscriptionPlan> {
    validation::one_of(plan, "subscription plan", SubscriptionPlan::VALUES)?
        .parse()
        .map_err(|_| Error::validation("Invalid subscription plan"))
}

fn parse_status(status: &str) -> Result<SubscriptionStatus> {
    validation::one_of(status, "subscription status", SubscriptionStatus::VALUES)?
        .parse()
        .map_err(|_| Error::validation("Invalid subscription status"))
}
