//! User accounts and subscriptions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned when a plan or status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {input}")]
pub struct ParseSubscriptionError {
    /// What was being parsed ("subscription plan", "subscription status").
    pub kind: &'static str,
    /// The rejected input.
    pub input: String,
}

/// Billing plan of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    /// No paid features.
    #[default]
    Free,
    /// Individual paid plan.
    Pro,
    /// Team plan.
    Enterprise,
}

impl SubscriptionPlan {
    /// Accepted wire values, in declaration order.
    pub const VALUES: &'static [&'static str] = &["free", "pro", "enterprise"];

    /// The wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = ParseSubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(ParseSubscriptionError {
                kind: "subscription plan",
                input: s.to_owned(),
            }),
        }
    }
}

/// Billing state of a user's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Paid up.
    #[default]
    Active,
    /// Cancelled by the user.
    Cancelled,
    /// Payment overdue.
    PastDue,
    /// Inside the trial window.
    Trialing,
}

impl SubscriptionStatus {
    /// Accepted wire values, in declaration order.
    pub const VALUES: &'static [&'static str] = &["active", "cancelled", "past_due", "trialing"];

    /// The wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::PastDue => "past_due",
            Self::Trialing => "trialing",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ParseSubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            "past_due" => Ok(Self::PastDue),
            "trialing" => Ok(Self::Trialing),
            _ => Err(ParseSubscriptionError {
                kind: "subscription status",
                input: s.to_owned(),
            }),
        }
    }
}

/// A reader account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Lower-cased email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Current plan
    #[serde(default)]
    pub subscription_plan: SubscriptionPlan,
    /// Current subscription state
    #[serde(default)]
    pub subscription_status: SubscriptionStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateUserParams {
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
}

/// Caller-supplied changes to a user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateUserParams {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Sanitized changes sent to the user repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserChanges {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<SubscriptionPlan>,
    /// New subscription state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<SubscriptionStatus>,
}
