//! Newsletter sources and source groups

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sender newsletters arrive from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSource {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Sender address issues arrive from
    pub from_email: String,
    /// Publisher website
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Whether the source is archived
    pub is_archived: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Input for creating a source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateSourceParams {
    /// Display name
    pub name: String,
    /// Sender address
    pub from_email: String,
    /// Publisher website
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Changes to a source, both as caller input and as sent to the repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New publisher website
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Archive flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

/// A named collection of sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceGroup {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Member sources
    #[serde(default)]
    pub sources: Vec<NewsletterSource>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Input for creating a source group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateGroupParams {
    /// Display name
    pub name: String,
    /// Initial members
    #[serde(default)]
    pub source_ids: Vec<String>,
}

/// Changes to a source group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateGroupParams {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
