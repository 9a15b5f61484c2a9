//! Reader-defined tags

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color given to tags created without one.
pub const DEFAULT_TAG_COLOR: &str = "#3b82f6";

/// A label a reader attaches to newsletters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// `#RRGGBB` color
    pub color: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Input for creating a tag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateTagParams {
    /// Display name
    pub name: String,
    /// `#RRGGBB` color; defaults to [`DEFAULT_TAG_COLOR`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Changes to a tag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateTagParams {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
