//! Newsletters received by a reader

use super::Tag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single received newsletter issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Newsletter {
    /// Unique identifier
    pub id: String,
    /// Subject line
    pub title: String,
    /// Short summary, if one was extracted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Source this issue came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Whether the reader has opened it
    pub is_read: bool,
    /// Whether the reader liked it
    pub is_liked: bool,
    /// Whether it has been archived
    pub is_archived: bool,
    /// Tags attached to the issue
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// When the issue arrived
    pub received_at: DateTime<Utc>,
}

/// Filters for listing and searching newsletters.
///
/// Unset fields do not filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewsletterQuery {
    /// Only read / unread issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    /// Only archived / unarchived issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    /// Only liked / not liked issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    /// Only issues from this source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Only issues carrying all of these tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<String>,
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Changes to a newsletter, both as caller input and as sent to the repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewsletterUpdate {
    /// New subject line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Read flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    /// Like flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    /// Archive flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

impl NewsletterUpdate {
    /// Set only the read flag.
    pub fn read(is_read: bool) -> Self {
        Self {
            is_read: Some(is_read),
            ..Default::default()
        }
    }

    /// Set only the like flag.
    pub fn liked(is_liked: bool) -> Self {
        Self {
            is_liked: Some(is_liked),
            ..Default::default()
        }
    }

    /// Set only the archive flag.
    pub fn archived(is_archived: bool) -> Self {
        Self {
            is_archived: Some(is_archived),
            ..Default::default()
        }
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
