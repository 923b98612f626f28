// ABOUTME: Article records, enums, and filters
// ABOUTME: Status, category, and unpublish policy definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleCategory {
    News,
    Blog,
    Update,
}

impl ArticleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Blog => "blog",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for ArticleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news" => Ok(Self::News),
            "blog" => Ok(Self::Blog),
            "update" => Ok(Self::Update),
            other => Err(format!("unknown article category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(format!("unknown article status '{}'", other)),
        }
    }
}

/// What happens to `published_at` when an article goes back to draft
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnpublishPolicy {
    /// Keep the original publication timestamp
    #[default]
    Retain,
    /// Reset the timestamp so a later publish is dated fresh
    Clear,
}

impl FromStr for UnpublishPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "clear" => Ok(Self::Clear),
            other => Err(format!(
                "unknown unpublish policy '{}' (expected 'retain' or 'clear')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Rich-text HTML body
    pub content: String,
    pub excerpt: String,
    pub cover_image: String,
    pub category: ArticleCategory,
    pub status: ArticleStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }
}

/// Editable article fields. The slug is derived, never supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: String,
    pub category: ArticleCategory,
    #[serde(default)]
    pub status: ArticleStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleFilter {
    pub status: Option<ArticleStatus>,
    pub category: Option<ArticleCategory>,
    /// Substring matched against title, content and excerpt
    #[serde(rename = "q")]
    pub search: Option<String>,
}
