use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Words per minute used for the read-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// Cover shown by the detail view when an article has none.
pub const DETAIL_COVER_PLACEHOLDER: &str =
    "/placeholder.svg?height=400&width=900&query=blog-cover-premium";

/// Store-assigned article identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArticleId(pub u64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArticleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(ArticleId)
    }
}

// Numeric ids, either as JSON numbers or numeric strings like "7". Random
// string ids (json-server v1 POSTs) are rejected.
impl<'de> Deserialize<'de> for ArticleId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(ArticleId(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Vec<String>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl Article {
    pub fn from_new(id: ArticleId, new: NewArticle) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            category: new.category,
            date: new.date,
            cover_image: Some(new.cover_image),
            content: new.content,
        }
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Estimated minutes to read the content, never less than one.
    pub fn read_time_minutes(&self) -> usize {
        self.word_count().div_ceil(WORDS_PER_MINUTE).max(1)
    }

    pub fn read_time(&self) -> String {
        format!("{} min", self.read_time_minutes())
    }

    /// Long en-US date, e.g. `October 18, 2026`.
    pub fn long_date(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }

    /// Numeric en-US date, e.g. `10/18/2026`.
    pub fn short_date(&self) -> String {
        self.date.format("%-m/%-d/%Y").to_string()
    }

    pub fn cover_or_placeholder(&self) -> &str {
        match self.cover_image.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => DETAIL_COVER_PLACEHOLDER,
        }
    }
}

/// An article as submitted for creation: everything but the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Vec<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub cover_image: String,
    pub content: String,
}
