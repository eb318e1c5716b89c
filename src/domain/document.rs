use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A normalized piece of collected content, keyed by its URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    /// Seconds since epoch, 0 when unknown.
    #[serde(rename = "created", default, skip_serializing_if = "is_zero")]
    pub publish_date: i64,
    /// Seconds since epoch at which this run first discovered the URL.
    #[serde(rename = "loaded", default, skip_serializing_if = "is_zero")]
    pub load_date: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub comments: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub likes: i64,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl Document {
    /// A document carrying only its URL and discovery time.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            load_date: Utc::now().timestamp(),
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Render a batch of documents as a pretty JSON array.
pub fn to_pretty_json(documents: &[Document]) -> String {
    serde_json::to_string_pretty(documents).unwrap_or_default()
}
