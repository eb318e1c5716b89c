use serde::Deserialize;

use crate::app::Result;

/// An item record of an indexed JSON API (Hacker News item shape).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiItem {
    /// Author handle
    pub by: String,
    /// Child comment ids
    pub kids: Vec<i64>,
    pub score: i64,
    /// Seconds since epoch
    pub time: i64,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

pub fn parse_ids(body: &[u8]) -> Result<Vec<i64>> {
    Ok(serde_json::from_slice(body)?)
}

/// Deleted items come back as `null`, which is a decode error here.
pub fn parse_item(body: &[u8]) -> Result<ApiItem> {
    Ok(serde_json::from_slice(body)?)
}
