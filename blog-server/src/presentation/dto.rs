use crate::domain::post::UpdateSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct FilterPostsQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostQuery {
    /// Overrides the configured default when present.
    pub reuse_author_id: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikesResponse {
    pub likes: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatedAuthorsResponse {
    pub updated: UpdateSummary,
}
