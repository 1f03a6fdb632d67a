//! API models for REST endpoints

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    pub subreddit: Option<String>,
    pub author: Option<String>,
    pub min_score: Option<i64>,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    100
}

impl Default for CommentsQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            subreddit: None,
            author: None,
            min_score: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<serde_json::Value>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
