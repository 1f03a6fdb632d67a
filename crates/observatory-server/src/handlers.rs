//! Request handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::borrow::Cow;

use observatory_core::{Field, Result, Table};

use crate::models::{CommentsQuery, CommentsResponse, ErrorResponse};
use crate::{AppState, LoadStatus};

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Observatory API" }))
}

/// Paginated comments with optional filters, sorted by score descending.
pub async fn get_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentsQuery>,
) -> Response {
    let Some(table) = state.dataset.get().await else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "No data loaded".to_string(),
            }),
        )
            .into_response();
    };

    match comments_page(&table, &query) {
        Ok(response) => Json(response).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// The query pipeline over the immutable table: filters produce new tables,
/// the shared one is only borrowed. An unfiltered request copies nothing
/// until the sort.
fn comments_page(table: &Table, query: &CommentsQuery) -> Result<CommentsResponse> {
    let mut filtered = Cow::Borrowed(table);

    if let Some(subreddit) = &query.subreddit {
        filtered = Cow::Owned(filtered.filter_eq(Field::Subreddit, subreddit)?);
    }
    if let Some(author) = &query.author {
        filtered = Cow::Owned(filtered.filter_eq(Field::Author, author)?);
    }
    if let Some(min_score) = query.min_score {
        filtered = Cow::Owned(filtered.filter_at_least(Field::Score, min_score)?);
    }

    let sorted = filtered.sort_desc(Field::Score)?;
    let total = sorted.row_count();

    let page = query.page.max(1);
    let per_page = query.per_page.max(1);
    // page and per_page come straight off the query string; saturate instead
    // of overflowing, slice turns an out-of-range offset into an empty page
    let offset = (page - 1).saturating_mul(per_page);
    let comments = sorted.slice(offset, per_page).row_objects();

    Ok(CommentsResponse {
        comments,
        total,
        page,
        per_page,
    })
}

/// Sorted list of distinct subreddits in the dataset.
pub async fn get_subreddits(State(state): State<AppState>) -> Json<Vec<String>> {
    match state.dataset.get().await {
        None => Json(vec![]),
        Some(table) => Json(table.distinct(Field::Subreddit).unwrap_or_default()),
    }
}

/// Current loading status of the dataset.
pub async fn loading_status(State(state): State<AppState>) -> Json<LoadStatus> {
    Json(state.status.borrow().clone())
}
