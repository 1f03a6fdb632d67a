//! Dataset Schema
//!
//! This module defines the fixed 8-field schema of the Reddit comment
//! dataset and the fully projected `Comment` record.
//!
//! ## The Schema
//! Every record consumed from the archive carries (at least) these fields:
//! - **id**: unique comment identifier
//! - **author**: author handle
//! - **created_utc**: Unix timestamp in seconds, UTC
//! - **subreddit**: community the comment was posted in
//! - **parent_id**: what the comment replies to, prefixed `t3_` when the
//!   parent is a top-level post and `t1_` when it is another comment
//! - **link_id**: the containing post
//! - **score**: vote score
//! - **body**: comment text
//!
//! ## Design Decisions
//! - `Field` is a closed enum rather than free-form strings: the projection
//!   and every table query operation are checked against the schema at the
//!   type level, and the snapshot format stores a stable name per column.
//! - Timestamps and scores are `i64`. Scores go negative; timestamps outlive
//!   2038.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// `parent_id` prefix marking a reply to a top-level post.
pub const TOP_LEVEL_PREFIX: &str = "t3_";

/// `parent_id` prefix marking a reply to another comment.
pub const COMMENT_PREFIX: &str = "t1_";

/// Value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Str,
    Int,
}

/// One of the 8 schema fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Author,
    CreatedUtc,
    Subreddit,
    ParentId,
    LinkId,
    Score,
    Body,
}

impl Field {
    /// All 8 fields in canonical projection order.
    pub const DEFAULT: [Field; 8] = [
        Field::Id,
        Field::Author,
        Field::CreatedUtc,
        Field::Subreddit,
        Field::ParentId,
        Field::LinkId,
        Field::Score,
        Field::Body,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Author => "author",
            Field::CreatedUtc => "created_utc",
            Field::Subreddit => "subreddit",
            Field::ParentId => "parent_id",
            Field::LinkId => "link_id",
            Field::Score => "score",
            Field::Body => "body",
        }
    }

    pub fn from_name(name: &str) -> Result<Field> {
        match name {
            "id" => Ok(Field::Id),
            "author" => Ok(Field::Author),
            "created_utc" => Ok(Field::CreatedUtc),
            "subreddit" => Ok(Field::Subreddit),
            "parent_id" => Ok(Field::ParentId),
            "link_id" => Ok(Field::LinkId),
            "score" => Ok(Field::Score),
            "body" => Ok(Field::Body),
            other => Err(Error::UnknownColumn(other.to_string())),
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            Field::CreatedUtc | Field::Score => DataType::Int,
            _ => DataType::Str,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully projected record: all 8 schema fields, typed.
///
/// Immutable once created. Used by the sample-data generator and by tests;
/// the streaming pipeline itself appends cells column-wise without going
/// through this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub created_utc: i64,
    pub subreddit: String,
    pub parent_id: String,
    pub link_id: String,
    pub score: i64,
    pub body: String,
}

impl Comment {
    /// True when this comment replies directly to a post.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.starts_with(TOP_LEVEL_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_roundtrip() {
        for field in Field::DEFAULT {
            assert_eq!(Field::from_name(field.name()).unwrap(), field);
        }
    }

    #[test]
    fn test_field_from_unknown_name() {
        assert!(matches!(
            Field::from_name("upvote_ratio"),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_data_types() {
        assert_eq!(Field::CreatedUtc.data_type(), DataType::Int);
        assert_eq!(Field::Score.data_type(), DataType::Int);
        assert_eq!(Field::Id.data_type(), DataType::Str);
        assert_eq!(Field::Body.data_type(), DataType::Str);
    }

    #[test]
    fn test_is_top_level() {
        let mut comment = Comment {
            id: "c1".to_string(),
            author: "alice".to_string(),
            created_utc: 1_730_764_800,
            subreddit: "politics".to_string(),
            parent_id: "t3_post".to_string(),
            link_id: "t3_post".to_string(),
            score: 1,
            body: "hello".to_string(),
        };
        assert!(comment.is_top_level());

        comment.parent_id = "t1_other".to_string();
        assert!(!comment.is_top_level());
    }
}
