//! Sample Data Generator
//!
//! Synthetic in-window top-level comments for development and for the
//! fallback path when neither snapshot nor archive is available. Shape and
//! size match the real dataset's schema so the frontend behaves identically.

use rand::Rng;

use observatory_core::{Comment, Table, TimeWindow};

const SAMPLE_SIZE: usize = 1000;

const SUBREDDITS: [&str; 5] = [
    "politics",
    "Conservative",
    "news",
    "worldnews",
    "PoliticalDiscussion",
];

/// Build a 1000-row synthetic table of top-level comments inside `window`.
pub fn sample_table(window: &TimeWindow) -> Table {
    let mut rng = rand::rng();
    let span = (window.end - window.start).max(1);

    let comments = (0..SAMPLE_SIZE)
        .map(|i| {
            let post = rng.random_range(1..=100);
            Comment {
                id: format!("comment_{i}"),
                author: format!("user_{}", rng.random_range(0..100)),
                created_utc: window.start + rng.random_range(0..span),
                subreddit: SUBREDDITS[rng.random_range(0..SUBREDDITS.len())].to_string(),
                parent_id: format!("t3_post_{post}"),
                link_id: format!("t3_post_{post}"),
                score: rng.random_range(-50..=500),
                body: format!(
                    "Sample election comment {i}. This is discussing the 2024 \
                     election results and various political topics."
                ),
            }
        })
        .collect();

    Table::from_comments(comments)
}
