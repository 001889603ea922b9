//! Vote persistence.
//!
//! Every vote lives in exactly one row keyed by `(post_id, user_id)`. Callers
//! go through [`VoteStore`] so handlers can run against Postgres in production
//! and against [`MemoryVoteStore`] in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

pub use memory::MemoryVoteStore;
pub use postgres::PgVoteStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unknown post: {0}")]
    UnknownPost(i64),

    /// The voter's row is gone although their token still verifies.
    #[error("Unknown user: {0}")]
    UnknownUser(i64),

    #[error("Vote store lock poisoned")]
    Poisoned,
}

/// Raw vote counts for one post, read in a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub positive: i64,
    pub negative: i64,
    /// Sign of the viewer's own row, if a viewer was given and has voted.
    pub viewer_vote: Option<bool>,
}

#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Inserts the vote or overwrites the sign of the existing one.
    async fn set_vote(&self, post_id: i64, user_id: i64, is_positive: bool)
    -> Result<(), StoreError>;

    /// Removes the vote if present. Absent votes are not an error.
    async fn clear_vote(&self, post_id: i64, user_id: i64) -> Result<(), StoreError>;

    async fn tally(&self, post_id: i64, viewer_id: Option<i64>) -> Result<VoteTally, StoreError>;

    /// Tallies for several posts in one read. Posts without votes are absent
    /// from the map; treat them as `VoteTally::default()`.
    async fn tally_many(
        &self,
        post_ids: &[i64],
        viewer_id: Option<i64>,
    ) -> Result<HashMap<i64, VoteTally>, StoreError>;
}
