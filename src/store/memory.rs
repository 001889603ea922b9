//! In-memory vote store for tests and local runs without Postgres.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{StoreError, VoteStore, VoteTally};

/// Votes keyed by `(post_id, user_id)`. One lock guards the whole map, so each
/// operation is atomic with respect to the others.
#[derive(Debug, Default)]
pub struct MemoryVoteStore {
    votes: Mutex<HashMap<(i64, i64), bool>>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored vote rows across all posts. Still counts after a
    /// writer panicked, since a single insert or remove cannot leave the map
    /// half-updated.
    pub fn len(&self) -> usize {
        self.votes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VoteStore for MemoryVoteStore {
    async fn set_vote(
        &self,
        post_id: i64,
        user_id: i64,
        is_positive: bool,
    ) -> Result<(), StoreError> {
        let mut votes = self.votes.lock().map_err(|_| StoreError::Poisoned)?;
        votes.insert((post_id, user_id), is_positive);
        Ok(())
    }

    async fn clear_vote(&self, post_id: i64, user_id: i64) -> Result<(), StoreError> {
        let mut votes = self.votes.lock().map_err(|_| StoreError::Poisoned)?;
        votes.remove(&(post_id, user_id));
        Ok(())
    }

    async fn tally(&self, post_id: i64, viewer_id: Option<i64>) -> Result<VoteTally, StoreError> {
        let votes = self.votes.lock().map_err(|_| StoreError::Poisoned)?;

        let mut tally = VoteTally::default();
        for (&(post, user), &is_positive) in votes.iter() {
            if post != post_id {
                continue;
            }
            if is_positive {
                tally.positive += 1;
            } else {
                tally.negative += 1;
            }
            if viewer_id == Some(user) {
                tally.viewer_vote = Some(is_positive);
            }
        }

        Ok(tally)
    }

    async fn tally_many(
        &self,
        post_ids: &[i64],
        viewer_id: Option<i64>,
    ) -> Result<HashMap<i64, VoteTally>, StoreError> {
        let votes = self.votes.lock().map_err(|_| StoreError::Poisoned)?;

        let mut tallies: HashMap<i64, VoteTally> = HashMap::new();
        for (&(post, user), &is_positive) in votes.iter() {
            if !post_ids.contains(&post) {
                continue;
            }
            let tally = tallies.entry(post).or_default();
            if is_positive {
                tally.positive += 1;
            } else {
                tally.negative += 1;
            }
            if viewer_id == Some(user) {
                tally.viewer_vote = Some(is_positive);
            }
        }

        Ok(tallies)
    }
}
