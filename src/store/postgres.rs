use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashMap;

use super::{StoreError, VoteStore, VoteTally};

const POST_FKEY: &str = "post_votes_post_id_fkey";
const USER_FKEY: &str = "post_votes_user_id_fkey";

#[derive(Clone)]
pub struct PgVoteStore {
    db: PgPool,
}

impl PgVoteStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn tally_from_row(row: &PgRow) -> Result<VoteTally, sqlx::Error> {
    Ok(VoteTally {
        positive: row.try_get("positive")?,
        negative: row.try_get("negative")?,
        viewer_vote: row.try_get("viewer_vote")?,
    })
}

#[async_trait]
impl VoteStore for PgVoteStore {
    async fn set_vote(
        &self,
        post_id: i64,
        user_id: i64,
        is_positive: bool,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO post_votes (post_id, user_id, is_positive)
            VALUES ($1, $2, $3)
            ON CONFLICT (post_id, user_id)
            DO UPDATE SET is_positive = EXCLUDED.is_positive
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(is_positive)
        .execute(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(POST_FKEY) => {
                StoreError::UnknownPost(post_id)
            }
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(USER_FKEY) => {
                StoreError::UnknownUser(user_id)
            }
            e => StoreError::Database(e),
        })?;

        Ok(())
    }

    async fn clear_vote(&self, post_id: i64, user_id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM post_votes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn tally(&self, post_id: i64, viewer_id: Option<i64>) -> Result<VoteTally, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE is_positive) AS positive,
                COUNT(*) FILTER (WHERE NOT is_positive) AS negative,
                BOOL_OR(is_positive) FILTER (WHERE user_id = $2) AS viewer_vote
            FROM post_votes
            WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .bind(viewer_id)
        .fetch_one(&self.db)
        .await?;

        Ok(tally_from_row(&row)?)
    }

    async fn tally_many(
        &self,
        post_ids: &[i64],
        viewer_id: Option<i64>,
    ) -> Result<HashMap<i64, VoteTally>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                post_id,
                COUNT(*) FILTER (WHERE is_positive) AS positive,
                COUNT(*) FILTER (WHERE NOT is_positive) AS negative,
                BOOL_OR(is_positive) FILTER (WHERE user_id = $2) AS viewer_vote
            FROM post_votes
            WHERE post_id = ANY($1)
            GROUP BY post_id
            "#,
        )
        .bind(post_ids)
        .bind(viewer_id)
        .fetch_all(&self.db)
        .await?;

        let mut tallies: HashMap<i64, VoteTally> = HashMap::with_capacity(rows.len());
        for row in &rows {
            let post_id: i64 = row.try_get("post_id")?;
            tallies.insert(post_id, tally_from_row(row)?);
        }

        Ok(tallies)
    }
}

/// These run against a scratch database created per test from `DATABASE_URL`:
/// `cargo test -- --ignored`.
#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn seed_user(pool: &PgPool, username: &str) -> i64 {
        sqlx::query_scalar("INSERT INTO users (username) VALUES ($1) RETURNING id")
            .bind(username)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    pub(crate) async fn seed_post(pool: &PgPool, creator: i64, topic: &str) -> i64 {
        sqlx::query("INSERT INTO topics (name) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(topic)
            .execute(pool)
            .await
            .unwrap();

        sqlx::query_scalar(
            "INSERT INTO posts (title, topic, creator) VALUES ('title', $1, $2) RETURNING id",
        )
        .bind(topic)
        .bind(creator)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn row_count(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM post_votes")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at Postgres"]
    async fn set_vote_is_an_idempotent_upsert(pool: PgPool) {
        let alice = seed_user(&pool, "alice").await;
        let post = seed_post(&pool, alice, "rust").await;
        let store = PgVoteStore::new(pool.clone());

        store.set_vote(post, alice, true).await.unwrap();
        store.set_vote(post, alice, true).await.unwrap();

        assert_eq!(row_count(&pool).await, 1);
        assert_eq!(
            store.tally(post, Some(alice)).await.unwrap(),
            VoteTally {
                positive: 1,
                negative: 0,
                viewer_vote: Some(true),
            }
        );
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at Postgres"]
    async fn set_vote_flips_the_existing_sign(pool: PgPool) {
        let alice = seed_user(&pool, "alice").await;
        let post = seed_post(&pool, alice, "rust").await;
        let store = PgVoteStore::new(pool.clone());

        store.set_vote(post, alice, true).await.unwrap();
        store.set_vote(post, alice, false).await.unwrap();

        assert_eq!(row_count(&pool).await, 1);
        let tally = store.tally(post, Some(alice)).await.unwrap();
        assert_eq!(tally.positive, 0);
        assert_eq!(tally.negative, 1);
        assert_eq!(tally.viewer_vote, Some(false));
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at Postgres"]
    async fn clear_vote_removes_the_row(pool: PgPool) {
        let alice = seed_user(&pool, "alice").await;
        let post = seed_post(&pool, alice, "rust").await;
        let store = PgVoteStore::new(pool.clone());
        store.set_vote(post, alice, false).await.unwrap();

        store.clear_vote(post, alice).await.unwrap();
        store.clear_vote(post, alice).await.unwrap();

        assert_eq!(row_count(&pool).await, 0);
        assert_eq!(
            store.tally(post, Some(alice)).await.unwrap(),
            VoteTally::default()
        );
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at Postgres"]
    async fn tally_reports_viewer_vote_only_for_a_viewer(pool: PgPool) {
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let carol = seed_user(&pool, "carol").await;
        let post = seed_post(&pool, alice, "rust").await;
        let store = PgVoteStore::new(pool.clone());
        store.set_vote(post, alice, true).await.unwrap();
        store.set_vote(post, bob, false).await.unwrap();

        let anonymous = store.tally(post, None).await.unwrap();
        assert_eq!(anonymous.positive, 1);
        assert_eq!(anonymous.negative, 1);
        assert_eq!(anonymous.viewer_vote, None);

        assert_eq!(
            store.tally(post, Some(bob)).await.unwrap().viewer_vote,
            Some(false)
        );
        assert_eq!(store.tally(post, Some(carol)).await.unwrap().viewer_vote, None);
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at Postgres"]
    async fn tally_many_skips_posts_without_votes(pool: PgPool) {
        let alice = seed_user(&pool, "alice").await;
        let voted = seed_post(&pool, alice, "rust").await;
        let quiet = seed_post(&pool, alice, "rust").await;
        let store = PgVoteStore::new(pool.clone());
        store.set_vote(voted, alice, true).await.unwrap();

        let tallies = store.tally_many(&[voted, quiet], Some(alice)).await.unwrap();

        assert_eq!(tallies.len(), 1);
        assert_eq!(
            tallies[&voted],
            store.tally(voted, Some(alice)).await.unwrap()
        );
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at Postgres"]
    async fn vote_on_missing_post_is_unknown_post(pool: PgPool) {
        let alice = seed_user(&pool, "alice").await;
        let store = PgVoteStore::new(pool.clone());

        let err = store.set_vote(9_999, alice, true).await.unwrap_err();

        assert!(matches!(err, StoreError::UnknownPost(9_999)));
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at Postgres"]
    async fn vote_by_deleted_user_is_unknown_user(pool: PgPool) {
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let post = seed_post(&pool, alice, "rust").await;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(bob)
            .execute(&pool)
            .await
            .unwrap();
        let store = PgVoteStore::new(pool.clone());

        let err = store.set_vote(post, bob, true).await.unwrap_err();

        assert!(matches!(err, StoreError::UnknownUser(id) if id == bob));
    }
}
