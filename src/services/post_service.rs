use sqlx::PgPool;
use std::collections::HashMap;

use crate::{
    error::{AppError, Result, bad_reference},
    models::{CreatePostRequest, Post, PostResponse, UpdatePostRequest},
    services::vote_service,
    store::{VoteStore, VoteTally},
};

pub async fn get_post_by_id_raw(db: &PgPool, post_id: i64) -> Result<Option<Post>> {
    let post = sqlx::query_as::<_, Post>(
        "SELECT id, title, body, topic, creator, created_at, is_edited FROM posts WHERE id = $1",
    )
    .bind(post_id)
    .fetch_optional(db)
    .await?;

    Ok(post)
}

/// Posts of a topic with their scores, highest score first. Equal scores are
/// ordered newest first.
pub async fn get_topic_posts(
    db: &PgPool,
    votes: &dyn VoteStore,
    topic: &str,
    viewer_id: Option<i64>,
) -> Result<Vec<PostResponse>> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, body, topic, creator, created_at, is_edited
        FROM posts
        WHERE topic = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(topic)
    .fetch_all(db)
    .await?;

    let post_ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
    let tallies = votes.tally_many(&post_ids, viewer_id).await?;

    Ok(rank_by_score(posts, &tallies, viewer_id.is_some()))
}

/// Attaches scores and sorts by score, descending. The sort is stable, so
/// posts with equal scores keep their incoming order.
pub fn rank_by_score(
    posts: Vec<Post>,
    tallies: &HashMap<i64, VoteTally>,
    has_viewer: bool,
) -> Vec<PostResponse> {
    let mut ranked: Vec<PostResponse> = posts
        .into_iter()
        .map(|post| {
            let tally = tallies.get(&post.id).copied().unwrap_or_default();
            PostResponse::new(post, vote_service::score_from_tally(&tally, has_viewer))
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

pub async fn create_post(db: &PgPool, creator: i64, request: &CreatePostRequest) -> Result<Post> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (title, body, topic, creator)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, body, topic, creator, created_at, is_edited
        "#,
    )
    .bind(&request.title)
    .bind(&request.body)
    .bind(&request.topic)
    .bind(creator)
    .fetch_one(db)
    .await
    .map_err(|e| bad_reference(e, "Topic not found"))?;

    Ok(post)
}

pub async fn update_post(db: &PgPool, post_id: i64, request: &UpdatePostRequest) -> Result<Post> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = $1, body = $2, is_edited = TRUE
        WHERE id = $3
        RETURNING id, title, body, topic, creator, created_at, is_edited
        "#,
    )
    .bind(&request.title)
    .bind(&request.body)
    .bind(post_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
}

pub async fn delete_post(db: &PgPool, post_id: i64) -> Result<()> {
    // Votes and comments go with the post via ON DELETE CASCADE
    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(db)
        .await?;

    Ok(())
}

/// Loads a post and checks that `user_id` created it.
pub async fn get_owned_post(db: &PgPool, post_id: i64, user_id: i64) -> Result<Post> {
    let post = get_post_by_id_raw(db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.creator != user_id {
        return Err(AppError::Authorization(
            "Can only modify your own posts".to_string(),
        ));
    }

    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryVoteStore, PgVoteStore, postgres::tests as pg};
    use chrono::{Duration, Utc};

    fn post(id: i64, minutes_ago: i64) -> Post {
        Post {
            id,
            title: format!("post {id}"),
            body: String::new(),
            topic: "rust".to_string(),
            creator: 1,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            is_edited: false,
        }
    }

    fn ids(posts: &[PostResponse]) -> Vec<i64> {
        posts.iter().map(|post| post.id).collect()
    }

    #[tokio::test]
    async fn ranking_uses_the_vote_store_scores() {
        let store = MemoryVoteStore::new();
        store.set_vote(2, 1, true).await.unwrap();
        store.set_vote(2, 2, true).await.unwrap();
        store.set_vote(3, 1, false).await.unwrap();
        let posts = vec![post(1, 1), post(2, 2), post(3, 3)];

        let tallies = store.tally_many(&[1, 2, 3], Some(1)).await.unwrap();
        let ranked = rank_by_score(posts, &tallies, true);

        assert_eq!(ids(&ranked), vec![2, 1, 3]);
        for response in &ranked {
            let single = vote_service::compute_score(&store, response.id, Some(1))
                .await
                .unwrap();
            assert_eq!(response.score, single.score);
            assert_eq!(response.user_vote, single.user_vote);
        }
    }

    #[test]
    fn equal_scores_keep_incoming_order() {
        let posts = vec![post(5, 1), post(4, 2), post(6, 3)];

        let ranked = rank_by_score(posts, &HashMap::new(), false);

        assert_eq!(ids(&ranked), vec![5, 4, 6]);
        assert!(ranked.iter().all(|post| post.user_vote.is_none()));
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at Postgres"]
    async fn topic_listing_is_ordered_by_score(pool: PgPool) {
        let alice = pg::seed_user(&pool, "alice").await;
        let bob = pg::seed_user(&pool, "bob").await;
        let low = pg::seed_post(&pool, alice, "rust").await;
        let high = pg::seed_post(&pool, alice, "rust").await;
        let middle = pg::seed_post(&pool, alice, "rust").await;
        let other_topic = pg::seed_post(&pool, alice, "go").await;
        let store = PgVoteStore::new(pool.clone());
        store.set_vote(high, alice, true).await.unwrap();
        store.set_vote(high, bob, true).await.unwrap();
        store.set_vote(low, bob, false).await.unwrap();
        store.set_vote(other_topic, bob, true).await.unwrap();

        let listing = get_topic_posts(&pool, &store, "rust", Some(bob))
            .await
            .unwrap();

        assert_eq!(ids(&listing), vec![high, middle, low]);
        assert_eq!(
            listing.iter().map(|post| post.score).collect::<Vec<_>>(),
            vec![2, 0, -1]
        );
        assert_eq!(listing[0].user_vote, Some(1));
        assert_eq!(listing[1].user_vote, None);
        assert_eq!(listing[2].user_vote, Some(-1));
    }
}
