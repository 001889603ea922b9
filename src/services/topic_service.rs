use sqlx::PgPool;

use crate::{
    error::{AppError, Result, conflict_on_duplicate},
    models::{CreateTopicRequest, Topic, UpdateTopicRequest},
};

pub async fn get_topics(db: &PgPool) -> Result<Vec<Topic>> {
    let topics = sqlx::query_as::<_, Topic>(
        "SELECT name, description, created_at FROM topics ORDER BY name ASC",
    )
    .fetch_all(db)
    .await?;

    Ok(topics)
}

pub async fn get_topic_by_name(db: &PgPool, name: &str) -> Result<Option<Topic>> {
    let topic = sqlx::query_as::<_, Topic>(
        "SELECT name, description, created_at FROM topics WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(db)
    .await?;

    Ok(topic)
}

pub async fn create_topic(db: &PgPool, request: &CreateTopicRequest) -> Result<Topic> {
    let topic = sqlx::query_as::<_, Topic>(
        r#"
        INSERT INTO topics (name, description)
        VALUES ($1, $2)
        RETURNING name, description, created_at
        "#,
    )
    .bind(&request.name)
    .bind(&request.description)
    .fetch_one(db)
    .await
    .map_err(|e| conflict_on_duplicate(e, "Topic already exists"))?;

    Ok(topic)
}

pub async fn update_topic(db: &PgPool, name: &str, request: &UpdateTopicRequest) -> Result<Topic> {
    sqlx::query_as::<_, Topic>(
        r#"
        UPDATE topics SET description = $2
        WHERE name = $1
        RETURNING name, description, created_at
        "#,
    )
    .bind(name)
    .bind(&request.description)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Topic not found".to_string()))
}

pub async fn delete_topic(db: &PgPool, name: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM topics WHERE name = $1")
        .bind(name)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Topic not found".to_string()));
    }

    Ok(())
}
