use sqlx::PgPool;

use crate::{error::Result, models::User};

pub async fn get_user_by_id(db: &PgPool, user_id: i64) -> Result<Option<User>> {
    let user =
        sqlx::query_as::<_, User>("SELECT id, username, created_at FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    Ok(user)
}

pub async fn get_user_by_username(db: &PgPool, username: &str) -> Result<Option<User>> {
    let user =
        sqlx::query_as::<_, User>("SELECT id, username, created_at FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(db)
            .await?;

    Ok(user)
}

/// Looks a user up by numeric id when the key starts with a digit, otherwise
/// by username. Usernames may start with digits, so a digit-led key that is not
/// a valid id falls back to a username lookup.
pub async fn get_user_by_id_or_username(db: &PgPool, key: &str) -> Result<Option<User>> {
    if key.starts_with(|c: char| c.is_ascii_digit()) {
        if let Ok(user_id) = key.parse::<i64>() {
            return get_user_by_id(db, user_id).await;
        }
    }

    get_user_by_username(db, key).await
}

/// Returns the id for `username`, registering the user on first sight.
pub async fn find_or_create_user(db: &PgPool, username: &str) -> Result<i64> {
    // The no-op update makes RETURNING yield the existing row on conflict
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username)
        VALUES ($1)
        ON CONFLICT (username)
        DO UPDATE SET username = EXCLUDED.username
        RETURNING id, username, created_at
        "#,
    )
    .bind(username)
    .fetch_one(db)
    .await?;

    Ok(user.id)
}
