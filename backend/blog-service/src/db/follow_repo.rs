use crate::models::{Follow, PublicProfile};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a follow relationship; `None` when it already exists
pub async fn create_follow(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<Option<Follow>, sqlx::Error> {
    sqlx::query_as::<_, Follow>(
        r#"
        INSERT INTO follows (follower_id, author_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, author_id) DO NOTHING
        RETURNING id, follower_id, author_id, created_at
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await
}

/// Returns true if a follow was removed
pub async fn delete_follow(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND author_id = $2")
        .bind(follower_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn is_following(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND author_id = $2)",
    )
    .bind(follower_id)
    .bind(author_id)
    .fetch_one(pool)
    .await
}

/// Authors the user follows, most recently followed first
pub async fn list_followed_authors(
    pool: &PgPool,
    follower_id: Uuid,
) -> Result<Vec<PublicProfile>, sqlx::Error> {
    sqlx::query_as::<_, PublicProfile>(
        r#"
        SELECT u.id, u.username, u.first_name, u.last_name, u.profile_image
        FROM follows f
        JOIN users u ON u.id = f.author_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(follower_id)
    .fetch_all(pool)
    .await
}

pub async fn count_following(pool: &PgPool, follower_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
        .bind(follower_id)
        .fetch_one(pool)
        .await
}
