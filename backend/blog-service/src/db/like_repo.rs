use crate::models::Like;
use sqlx::PgExecutor;
use uuid::Uuid;

/// Insert a like; `None` when the user already liked the blog
pub async fn create_like<'e, E>(
    executor: E,
    blog_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Like>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Like>(
        r#"
        INSERT INTO blog_likes (blog_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (blog_id, user_id) DO NOTHING
        RETURNING id, blog_id, user_id, created_at
        "#,
    )
    .bind(blog_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Returns true if a like was removed
pub async fn delete_like<'e, E>(executor: E, blog_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM blog_likes WHERE blog_id = $1 AND user_id = $2")
        .bind(blog_id)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn has_liked<'e, E>(executor: E, blog_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM blog_likes WHERE blog_id = $1 AND user_id = $2)",
    )
    .bind(blog_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}
