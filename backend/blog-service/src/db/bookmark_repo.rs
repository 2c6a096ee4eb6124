use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Add or remove `blog_id` from the user's bookmarks in one statement.
///
/// Returns the new state, or `None` if the user does not exist.
pub async fn toggle_bookmark<'e, E>(
    executor: E,
    user_id: Uuid,
    blog_id: Uuid,
) -> Result<Option<bool>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, bool>(
        r#"
        UPDATE users
        SET bookmarked_blogs = CASE
                WHEN $2 = ANY(bookmarked_blogs) THEN array_remove(bookmarked_blogs, $2)
                ELSE array_append(bookmarked_blogs, $2)
            END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING $2 = ANY(bookmarked_blogs)
        "#,
    )
    .bind(user_id)
    .bind(blog_id)
    .fetch_optional(executor)
    .await
}

/// Bookmarked blog ids, oldest bookmark first
pub async fn bookmarked_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let ids = sqlx::query_scalar::<_, Vec<Uuid>>("SELECT bookmarked_blogs FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(ids.unwrap_or_default())
}

/// Drop a deleted blog from every user's bookmarks
pub async fn remove_from_all<'e, E>(executor: E, blog_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE users
        SET bookmarked_blogs = array_remove(bookmarked_blogs, $1)
        WHERE $1 = ANY(bookmarked_blogs)
        "#,
    )
    .bind(blog_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
