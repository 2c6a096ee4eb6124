use crate::models::{Comment, CommentView, UserCommentView};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

pub async fn create_comment<'e, E>(
    executor: E,
    blog_id: Uuid,
    user_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO blog_comments (blog_id, user_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, blog_id, user_id, content, created_at
        "#,
    )
    .bind(blog_id)
    .bind(user_id)
    .bind(content)
    .fetch_one(executor)
    .await
}

pub async fn find_comment_by_id<'e, E>(
    executor: E,
    comment_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comment>(
        "SELECT id, blog_id, user_id, content, created_at FROM blog_comments WHERE id = $1",
    )
    .bind(comment_id)
    .fetch_optional(executor)
    .await
}

/// Returns true if the comment existed
pub async fn delete_comment<'e, E>(executor: E, comment_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM blog_comments WHERE id = $1")
        .bind(comment_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Comments on a blog, newest first
pub async fn list_for_blog(pool: &PgPool, blog_id: Uuid) -> Result<Vec<CommentView>, sqlx::Error> {
    sqlx::query_as::<_, CommentView>(
        r#"
        SELECT c.id, c.blog_id, c.user_id, c.content, c.created_at,
               u.username AS commenter_username,
               u.first_name AS commenter_first_name,
               u.last_name AS commenter_last_name,
               u.profile_image AS commenter_profile_image
        FROM blog_comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.blog_id = $1
        ORDER BY c.created_at DESC, c.id DESC
        "#,
    )
    .bind(blog_id)
    .fetch_all(pool)
    .await
}

/// A user's own comments on blogs they can still see, newest first
pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserCommentView>, sqlx::Error> {
    sqlx::query_as::<_, UserCommentView>(
        r#"
        SELECT c.id, c.blog_id, c.user_id, c.content, c.created_at,
               b.title AS blog_title, b.slug AS blog_slug
        FROM blog_comments c
        JOIN blogs b ON b.id = c.blog_id
        WHERE c.user_id = $1 AND (b.visibility = 'public' OR b.author_id = $1)
        ORDER BY c.created_at DESC, c.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
