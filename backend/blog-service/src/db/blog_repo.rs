use crate::config::RankingConfig;
use crate::models::{Blog, BlogView, SortOrder};
use crate::services::ranking;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const BLOG_COLUMNS: &str = "id, title, content, feature_image, slug, visibility, author_id, \
     category_id, like_count, comment_count, share_count, read_count, created_at, updated_at";

/// Blog columns plus author/category summaries; callers append WHERE/ORDER BY
const BLOG_VIEW_SELECT: &str = r#"
    SELECT b.id, b.title, b.content, b.feature_image, b.slug, b.visibility,
           b.author_id, b.category_id, b.like_count, b.comment_count,
           b.share_count, b.read_count, b.created_at, b.updated_at,
           u.username AS author_username,
           u.first_name AS author_first_name,
           u.last_name AS author_last_name,
           u.profile_image AS author_profile_image,
           c.name AS category_name,
           c.slug AS category_slug
    FROM blogs b
    JOIN users u ON u.id = b.author_id
    JOIN categories c ON c.id = b.category_id
"#;

pub struct NewBlog<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub slug: &'a str,
    pub visibility: &'a str,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub feature_image: Option<&'a str>,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Default)]
pub struct BlogChanges<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub visibility: Option<&'a str>,
    pub category_id: Option<Uuid>,
    pub feature_image: Option<&'a str>,
}

pub async fn create_blog(pool: &PgPool, blog: NewBlog<'_>) -> Result<Blog, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO blogs (title, content, slug, visibility, author_id, category_id, feature_image)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {BLOG_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Blog>(&sql)
        .bind(blog.title)
        .bind(blog.content)
        .bind(blog.slug)
        .bind(blog.visibility)
        .bind(blog.author_id)
        .bind(blog.category_id)
        .bind(blog.feature_image)
        .fetch_one(pool)
        .await
}

pub async fn find_blog_by_id<'e, E>(executor: E, blog_id: Uuid) -> Result<Option<Blog>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1");
    sqlx::query_as::<_, Blog>(&sql)
        .bind(blog_id)
        .fetch_optional(executor)
        .await
}

pub async fn find_view_by_id(pool: &PgPool, blog_id: Uuid) -> Result<Option<BlogView>, sqlx::Error> {
    let sql = format!("{BLOG_VIEW_SELECT} WHERE b.id = $1");
    sqlx::query_as::<_, BlogView>(&sql)
        .bind(blog_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_view_by_slug(pool: &PgPool, slug: &str) -> Result<Option<BlogView>, sqlx::Error> {
    let sql = format!("{BLOG_VIEW_SELECT} WHERE b.slug = $1");
    sqlx::query_as::<_, BlogView>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM blogs WHERE slug = $1)")
        .bind(slug)
        .fetch_one(pool)
        .await
}

/// One page of public blogs, optionally restricted to a category slug
pub async fn list_public(
    pool: &PgPool,
    category_slug: Option<&str>,
    sort: SortOrder,
    ranking_config: &RankingConfig,
    limit: i64,
    offset: i64,
) -> Result<Vec<BlogView>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(BLOG_VIEW_SELECT);
    qb.push(" WHERE b.visibility = 'public'");
    if let Some(slug) = category_slug {
        qb.push(" AND c.slug = ").push_bind(slug);
    }
    qb.push(" ORDER BY ");
    ranking::push_order_by(&mut qb, sort, ranking_config);
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);

    qb.build_query_as::<BlogView>().fetch_all(pool).await
}

pub async fn count_public(pool: &PgPool, category_slug: Option<&str>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM blogs b
        JOIN categories c ON c.id = b.category_id
        WHERE b.visibility = 'public' AND ($1::TEXT IS NULL OR c.slug = $1)
        "#,
    )
    .bind(category_slug)
    .fetch_one(pool)
    .await
}

/// All of an author's blogs, public and private, newest first
pub async fn list_by_author(pool: &PgPool, author_id: Uuid) -> Result<Vec<BlogView>, sqlx::Error> {
    let sql = format!("{BLOG_VIEW_SELECT} WHERE b.author_id = $1 ORDER BY b.created_at DESC, b.id DESC");
    sqlx::query_as::<_, BlogView>(&sql)
        .bind(author_id)
        .fetch_all(pool)
        .await
}

/// Public blogs from every author `follower_id` follows
pub async fn list_following(
    pool: &PgPool,
    follower_id: Uuid,
    oldest_first: bool,
) -> Result<Vec<BlogView>, sqlx::Error> {
    let direction = if oldest_first { "ASC" } else { "DESC" };
    let sql = format!(
        r#"{BLOG_VIEW_SELECT}
        WHERE b.visibility = 'public'
          AND b.author_id IN (SELECT author_id FROM follows WHERE follower_id = $1)
        ORDER BY b.created_at {direction}, b.id {direction}"#
    );
    sqlx::query_as::<_, BlogView>(&sql)
        .bind(follower_id)
        .fetch_all(pool)
        .await
}

/// Blogs the user liked and may still see, most recent like first
pub async fn list_liked_by(pool: &PgPool, user_id: Uuid) -> Result<Vec<BlogView>, sqlx::Error> {
    let sql = format!(
        r#"{BLOG_VIEW_SELECT}
        JOIN blog_likes l ON l.blog_id = b.id AND l.user_id = $1
        WHERE b.visibility = 'public' OR b.author_id = $1
        ORDER BY l.created_at DESC"#
    );
    sqlx::query_as::<_, BlogView>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Blogs from `ids` visible to `viewer_id`, in reverse order of `ids`
pub async fn list_by_ids_newest_first(
    pool: &PgPool,
    ids: &[Uuid],
    viewer_id: Uuid,
) -> Result<Vec<BlogView>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        r#"{BLOG_VIEW_SELECT}
        WHERE b.id = ANY($1) AND (b.visibility = 'public' OR b.author_id = $2)
        ORDER BY array_position($1, b.id) DESC"#
    );
    sqlx::query_as::<_, BlogView>(&sql)
        .bind(ids)
        .bind(viewer_id)
        .fetch_all(pool)
        .await
}

pub async fn update_blog(
    pool: &PgPool,
    blog_id: Uuid,
    changes: BlogChanges<'_>,
) -> Result<Option<Blog>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE blogs
        SET title = COALESCE($2, title),
            content = COALESCE($3, content),
            slug = COALESCE($4, slug),
            visibility = COALESCE($5, visibility),
            category_id = COALESCE($6, category_id),
            feature_image = COALESCE($7, feature_image),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {BLOG_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Blog>(&sql)
        .bind(blog_id)
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.slug)
        .bind(changes.visibility)
        .bind(changes.category_id)
        .bind(changes.feature_image)
        .fetch_optional(pool)
        .await
}

/// Returns true if the blog existed. Likes and comments cascade.
pub async fn delete_blog<'e, E>(executor: E, blog_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
        .bind(blog_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns the new read count, `None` if the blog is gone
pub async fn increment_read_count(pool: &PgPool, blog_id: Uuid) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "UPDATE blogs SET read_count = read_count + 1 WHERE id = $1 RETURNING read_count",
    )
    .bind(blog_id)
    .fetch_optional(pool)
    .await
}

pub async fn increment_share_count(pool: &PgPool, blog_id: Uuid) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "UPDATE blogs SET share_count = share_count + 1 WHERE id = $1 RETURNING share_count",
    )
    .bind(blog_id)
    .fetch_optional(pool)
    .await
}

/// Add `delta` to `like_count`, flooring at zero
pub async fn adjust_like_count<'e, E>(executor: E, blog_id: Uuid, delta: i64) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE blogs
        SET like_count = GREATEST(like_count + $2, 0)
        WHERE id = $1
        RETURNING like_count
        "#,
    )
    .bind(blog_id)
    .bind(delta)
    .fetch_one(executor)
    .await
}

/// Add `delta` to `comment_count`, flooring at zero
pub async fn adjust_comment_count<'e, E>(
    executor: E,
    blog_id: Uuid,
    delta: i64,
) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE blogs
        SET comment_count = GREATEST(comment_count + $2, 0)
        WHERE id = $1
        RETURNING comment_count
        "#,
    )
    .bind(blog_id)
    .bind(delta)
    .fetch_one(executor)
    .await
}

/// Fetch a blog and lock its row for the rest of the transaction
pub async fn find_blog_for_update<'e, E>(
    executor: E,
    blog_id: Uuid,
) -> Result<Option<Blog>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Blog>(&sql)
        .bind(blog_id)
        .fetch_optional(executor)
        .await
}
