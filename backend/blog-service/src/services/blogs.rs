/// Blog service - publishing, editing and reading blogs
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::RankingConfig;
use crate::db::blog_repo::{self, BlogChanges, NewBlog};
use crate::db::{bookmark_repo, category_repo, follow_repo};
use crate::error::{conflict_on_unique, AppError, Result};
use crate::metrics::engagement;
use crate::middleware::{check_blog_deletion, check_blog_update};
use crate::models::{BlogPage, BlogView, SortOrder, User, Visibility};
use crate::validators::{is_valid_slug, slugify};

const DUPLICATE_SLUG: &str = "A blog with this slug already exists";

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A new blog as submitted by its author
pub struct BlogDraft<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub slug: Option<&'a str>,
    pub visibility: Visibility,
    pub category_id: Uuid,
    pub feature_image: Option<&'a str>,
}

/// Fields to change on an existing blog
#[derive(Default)]
pub struct BlogUpdate<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub visibility: Option<Visibility>,
    pub category_id: Option<Uuid>,
    pub feature_image: Option<&'a str>,
}

fn blog_not_found() -> AppError {
    AppError::NotFound("Blog not found".to_string())
}

fn checked_slug(slug: &str) -> Result<&str> {
    if is_valid_slug(slug) {
        Ok(slug)
    } else {
        Err(AppError::ValidationError(
            "Slug may only contain lowercase letters, digits and hyphens".to_string(),
        ))
    }
}

/// Clamp user-supplied paging to `(page, limit, offset)`
pub fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1).saturating_mul(limit);
    (page, limit, offset)
}

pub struct BlogService {
    pool: PgPool,
    ranking: RankingConfig,
}

impl BlogService {
    pub fn new(pool: PgPool, ranking: RankingConfig) -> Self {
        Self { pool, ranking }
    }

    async fn ensure_category(&self, category_id: Uuid) -> Result<()> {
        if category_repo::exists(&self.pool, category_id).await? {
            Ok(())
        } else {
            Err(AppError::BadRequest("Category does not exist".to_string()))
        }
    }

    /// Publish a blog; the slug is derived from the title when not given
    pub async fn create_blog(&self, author: &User, draft: BlogDraft<'_>) -> Result<BlogView> {
        let slug = match draft.slug.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => checked_slug(s)?.to_string(),
            None => slugify(draft.title).ok_or_else(|| {
                AppError::ValidationError(
                    "A slug could not be derived from the title, please provide one".to_string(),
                )
            })?,
        };

        self.ensure_category(draft.category_id).await?;

        if blog_repo::slug_exists(&self.pool, &slug).await? {
            return Err(AppError::Conflict(DUPLICATE_SLUG.to_string()));
        }

        let blog = blog_repo::create_blog(
            &self.pool,
            NewBlog {
                title: draft.title.trim(),
                content: draft.content,
                slug: &slug,
                visibility: draft.visibility.as_str(),
                author_id: author.id,
                category_id: draft.category_id,
                feature_image: draft.feature_image,
            },
        )
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_SLUG))?;

        info!(blog_id = %blog.id, author_id = %author.id, slug = %blog.slug, "blog created");

        blog_repo::find_view_by_id(&self.pool, blog.id)
            .await?
            .ok_or_else(blog_not_found)
    }

    /// One page of public blogs in the requested order
    pub async fn list_blogs(
        &self,
        sort: SortOrder,
        category_slug: Option<&str>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<BlogPage> {
        let (page, limit, offset) = page_window(page, limit);

        let blogs =
            blog_repo::list_public(&self.pool, category_slug, sort, &self.ranking, limit, offset)
                .await?;
        let total = blog_repo::count_public(&self.pool, category_slug).await?;
        debug!(?sort, page, limit, total, "listed blogs");

        Ok(BlogPage {
            blogs,
            page,
            limit,
            total,
        })
    }

    /// Read a blog by slug, counting the read
    pub async fn read_blog(&self, slug: &str, viewer: Option<Uuid>) -> Result<BlogView> {
        let mut view = blog_repo::find_view_by_slug(&self.pool, slug)
            .await?
            .filter(|v| v.blog.visible_to(viewer))
            .ok_or_else(blog_not_found)?;

        if let Some(read_count) = blog_repo::increment_read_count(&self.pool, view.blog.id).await? {
            view.blog.read_count = read_count;
        }
        engagement::record("read");

        Ok(view)
    }

    pub async fn user_blogs(&self, author_id: Uuid) -> Result<Vec<BlogView>> {
        Ok(blog_repo::list_by_author(&self.pool, author_id).await?)
    }

    /// Public blogs by followed authors and how many authors are followed
    pub async fn following_feed(&self, user_id: Uuid, oldest_first: bool) -> Result<(Vec<BlogView>, i64)> {
        let following_count = follow_repo::count_following(&self.pool, user_id).await?;
        if following_count == 0 {
            return Ok((Vec::new(), 0));
        }

        let blogs = blog_repo::list_following(&self.pool, user_id, oldest_first).await?;
        Ok((blogs, following_count))
    }

    pub async fn update_blog(&self, user: &User, blog_id: Uuid, update: BlogUpdate<'_>) -> Result<BlogView> {
        let blog = blog_repo::find_blog_by_id(&self.pool, blog_id)
            .await?
            .ok_or_else(blog_not_found)?;
        check_blog_update(user, &blog)?;

        let slug = match update.slug.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Some(checked_slug(s)?),
            None => None,
        };
        if let Some(category_id) = update.category_id {
            self.ensure_category(category_id).await?;
        }

        blog_repo::update_blog(
            &self.pool,
            blog_id,
            BlogChanges {
                title: update.title.map(str::trim),
                content: update.content,
                slug,
                visibility: update.visibility.map(|v| v.as_str()),
                category_id: update.category_id,
                feature_image: update.feature_image,
            },
        )
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_SLUG))?
        .ok_or_else(blog_not_found)?;

        info!(blog_id = %blog_id, user_id = %user.id, "blog updated");

        blog_repo::find_view_by_id(&self.pool, blog_id)
            .await?
            .ok_or_else(blog_not_found)
    }

    /// Delete a blog with its likes, comments and bookmark references
    pub async fn delete_blog(&self, user: &User, blog_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let blog = blog_repo::find_blog_for_update(&mut *tx, blog_id)
            .await?
            .ok_or_else(blog_not_found)?;
        check_blog_deletion(user, &blog)?;

        let unbookmarked = bookmark_repo::remove_from_all(&mut *tx, blog_id).await?;
        blog_repo::delete_blog(&mut *tx, blog_id).await?;
        tx.commit().await?;

        info!(blog_id = %blog_id, user_id = %user.id, unbookmarked, "blog deleted");
        Ok(())
    }

    /// Count a share and return the new total
    pub async fn share_blog(&self, blog_id: Uuid, viewer: Option<Uuid>) -> Result<i64> {
        blog_repo::find_blog_by_id(&self.pool, blog_id)
            .await?
            .filter(|b| b.visible_to(viewer))
            .ok_or_else(blog_not_found)?;

        let share_count = blog_repo::increment_share_count(&self.pool, blog_id)
            .await?
            .ok_or_else(blog_not_found)?;
        engagement::record("share");

        Ok(share_count)
    }
}
