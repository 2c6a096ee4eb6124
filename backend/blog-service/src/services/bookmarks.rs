/// Bookmark service - a reader's saved blogs
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{blog_repo, bookmark_repo};
use crate::error::{AppError, Result};
use crate::metrics::engagement;
use crate::models::BlogView;

pub struct BookmarkService {
    pool: PgPool,
}

impl BookmarkService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns whether the blog is bookmarked after the toggle
    pub async fn toggle_bookmark(&self, user_id: Uuid, blog_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        // Blog deletion takes the same row lock before stripping bookmarks
        blog_repo::find_blog_for_update(&mut *tx, blog_id)
            .await?
            .filter(|b| b.visible_to(Some(user_id)))
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

        let bookmarked = bookmark_repo::toggle_bookmark(&mut *tx, user_id, blog_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        tx.commit().await?;

        engagement::record(if bookmarked { "bookmark" } else { "unbookmark" });
        tracing::debug!(%user_id, %blog_id, bookmarked, "bookmark toggled");
        Ok(bookmarked)
    }

    /// Most recently bookmarked first
    pub async fn bookmarked_blogs(&self, user_id: Uuid) -> Result<Vec<BlogView>> {
        let ids = bookmark_repo::bookmarked_ids(&self.pool, user_id).await?;
        Ok(blog_repo::list_by_ids_newest_first(&self.pool, &ids, user_id).await?)
    }
}
