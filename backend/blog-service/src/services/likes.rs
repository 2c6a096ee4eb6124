/// Like service - toggling likes and keeping `like_count` in step
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::db::{blog_repo, like_repo};
use crate::error::{AppError, Result};
use crate::metrics::engagement;
use crate::models::{BlogView, LikeStatus};

pub struct LikeService {
    pool: PgPool,
}

impl LikeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Like the blog if not yet liked, otherwise remove the like
    pub async fn toggle_like(&self, user_id: Uuid, blog_id: Uuid) -> Result<LikeStatus> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent toggles on the same blog
        blog_repo::find_blog_for_update(&mut *tx, blog_id)
            .await?
            .filter(|b| b.visible_to(Some(user_id)))
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

        let status = if like_repo::delete_like(&mut *tx, blog_id, user_id).await? {
            let like_count = blog_repo::adjust_like_count(&mut *tx, blog_id, -1).await?;
            LikeStatus {
                liked: false,
                like_count,
            }
        } else {
            let inserted = like_repo::create_like(&mut *tx, blog_id, user_id).await?;
            let delta = if inserted.is_some() { 1 } else { 0 };
            let like_count = blog_repo::adjust_like_count(&mut *tx, blog_id, delta).await?;
            LikeStatus {
                liked: true,
                like_count,
            }
        };

        tx.commit().await?;

        engagement::record(if status.liked { "like" } else { "unlike" });
        debug!(%blog_id, %user_id, liked = status.liked, like_count = status.like_count, "like toggled");
        Ok(status)
    }

    /// Whether `viewer` liked the blog; anonymous viewers never have
    pub async fn like_status(&self, blog_id: Uuid, viewer: Option<Uuid>) -> Result<LikeStatus> {
        let blog = blog_repo::find_blog_by_id(&self.pool, blog_id)
            .await?
            .filter(|b| b.visible_to(viewer))
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

        let liked = match viewer {
            Some(user_id) => like_repo::has_liked(&self.pool, blog_id, user_id).await?,
            None => false,
        };

        Ok(LikeStatus {
            liked,
            like_count: blog.like_count,
        })
    }

    pub async fn liked_blogs(&self, user_id: Uuid) -> Result<Vec<BlogView>> {
        Ok(blog_repo::list_liked_by(&self.pool, user_id).await?)
    }
}
