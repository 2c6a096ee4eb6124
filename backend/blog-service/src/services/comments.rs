/// Comment service - comments on blogs and the `comment_count` they drive
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::{blog_repo, comment_repo};
use crate::error::{AppError, Result};
use crate::metrics::engagement;
use crate::middleware::check_comment_deletion;
use crate::models::{CommentView, CommenterSummary, User, UserCommentView};

pub const MAX_COMMENT_LEN: usize = 2000;

fn blog_not_found() -> AppError {
    AppError::NotFound("Blog not found".to_string())
}

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn add_comment(&self, user: &User, blog_id: Uuid, content: &str) -> Result<CommentView> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::ValidationError("Comment cannot be empty".to_string()));
        }
        if content.chars().count() > MAX_COMMENT_LEN {
            return Err(AppError::ValidationError(format!(
                "Comment must be at most {} characters",
                MAX_COMMENT_LEN
            )));
        }

        let mut tx = self.pool.begin().await?;

        blog_repo::find_blog_for_update(&mut *tx, blog_id)
            .await?
            .filter(|b| b.visible_to(Some(user.id)))
            .ok_or_else(blog_not_found)?;

        let comment = comment_repo::create_comment(&mut *tx, blog_id, user.id, content).await?;
        blog_repo::adjust_comment_count(&mut *tx, blog_id, 1).await?;
        tx.commit().await?;

        engagement::record("comment");
        info!(comment_id = %comment.id, %blog_id, user_id = %user.id, "comment added");

        Ok(CommentView {
            comment,
            user: CommenterSummary {
                id: user.id,
                username: user.username.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                profile_image: user.profile_image.clone(),
            },
        })
    }

    /// Comments on a blog the viewer can see, newest first
    pub async fn list_comments(&self, blog_id: Uuid, viewer: Option<Uuid>) -> Result<Vec<CommentView>> {
        blog_repo::find_blog_by_id(&self.pool, blog_id)
            .await?
            .filter(|b| b.visible_to(viewer))
            .ok_or_else(blog_not_found)?;

        Ok(comment_repo::list_for_blog(&self.pool, blog_id).await?)
    }

    pub async fn delete_comment(&self, user: &User, comment_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let comment = comment_repo::find_comment_by_id(&mut *tx, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
        let blog = blog_repo::find_blog_for_update(&mut *tx, comment.blog_id)
            .await?
            .ok_or_else(blog_not_found)?;
        check_comment_deletion(user, &comment, blog.author_id)?;

        if comment_repo::delete_comment(&mut *tx, comment_id).await? {
            blog_repo::adjust_comment_count(&mut *tx, blog.id, -1).await?;
        }
        tx.commit().await?;

        info!(%comment_id, blog_id = %blog.id, user_id = %user.id, "comment deleted");
        Ok(())
    }

    pub async fn user_comments(&self, user_id: Uuid) -> Result<Vec<UserCommentView>> {
        Ok(comment_repo::list_by_user(&self.pool, user_id).await?)
    }
}
