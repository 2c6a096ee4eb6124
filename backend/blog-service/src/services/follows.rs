/// Follow service - reader/author connections
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::{follow_repo, user_repo};
use crate::error::{AppError, Result};
use crate::metrics::engagement;
use crate::models::{Follow, PublicProfile};

pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<Follow> {
        if follower_id == author_id {
            return Err(AppError::BadRequest("You cannot follow yourself".to_string()));
        }
        if !user_repo::exists(&self.pool, author_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let follow = follow_repo::create_follow(&self.pool, follower_id, author_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("You are already following this user".to_string()))?;

        engagement::record("follow");
        info!(%follower_id, %author_id, "user followed");
        Ok(follow)
    }

    pub async fn unfollow(&self, follower_id: Uuid, author_id: Uuid) -> Result<()> {
        if !follow_repo::delete_follow(&self.pool, follower_id, author_id).await? {
            return Err(AppError::NotFound(
                "You are not following this user".to_string(),
            ));
        }

        engagement::record("unfollow");
        info!(%follower_id, %author_id, "user unfollowed");
        Ok(())
    }

    pub async fn followed_users(&self, follower_id: Uuid) -> Result<Vec<PublicProfile>> {
        Ok(follow_repo::list_followed_authors(&self.pool, follower_id).await?)
    }

    pub async fn is_following(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        Ok(follow_repo::is_following(&self.pool, follower_id, author_id).await?)
    }
}
