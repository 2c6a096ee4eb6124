/// Follow handlers - reader/author connections
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::response;
use crate::services::FollowService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
    pub author_id: Option<Uuid>,
}

impl AuthorRequest {
    fn author_id(&self) -> Result<Uuid> {
        self.author_id
            .ok_or_else(|| AppError::BadRequest("Author id is required".to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStatus {
    pub is_following: bool,
}

pub async fn follow(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<AuthorRequest>,
) -> Result<HttpResponse> {
    let author_id = req.author_id()?;
    let follow = FollowService::new((**pool).clone())
        .follow(user.id(), author_id)
        .await?;

    Ok(response::ok(follow, "Following successfully"))
}

pub async fn unfollow(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<AuthorRequest>,
) -> Result<HttpResponse> {
    let author_id = req.author_id()?;
    FollowService::new((**pool).clone())
        .unfollow(user.id(), author_id)
        .await?;

    Ok(response::ok(
        FollowStatus {
            is_following: false,
        },
        "Un-followed successfully",
    ))
}

pub async fn followed_users(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let users = FollowService::new((**pool).clone())
        .followed_users(user.id())
        .await?;

    Ok(response::ok(users, "Followed users fetched successfully"))
}

pub async fn check_follow(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<AuthorRequest>,
) -> Result<HttpResponse> {
    let author_id = req.author_id()?;
    let is_following = FollowService::new((**pool).clone())
        .is_following(user.id(), author_id)
        .await?;

    Ok(response::ok(FollowStatus { is_following }, "Follow status fetched"))
}
