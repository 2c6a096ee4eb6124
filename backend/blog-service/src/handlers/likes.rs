/// Like handlers
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::{AuthUser, MaybeUser};
use crate::response;
use crate::services::LikeService;

/// Like or unlike a blog
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    user: AuthUser,
    blog_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let status = LikeService::new((**pool).clone())
        .toggle_like(user.id(), *blog_id)
        .await?;

    let message = if status.liked {
        "Blog liked"
    } else {
        "Blog unliked"
    };
    Ok(response::ok(status, message))
}

pub async fn like_status(
    pool: web::Data<PgPool>,
    viewer: MaybeUser,
    blog_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let status = LikeService::new((**pool).clone())
        .like_status(*blog_id, viewer.id())
        .await?;

    Ok(response::ok(status, "Like status fetched successfully"))
}

pub async fn liked_posts(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let blogs = LikeService::new((**pool).clone())
        .liked_blogs(user.id())
        .await?;

    Ok(response::ok(blogs, "Liked blogs fetched successfully"))
}
