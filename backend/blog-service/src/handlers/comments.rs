/// Comment handlers - HTTP endpoints for blog comments
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::{AuthUser, MaybeUser};
use crate::response;
use crate::services::CommentService;

#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
}

pub async fn add_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    blog_id: web::Path<Uuid>,
    req: web::Json<AddCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let comment = CommentService::new((**pool).clone())
        .add_comment(&user.0, *blog_id, &req.content)
        .await?;

    Ok(response::created(comment, "Comment added successfully"))
}

pub async fn list_comments(
    pool: web::Data<PgPool>,
    viewer: MaybeUser,
    blog_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = CommentService::new((**pool).clone())
        .list_comments(*blog_id, viewer.id())
        .await?;

    Ok(response::ok(comments, "Comments fetched successfully"))
}

pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    CommentService::new((**pool).clone())
        .delete_comment(&user.0, *comment_id)
        .await?;

    Ok(response::ok((), "Comment deleted successfully"))
}

/// Every comment the caller has written
pub async fn my_comments(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let comments = CommentService::new((**pool).clone())
        .user_comments(user.id())
        .await?;

    Ok(response::ok(comments, "User comments fetched successfully"))
}
