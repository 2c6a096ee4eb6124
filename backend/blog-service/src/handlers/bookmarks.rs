/// Bookmark handlers
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::response;
use crate::services::BookmarkService;

#[derive(Debug, Serialize)]
pub struct BookmarkStatus {
    pub bookmarked: bool,
}

pub async fn toggle_bookmark(
    pool: web::Data<PgPool>,
    user: AuthUser,
    blog_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let bookmarked = BookmarkService::new((**pool).clone())
        .toggle_bookmark(user.id(), *blog_id)
        .await?;

    let message = if bookmarked {
        "Blog bookmarked"
    } else {
        "Bookmark removed"
    };
    Ok(response::ok(BookmarkStatus { bookmarked }, message))
}

pub async fn bookmarked_blogs(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let blogs = BookmarkService::new((**pool).clone())
        .bookmarked_blogs(user.id())
        .await?;

    Ok(response::ok(blogs, "Bookmarked blogs fetched successfully"))
}
