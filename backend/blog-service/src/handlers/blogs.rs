/// Blog handlers - HTTP endpoints for publishing and reading blogs
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, MaybeUser};
use crate::models::{BlogView, SortOrder, Visibility};
use crate::response;
use crate::services::{BlogDraft, BlogService, BlogUpdate};
use crate::validators::validate_not_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    #[serde(alias = "tittle")]
    #[validate(
        length(max = 200, message = "Title must be at most 200 characters"),
        custom(function = "validate_not_blank", message = "Title is required")
    )]
    pub title: String,
    #[validate(custom(function = "validate_not_blank", message = "Content is required"))]
    pub content: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(alias = "categoryId")]
    pub category: Uuid,
    #[validate(length(max = 2048, message = "Feature image reference is too long"))]
    pub feature_image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    #[serde(alias = "tittle")]
    #[validate(
        length(max = 200, message = "Title must be at most 200 characters"),
        custom(function = "validate_not_blank", message = "Title cannot be blank")
    )]
    pub title: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "Content cannot be blank"))]
    pub content: Option<String>,
    pub slug: Option<String>,
    pub visibility: Option<Visibility>,
    #[serde(alias = "categoryId")]
    pub category: Option<Uuid>,
    #[validate(length(max = 2048, message = "Feature image reference is too long"))]
    pub feature_image: Option<String>,
}

impl UpdateBlogRequest {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.slug.is_none()
            && self.visibility.is_none()
            && self.category.is_none()
            && self.feature_image.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct ListBlogsQuery {
    pub sort: Option<SortOrder>,
    /// Category slug
    pub category: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FollowingQuery {
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowingFeedResponse {
    pub blogs: Vec<BlogView>,
    pub following_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub share_count: i64,
}

fn blog_service(pool: &web::Data<PgPool>, config: &web::Data<Config>) -> BlogService {
    BlogService::new(pool.get_ref().clone(), config.ranking.clone())
}

/// Publish a new blog
pub async fn create_blog(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: AuthUser,
    req: web::Json<CreateBlogRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let blog = blog_service(&pool, &config)
        .create_blog(
            &user.0,
            BlogDraft {
                title: &req.title,
                content: &req.content,
                slug: req.slug.as_deref(),
                visibility: req.visibility,
                category_id: req.category,
                feature_image: req.feature_image.as_deref(),
            },
        )
        .await?;

    Ok(response::created(blog, "Blog created successfully"))
}

/// Public blogs, paginated and sorted
pub async fn list_blogs(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<ListBlogsQuery>,
) -> Result<HttpResponse> {
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));

    let page = blog_service(&pool, &config)
        .list_blogs(query.sort.unwrap_or_default(), category, query.page, query.limit)
        .await?;

    Ok(response::ok(page, "Blogs fetched successfully"))
}

pub async fn get_blog_by_slug(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    viewer: MaybeUser,
    slug: web::Path<String>,
) -> Result<HttpResponse> {
    let blog = blog_service(&pool, &config)
        .read_blog(&slug, viewer.id())
        .await?;

    Ok(response::ok(blog, "Blog fetched successfully"))
}

/// The caller's own blogs, including private ones
pub async fn user_blogs(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let blogs = blog_service(&pool, &config).user_blogs(user.id()).await?;
    Ok(response::ok(blogs, "User blogs fetched successfully"))
}

pub async fn following_blogs(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: AuthUser,
    query: web::Query<FollowingQuery>,
) -> Result<HttpResponse> {
    let oldest_first = matches!(query.sort, Some(SortOrder::Oldest));
    let (blogs, following_count) = blog_service(&pool, &config)
        .following_feed(user.id(), oldest_first)
        .await?;

    let message = if following_count == 0 {
        "You are not following anyone yet"
    } else {
        "Following blogs fetched successfully"
    };

    Ok(response::ok(
        FollowingFeedResponse {
            blogs,
            following_count,
        },
        message,
    ))
}

pub async fn update_blog(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: AuthUser,
    blog_id: web::Path<Uuid>,
    req: web::Json<UpdateBlogRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    if req.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let blog = blog_service(&pool, &config)
        .update_blog(
            &user.0,
            *blog_id,
            BlogUpdate {
                title: req.title.as_deref(),
                content: req.content.as_deref(),
                slug: req.slug.as_deref(),
                visibility: req.visibility,
                category_id: req.category,
                feature_image: req.feature_image.as_deref(),
            },
        )
        .await?;

    Ok(response::ok(blog, "Blog updated successfully"))
}

pub async fn delete_blog(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: AuthUser,
    blog_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    blog_service(&pool, &config)
        .delete_blog(&user.0, *blog_id)
        .await?;

    Ok(response::ok((), "Blog deleted successfully"))
}

pub async fn share_blog(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    viewer: MaybeUser,
    blog_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let share_count = blog_service(&pool, &config)
        .share_blog(*blog_id, viewer.id())
        .await?;

    Ok(response::ok(ShareResponse { share_count }, "Blog shared"))
}
