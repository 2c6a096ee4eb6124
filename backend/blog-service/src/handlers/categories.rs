/// Category handlers
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::response;
use crate::services::CategoryService;
use crate::validators::validate_not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(
        length(max = 100, message = "Category name must be at most 100 characters"),
        custom(function = "validate_not_blank", message = "Category name is required")
    )]
    pub name: String,
    pub slug: Option<String>,
}

pub async fn list_categories(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let categories = CategoryService::new((**pool).clone())
        .list_categories()
        .await?;

    Ok(response::ok(categories, "Categories fetched successfully"))
}

pub async fn create_category(
    pool: web::Data<PgPool>,
    _user: AuthUser,
    req: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let category = CategoryService::new((**pool).clone())
        .create_category(&req.name, req.slug.as_deref())
        .await?;

    Ok(response::created(category, "Category created successfully"))
}
