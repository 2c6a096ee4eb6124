/// Category service - the fixed taxonomy blogs are filed under
use sqlx::PgPool;

use crate::db::category_repo;
use crate::error::{conflict_on_unique, AppError, Result};
use crate::models::Category;
use crate::validators::{is_valid_slug, slugify_within};

/// Matches the `categories.slug` column width
pub const MAX_CATEGORY_SLUG_LEN: usize = 120;

pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(category_repo::list_categories(&self.pool).await?)
    }

    /// Create a category; the slug defaults to one derived from `name`
    pub async fn create_category(&self, name: &str, slug: Option<&str>) -> Result<Category> {
        let name = name.trim();
        let slug = match slug.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) if s.len() > MAX_CATEGORY_SLUG_LEN => {
                return Err(AppError::ValidationError(format!(
                    "Category slug must be at most {} characters",
                    MAX_CATEGORY_SLUG_LEN
                )))
            }
            Some(s) if is_valid_slug(s) => s.to_string(),
            Some(_) => {
                return Err(AppError::ValidationError(
                    "Slug may only contain lowercase letters, digits and hyphens".to_string(),
                ))
            }
            None => slugify_within(name, MAX_CATEGORY_SLUG_LEN).ok_or_else(|| {
                AppError::ValidationError("Category name must contain letters or digits".to_string())
            })?,
        };

        let category = category_repo::create_category(&self.pool, name, &slug)
            .await
            .map_err(|e| conflict_on_unique(e, "A category with this slug already exists"))?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "category created");
        Ok(category)
    }
}
