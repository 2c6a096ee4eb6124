use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Orderings accepted by the blog listing endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Latest,
    Oldest,
    Popular,
    Trending,
    Smart,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub feature_image: Option<String>,
    pub slug: String,
    pub visibility: String,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub like_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
    pub read_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private.as_str()
    }

    /// Private blogs are visible to their author only
    pub fn visible_to(&self, viewer: Option<Uuid>) -> bool {
        !self.is_private() || viewer == Some(self.author_id)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    #[sqlx(rename = "author_id")]
    pub id: Uuid,
    #[sqlx(rename = "author_username")]
    pub username: String,
    #[sqlx(rename = "author_first_name")]
    pub first_name: String,
    #[sqlx(rename = "author_last_name")]
    pub last_name: String,
    #[sqlx(rename = "author_profile_image")]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    #[sqlx(rename = "category_id")]
    pub id: Uuid,
    #[sqlx(rename = "category_name")]
    pub name: String,
    #[sqlx(rename = "category_slug")]
    pub slug: String,
}

/// A blog joined with its author and category
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub blog: Blog,
    #[sqlx(flatten)]
    pub author: AuthorSummary,
    #[sqlx(flatten)]
    pub category: CategorySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPage {
    pub blogs: Vec<BlogView>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}
