use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommenterSummary {
    #[sqlx(rename = "user_id")]
    pub id: Uuid,
    #[sqlx(rename = "commenter_username")]
    pub username: String,
    #[sqlx(rename = "commenter_first_name")]
    pub first_name: String,
    #[sqlx(rename = "commenter_last_name")]
    pub last_name: String,
    #[sqlx(rename = "commenter_profile_image")]
    pub profile_image: Option<String>,
}

/// A comment with the commenter's public summary
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    #[sqlx(flatten)]
    pub user: CommenterSummary,
}

/// One of the caller's comments with the blog it was left on
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserCommentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub blog_title: String,
    pub blog_slug: String,
}
