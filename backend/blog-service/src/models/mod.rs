/// Data models for blog-service
///
/// Row types map one-to-one onto tables; `*View` types join in the author,
/// category or blog summaries that API responses carry.
pub mod blog;
pub mod category;
pub mod comment;
pub mod follow;
pub mod like;
pub mod user;

pub use blog::{AuthorSummary, Blog, BlogPage, BlogView, CategorySummary, SortOrder, Visibility};
pub use category::Category;
pub use comment::{Comment, CommentView, CommenterSummary, UserCommentView};
pub use follow::Follow;
pub use like::{Like, LikeStatus};
pub use user::{PublicProfile, Role, User, UserProfile};
