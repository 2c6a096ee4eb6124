/// Business logic layer for blog-service
///
/// - Auth: sign-up, login, refresh and password changes
/// - Blogs: publishing, listing, ranking, reads and shares
/// - Engagement: likes, comments, follows and bookmarks
pub mod auth;
pub mod blogs;
pub mod bookmarks;
pub mod categories;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod ranking;

// Re-export commonly used services
pub use auth::{AuthService, Registration};
pub use blogs::{BlogDraft, BlogService, BlogUpdate};
pub use bookmarks::BookmarkService;
pub use categories::CategoryService;
pub use comments::CommentService;
pub use follows::FollowService;
pub use likes::LikeService;
