/// Database access layer
///
/// Free-function repositories over `sqlx`. Functions that take part in
/// multi-statement mutations are generic over [`sqlx::PgExecutor`] so the
/// services can run them inside a transaction.
pub mod blog_repo;
pub mod bookmark_repo;
pub mod category_repo;
pub mod comment_repo;
pub mod follow_repo;
pub mod like_repo;
pub mod user_repo;
