/// HTTP request handlers for blog-service
///
/// - `auth`: sign-up, login, session and password endpoints
/// - `blogs`: publishing, listing, reading and sharing
/// - `categories`, `likes`, `comments`, `follows`, `bookmarks`
///
/// [`configure_routes`] mounts everything under `/api/v1`.
pub mod auth;
pub mod blogs;
pub mod bookmarks;
pub mod categories;
pub mod comments;
pub mod follows;
pub mod likes;

use actix_web::web;

use crate::error::AppError;

/// Mount the API routes and extractor error handlers.
///
/// Literal blog sub-paths are registered before `/{blogId}` so they are
/// never captured as ids.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query parameters: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::NotFound(format!("Invalid resource id: {}", err)).into()
    }))
    .service(
        web::scope("/api/v1")
            .service(
                web::scope("/auth")
                    .route("/sign-up", web::post().to(auth::sign_up))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me))
                    .route("/log-out", web::get().to(auth::log_out))
                    .route("/refresh-token", web::post().to(auth::refresh_token))
                    .route("/change-password", web::post().to(auth::change_password)),
            )
            .service(
                web::scope("/blogs")
                    .route("", web::get().to(blogs::list_blogs))
                    .route("/", web::get().to(blogs::list_blogs))
                    .route("/create", web::post().to(blogs::create_blog))
                    .route("/categories", web::get().to(categories::list_categories))
                    .route("/category", web::post().to(categories::create_category))
                    .route("/slug/{slug}", web::get().to(blogs::get_blog_by_slug))
                    .route("/user-blogs", web::get().to(blogs::user_blogs))
                    .route("/following", web::get().to(blogs::following_blogs))
                    .route("/liked-posts", web::get().to(likes::liked_posts))
                    .route("/bookmarked", web::get().to(bookmarks::bookmarked_blogs))
                    .route("/comments", web::get().to(comments::my_comments))
                    .route(
                        "/comments/{commentId}",
                        web::delete().to(comments::delete_comment),
                    )
                    .route("/{blogId}/like", web::post().to(likes::toggle_like))
                    .route("/{blogId}/like-status", web::get().to(likes::like_status))
                    .service(
                        web::resource("/{blogId}/comments")
                            .route(web::get().to(comments::list_comments))
                            .route(web::post().to(comments::add_comment)),
                    )
                    .route("/{blogId}/bookmark", web::post().to(bookmarks::toggle_bookmark))
                    .route("/{blogId}/share", web::post().to(blogs::share_blog))
                    .service(
                        web::resource("/{blogId}")
                            .route(web::patch().to(blogs::update_blog))
                            .route(web::delete().to(blogs::delete_blog)),
                    ),
            )
            .service(
                web::scope("/connections")
                    .route("/follow", web::post().to(follows::follow))
                    .route("/unfollow", web::post().to(follows::unfollow))
                    .route("/followed-users", web::get().to(follows::followed_users))
                    .route("/check-follow", web::post().to(follows::check_follow)),
            ),
    );
}
