//! Integration Tests: Likes, Comments, Follows, Bookmarks
//!
//! Coverage:
//! - Like toggling keeps `likeCount` in step
//! - Comment add/delete maintains `commentCount`; who may delete
//! - Follow rules (self, duplicate, unknown, unfollow) and the following feed
//! - Bookmark toggling and cleanup when a blog is deleted
//! - Counters never go below zero
//! - Private blogs drop out of other readers' likes and comments

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{bearer, create_blog, create_category, send, sign_up, TestContext};
use serde_json::json;
use uuid::Uuid;

#[actix_web::test]
#[ignore = "Requires Docker for PostgreSQL container"]
async fn test_like_toggle() {
    let ctx = TestContext::start().await;
    let app = ctx.init_app().await;
    let author = sign_up(&app, "author").await;
    let fan = sign_up(&app, "fan").await;
    let category = create_category(&app, &author, "Music").await;
    let blog = create_blog(&app, &author, category, "Song", "public").await;
    let id = blog["id"].as_str().unwrap();
    let like_uri = format!("/api/v1/blogs/{}/like", id);
    let status_uri = format!("/api/v1/blogs/{}/like-status", id);

    let (status, body) = send(&app, bearer(test::TestRequest::post().uri(&like_uri), &fan.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["liked"], true);
    assert_eq!(body["data"]["likeCount"], 1);

    let (_, body) = send(&app, bearer(test::TestRequest::get().uri(&status_uri), &fan.token)).await;
    assert_eq!(body["data"]["liked"], true);

    let (_, body) = send(
        &app,
        bearer(test::TestRequest::get().uri("/api/v1/blogs/liked-posts"), &fan.token),
    )
    .await;
    assert_eq!(body["data"][0]["id"], id);

    let (_, body) = send(&app, bearer(test::TestRequest::post().uri(&like_uri), &fan.token)).await;
    assert_eq!(body["data"]["liked"], false);
    assert_eq!(body["data"]["likeCount"], 0);

    // Anonymous readers see the count only
    let (status, body) = send(&app, test::TestRequest::get().uri(&status_uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["liked"], false);

    let (status, _) = send(&app, test::TestRequest::post().uri(&like_uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        bearer(
            test::TestRequest::post().uri(&format!("/api/v1/blogs/{}/like", Uuid::new_v4())),
            &fan.token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[ignore = "Requires Docker for PostgreSQL container"]
async fn test_comments_and_counts() {
    let ctx = TestContext::start().await;
    let app = ctx.init_app().await;
    let author = sign_up(&app, "host").await;
    let guest = sign_up(&app, "guest").await;
    let other = sign_up(&app, "bystander").await;
    let category = create_category(&app, &author, "Talk").await;
    let blog = create_blog(&app, &author, category, "Discuss", "public").await;
    let comments_uri = format!("/api/v1/blogs/{}/comments", blog["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        bearer(test::TestRequest::post().uri(&comments_uri), &guest.token)
            .set_json(json!({ "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut ids = Vec::new();
    for text in ["First!", "Nice post"] {
        let (status, body) = send(
            &app,
            bearer(test::TestRequest::post().uri(&comments_uri), &guest.token)
                .set_json(json!({ "content": text })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["user"]["username"], "guest");
        ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let (_, body) = send(&app, test::TestRequest::get().uri(&comments_uri)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, test::TestRequest::get().uri("/api/v1/blogs/slug/discuss")).await;
    assert_eq!(body["data"]["commentCount"], 2);

    let (_, body) = send(
        &app,
        bearer(test::TestRequest::get().uri("/api/v1/blogs/comments"), &guest.token),
    )
    .await;
    assert_eq!(body["data"][0]["blogSlug"], "discuss");

    let delete = |id: &str| format!("/api/v1/blogs/comments/{}", id);

    let (status, _) = send(
        &app,
        bearer(test::TestRequest::delete().uri(&delete(&ids[0])), &other.token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The commenter and the blog's author may both delete
    let (status, _) = send(
        &app,
        bearer(test::TestRequest::delete().uri(&delete(&ids[0])), &guest.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        bearer(test::TestRequest::delete().uri(&delete(&ids[1])), &author.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        bearer(test::TestRequest::delete().uri(&delete(&ids[1])), &author.token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, test::TestRequest::get().uri("/api/v1/blogs/slug/discuss")).await;
    assert_eq!(body["data"]["commentCount"], 0);
}

#[actix_web::test]
#[ignore = "Requires Docker for PostgreSQL container"]
async fn test_follow_rules_and_feed() {
    let ctx = TestContext::start().await;
    let app = ctx.init_app().await;
    let author = sign_up(&app, "novelist").await;
    let reader = sign_up(&app, "bookworm").await;
    let category = create_category(&app, &author, "Fiction").await;
    create_blog(&app, &author, category, "Chapter One", "public").await;
    create_blog(&app, &author, category, "Draft Two", "private").await;

    let follow = |token: &str, author_id: serde_json::Value| {
        bearer(test::TestRequest::post().uri("/api/v1/connections/follow"), token)
            .set_json(json!({ "authorId": author_id }))
    };

    let (_, body) = send(
        &app,
        bearer(test::TestRequest::get().uri("/api/v1/blogs/following"), &reader.token),
    )
    .await;
    assert_eq!(body["data"]["followingCount"], 0);
    assert_eq!(body["message"], "You are not following anyone yet");

    let (status, body) = send(&app, follow(&reader.token, json!(reader.id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You cannot follow yourself");

    let (status, _) = send(&app, follow(&reader.token, json!(Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, follow(&reader.token, serde_json::Value::Null)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Author id is required");

    let (status, _) = send(&app, follow(&reader.token, json!(author.id))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, follow(&reader.token, json!(author.id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(
        &app,
        bearer(test::TestRequest::post().uri("/api/v1/connections/check-follow"), &reader.token)
            .set_json(json!({ "authorId": author.id })),
    )
    .await;
    assert_eq!(body["data"]["isFollowing"], true);

    let (_, body) = send(
        &app,
        bearer(test::TestRequest::get().uri("/api/v1/connections/followed-users"), &reader.token),
    )
    .await;
    assert_eq!(body["data"][0]["username"], "novelist");

    let (_, body) = send(
        &app,
        bearer(test::TestRequest::get().uri("/api/v1/blogs/following"), &reader.token),
    )
    .await;
    assert_eq!(body["data"]["followingCount"], 1);
    let blogs = body["data"]["blogs"].as_array().unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0]["slug"], "chapter-one");

    let unfollow = |token: &str| {
        bearer(test::TestRequest::post().uri("/api/v1/connections/unfollow"), token)
            .set_json(json!({ "authorId": author.id }))
    };
    let (status, _) = send(&app, unfollow(&reader.token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, unfollow(&reader.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "You are not following this user");
}

#[actix_web::test]
#[ignore = "Requires Docker for PostgreSQL container"]
async fn test_bookmarks_follow_blog_lifecycle() {
    let ctx = TestContext::start().await;
    let app = ctx.init_app().await;
    let author = sign_up(&app, "essayist").await;
    let reader = sign_up(&app, "collector").await;
    let category = create_category(&app, &author, "Essays").await;
    let first = create_blog(&app, &author, category, "Keep me", "public").await;
    let second = create_blog(&app, &author, category, "Delete me", "public").await;

    let toggle = |blog: &serde_json::Value| {
        bearer(
            test::TestRequest::post()
                .uri(&format!("/api/v1/blogs/{}/bookmark", blog["id"].as_str().unwrap())),
            &reader.token,
        )
    };

    let (_, body) = send(&app, toggle(&first)).await;
    assert_eq!(body["data"]["bookmarked"], true);
    let (_, body) = send(&app, toggle(&second)).await;
    assert_eq!(body["data"]["bookmarked"], true);

    let list = || bearer(test::TestRequest::get().uri("/api/v1/blogs/bookmarked"), &reader.token);

    // Most recently bookmarked first
    let (_, body) = send(&app, list()).await;
    let slugs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["delete-me", "keep-me"]);

    let (status, _) = send(
        &app,
        bearer(
            test::TestRequest::delete()
                .uri(&format!("/api/v1/blogs/{}", second["id"].as_str().unwrap())),
            &author.token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        bearer(test::TestRequest::get().uri("/api/v1/auth/me"), &reader.token),
    )
    .await;
    assert_eq!(body["data"]["bookmarkedBlogs"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, toggle(&first)).await;
    assert_eq!(body["data"]["bookmarked"], false);
    let (_, body) = send(&app, list()).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
#[ignore = "Requires Docker for PostgreSQL container"]
async fn test_counters_floor_at_zero() {
    let ctx = TestContext::start().await;
    let app = ctx.init_app().await;
    let author = sign_up(&app, "counter").await;
    let fan = sign_up(&app, "drifter").await;
    let category = create_category(&app, &author, "Numbers").await;
    let blog = create_blog(&app, &author, category, "Zero", "public").await;
    let id = blog["id"].as_str().unwrap();
    let blog_id: Uuid = id.parse().unwrap();
    let like_uri = format!("/api/v1/blogs/{}/like", id);
    let comments_uri = format!("/api/v1/blogs/{}/comments", id);

    let (_, body) = send(&app, bearer(test::TestRequest::post().uri(&like_uri), &fan.token)).await;
    assert_eq!(body["data"]["likeCount"], 1);
    let (_, body) = send(
        &app,
        bearer(test::TestRequest::post().uri(&comments_uri), &fan.token)
            .set_json(json!({ "content": "Counting on it" })),
    )
    .await;
    let comment_id = body["data"]["id"].as_str().unwrap().to_string();

    // Counters drifted below the rows that back them
    sqlx::query("UPDATE blogs SET like_count = 0, comment_count = 0 WHERE id = $1")
        .bind(blog_id)
        .execute(&ctx.pool)
        .await
        .unwrap();

    let (status, body) = send(&app, bearer(test::TestRequest::post().uri(&like_uri), &fan.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["liked"], false);
    assert_eq!(body["data"]["likeCount"], 0);

    let (status, _) = send(
        &app,
        bearer(
            test::TestRequest::delete().uri(&format!("/api/v1/blogs/comments/{}", comment_id)),
            &fan.token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (like_count, comment_count): (i64, i64) =
        sqlx::query_as("SELECT like_count, comment_count FROM blogs WHERE id = $1")
            .bind(blog_id)
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(like_count, 0);
    assert_eq!(comment_count, 0);
}

#[actix_web::test]
#[ignore = "Requires Docker for PostgreSQL container"]
async fn test_private_blogs_leave_reader_listings() {
    let ctx = TestContext::start().await;
    let app = ctx.init_app().await;
    let author = sign_up(&app, "recluse").await;
    let reader = sign_up(&app, "visitor").await;
    let category = create_category(&app, &author, "Diary").await;
    let blog = create_blog(&app, &author, category, "Open Page", "public").await;
    let id = blog["id"].as_str().unwrap();
    let comments_uri = format!("/api/v1/blogs/{}/comments", id);

    send(
        &app,
        bearer(test::TestRequest::post().uri(&format!("/api/v1/blogs/{}/like", id)), &reader.token),
    )
    .await;
    let (status, _) = send(
        &app,
        bearer(test::TestRequest::post().uri(&comments_uri), &reader.token)
            .set_json(json!({ "content": "Lovely" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        bearer(test::TestRequest::patch().uri(&format!("/api/v1/blogs/{}", id)), &author.token)
            .set_json(json!({ "visibility": "private" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        bearer(test::TestRequest::get().uri("/api/v1/blogs/liked-posts"), &reader.token),
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, body) = send(
        &app,
        bearer(test::TestRequest::get().uri("/api/v1/blogs/comments"), &reader.token),
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, bearer(test::TestRequest::get().uri(&comments_uri), &reader.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, test::TestRequest::get().uri(&comments_uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, bearer(test::TestRequest::get().uri(&comments_uri), &author.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Bookmarking is refused too, and leaves the reader's list unchanged
    let (status, _) = send(
        &app,
        bearer(test::TestRequest::post().uri(&format!("/api/v1/blogs/{}/bookmark", id)), &reader.token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = send(
        &app,
        bearer(test::TestRequest::get().uri("/api/v1/auth/me"), &reader.token),
    )
    .await;
    assert!(body["data"]["bookmarkedBlogs"].as_array().unwrap().is_empty());
}
