//! Account, feed, profile, leaderboard, and health tests.

use crate::helpers::*;
use axum::http::StatusCode;
use pillory::domain::user::entity::Role;
use serde_json::{Value, json};

// --- Accounts ---

#[tokio::test]
async fn registration_issues_a_usable_token() {
    let app = spawn_app();
    let (token, user_id) = register_user(&app, "alice").await;

    let res = expect_status(
        send(&app.app, get_request("/api/v1/auth/me", Some(&token))).await,
        StatusCode::OK,
    )
    .await;
    let me: Value = read_json(res).await;
    assert_eq!(me["id"], json!(user_id.to_string()));
    assert_eq!(me["username"], json!("alice"));
    assert_eq!(me["role"], json!("USER"));
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let app = spawn_app();
    register_user(&app, "alice").await;

    let req = json_request(
        "POST",
        "/api/v1/auth/register",
        None,
        json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "StrongTestPass123!",
        }),
    );
    expect_status(send(&app.app, req).await, StatusCode::CONFLICT).await;
}

#[tokio::test]
async fn registration_validates_username_and_password() {
    let app = spawn_app();

    let req = json_request(
        "POST",
        "/api/v1/auth/register",
        None,
        json!({ "username": "a!", "email": "a@example.com", "password": "StrongTestPass123!" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;

    let req = json_request(
        "POST",
        "/api/v1/auth/register",
        None,
        json!({ "username": "valid_name", "email": "a@example.com", "password": "short" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;

    let req = json_request(
        "POST",
        "/api/v1/auth/register",
        None,
        json!({ "username": "valid_name", "email": "not-an-email", "password": "StrongTestPass123!" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let app = spawn_app();
    register_user(&app, "alice").await;

    let req = json_request(
        "POST",
        "/api/v1/auth/login",
        None,
        json!({ "email": "alice@example.com", "password": "not-the-password" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::UNAUTHORIZED).await;
}

// --- Publishing and the feed ---

#[tokio::test]
async fn publishing_requires_authentication() {
    let app = spawn_app();
    let req = json_request("POST", "/api/v1/posts", None, json!({ "content": "hi" }));
    expect_status(send(&app.app, req).await, StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
async fn content_length_is_enforced() {
    let app = spawn_app();
    let (token, _) = register_user(&app, "alice").await;

    let req = json_request("POST", "/api/v1/posts", Some(&token), json!({ "content": "   " }));
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;

    let req = json_request(
        "POST",
        "/api/v1/posts",
        Some(&token),
        json!({ "content": "x".repeat(281) }),
    );
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;

    let req = json_request(
        "POST",
        "/api/v1/posts",
        Some(&token),
        json!({ "content": "x".repeat(280) }),
    );
    expect_status(send(&app.app, req).await, StatusCode::CREATED).await;
}

#[tokio::test]
async fn anonymous_feed_shows_only_public_posts() {
    // High provider score: published posts are approved and visible.
    let app = spawn_app_with(Some(0.8), &[]);
    let (alice, _) = register_user(&app, "alice").await;
    publish_post(&app, &alice, "public one").await;
    let hidden_id = publish_post(&app, &alice, "soon hidden").await;

    // Flip one post to hidden directly.
    app.store
        .posts
        .lock()
        .unwrap()
        .iter_mut()
        .find(|p| p.id == hidden_id)
        .unwrap()
        .is_hidden = true;

    let res = expect_status(
        send(&app.app, get_request("/api/v1/posts", None)).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["items"][0]["content"], json!("public one"));
    assert_eq!(body["items"][0]["author_username"], json!("alice"));
}

#[tokio::test]
async fn authors_see_their_own_non_public_posts_in_the_feed() {
    let app = spawn_app(); // every post lands unapproved
    let (alice, _) = register_user(&app, "alice").await;
    let (bob, _) = register_user(&app, "bob").await;
    publish_post(&app, &alice, "mine, pending").await;

    let res = expect_status(
        send(&app.app, get_request("/api/v1/posts", Some(&alice))).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["total"], json!(1));

    let res = expect_status(
        send(&app.app, get_request("/api/v1/posts", Some(&bob))).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["total"], json!(0));

    let (mod_token, _) = register_with_role(&app, "mod", Role::Moderator).await;
    let res = expect_status(
        send(&app.app, get_request("/api/v1/posts", Some(&mod_token))).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["total"], json!(1));
}

#[tokio::test]
async fn single_post_fetch_respects_visibility() {
    let app = spawn_app();
    let (alice, _) = register_user(&app, "alice").await;
    let post_id = publish_post(&app, &alice, "pending post").await;
    let uri = format!("/api/v1/posts/{}", post_id);

    let res = send(&app.app, get_request(&uri, None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = expect_status(
        send(&app.app, get_request(&uri, Some(&alice))).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["id"], json!(post_id.to_string()));
}

#[tokio::test]
async fn feed_pagination_clamps_and_offsets() {
    let app = spawn_app_with(Some(0.8), &[]);
    let (alice, _) = register_user(&app, "alice").await;
    for i in 0..3 {
        publish_post(&app, &alice, &format!("post {}", i)).await;
    }

    let res = expect_status(
        send(&app.app, get_request("/api/v1/posts?limit=2&offset=2", None)).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["limit"], json!(2));
    assert_eq!(body["offset"], json!(2));
}

// --- Leaderboard ---

#[tokio::test]
async fn leaderboard_ranks_flagged_authors_only() {
    let app = spawn_app_with(Some(0.6), &[]);
    let (alice, _) = register_user(&app, "alice").await;
    publish_post(&app, &alice, "one").await;
    publish_post(&app, &alice, "two").await;

    let (bob, _) = register_user(&app, "bob").await;
    publish_post(&app, &bob, "three").await;

    // Carol's only post scores zero, which keeps her off the board entirely.
    let (carol, carol_id) = register_user(&app, "carol").await;
    publish_post(&app, &carol, "four").await;
    app.store
        .posts
        .lock()
        .unwrap()
        .iter_mut()
        .filter(|p| p.user_id == carol_id)
        .for_each(|p| p.racism_score = 0.0);

    let res = expect_status(
        send(&app.app, get_request("/api/v1/leaderboard", None)).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["items"][0]["username"], json!("alice"));
    assert!(
        (body["items"][0]["total_racism_score"].as_f64().unwrap() - 1.2).abs() < 1e-9
    );
    assert_eq!(body["items"][0]["flagged_posts_count"], json!(2));
    assert_eq!(body["items"][1]["username"], json!("bob"));

    // Ascending by count puts bob first; unknown sort values just fall back.
    let res = expect_status(
        send(
            &app.app,
            get_request("/api/v1/leaderboard?sort=count&direction=asc", None),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["items"][0]["username"], json!("bob"));

    let res = send(
        &app.app,
        get_request("/api/v1/leaderboard?sort=sideways&direction=up", None),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

// --- Profiles ---

#[tokio::test]
async fn profile_aggregates_author_stats() {
    let app = spawn_app_with(Some(0.6), &[]);
    let (alice, _) = register_user(&app, "alice").await;
    let (bob, _) = register_user(&app, "bob").await;
    let p1 = publish_post(&app, &alice, "first").await;
    publish_post(&app, &alice, "second").await;

    let like = json_request("POST", &format!("/api/v1/posts/{}/like", p1), Some(&bob), json!({}));
    expect_status(send(&app.app, like).await, StatusCode::OK).await;
    let view = json_request("POST", &format!("/api/v1/posts/{}/view", p1), None, json!({}));
    expect_status(send(&app.app, view).await, StatusCode::OK).await;

    let res = expect_status(
        send(&app.app, get_request("/api/v1/profiles/alice", None)).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["username"], json!("alice"));
    assert!((body["stats"]["cumulative_racism_score"].as_f64().unwrap() - 1.2).abs() < 1e-9);
    assert_eq!(body["stats"]["flagged_posts_count"], json!(2));
    assert_eq!(body["stats"]["total_likes_received"], json!(1));
    assert_eq!(body["stats"]["total_views"], json!(1));
    assert_eq!(body["stats"]["posts_count"], json!(2));
    assert_eq!(body["recent_posts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn profile_hides_non_public_posts_from_strangers() {
    let app = spawn_app(); // unapproved posts
    let (alice, _) = register_user(&app, "alice").await;
    publish_post(&app, &alice, "pending").await;

    let res = expect_status(
        send(&app.app, get_request("/api/v1/profiles/alice", None)).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["recent_posts"].as_array().unwrap().len(), 0);
    // Stats still count every post, visible or not.
    assert_eq!(body["stats"]["posts_count"], json!(1));

    let res = expect_status(
        send(&app.app, get_request("/api/v1/profiles/alice", Some(&alice))).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["recent_posts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_profile_is_404() {
    let app = spawn_app();
    let res = send(&app.app, get_request("/api/v1/profiles/nobody", None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// --- Health ---

#[tokio::test]
async fn health_reports_the_storage_state() {
    let app = spawn_app();
    let res = expect_status(
        send(&app.app, get_request("/health", None)).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["database"], json!("up"));
    assert_eq!(body["service"], json!("pillory"));
}
