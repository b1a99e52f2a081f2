//! End-to-end moderation pipeline tests: automatic scoring at publish time,
//! report blending, and the moderator surface.

use crate::helpers::*;
use axum::http::StatusCode;
use pillory::application::report_post::use_case::ReportPostUseCase;
use pillory::domain::post::entity::Post;
use pillory::domain::report::entity::Report;
use pillory::infrastructure::moderation::{config::ModerationConfig, engine::ModerationEngine};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} to be close to {}",
        actual,
        expected
    );
}

#[tokio::test]
async fn keyword_hit_scores_high_and_post_stays_visible() {
    // Provider down, keyword table carries one term at 0.8. With the default
    // thresholds (0.5 / 0.2) a 0.8 score approves the post and does not hide
    // it: hiding only triggers on scores BELOW the critical threshold.
    let app = spawn_app_with(None, &[("zorblat", 0.8)]);
    let (token, _) = register_user(&app, "alice").await;

    let req = json_request(
        "POST",
        "/api/v1/posts",
        Some(&token),
        json!({ "content": "nothing but zorblat talk" }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::CREATED).await;
    let post: Value = read_json(res).await;

    assert_close(post["racism_score"].as_f64().unwrap(), 0.8);
    assert_eq!(post["is_approved"], json!(true));
    assert_eq!(post["is_hidden"], json!(false));
}

#[tokio::test]
async fn low_provider_score_leaves_post_unapproved_and_hidden() {
    let app = spawn_app_with(Some(0.1), &[]);
    let (token, _) = register_user(&app, "alice").await;

    let req = json_request(
        "POST",
        "/api/v1/posts",
        Some(&token),
        json!({ "content": "a perfectly mild remark" }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::CREATED).await;
    let post: Value = read_json(res).await;

    assert_close(post["racism_score"].as_f64().unwrap(), 0.1);
    assert_eq!(post["is_approved"], json!(false));
    assert_eq!(post["is_hidden"], json!(true));
}

#[tokio::test]
async fn single_racism_report_blends_score_upward() {
    // Post scored 0.4 by the provider. One racism report: ratio 1/1, so the
    // new score is 0.4 * 0.7 + 1.0 * 0.3 = 0.58.
    let app = spawn_app_with(Some(0.4), &[]);
    let (author, _) = register_user(&app, "author").await;
    let (reporter, _) = register_user(&app, "reporter").await;
    let post_id = publish_post(&app, &author, "borderline take").await;

    let req = json_request(
        "POST",
        &format!("/api/v1/posts/{}/report", post_id),
        Some(&reporter),
        json!({ "reason": "this reads as racist", "is_racism_report": true }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_close(body["racism_score"].as_f64().unwrap(), 0.58);
    assert_eq!(body["is_hidden"], json!(false));
}

#[tokio::test]
async fn non_racism_report_can_drag_score_below_critical() {
    // Post at 0.25. A single non-racism report gives ratio 0, so the score
    // decays to 0.25 * 0.7 = 0.175, which is below the 0.2 critical
    // threshold and hides the post.
    let app = spawn_app_with(Some(0.25), &[]);
    let (author, _) = register_user(&app, "author").await;
    let (reporter, _) = register_user(&app, "reporter").await;
    let post_id = publish_post(&app, &author, "some spam").await;

    let req = json_request(
        "POST",
        &format!("/api/v1/posts/{}/report", post_id),
        Some(&reporter),
        json!({ "reason": "off topic spam" }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_close(body["racism_score"].as_f64().unwrap(), 0.175);
    assert_eq!(body["is_hidden"], json!(true));
}

#[tokio::test]
async fn report_on_unknown_post_is_404() {
    let app = spawn_app();
    let (token, _) = register_user(&app, "reporter").await;

    let req = json_request(
        "POST",
        &format!("/api/v1/posts/{}/report", Uuid::now_v7()),
        Some(&token),
        json!({ "reason": "whatever" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::NOT_FOUND).await;
}

fn rescore_fixture(app: &TestApp) -> ReportPostUseCase {
    let engine = Arc::new(ModerationEngine::new(
        Arc::new(StubProvider(None)),
        ModerationConfig::default(),
    ));
    ReportPostUseCase::new(
        Arc::new(InMemoryPosts(app.store.clone())),
        Arc::new(InMemoryReports(app.store.clone())),
        engine,
    )
}

#[tokio::test]
async fn recalculation_blends_full_tallies_in_one_pass() {
    // 0.4 * 0.7 + (2/3) * 0.3 = 0.48 when all three reports are already on
    // file and the score is re-blended once.
    let app = spawn_app();
    let mut post = Post::pending(Uuid::now_v7(), "already reported".to_string());
    post.racism_score = 0.4;
    app.store.posts.lock().unwrap().push(post.clone());
    {
        let mut reports = app.store.reports.lock().unwrap();
        reports.push(Report::new(post.id, Uuid::now_v7(), "r1".into(), true));
        reports.push(Report::new(post.id, Uuid::now_v7(), "r2".into(), true));
        reports.push(Report::new(post.id, Uuid::now_v7(), "r3".into(), false));
    }

    let use_case = rescore_fixture(&app);
    let rescored = use_case.recalculate(&post).await.unwrap();

    assert_close(rescored.racism_score, 0.48);
    assert!(!rescored.is_hidden);
}

#[tokio::test]
async fn recalculation_with_no_reports_changes_nothing() {
    let app = spawn_app();
    let mut post = Post::pending(Uuid::now_v7(), "unreported".to_string());
    post.racism_score = 0.37;
    app.store.posts.lock().unwrap().push(post.clone());

    let use_case = rescore_fixture(&app);
    let first = use_case.recalculate(&post).await.unwrap();
    let second = use_case.recalculate(&first).await.unwrap();

    assert_eq!(first.racism_score, 0.37);
    assert_eq!(second.racism_score, 0.37);
    let stored = app.store.posts.lock().unwrap()[0].clone();
    assert_eq!(stored.racism_score, 0.37);
    assert_eq!(stored.updated_at, post.updated_at);
}

// --- Moderator surface ---

#[tokio::test]
async fn moderation_surface_requires_a_moderator_token() {
    let app = spawn_app();
    let (user_token, _) = register_user(&app, "civilian").await;

    let res = send(&app.app, get_request("/api/v1/admin/posts", None)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send(&app.app, get_request("/api/v1/admin/posts", Some(&user_token))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn pending_queue_lists_unapproved_posts() {
    let app = spawn_app(); // provider down, no terms: every post scores 0.0, unapproved
    let (author, _) = register_user(&app, "author").await;
    let post_id = publish_post(&app, &author, "awaiting review").await;

    let (mod_token, _) =
        register_with_role(&app, "mod", pillory::domain::user::entity::Role::Moderator).await;

    let res = expect_status(
        send(&app.app, get_request("/api/v1/admin/posts", Some(&mod_token))).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["items"][0]["id"], json!(post_id.to_string()));

    let res = send(
        &app.app,
        get_request("/api/v1/admin/posts?queue=nonsense", Some(&mod_token)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approve_then_hide_then_unhide_walks_the_queues() {
    let app = spawn_app();
    let (author, author_id) = register_user(&app, "author").await;
    let post_id = publish_post(&app, &author, "queued post").await;
    let (mod_token, mod_id) =
        register_with_role(&app, "mod", pillory::domain::user::entity::Role::Moderator).await;

    let approve = json_request(
        "POST",
        &format!("/api/v1/admin/posts/{}/approve", post_id),
        Some(&mod_token),
        json!({}),
    );
    let res = expect_status(send(&app.app, approve).await, StatusCode::OK).await;
    let post: Value = read_json(res).await;
    assert_eq!(post["is_approved"], json!(true));

    let hide = json_request(
        "POST",
        &format!("/api/v1/admin/posts/{}/hide", post_id),
        Some(&mod_token),
        json!({}),
    );
    let res = expect_status(send(&app.app, hide).await, StatusCode::OK).await;
    let post: Value = read_json(res).await;
    assert_eq!(post["is_hidden"], json!(true));

    let res = expect_status(
        send(
            &app.app,
            get_request("/api/v1/admin/posts?queue=hidden", Some(&mod_token)),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["total"], json!(1));

    let unhide = json_request(
        "POST",
        &format!("/api/v1/admin/posts/{}/unhide", post_id),
        Some(&mod_token),
        json!({}),
    );
    let res = expect_status(send(&app.app, unhide).await, StatusCode::OK).await;
    let post: Value = read_json(res).await;
    assert_eq!(post["is_hidden"], json!(false));

    // Every action lands in the audit trail against the acting moderator.
    let entries = app.store.audit_entries.lock().unwrap().clone();
    let actions: Vec<&str> = entries.iter().map(|(_, a, _)| a.as_str()).collect();
    assert_eq!(actions, vec!["approved", "hidden", "unhidden"]);
    assert!(entries.iter().all(|(admin, _, pid)| *admin == mod_id && *pid == Some(post_id)));

    // The author was told about each decision.
    let notifications = app.store.notifications.lock().unwrap();
    let kinds: Vec<&str> = notifications
        .iter()
        .filter(|n| n.user_id == author_id)
        .map(|n| n.kind.as_str())
        .collect();
    assert_eq!(kinds, vec!["post_moderated"; 3]);
}

#[tokio::test]
async fn first_admin_edit_preserves_the_original_text_forever() {
    let app = spawn_app();
    let (author, _) = register_user(&app, "author").await;
    let post_id = publish_post(&app, &author, "hello").await;
    let (mod_token, mod_id) =
        register_with_role(&app, "mod", pillory::domain::user::entity::Role::Moderator).await;

    let edit = json_request(
        "PATCH",
        &format!("/api/v1/admin/posts/{}", post_id),
        Some(&mod_token),
        json!({ "content": "goodbye" }),
    );
    let res = expect_status(send(&app.app, edit).await, StatusCode::OK).await;
    let post: Value = read_json(res).await;
    assert_eq!(post["content"], json!("goodbye"));
    assert_eq!(post["original_content"], json!("hello"));
    assert_eq!(post["edited_by_admin"], json!(true));
    assert_eq!(post["admin_editor_id"], json!(mod_id.to_string()));

    // A second edit must not clobber the preserved original.
    let edit = json_request(
        "PATCH",
        &format!("/api/v1/admin/posts/{}", post_id),
        Some(&mod_token),
        json!({ "content": "farewell" }),
    );
    let res = expect_status(send(&app.app, edit).await, StatusCode::OK).await;
    let post: Value = read_json(res).await;
    assert_eq!(post["content"], json!("farewell"));
    assert_eq!(post["original_content"], json!("hello"));
}

#[tokio::test]
async fn admin_edit_rejects_oversized_content() {
    let app = spawn_app();
    let (author, _) = register_user(&app, "author").await;
    let post_id = publish_post(&app, &author, "fine").await;
    let (mod_token, _) =
        register_with_role(&app, "mod", pillory::domain::user::entity::Role::Moderator).await;

    let edit = json_request(
        "PATCH",
        &format!("/api/v1/admin/posts/{}", post_id),
        Some(&mod_token),
        json!({ "content": "x".repeat(281) }),
    );
    expect_status(send(&app.app, edit).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn delete_removes_the_post_and_its_reports() {
    let app = spawn_app();
    let (author, _) = register_user(&app, "author").await;
    let (reporter, _) = register_user(&app, "reporter").await;
    let post_id = publish_post(&app, &author, "doomed").await;

    let report = json_request(
        "POST",
        &format!("/api/v1/posts/{}/report", post_id),
        Some(&reporter),
        json!({ "reason": "awful", "is_racism_report": true }),
    );
    expect_status(send(&app.app, report).await, StatusCode::OK).await;

    let (mod_token, _) =
        register_with_role(&app, "mod", pillory::domain::user::entity::Role::Moderator).await;
    let delete = json_request(
        "DELETE",
        &format!("/api/v1/admin/posts/{}", post_id),
        Some(&mod_token),
        json!({}),
    );
    expect_status(send(&app.app, delete).await, StatusCode::NO_CONTENT).await;

    let res = send(
        &app.app,
        get_request(&format!("/api/v1/admin/posts/{}", post_id), Some(&mod_token)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(app.store.reports.lock().unwrap().is_empty());
}

#[tokio::test]
async fn post_detail_bundles_reports_with_reporter_names() {
    let app = spawn_app();
    let (author, _) = register_user(&app, "author").await;
    let (reporter, _) = register_user(&app, "watchdog").await;
    let post_id = publish_post(&app, &author, "contested").await;

    let report = json_request(
        "POST",
        &format!("/api/v1/posts/{}/report", post_id),
        Some(&reporter),
        json!({ "reason": "flagging this", "is_racism_report": true }),
    );
    expect_status(send(&app.app, report).await, StatusCode::OK).await;

    let (mod_token, _) =
        register_with_role(&app, "mod", pillory::domain::user::entity::Role::Moderator).await;
    let res = expect_status(
        send(
            &app.app,
            get_request(&format!("/api/v1/admin/posts/{}", post_id), Some(&mod_token)),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["post"]["id"], json!(post_id.to_string()));
    assert_eq!(body["reports"][0]["reporter_username"], json!("watchdog"));
    assert_eq!(body["reports"][0]["is_racism_report"], json!(true));
}

#[tokio::test]
async fn role_changes_are_admin_only() {
    let app = spawn_app();
    register_user(&app, "target").await;
    let (mod_token, _) =
        register_with_role(&app, "mod", pillory::domain::user::entity::Role::Moderator).await;
    let (admin_token, _) =
        register_with_role(&app, "boss", pillory::domain::user::entity::Role::Admin).await;

    // A moderator clears the route guard but not the admin check.
    let req = json_request(
        "PUT",
        "/api/v1/admin/users/target/role",
        Some(&mod_token),
        json!({ "role": "moderator" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::FORBIDDEN).await;

    let req = json_request(
        "PUT",
        "/api/v1/admin/users/target/role",
        Some(&admin_token),
        json!({ "role": "overlord" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;

    let req = json_request(
        "PUT",
        "/api/v1/admin/users/target/role",
        Some(&admin_token),
        json!({ "role": "moderator" }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["role"], json!("MODERATOR"));

    let req = json_request(
        "PUT",
        "/api/v1/admin/users/ghost/role",
        Some(&admin_token),
        json!({ "role": "user" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::NOT_FOUND).await;
}
