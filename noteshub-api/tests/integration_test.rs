/// Integration tests for the NotesHub API
///
/// These tests verify the full system works end-to-end:
/// - Registration with tenant auto-provisioning
/// - Login and enumeration resistance
/// - Tenant isolation for notes
/// - Member/admin note visibility
/// - Free-plan quota enforcement and the upgrade flow
///
/// Requires `TEST_DATABASE_URL`; each test skips itself when unset.

mod common;

use axum::http::StatusCode;
use common::unique_domain;
use serde_json::json;
use uuid::Uuid;

fn user_id(body: &serde_json::Value) -> Uuid {
    Uuid::parse_str(body["user"]["id"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut ctx = require_test_db!();

    let (status, body) = ctx.request("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_register_provisions_tenant() {
    let mut ctx = require_test_db!();
    let domain = unique_domain();
    let slug = domain.split('.').next().unwrap().to_string();

    let (token, body) = ctx
        .register(&format!("alice@{}", domain), "secret1")
        .await;

    // Self-registered users are members and never leak their hash
    assert_eq!(body["user"]["role"], "member");
    assert!(body["user"].get("password_hash").is_none());

    let (status, tenant) = ctx
        .request("GET", "/api/user/tenant", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tenant["slug"], slug.as_str());
    assert_eq!(tenant["plan"], "free");
    assert_eq!(tenant["max_notes"], 3);

    ctx.cleanup_tenant(&slug).await;
}

#[tokio::test]
async fn test_register_same_domain_reuses_tenant() {
    let mut ctx = require_test_db!();
    let domain = unique_domain();
    let slug = domain.split('.').next().unwrap().to_string();

    let (_, first) = ctx.register(&format!("a@{}", domain), "secret1").await;
    let (_, second) = ctx.register(&format!("b@{}", domain), "secret1").await;

    assert_eq!(first["user"]["tenant_id"], second["user"]["tenant_id"]);

    ctx.cleanup_tenant(&slug).await;
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let mut ctx = require_test_db!();
    let domain = unique_domain();
    let slug = domain.split('.').next().unwrap().to_string();
    let email = format!("dup@{}", domain);

    ctx.register(&email, "secret1").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({ "email": email, "password": "secret1" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");

    ctx.cleanup_tenant(&slug).await;
}

#[tokio::test]
async fn test_register_validation() {
    let mut ctx = require_test_db!();

    // Malformed email
    let (status, _) = ctx
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Too-short password reports the failing field
    let (status, body) = ctx
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({ "email": format!("x@{}", unique_domain()), "password": "abc" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "password");
}

#[tokio::test]
async fn test_login_enumeration_resistance() {
    let mut ctx = require_test_db!();
    let domain = unique_domain();
    let slug = domain.split('.').next().unwrap().to_string();
    let email = format!("carol@{}", domain);

    ctx.register(&email, "secret1").await;

    let (wrong_pw_status, wrong_pw_body) = ctx
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({ "email": email, "password": "wrong" })),
        )
        .await;

    let (no_user_status, no_user_body) = ctx
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({ "email": format!("nobody@{}", domain), "password": "secret1" })),
        )
        .await;

    // Identical response either way, so accounts cannot be enumerated
    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_user_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, no_user_body);

    ctx.cleanup_tenant(&slug).await;
}

#[tokio::test]
async fn test_login_returns_working_token() {
    let mut ctx = require_test_db!();
    let domain = unique_domain();
    let slug = domain.split('.').next().unwrap().to_string();
    let email = format!("dave@{}", domain);

    ctx.register(&email, "secret1").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({ "email": email, "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap().to_string();
    let (status, principal) = ctx.request("GET", "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(principal["email"], email);

    ctx.cleanup_tenant(&slug).await;
}

#[tokio::test]
async fn test_missing_and_garbage_tokens_rejected() {
    let mut ctx = require_test_db!();

    let (status, _) = ctx.request("GET", "/api/notes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request("GET", "/api/notes", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_note_crud() {
    let mut ctx = require_test_db!();
    let domain = unique_domain();
    let slug = domain.split('.').next().unwrap().to_string();
    let email = format!("erin@{}", domain);

    let (token, _) = ctx.register(&email, "secret1").await;

    // Create
    let (status, note) = ctx
        .request(
            "POST",
            "/api/notes",
            Some(&token),
            Some(json!({ "title": "First", "content": "hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["title"], "First");
    assert_eq!(note["author_email"], email);
    let note_id = note["id"].as_str().unwrap().to_string();

    // Read
    let (status, fetched) = ctx
        .request("GET", &format!("/api/notes/{}", note_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], note["id"]);

    // Update title only; content is preserved
    let (status, updated) = ctx
        .request(
            "PUT",
            &format!("/api/notes/{}", note_id),
            Some(&token),
            Some(json!({ "title": "Renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["content"], "hello");

    // List
    let (status, notes) = ctx.request("GET", "/api/notes", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notes.as_array().unwrap().len(), 1);

    // Delete
    let (status, body) = ctx
        .request(
            "DELETE",
            &format!("/api/notes/{}", note_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Note deleted successfully");

    // Gone
    let (status, _) = ctx
        .request("GET", &format!("/api/notes/{}", note_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup_tenant(&slug).await;
}

#[tokio::test]
async fn test_cross_tenant_notes_are_invisible() {
    let mut ctx = require_test_db!();
    let domain_a = unique_domain();
    let domain_b = unique_domain();
    let slug_a = domain_a.split('.').next().unwrap().to_string();
    let slug_b = domain_b.split('.').next().unwrap().to_string();

    let (token_a, _) = ctx.register(&format!("a@{}", domain_a), "secret1").await;
    let (token_b, _) = ctx.register(&format!("b@{}", domain_b), "secret1").await;

    let (_, note) = ctx
        .request(
            "POST",
            "/api/notes",
            Some(&token_a),
            Some(json!({ "title": "private", "content": "tenant A only" })),
        )
        .await;
    let note_id = note["id"].as_str().unwrap().to_string();

    // Another tenant sees 404, not 403: the note's existence is not leaked
    let (status, _) = ctx
        .request(
            "GET",
            &format!("/api/notes/{}", note_id),
            Some(&token_b),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/notes/{}", note_id),
            Some(&token_b),
            Some(json!({ "title": "stolen" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/api/notes/{}", note_id),
            Some(&token_b),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Still intact for its owner
    let (status, _) = ctx
        .request(
            "GET",
            &format!("/api/notes/{}", note_id),
            Some(&token_a),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup_tenant(&slug_a).await;
    ctx.cleanup_tenant(&slug_b).await;
}

#[tokio::test]
async fn test_member_sees_own_notes_admin_sees_all() {
    let mut ctx = require_test_db!();
    let domain = unique_domain();
    let slug = domain.split('.').next().unwrap().to_string();

    let (admin_token, admin_body) = ctx.register(&format!("boss@{}", domain), "secret1").await;
    ctx.promote_to_admin(user_id(&admin_body)).await;
    let (member_a, _) = ctx.register(&format!("a@{}", domain), "secret1").await;
    let (member_b, _) = ctx.register(&format!("b@{}", domain), "secret1").await;

    let (_, note_a) = ctx
        .request(
            "POST",
            "/api/notes",
            Some(&member_a),
            Some(json!({ "title": "a's note", "content": "x" })),
        )
        .await;
    ctx.request(
        "POST",
        "/api/notes",
        Some(&member_b),
        Some(json!({ "title": "b's note", "content": "y" })),
    )
    .await;

    // Members list only their own notes
    let (_, notes) = ctx.request("GET", "/api/notes", Some(&member_a), None).await;
    assert_eq!(notes.as_array().unwrap().len(), 1);
    assert_eq!(notes[0]["title"], "a's note");

    // Admin lists the whole tenant
    let (_, notes) = ctx
        .request("GET", "/api/notes", Some(&admin_token), None)
        .await;
    assert_eq!(notes.as_array().unwrap().len(), 2);

    // A member fetching another member's note is refused, not hidden
    let note_a_id = note_a["id"].as_str().unwrap();
    let (status, _) = ctx
        .request(
            "GET",
            &format!("/api/notes/{}", note_a_id),
            Some(&member_b),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The admin can fetch it
    let (status, _) = ctx
        .request(
            "GET",
            &format!("/api/notes/{}", note_a_id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup_tenant(&slug).await;
}

#[tokio::test]
async fn test_quota_and_upgrade_flow() {
    let mut ctx = require_test_db!();
    let domain = unique_domain();
    let slug = domain.split('.').next().unwrap().to_string();

    let (token, body) = ctx.register(&format!("admin@{}", domain), "secret1").await;
    ctx.promote_to_admin(user_id(&body)).await;

    // Free plan allows exactly three notes
    for i in 0..3 {
        let (status, _) = ctx
            .request(
                "POST",
                "/api/notes",
                Some(&token),
                Some(json!({ "title": format!("note {}", i), "content": "body" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = ctx
        .request(
            "POST",
            "/api/notes",
            Some(&token),
            Some(json!({ "title": "one too many", "content": "body" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Upgrade to Pro"));

    // Upgrade unlocks unlimited notes
    let (status, tenant) = ctx
        .request(
            "POST",
            &format!("/api/tenants/{}/upgrade", slug),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tenant["plan"], "pro");
    assert_eq!(tenant["max_notes"], -1);

    let (status, _) = ctx
        .request(
            "POST",
            "/api/notes",
            Some(&token),
            Some(json!({ "title": "fourth", "content": "body" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Upgrade is idempotent
    let (status, tenant) = ctx
        .request(
            "POST",
            &format!("/api/tenants/{}/upgrade", slug),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tenant["plan"], "pro");

    ctx.cleanup_tenant(&slug).await;
}

#[tokio::test]
async fn test_member_cannot_upgrade() {
    let mut ctx = require_test_db!();
    let domain = unique_domain();
    let slug = domain.split('.').next().unwrap().to_string();

    let (token, _) = ctx.register(&format!("pleb@{}", domain), "secret1").await;

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/api/tenants/{}/upgrade", slug),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    ctx.cleanup_tenant(&slug).await;
}

#[tokio::test]
async fn test_admin_cannot_upgrade_other_tenant() {
    let mut ctx = require_test_db!();
    let domain_a = unique_domain();
    let domain_b = unique_domain();
    let slug_a = domain_a.split('.').next().unwrap().to_string();
    let slug_b = domain_b.split('.').next().unwrap().to_string();

    let (token_a, body_a) = ctx.register(&format!("boss@{}", domain_a), "secret1").await;
    ctx.promote_to_admin(user_id(&body_a)).await;
    ctx.register(&format!("x@{}", domain_b), "secret1").await;

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/api/tenants/{}/upgrade", slug_b),
            Some(&token_a),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // And tenant info is equally off-limits
    let (status, _) = ctx
        .request(
            "GET",
            &format!("/api/tenants/{}", slug_b),
            Some(&token_a),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    ctx.cleanup_tenant(&slug_a).await;
    ctx.cleanup_tenant(&slug_b).await;
}
