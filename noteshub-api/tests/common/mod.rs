/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user/tenant creation via the API itself
/// - JWT token generation
/// - Request helpers
///
/// Tests need a running PostgreSQL instance, configured via
/// `TEST_DATABASE_URL`. When the variable is unset every test skips itself,
/// so the suite still passes on machines without a database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use noteshub_api::app::{build_router, AppState};
use noteshub_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, TenancyConfig};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a test context, or `None` when `TEST_DATABASE_URL` is unset
    pub async fn try_new() -> anyhow::Result<Option<Self>> {
        let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
            return Ok(None);
        };

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec![],
                production: false,
            },
            database: DatabaseConfig {
                url: database_url.clone(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
            tenancy: TenancyConfig {
                strict_domains: false,
            },
        };

        let db = PgPool::connect(&database_url).await?;

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext { db, app }))
    }

    /// Sends a JSON request and returns status plus parsed body
    pub async fn request(
        &mut self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, body)
    }

    /// Registers a user and returns its token and the response body
    pub async fn register(&mut self, email: &str, password: &str) -> (String, Value) {
        let (status, body) = self
            .request(
                "POST",
                "/api/register",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        let token = body["token"].as_str().unwrap().to_string();
        (token, body)
    }

    /// Promotes a registered user to tenant admin
    ///
    /// Self-registration always produces members; tests that exercise
    /// admin-only paths flip the role directly.
    pub async fn promote_to_admin(&self, user_id: Uuid) {
        sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .unwrap();
    }

    /// Deletes a tenant by slug; users and notes cascade
    pub async fn cleanup_tenant(&self, slug: &str) {
        sqlx::query("DELETE FROM tenants WHERE slug = $1")
            .bind(slug)
            .execute(&self.db)
            .await
            .unwrap();
    }
}

/// Returns a unique email domain so tests do not share tenants
pub fn unique_domain() -> String {
    format!("t{}.example", Uuid::new_v4().simple())
}

/// Skips the current test when no test database is configured
#[macro_export]
macro_rules! require_test_db {
    () => {
        match common::TestContext::try_new().await.unwrap() {
            Some(ctx) => ctx,
            None => {
                eprintln!("skipping: TEST_DATABASE_URL not set");
                return;
            }
        }
    };
}
