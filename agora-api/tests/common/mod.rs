/// Common test utilities for integration tests
///
/// Shared infrastructure: test database + Redis connections, the assembled
/// router, a signed-up test user, and request helpers. All of it assumes a
/// running Postgres and Redis (tests using it are `#[ignore]`-marked).

use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::json;
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

use agora_api::app::{build_router, AppState};
use agora_api::config::Config;
use agora_shared::auth::jwt;
use agora_shared::redis::{RedisClient, RedisConfig, SessionStore};

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    /// Username of the signed-up test user (unique per context)
    pub username: String,
    pub password: String,
    pub user_id: Uuid,
}

impl TestContext {
    /// Creates a new test context with a fresh signed-up user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../agora-shared/migrations").run(&db).await?;

        let redis = RedisClient::new(RedisConfig::from_env()?).await?;
        let sessions = SessionStore::new(redis);

        let state = AppState::new(db.clone(), sessions, config.clone());
        let mut app = build_router(state);

        // Sign up a fresh user through the API itself
        let username = format!("testuser-{}", &Uuid::new_v4().to_string()[..8]);
        let password = "test-password-123".to_string();

        let response = app
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/api/users/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "username": username,
                            "nickname": format!("nick-{}", &username[9..]),
                            "password": password,
                            "confirmPassword": password,
                        })
                        .to_string(),
                    ))?,
            )
            .await?;

        let body = body_json(response).await?;
        let user_id = Uuid::parse_str(
            body["data"]["id"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("Signup returned no user id: {}", body))?,
        )?;

        Ok(TestContext {
            db,
            app,
            config,
            username,
            password,
            user_id,
        })
    }

    /// Logs the test user in, returning the prefixed (access, refresh) pair
    pub async fn login(&mut self) -> anyhow::Result<(String, String)> {
        let response = self
            .app
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/api/users/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "username": self.username,
                            "password": self.password,
                        })
                        .to_string(),
                    ))?,
            )
            .await?;

        let access = header_value(&response, jwt::ACCESS_TOKEN_HEADER)?;
        let refresh = header_value(&response, jwt::REFRESH_TOKEN_HEADER)?;

        Ok((access, refresh))
    }

    /// Cleans up test data; boards, comments, and reports cascade
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Reads a response header as an owned string
pub fn header_value(response: &Response<Body>, name: &str) -> anyhow::Result<String> {
    Ok(response
        .headers()
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("Missing {} header", name))?
        .to_str()?
        .to_string())
}

/// Collects a response body into JSON
pub async fn body_json(response: Response<Body>) -> anyhow::Result<serde_json::Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Builds a JSON request carrying an access token
pub fn authed_request(
    method: &str,
    uri: &str,
    access_token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(jwt::ACCESS_TOKEN_HEADER, access_token)
        .header("content-type", "application/json");

    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    builder.body(body).expect("Failed to build request")
}
