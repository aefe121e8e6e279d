/// Application state and router builder
///
/// Defines the shared application state (explicit constructor-passed
/// dependencies, cloned per request) and assembles the axum router with the
/// access-token guard on every authenticated route group.

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use agora_shared::auth::{context::AuthContext, jwt};
use agora_shared::redis::SessionStore;

use crate::{config::Config, error::ApiError, routes};

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor; the pool
/// and session store are internally reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Session cache (refresh tokens + access-token blacklist)
    pub sessions: SessionStore,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, sessions: SessionStore, config: Config) -> Self {
        Self {
            db,
            sessions,
            config: Arc::new(config),
        }
    }

    /// JWT signing secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete axum router
///
/// ```text
/// /
/// ├── /health                          # liveness (public)
/// └── /api/
///     ├── /users/
///     │   ├── POST /signup             # public
///     │   ├── POST /login              # public, issues tokens in headers
///     │   ├── POST /username           # public, availability check
///     │   ├── POST /nickname           # public, availability check
///     │   ├── POST /logout             # validates its own tokens (idempotent)
///     │   ├── GET / DELETE /           # guarded, profile / account deletion
///     │   ├── PATCH /profile           # guarded
///     │   └── PATCH /profile/password  # guarded
///     ├── /boards/                     # guarded: CRUD + comments + report
///     ├── /comments/                   # guarded: update/delete/report
///     └── /reports/                    # guarded, admin-only listings
/// ```
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // User routes that must work without a session. Logout lives here, not
    // behind the guard: it validates its own tokens and must keep succeeding
    // after the access token has been blacklisted by an earlier logout.
    let public_user_routes = Router::new()
        .route("/signup", post(routes::users::signup))
        .route("/login", post(routes::users::login))
        .route("/logout", post(routes::users::logout))
        .route("/username", post(routes::users::verify_username))
        .route("/nickname", post(routes::users::verify_nickname));

    // User routes behind the access-token guard
    let guarded_user_routes = Router::new()
        .route(
            "/",
            get(routes::users::get_profile).delete(routes::users::delete_user),
        )
        .route("/profile", patch(routes::users::update_profile))
        .route(
            "/profile/password",
            patch(routes::users::update_password),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_token_guard,
        ));

    let board_routes = Router::new()
        .route(
            "/",
            post(routes::boards::create_board).get(routes::boards::list_boards),
        )
        .route(
            "/:id",
            get(routes::boards::get_board)
                .patch(routes::boards::update_board)
                .delete(routes::boards::delete_board),
        )
        .route(
            "/:id/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        )
        .route("/:id/report", post(routes::reports::report_board))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_token_guard,
        ));

    let comment_routes = Router::new()
        .route(
            "/:id",
            patch(routes::comments::update_comment).delete(routes::comments::delete_comment),
        )
        .route("/:id/report", post(routes::reports::report_comment))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_token_guard,
        ));

    let report_routes = Router::new()
        .route("/boards", get(routes::reports::list_board_reports))
        .route("/comments", get(routes::reports::list_comment_reports))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_token_guard,
        ));

    let api_routes = Router::new()
        .nest("/users", public_user_routes.merge(guarded_user_routes))
        .nest("/boards", board_routes)
        .nest("/comments", comment_routes)
        .nest("/reports", report_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .expose_headers([
                HeaderName::from_static(jwt::ACCESS_TOKEN_HEADER),
                HeaderName::from_static(jwt::REFRESH_TOKEN_HEADER),
            ])
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Access-token guard
///
/// Runs on every authenticated route. Extracts the access token from the
/// `access-token` header, validates signature and expiry, rejects
/// blacklisted (logged-out) tokens, and attaches the embedded identity to
/// the request extensions as [`AuthContext`].
async fn access_token_guard(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(jwt::ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    // Missing header -> LoginRequired; present but unusable -> InvalidAccessToken
    let token = jwt::token_without_bearer(header.as_deref())?;

    let claims =
        jwt::decode_claims(token, state.jwt_secret()).map_err(|_| ApiError::InvalidAccessToken)?;

    // A logged-out token stays revoked until its natural expiry. Presence of
    // the blacklist key is the signal; the stored value is never read.
    if state.sessions.is_blacklisted(token).await? {
        return Err(ApiError::InvalidAccessToken);
    }

    req.extensions_mut()
        .insert(AuthContext::new(claims.sub, claims.role));

    Ok(next.run(req).await)
}
