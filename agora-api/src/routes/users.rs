/// User routes: signup, login, logout, profile management
///
/// Login and logout drive the session lifecycle: login issues the token pair
/// in response headers and registers the refresh token in the session cache;
/// logout removes the refresh token and blacklists the access token for the
/// rest of its lifetime.

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use agora_shared::auth::{context::AuthContext, jwt, password};
use agora_shared::models::user::{CreateUser, Role, UpdateProfile, User};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, Envelope},
};

/// Signup request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[validate(length(min = 2, max = 32, message = "Nickname must be 2-32 characters"))]
    pub nickname: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    pub confirm_password: String,

    #[validate(url(message = "Profile URL must be a valid URL"))]
    pub profile_url: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile update request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 32, message = "Nickname must be 2-32 characters"))]
    pub nickname: Option<String>,

    #[validate(url(message = "Profile URL must be a valid URL"))]
    pub profile_url: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    /// Current password, re-verified before the change
    pub password: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,

    pub confirm_new_password: String,
}

/// Username availability check request
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyUsernameRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,
}

/// Nickname availability check request
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyNicknameRequest {
    #[validate(length(min = 2, max = 32, message = "Nickname must be 2-32 characters"))]
    pub nickname: String,
}

/// Public user profile; never exposes the password hash
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub username: String,
    pub nickname: String,
    pub role: Role,
    pub profile_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            nickname: user.nickname,
            role: user.role,
            profile_url: user.profile_url,
            created_at: user.created_at,
        }
    }
}

/// Availability check response
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// POST /api/users/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<UserResponse>>)> {
    req.validate()?;

    if req.password != req.confirm_password {
        return Err(ApiError::DifferentPassword);
    }

    if User::exists_by_username(&state.db, &req.username).await? {
        return Err(ApiError::DuplicatedUsername);
    }
    if User::exists_by_nickname(&state.db, &req.nickname).await? {
        return Err(ApiError::DuplicatedNickname);
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            nickname: req.nickname,
            password_hash,
            profile_url: req.profile_url,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(UserResponse::from(user))),
    ))
}

/// POST /api/users/login
///
/// On success the token pair travels in the `access-token` and
/// `refresh-token` response headers (both `Bearer `-prefixed); the body
/// carries the profile. The refresh token is registered in the session cache
/// under its bare form.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<Envelope<UserResponse>>)> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or(ApiError::NotFoundUser)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::NotMatchedPassword);
    }

    let access_token = jwt::create_access_token(user.id, user.role, state.jwt_secret())?;
    let refresh_token = jwt::create_refresh_token();

    let bare_refresh = jwt::token_without_bearer(Some(&refresh_token))
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    state
        .sessions
        .store_refresh_token(bare_refresh, user.id)
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(jwt::ACCESS_TOKEN_HEADER),
        HeaderValue::from_str(&access_token)
            .map_err(|e| ApiError::Internal(format!("Invalid token header value: {}", e)))?,
    );
    headers.insert(
        HeaderName::from_static(jwt::REFRESH_TOKEN_HEADER),
        HeaderValue::from_str(&refresh_token)
            .map_err(|e| ApiError::Internal(format!("Invalid token header value: {}", e)))?,
    );

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((headers, Json(Envelope::success(UserResponse::from(user)))))
}

/// POST /api/users/logout
///
/// Reads both tokens from the request headers and validates the access
/// token directly instead of going through the guard: the blacklist is
/// deliberately not consulted here, so repeating a logout with the same
/// token pair succeeds. The refresh token is removed from the session cache
/// (absence is not an error) and the access token is blacklisted for the
/// rest of its lifetime so it cannot be replayed before it expires.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    let access_header = headers
        .get(jwt::ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    let refresh_header = headers
        .get(jwt::REFRESH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    let access_token = jwt::token_without_bearer(access_header)?;
    let refresh_token = jwt::token_without_bearer(refresh_header)
        .map_err(|_| ApiError::InvalidRefreshToken)?;

    // Signature and expiry still have to hold; only the revocation state is
    // ignored on this path
    if !jwt::validate_token(access_token, state.jwt_secret())? {
        return Err(ApiError::InvalidAccessToken);
    }

    state.sessions.delete_refresh_token(refresh_token).await?;

    // Blacklist TTL covers the token's remaining lifetime; clamp to 1 second
    // so a token on the edge of expiry still gets an entry
    let remaining = jwt::expiration_secs(access_token, state.jwt_secret())?.max(1);
    state
        .sessions
        .blacklist_access_token(access_token, remaining as u64)
        .await?;

    tracing::info!("User logged out");

    Ok(Json(Envelope::success(serde_json::json!({}))))
}

/// GET /api/users
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Envelope<UserResponse>>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or(ApiError::NotFoundUser)?;

    Ok(Json(Envelope::success(UserResponse::from(user))))
}

/// DELETE /api/users
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    if !User::delete(&state.db, auth.user_id).await? {
        return Err(ApiError::NotFoundUser);
    }

    tracing::info!(user_id = %auth.user_id, "User account deleted");

    Ok(Json(Envelope::success(serde_json::json!({
        "deleted": true
    }))))
}

/// PATCH /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Envelope<UserResponse>>> {
    req.validate()?;

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or(ApiError::NotFoundUser)?;

    // Keeping the current nickname is fine; taking someone else's is not
    if let Some(nickname) = &req.nickname {
        if nickname != &user.nickname && User::exists_by_nickname(&state.db, nickname).await? {
            return Err(ApiError::DuplicatedNickname);
        }
    }

    let updated = User::update_profile(
        &state.db,
        auth.user_id,
        UpdateProfile {
            nickname: req.nickname,
            profile_url: req.profile_url,
        },
    )
    .await?
    .ok_or(ApiError::NotFoundUser)?;

    Ok(Json(Envelope::success(UserResponse::from(updated))))
}

/// PATCH /api/users/profile/password
pub async fn update_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    req.validate()?;

    if req.new_password != req.confirm_new_password {
        return Err(ApiError::DifferentPassword);
    }

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or(ApiError::NotFoundUser)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::NotMatchedPassword);
    }

    let new_hash = password::hash_password(&req.new_password)?;

    if !User::update_password(&state.db, auth.user_id, &new_hash).await? {
        return Err(ApiError::NotFoundUser);
    }

    tracing::info!(user_id = %auth.user_id, "Password updated");

    Ok(Json(Envelope::success(serde_json::json!({
        "updated": true
    }))))
}

/// POST /api/users/username
pub async fn verify_username(
    State(state): State<AppState>,
    Json(req): Json<VerifyUsernameRequest>,
) -> ApiResult<Json<Envelope<AvailabilityResponse>>> {
    req.validate()?;

    let taken = User::exists_by_username(&state.db, &req.username).await?;

    Ok(Json(Envelope::success(AvailabilityResponse {
        available: !taken,
    })))
}

/// POST /api/users/nickname
pub async fn verify_nickname(
    State(state): State<AppState>,
    Json(req): Json<VerifyNicknameRequest>,
) -> ApiResult<Json<Envelope<AvailabilityResponse>>> {
    req.validate()?;

    let taken = User::exists_by_nickname(&state.db, &req.nickname).await?;

    Ok(Json(Envelope::success(AvailabilityResponse {
        available: !taken,
    })))
}
