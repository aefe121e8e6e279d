/// JWT token generation and validation
///
/// Access tokens are HS256-signed JWTs embedding the user id and role.
/// Refresh tokens are opaque random handles with no payload; they only serve
/// as lookup keys into the session cache.
///
/// Both tokens travel in custom headers (`access-token`, `refresh-token`)
/// with a `Bearer ` scheme prefix. Creation functions return header-ready
/// prefixed values; validation functions expect the bare token.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Access token lifetime**: 1 hour
/// - **Refresh token lifetime**: 14 days (enforced by the cache TTL)
/// - **Secret**: configured at process start, at least 32 bytes

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Request/response header carrying the access token
pub const ACCESS_TOKEN_HEADER: &str = "access-token";

/// Request/response header carrying the refresh token
pub const REFRESH_TOKEN_HEADER: &str = "refresh-token";

/// Scheme prefix carried by both token headers
pub const BEARER_PREFIX: &str = "Bearer ";

/// Access token lifetime in seconds (1 hour)
pub const ACCESS_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Refresh token lifetime in seconds (14 days)
pub const REFRESH_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 14;

/// Token issuer claim
const ISSUER: &str = "agora";

/// Number of random bytes in an opaque refresh token
const REFRESH_TOKEN_BYTES: usize = 32;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token is structurally broken (not decodable as a JWT at all)
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Token was once valid but has expired
    #[error("Token has expired")]
    Expired,

    /// Token decoded but failed validation (signature, issuer, claims)
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Expected token header was absent or missing the scheme prefix
    #[error("Missing token")]
    MissingToken,
}

/// JWT claims for an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Issuer - always "agora"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Role of the user at issue time (custom claim)
    pub role: Role,
}

impl Claims {
    /// Creates claims with the default access-token lifetime
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self::with_expiration(user_id, role, Duration::seconds(ACCESS_TOKEN_LIFETIME_SECS))
    }

    /// Creates claims with a custom lifetime (used by tests for expiry cases)
    pub fn with_expiration(user_id: Uuid, role: Role, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            role,
        }
    }
}

/// Signs claims into a bare (unprefixed) JWT string
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Creates a header-ready access token for a user
///
/// The returned string carries the `Bearer ` prefix so it can be written
/// straight into the `access-token` response header.
pub fn create_access_token(user_id: Uuid, role: Role, secret: &str) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, role);
    let token = create_token(&claims, secret)?;

    Ok(format!("{}{}", BEARER_PREFIX, token))
}

/// Creates a header-ready opaque refresh token
///
/// The token carries no payload; it is purely a random handle used as a
/// session-cache key. 32 bytes of OS randomness, hex encoded.
pub fn create_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);

    format!("{}{}", BEARER_PREFIX, hex::encode(bytes))
}

/// Checks whether a bare access token is currently valid
///
/// Returns `Ok(false)` for tokens that decode but fail verification
/// (bad signature, expired, wrong issuer). Only structurally broken input
/// produces an error.
pub fn validate_token(token: &str, secret: &str) -> Result<bool, JwtError> {
    match decode_raw(token, secret) {
        Ok(_) => Ok(true),
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
            | jsonwebtoken::errors::ErrorKind::InvalidSignature
            | jsonwebtoken::errors::ErrorKind::ImmatureSignature
            | jsonwebtoken::errors::ErrorKind::InvalidIssuer => Ok(false),
            _ => Err(JwtError::Malformed(e.to_string())),
        },
    }
}

/// Decodes and verifies a bare access token, returning its claims
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, JwtError> {
    decode_raw(token, secret).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::Base64(_)
        | jsonwebtoken::errors::ErrorKind::Json(_)
        | jsonwebtoken::errors::ErrorKind::Utf8(_) => JwtError::Malformed(e.to_string()),
        _ => JwtError::Invalid(e.to_string()),
    })
}

/// Remaining lifetime of a bare access token, in seconds
///
/// Used to size blacklist TTLs so that a revoked token stays blacklisted
/// at least until it would have expired naturally.
pub fn expiration_secs(token: &str, secret: &str) -> Result<i64, JwtError> {
    let claims = decode_claims(token, secret)?;

    Ok(claims.exp - Utc::now().timestamp())
}

/// Strips the `Bearer ` scheme prefix from a header value
///
/// Returns `JwtError::MissingToken` when the header is absent or does not
/// carry the expected prefix.
pub fn token_without_bearer(header: Option<&str>) -> Result<&str, JwtError> {
    header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(JwtError::MissingToken)
}

fn decode_raw(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_create_and_decode_access_token() {
        let user_id = Uuid::new_v4();
        let prefixed = create_access_token(user_id, Role::User, SECRET).unwrap();

        assert!(prefixed.starts_with(BEARER_PREFIX));

        let token = token_without_bearer(Some(&prefixed)).unwrap();
        let claims = decode_claims(token, SECRET).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.iss, "agora");
    }

    #[test]
    fn test_validate_valid_token() {
        let claims = Claims::new(Uuid::new_v4(), Role::Admin);
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, SECRET).unwrap());
    }

    #[test]
    fn test_wrong_signature_is_invalid_not_malformed() {
        let claims = Claims::new(Uuid::new_v4(), Role::User);
        let token = create_token(&claims, SECRET).unwrap();

        // Signed with a different secret: rejected, but not an error
        let valid = validate_token(&token, "another-secret-key-that-is-long-enough").unwrap();
        assert!(!valid);
    }

    #[test]
    fn test_expired_token_is_invalid_not_malformed() {
        let claims =
            Claims::with_expiration(Uuid::new_v4(), Role::User, Duration::seconds(-120));
        let token = create_token(&claims, SECRET).unwrap();

        assert!(!validate_token(&token, SECRET).unwrap());
        assert!(matches!(decode_claims(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let result = validate_token("not-a-jwt-at-all", SECRET);
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_expiration_secs_within_lifetime() {
        let claims = Claims::new(Uuid::new_v4(), Role::User);
        let token = create_token(&claims, SECRET).unwrap();

        let remaining = expiration_secs(&token, SECRET).unwrap();
        assert!(remaining > 0);
        assert!(remaining <= ACCESS_TOKEN_LIFETIME_SECS);
    }

    #[test]
    fn test_refresh_tokens_are_opaque_and_distinct() {
        let first = create_refresh_token();
        let second = create_refresh_token();

        assert!(first.starts_with(BEARER_PREFIX));
        assert_ne!(first, second);

        let bare = token_without_bearer(Some(&first)).unwrap();
        assert_eq!(bare.len(), REFRESH_TOKEN_BYTES * 2);
        assert!(bare.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_without_bearer() {
        assert_eq!(token_without_bearer(Some("Bearer abc")).unwrap(), "abc");

        assert!(matches!(
            token_without_bearer(None),
            Err(JwtError::MissingToken)
        ));
        assert!(matches!(
            token_without_bearer(Some("abc")),
            Err(JwtError::MissingToken)
        ));
    }
}
