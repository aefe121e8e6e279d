/// Authentication primitives
///
/// # Modules
///
/// - [`jwt`]: access-token creation/validation and opaque refresh tokens
/// - [`password`]: Argon2id password hashing and verification
/// - [`context`]: the authenticated identity threaded through handlers
///
/// The session-cache side of the auth lifecycle (refresh-token storage and
/// the access-token blacklist) lives in [`crate::redis::session`].

pub mod context;
pub mod jwt;
pub mod password;
