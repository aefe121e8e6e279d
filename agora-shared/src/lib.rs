//! # Agora Shared Library
//!
//! Shared types and infrastructure for the Agora board backend.
//!
//! ## Module Organization
//!
//! - `models`: database models and their CRUD operations
//! - `auth`: token service, password hashing, authenticated context
//! - `db`: PostgreSQL pool and migrations
//! - `redis`: Redis client and the session cache

pub mod auth;
pub mod db;
pub mod models;
pub mod redis;

/// Current version of the Agora shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
