/// Session cache: refresh-token mappings and the access-token blacklist
///
/// Two kinds of entries live in Redis, both under namespaced keys:
///
/// - `refresh:{token}` → user id, TTL 14 days. Written at login, read when a
///   session is re-established, deleted at logout.
/// - `blacklist:{token}` → `"logout"`, TTL = remaining lifetime of the
///   revoked access token. A revoked token is recognized by key presence
///   alone; the stored value is never inspected.
///
/// Every operation is a single-key atomic command (SET EX / GET / DEL /
/// EXISTS), so no transactions or locking are needed.

use redis::AsyncCommands;
use uuid::Uuid;

use super::client::{RedisClient, RedisClientError};
use crate::auth::jwt::REFRESH_TOKEN_TTL_SECS;

/// Value stored for blacklisted access tokens
const BLACKLIST_VALUE: &str = "logout";

/// Session cache over the shared Redis client
#[derive(Clone)]
pub struct SessionStore {
    client: RedisClient,
}

impl SessionStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Health check passthrough, used by the health endpoint
    pub async fn ping(&self) -> Result<bool, RedisClientError> {
        self.client.ping().await
    }

    /// Maps a refresh token to a user id with the fixed 14-day expiry
    pub async fn store_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
    ) -> Result<(), RedisClientError> {
        let mut conn = self.client.get_connection();

        let _: () = conn
            .set_ex(refresh_key(token), user_id.to_string(), REFRESH_TOKEN_TTL_SECS)
            .await?;

        Ok(())
    }

    /// Looks up the user a refresh token belongs to
    pub async fn lookup_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<Uuid>, RedisClientError> {
        let mut conn = self.client.get_connection();

        let value: Option<String> = conn.get(refresh_key(token)).await?;

        Ok(value.and_then(|v| Uuid::parse_str(&v).ok()))
    }

    /// Whether a refresh token is currently registered
    pub async fn has_refresh_token(&self, token: &str) -> Result<bool, RedisClientError> {
        let mut conn = self.client.get_connection();

        Ok(conn.exists(refresh_key(token)).await?)
    }

    /// Removes a refresh token; returns false if it was already gone
    pub async fn delete_refresh_token(&self, token: &str) -> Result<bool, RedisClientError> {
        let mut conn = self.client.get_connection();

        let removed: i64 = conn.del(refresh_key(token)).await?;

        Ok(removed > 0)
    }

    /// Marks an access token revoked until its natural expiry
    ///
    /// The TTL must be at least the token's remaining lifetime so the entry
    /// never expires before the token would have.
    pub async fn blacklist_access_token(
        &self,
        token: &str,
        ttl_secs: u64,
    ) -> Result<(), RedisClientError> {
        let mut conn = self.client.get_connection();

        let _: () = conn
            .set_ex(blacklist_key(token), BLACKLIST_VALUE, ttl_secs)
            .await?;

        Ok(())
    }

    /// Whether an access token has been revoked
    ///
    /// Key presence is the only signal; the stored value is irrelevant.
    pub async fn is_blacklisted(&self, token: &str) -> Result<bool, RedisClientError> {
        let mut conn = self.client.get_connection();

        Ok(conn.exists(blacklist_key(token)).await?)
    }
}

fn refresh_key(token: &str) -> String {
    format!("refresh:{}", token)
}

fn blacklist_key(token: &str) -> String {
    format!("blacklist:{}", token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redis::client::RedisConfig;

    #[test]
    fn test_key_namespacing() {
        assert_eq!(refresh_key("abc"), "refresh:abc");
        assert_eq!(blacklist_key("abc"), "blacklist:abc");
        // Same token must never collide across namespaces
        assert_ne!(refresh_key("token"), blacklist_key("token"));
    }

    async fn test_store() -> SessionStore {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            command_timeout_secs: 10,
        };
        SessionStore::new(RedisClient::new(config).await.unwrap())
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_refresh_token_roundtrip() {
        let store = test_store().await;
        let user_id = Uuid::new_v4();
        let token = "test-refresh-roundtrip";

        store.store_refresh_token(token, user_id).await.unwrap();
        assert!(store.has_refresh_token(token).await.unwrap());
        assert_eq!(
            store.lookup_refresh_token(token).await.unwrap(),
            Some(user_id)
        );

        assert!(store.delete_refresh_token(token).await.unwrap());
        assert!(!store.has_refresh_token(token).await.unwrap());

        // Second delete is a no-op, not an error
        assert!(!store.delete_refresh_token(token).await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_blacklist_presence() {
        let store = test_store().await;
        let token = "test-blacklist-presence";

        assert!(!store.is_blacklisted(token).await.unwrap());
        store.blacklist_access_token(token, 60).await.unwrap();
        assert!(store.is_blacklisted(token).await.unwrap());
    }
}
