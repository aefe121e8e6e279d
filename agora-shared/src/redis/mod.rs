/// Redis integration: connection management and the session cache
///
/// - [`client`]: connection manager wrapper, env config, health check
/// - [`session`]: refresh-token → user-id mappings and the access-token
///   blacklist, the only shared mutable state in the system

pub mod client;
pub mod session;

pub use client::{RedisClient, RedisClientError, RedisConfig};
pub use session::SessionStore;
