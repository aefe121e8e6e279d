/// Authenticated request context
///
/// After the access-token guard validates a request, it inserts an
/// `AuthContext` into the request extensions. Handlers extract it with
/// axum's `Extension` extractor instead of re-parsing the token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Identity attached to an authenticated request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id (from the access token `sub` claim)
    pub user_id: Uuid,

    /// Role embedded in the access token at issue time
    pub role: Role,
}

impl AuthContext {
    /// Builds the context from validated token claims
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Whether the authenticated user holds the admin role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin() {
        let user = AuthContext::new(Uuid::new_v4(), Role::User);
        assert!(!user.is_admin());

        let admin = AuthContext::new(Uuid::new_v4(), Role::Admin);
        assert!(admin.is_admin());
    }
}
