/// Database migration runner
///
/// Migrations live in the `migrations/` directory of this crate and are
/// embedded at compile time via `sqlx::migrate!`. Each migration has an up
/// file (`{version}_{name}.sql`) and a down file (`.down.sql`).

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending migrations
///
/// Called once at startup, before the server begins accepting requests.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("Database migrations complete");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::{create_pool, DatabaseConfig};

    #[tokio::test]
    #[ignore] // Requires running Postgres instance
    async fn test_migrations_are_idempotent() {
        let config = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/agora_test".to_string()),
            ..Default::default()
        };
        let pool = create_pool(config).await.unwrap();

        run_migrations(&pool).await.unwrap();
        // Running twice must be a no-op
        run_migrations(&pool).await.unwrap();
    }
}
