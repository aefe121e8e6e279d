/// Report models for boards and comments
///
/// A report records that a user flagged a post or comment with a reason.
/// Reports are listed by administrators only; no de-duplication or workflow
/// state is tracked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A report filed against a board post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardReport {
    pub id: Uuid,

    /// Reported board post
    pub board_id: Uuid,

    /// User who filed the report
    pub reporter_id: Uuid,

    pub reason: String,

    pub created_at: DateTime<Utc>,
}

/// A report filed against a comment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentReport {
    pub id: Uuid,

    /// Reported comment
    pub comment_id: Uuid,

    /// User who filed the report
    pub reporter_id: Uuid,

    pub reason: String,

    pub created_at: DateTime<Utc>,
}

impl BoardReport {
    /// Files a report against a board post
    pub async fn create(
        pool: &PgPool,
        board_id: Uuid,
        reporter_id: Uuid,
        reason: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, BoardReport>(
            r#"
            INSERT INTO board_reports (board_id, reporter_id, reason)
            VALUES ($1, $2, $3)
            RETURNING id, board_id, reporter_id, reason, created_at
            "#,
        )
        .bind(board_id)
        .bind(reporter_id)
        .bind(reason)
        .fetch_one(pool)
        .await
    }

    /// Lists all board reports, newest first (admin view)
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, BoardReport>(
            "SELECT id, board_id, reporter_id, reason, created_at
             FROM board_reports ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}

impl CommentReport {
    /// Files a report against a comment
    pub async fn create(
        pool: &PgPool,
        comment_id: Uuid,
        reporter_id: Uuid,
        reason: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, CommentReport>(
            r#"
            INSERT INTO comment_reports (comment_id, reporter_id, reason)
            VALUES ($1, $2, $3)
            RETURNING id, comment_id, reporter_id, reason, created_at
            "#,
        )
        .bind(comment_id)
        .bind(reporter_id)
        .bind(reason)
        .fetch_one(pool)
        .await
    }

    /// Lists all comment reports, newest first (admin view)
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, CommentReport>(
            "SELECT id, comment_id, reporter_id, reason, created_at
             FROM comment_reports ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}
