/// Comment model and database operations
///
/// Comments belong to a board post and are removed by cascade when the post
/// or their author is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A comment on a board post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,

    /// Board post the comment belongs to
    pub board_id: Uuid,

    /// Author of the comment
    pub user_id: Uuid,

    pub content: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

const COMMENT_COLUMNS: &str = "id, board_id, user_id, content, created_at, updated_at";

impl Comment {
    /// Inserts a new comment and returns the stored row
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (board_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING {COMMENT_COLUMNS}
            "#,
        ))
        .bind(data.board_id)
        .bind(data.user_id)
        .bind(data.content)
        .fetch_one(pool)
        .await
    }

    /// Finds a comment by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists the comments of a board post, oldest first
    pub async fn list_by_board(pool: &PgPool, board_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE board_id = $1 ORDER BY created_at ASC"
        ))
        .bind(board_id)
        .fetch_all(pool)
        .await
    }

    /// Replaces the comment content
    pub async fn update_content(
        pool: &PgPool,
        id: Uuid,
        content: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a comment
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
