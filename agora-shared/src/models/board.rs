/// Board (post) model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(100) NOT NULL,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A board post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    pub id: Uuid,

    /// Author of the post
    pub user_id: Uuid,

    pub title: String,
    pub content: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a board post
#[derive(Debug, Clone)]
pub struct CreateBoard {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
}

/// Input for updating a board post; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateBoard {
    pub title: Option<String>,
    pub content: Option<String>,
}

const BOARD_COLUMNS: &str = "id, user_id, title, content, created_at, updated_at";

impl Board {
    /// Inserts a new board post and returns the stored row
    pub async fn create(pool: &PgPool, data: CreateBoard) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Board>(&format!(
            r#"
            INSERT INTO boards (user_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING {BOARD_COLUMNS}
            "#,
        ))
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.content)
        .fetch_one(pool)
        .await
    }

    /// Finds a board post by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists board posts, newest first
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Updates a board post; unset fields keep their value
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBoard,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(&format!(
            r#"
            UPDATE boards
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOARD_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.content)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a board post; comments are removed by cascade
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
