/// Comment routes: list and create under a board, update and delete by id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use agora_shared::auth::context::AuthContext;
use agora_shared::models::{
    board::Board,
    comment::{Comment, CreateComment},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, Envelope},
};

/// Comment body, shared by create and update
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Content must be 1-1000 characters"))]
    pub content: String,
}

/// Comment as returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            board_id: comment.board_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// GET /api/boards/:id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Vec<CommentResponse>>>> {
    if Board::find_by_id(&state.db, board_id).await?.is_none() {
        return Err(ApiError::NotFoundBoard);
    }

    let comments = Comment::list_by_board(&state.db, board_id).await?;

    Ok(Json(Envelope::success(
        comments.into_iter().map(CommentResponse::from).collect(),
    )))
}

/// POST /api/boards/:id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<CommentResponse>>)> {
    req.validate()?;

    if Board::find_by_id(&state.db, board_id).await?.is_none() {
        return Err(ApiError::NotFoundBoard);
    }

    let comment = Comment::create(
        &state.db,
        CreateComment {
            board_id,
            user_id: auth.user_id,
            content: req.content,
        },
    )
    .await?;

    tracing::info!(comment_id = %comment.id, board_id = %board_id, "Comment created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(CommentResponse::from(comment))),
    ))
}

/// PATCH /api/comments/:id
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<Json<Envelope<CommentResponse>>> {
    req.validate()?;

    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFoundComment)?;

    if comment.user_id != auth.user_id {
        return Err(ApiError::AccessDeny);
    }

    let updated = Comment::update_content(&state.db, id, &req.content)
        .await?
        .ok_or(ApiError::NotFoundComment)?;

    Ok(Json(Envelope::success(CommentResponse::from(updated))))
}

/// DELETE /api/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFoundComment)?;

    if comment.user_id != auth.user_id && !auth.is_admin() {
        return Err(ApiError::AccessDeny);
    }

    Comment::delete(&state.db, id).await?;

    tracing::info!(comment_id = %id, user_id = %auth.user_id, "Comment deleted");

    Ok(Json(Envelope::success(serde_json::json!({
        "deleted": true
    }))))
}
