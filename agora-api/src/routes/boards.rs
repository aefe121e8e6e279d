/// Board routes: create, list, read, update, delete
///
/// Updates are owner-only; deletion is allowed to the owner or an admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use agora_shared::auth::context::AuthContext;
use agora_shared::models::board::{Board, CreateBoard, UpdateBoard};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, Envelope},
};

/// Maximum number of posts returned by the listing endpoint
const LIST_LIMIT: i64 = 100;

/// Board creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}

/// Board update request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBoardRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: Option<String>,
}

/// Board post as returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Board> for BoardResponse {
    fn from(board: Board) -> Self {
        Self {
            id: board.id,
            user_id: board.user_id,
            title: board.title,
            content: board.content,
            created_at: board.created_at,
            updated_at: board.updated_at,
        }
    }
}

/// POST /api/boards
pub async fn create_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<BoardResponse>>)> {
    req.validate()?;

    let board = Board::create(
        &state.db,
        CreateBoard {
            user_id: auth.user_id,
            title: req.title,
            content: req.content,
        },
    )
    .await?;

    tracing::info!(board_id = %board.id, user_id = %auth.user_id, "Board created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(BoardResponse::from(board))),
    ))
}

/// GET /api/boards
pub async fn list_boards(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<BoardResponse>>>> {
    let boards = Board::list(&state.db, LIST_LIMIT).await?;

    Ok(Json(Envelope::success(
        boards.into_iter().map(BoardResponse::from).collect(),
    )))
}

/// GET /api/boards/:id
pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<BoardResponse>>> {
    let board = Board::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFoundBoard)?;

    Ok(Json(Envelope::success(BoardResponse::from(board))))
}

/// PATCH /api/boards/:id
pub async fn update_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBoardRequest>,
) -> ApiResult<Json<Envelope<BoardResponse>>> {
    req.validate()?;

    let board = Board::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFoundBoard)?;

    if board.user_id != auth.user_id {
        return Err(ApiError::AccessDeny);
    }

    let updated = Board::update(
        &state.db,
        id,
        UpdateBoard {
            title: req.title,
            content: req.content,
        },
    )
    .await?
    .ok_or(ApiError::NotFoundBoard)?;

    Ok(Json(Envelope::success(BoardResponse::from(updated))))
}

/// DELETE /api/boards/:id
pub async fn delete_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    let board = Board::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFoundBoard)?;

    if board.user_id != auth.user_id && !auth.is_admin() {
        return Err(ApiError::AccessDeny);
    }

    Board::delete(&state.db, id).await?;

    tracing::info!(board_id = %id, user_id = %auth.user_id, "Board deleted");

    Ok(Json(Envelope::success(serde_json::json!({
        "deleted": true
    }))))
}
