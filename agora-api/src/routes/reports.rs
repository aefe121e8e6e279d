/// Report routes: filing reports against boards and comments, plus the
/// admin-only listings

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
    comment::Comment,
    report::{BoardReport, CommentReport},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, Envelope},
};

/// Report filing request
#[derive(Debug, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}

/// Board report as returned to administrators
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardReportResponse {
    pub id: Uuid,
    pub board_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<BoardReport> for BoardReportResponse {
    fn from(report: BoardReport) -> Self {
        Self {
            id: report.id,
            board_id: report.board_id,
            reporter_id: report.reporter_id,
            reason: report.reason,
            created_at: report.created_at,
        }
    }
}

/// Comment report as returned to administrators
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReportResponse {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CommentReport> for CommentReportResponse {
    fn from(report: CommentReport) -> Self {
        Self {
            id: report.id,
            comment_id: report.comment_id,
            reporter_id: report.reporter_id,
            reason: report.reason,
            created_at: report.created_at,
        }
    }
}

/// POST /api/boards/:id/report
pub async fn report_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<ReportRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<BoardReportResponse>>)> {
    req.validate()?;

    if Board::find_by_id(&state.db, board_id).await?.is_none() {
        return Err(ApiError::NotFoundBoard);
    }

    let report = BoardReport::create(&state.db, board_id, auth.user_id, &req.reason).await?;

    tracing::info!(board_id = %board_id, reporter_id = %auth.user_id, "Board reported");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(BoardReportResponse::from(report))),
    ))
}

/// POST /api/comments/:id/report
pub async fn report_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(comment_id): Path<Uuid>,
    Json(req): Json<ReportRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<CommentReportResponse>>)> {
    req.validate()?;

    if Comment::find_by_id(&state.db, comment_id).await?.is_none() {
        return Err(ApiError::NotFoundComment);
    }

    let report = CommentReport::create(&state.db, comment_id, auth.user_id, &req.reason).await?;

    tracing::info!(comment_id = %comment_id, reporter_id = %auth.user_id, "Comment reported");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(CommentReportResponse::from(report))),
    ))
}

/// GET /api/reports/boards (admin only)
pub async fn list_board_reports(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Envelope<Vec<BoardReportResponse>>>> {
    if !auth.is_admin() {
        return Err(ApiError::AccessDeny);
    }

    let reports = BoardReport::list(&state.db).await?;

    Ok(Json(Envelope::success(
        reports.into_iter().map(BoardReportResponse::from).collect(),
    )))
}

/// GET /api/reports/comments (admin only)
pub async fn list_comment_reports(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Envelope<Vec<CommentReportResponse>>>> {
    if !auth.is_admin() {
        return Err(ApiError::AccessDeny);
    }

    let reports = CommentReport::list(&state.db).await?;

    Ok(Json(Envelope::success(
        reports
            .into_iter()
            .map(CommentReportResponse::from)
            .collect(),
    )))
}
