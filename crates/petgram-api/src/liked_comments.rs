use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use petgram_types::api::CreateCommentMarkRequest;
use petgram_types::models::LikedComment;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::parse_ids;
use crate::state::AppState;

/// Accounts that liked `{comment_id}`.
pub async fn list(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Uuid>>, ApiError> {
    let (limit, offset) = page.bounds();
    let ids = state
        .db
        .list_comment_likers(&comment_id.to_string(), limit, offset)?;
    Ok(Json(parse_ids(ids)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCommentMarkRequest>,
) -> Result<Json<LikedComment>, ApiError> {
    let id = Uuid::new_v4();
    state.db.insert_liked_comment(
        &id.to_string(),
        &req.comment_id.to_string(),
        &req.account_id.to_string(),
    )?;

    let row = state
        .db
        .get_liked_comment(&id.to_string())?
        .ok_or_else(|| anyhow::anyhow!("Like vanished after insert"))?;
    Ok(Json(row.into_liked_comment()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LikedComment>, ApiError> {
    let id_str = id.to_string();
    let row = state
        .db
        .get_liked_comment(&id_str)?
        .ok_or_else(|| ApiError::not_found("Delete not successful", "Liked Comment not found"))?;
    state.db.delete_liked_comment(&id_str)?;
    Ok(Json(row.into_liked_comment()?))
}
