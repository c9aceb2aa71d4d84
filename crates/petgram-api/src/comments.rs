use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use petgram_types::api::{CreateCommentRequest, UpdateCommentRequest};
use petgram_types::models::Comment;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let (limit, offset) = page.bounds();
    let rows = state
        .db
        .list_comments_by_post(&post_id.to_string(), limit, offset)?;
    let comments = rows
        .into_iter()
        .map(|row| row.into_comment())
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Json(comments))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let id = Uuid::new_v4();
    let replied_to = req.replied_to.map(|id| id.to_string());
    state.db.insert_comment(
        &id.to_string(),
        &req.post_id.to_string(),
        &req.account_id.to_string(),
        &req.content,
        replied_to.as_deref(),
        req.date,
    )?;

    let row = state
        .db
        .get_comment(&id.to_string())?
        .ok_or_else(|| anyhow::anyhow!("Comment vanished after insert"))?;
    Ok(Json(row.into_comment()?))
}

// The edit path reports missing rows with the delete wording; the
// clients match on it, so it stays.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let id_str = id.to_string();
    let updated = state.db.update_comment_content(&id_str, &req.content)?;
    if updated == 0 {
        return Err(ApiError::not_found(
            "Delete not successful",
            "Comment not found",
        ));
    }

    let row = state
        .db
        .get_comment(&id_str)?
        .ok_or_else(|| ApiError::not_found("Delete not successful", "Comment not found"))?;
    Ok(Json(row.into_comment()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Comment>, ApiError> {
    let id_str = id.to_string();
    let row = state
        .db
        .get_comment(&id_str)?
        .ok_or_else(|| ApiError::not_found("Delete not successful", "Comment not found"))?;
    state.db.delete_comment(&id_str)?;
    Ok(Json(row.into_comment()?))
}
