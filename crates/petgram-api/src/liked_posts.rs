use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use petgram_types::api::CreatePostMarkRequest;
use petgram_types::models::LikedPost;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::parse_ids;
use crate::state::AppState;

/// Accounts that liked `{post_id}`.
pub async fn list(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Uuid>>, ApiError> {
    let (limit, offset) = page.bounds();
    let ids = state
        .db
        .list_post_likers(&post_id.to_string(), limit, offset)?;
    Ok(Json(parse_ids(ids)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePostMarkRequest>,
) -> Result<Json<LikedPost>, ApiError> {
    let id = Uuid::new_v4();
    state.db.insert_liked_post(
        &id.to_string(),
        &req.post_id.to_string(),
        &req.account_id.to_string(),
    )?;

    let row = state
        .db
        .get_liked_post(&id.to_string())?
        .ok_or_else(|| anyhow::anyhow!("Like vanished after insert"))?;
    Ok(Json(row.into_liked_post()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LikedPost>, ApiError> {
    let id_str = id.to_string();
    let row = state
        .db
        .get_liked_post(&id_str)?
        .ok_or_else(|| ApiError::not_found("Delete not successful", "Liked Post not found"))?;
    state.db.delete_liked_post(&id_str)?;
    Ok(Json(row.into_liked_post()?))
}
