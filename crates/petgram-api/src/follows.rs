use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use petgram_types::api::CreateFollowRequest;
use petgram_types::models::Follow;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::parse_ids;
use crate::state::AppState;

/// Accounts following `{account_id}`.
pub async fn followers(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Uuid>>, ApiError> {
    let (limit, offset) = page.bounds();
    let ids = state
        .db
        .list_follower_ids(&account_id.to_string(), limit, offset)?;
    Ok(Json(parse_ids(ids)?))
}

/// Accounts `{account_id}` follows.
pub async fn following(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Uuid>>, ApiError> {
    let (limit, offset) = page.bounds();
    let ids = state
        .db
        .list_following_ids(&account_id.to_string(), limit, offset)?;
    Ok(Json(parse_ids(ids)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateFollowRequest>,
) -> Result<Json<Follow>, ApiError> {
    let id = Uuid::new_v4();
    state.db.insert_follow(
        &id.to_string(),
        &req.follower_id.to_string(),
        &req.followed_id.to_string(),
    )?;

    let row = state
        .db
        .get_follow(&id.to_string())?
        .ok_or_else(|| anyhow::anyhow!("Follow vanished after insert"))?;
    Ok(Json(row.into_follow()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Follow>, ApiError> {
    let id_str = id.to_string();
    let row = state
        .db
        .get_follow(&id_str)?
        .ok_or_else(|| ApiError::not_found("Delete not successful", "Follow not found"))?;
    state.db.delete_follow(&id_str)?;
    Ok(Json(row.into_follow()?))
}
