use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use petgram_types::api::{CreatePostRequest, UpdatePostRequest};
use petgram_types::models::Post;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let (limit, offset) = page.bounds();
    let rows = state
        .db
        .list_posts_by_account(&account_id.to_string(), limit, offset)?;
    let posts = rows
        .into_iter()
        .map(|row| row.into_post())
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Json(posts))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let id = Uuid::new_v4();
    let content_json = serde_json::to_string(&req.content).map_err(anyhow::Error::from)?;
    state.db.insert_post(
        &id.to_string(),
        &req.account_id.to_string(),
        &content_json,
        &req.description,
        req.date,
    )?;

    let row = state
        .db
        .get_post(&id.to_string())?
        .ok_or_else(|| anyhow::anyhow!("Post vanished after insert"))?;
    Ok(Json(row.into_post()?))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let id_str = id.to_string();
    let updated = state.db.update_post_description(&id_str, &req.description)?;
    if updated == 0 {
        return Err(ApiError::not_found("Edit not successful", "Post not found"));
    }

    let row = state
        .db
        .get_post(&id_str)?
        .ok_or_else(|| ApiError::not_found("Edit not successful", "Post not found"))?;
    Ok(Json(row.into_post()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    let id_str = id.to_string();
    let row = state
        .db
        .get_post(&id_str)?
        .ok_or_else(|| ApiError::not_found("Delete not successful", "Post not found"))?;
    state.db.delete_post(&id_str)?;
    Ok(Json(row.into_post()?))
}
