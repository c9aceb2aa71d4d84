use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use petgram_types::api::CreateStoryRequest;
use petgram_types::models::Story;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Story>>, ApiError> {
    let (limit, offset) = page.bounds();
    let rows = state
        .db
        .list_stories_by_account(&account_id.to_string(), limit, offset)?;
    let stories = rows
        .into_iter()
        .map(|row| row.into_story())
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Json(stories))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateStoryRequest>,
) -> Result<Json<Story>, ApiError> {
    let id = Uuid::new_v4();
    state.db.insert_story(
        &id.to_string(),
        &req.account_id.to_string(),
        &req.content,
        req.date,
    )?;

    let row = state
        .db
        .get_story(&id.to_string())?
        .ok_or_else(|| anyhow::anyhow!("Story vanished after insert"))?;
    Ok(Json(row.into_story()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Story>, ApiError> {
    let id_str = id.to_string();
    let row = state
        .db
        .get_story(&id_str)?
        .ok_or_else(|| ApiError::not_found("Delete not successful", "Story not found"))?;
    state.db.delete_story(&id_str)?;
    Ok(Json(row.into_story()?))
}
