use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use petgram_types::api::{CreateDirectMessageRequest, UpdateDirectMessageRequest};
use petgram_types::models::DirectMessage;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Path(chat_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<DirectMessage>>, ApiError> {
    let (limit, offset) = page.bounds();
    let rows = state
        .db
        .list_messages_by_chat(&chat_id.to_string(), limit, offset)?;
    let messages = rows
        .into_iter()
        .map(|row| row.into_direct_message())
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Json(messages))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateDirectMessageRequest>,
) -> Result<Json<DirectMessage>, ApiError> {
    let id = Uuid::new_v4();
    state.db.insert_direct_message(
        &id.to_string(),
        &req.chat_id.to_string(),
        &req.sender_id.to_string(),
        &req.message,
        req.date,
    )?;

    let row = state
        .db
        .get_direct_message(&id.to_string())?
        .ok_or_else(|| anyhow::anyhow!("Message vanished after insert"))?;
    Ok(Json(row.into_direct_message()?))
}

// Missing rows on the edit path report the delete wording; the clients
// match on it, so it stays.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDirectMessageRequest>,
) -> Result<Json<DirectMessage>, ApiError> {
    let id_str = id.to_string();
    let updated = state.db.update_direct_message(&id_str, &req.message)?;
    if updated == 0 {
        return Err(ApiError::not_found(
            "Delete not successful",
            "Message not found",
        ));
    }

    let row = state
        .db
        .get_direct_message(&id_str)?
        .ok_or_else(|| ApiError::not_found("Delete not successful", "Message not found"))?;
    Ok(Json(row.into_direct_message()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DirectMessage>, ApiError> {
    let id_str = id.to_string();
    let row = state
        .db
        .get_direct_message(&id_str)?
        .ok_or_else(|| ApiError::not_found("Delete not successful", "Message not found"))?;
    state.db.delete_direct_message(&id_str)?;
    Ok(Json(row.into_direct_message()?))
}
