use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use petgram_db::Database;
use petgram_types::api::{CreateChatRequest, UpdateChatRequest};
use petgram_types::models::Chat;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::state::AppState;

fn load_chat(db: &Database, id: &str) -> anyhow::Result<Option<Chat>> {
    let Some(row) = db.get_chat(id)? else {
        return Ok(None);
    };
    let members = db.get_chat_members(id)?;
    Ok(Some(row.into_chat(members)?))
}

/// Chats `{account_id}` is a member of.
pub async fn list(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Chat>>, ApiError> {
    let (limit, offset) = page.bounds();
    let rows = state
        .db
        .list_chats_for_account(&account_id.to_string(), limit, offset)?;

    let mut chats = Vec::with_capacity(rows.len());
    for row in rows {
        let members = state.db.get_chat_members(&row.id)?;
        chats.push(row.into_chat(members)?);
    }
    Ok(Json(chats))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateChatRequest>,
) -> Result<Json<Chat>, ApiError> {
    let id = Uuid::new_v4();
    let members: Vec<String> = req.members.iter().map(Uuid::to_string).collect();
    state.db.create_chat(&id.to_string(), &req.title, &members)?;

    let chat = load_chat(&state.db, &id.to_string())?
        .ok_or_else(|| anyhow::anyhow!("Chat vanished after insert"))?;
    Ok(Json(chat))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateChatRequest>,
) -> Result<Json<Chat>, ApiError> {
    let id_str = id.to_string();
    let updated = state.db.update_chat_title(&id_str, &req.title)?;
    if updated == 0 {
        return Err(ApiError::not_found("Edit not successful", "Chat not found"));
    }

    let chat = load_chat(&state.db, &id_str)?
        .ok_or_else(|| ApiError::not_found("Edit not successful", "Chat not found"))?;
    Ok(Json(chat))
}

/// Membership rows go with the chat; its messages are kept.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Chat>, ApiError> {
    let id_str = id.to_string();
    let chat = load_chat(&state.db, &id_str)?
        .ok_or_else(|| ApiError::not_found("Delete not successful", "Chat not found"))?;
    state.db.delete_chat(&id_str)?;
    Ok(Json(chat))
}
