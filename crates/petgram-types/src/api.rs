use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Account;

// -- JWT Claims --

/// Session token claims issued on login and checked by the bearer
/// middleware. Canonical definition lives here in petgram-types so the
/// api crate and any future consumers agree on the shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

/// Claims carried by the account-activation link mailed at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailClaims {
    pub email: String,
    pub exp: usize,
}

/// Claims carried by the password-reset link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    pub sub: Uuid,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: String,
}

/// Login accepts either identifier; password is optional only so the
/// handler can answer missing fields with 400 instead of a decode error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: Account,
    pub token: String,
    pub expiration: u64,
}

/// Generic `{"message": ...}` body used by register, forgot-password and
/// the error responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// `?xt=<token>` query string on the email-driven endpoints.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub xt: Option<String>,
}

/// Fields posted by the reset-password HTML form. Optional so empty
/// submissions reach the handler's own validation.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

// -- Posts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
    pub account_id: Uuid,
    pub content: Vec<String>,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePostRequest {
    pub description: String,
}

// -- Stories --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateStoryRequest {
    pub account_id: Uuid,
    pub content: String,
    pub date: Option<DateTime<Utc>>,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub account_id: Uuid,
    pub content: String,
    pub replied_to: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentRequest {
    pub content: String,
}

// -- Follows --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFollowRequest {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
}

// -- Post/comment marks (likes, shares, saves) --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostMarkRequest {
    pub account_id: Uuid,
    pub post_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentMarkRequest {
    pub account_id: Uuid,
    pub comment_id: Uuid,
}

// -- Chats --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateChatRequest {
    pub members: Vec<Uuid>,
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateChatRequest {
    pub title: String,
}

// -- Direct messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateDirectMessageRequest {
    pub sender_id: Uuid,
    pub chat_id: Uuid,
    pub message: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDirectMessageRequest {
    pub message: String,
}
