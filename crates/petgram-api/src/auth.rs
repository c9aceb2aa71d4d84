use anyhow::anyhow;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::Json;
use axum::extract::{Form, Multipart, Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use tracing::{error, warn};
use uuid::Uuid;

use petgram_db::queries::ProfileChanges;
use petgram_types::api::{
    LoginRequest, LoginResponse, MessageBody, RegisterRequest, ResetPasswordForm, TokenQuery,
};
use petgram_types::models::Account;

use crate::error::ApiError;
use crate::state::AppState;
use crate::{templates, tokens};

/// Shown on the verification and reset pages when a token fails to
/// decode. Deliberately vague, the token never reveals why it died.
const TOKEN_FAILURE_MSG: &str =
    "Something unexpected happened, please try again or contact support";

const MIN_PASSWORD_LEN: usize = 6;
const SHORT_PASSWORD_MSG: &str = "Password must have more than 6 characters";

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("Password hashing failed: {err}"))?;
    Ok(hash.to_string())
}

fn password_matches(stored_hash: &str, password: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Create an unverified account and mail the activation link. The
/// account row is kept even if the mail bounces, so a re-register after
/// "Email could not be sent" hits the UNIQUE constraint.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageBody>, ApiError> {
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(SHORT_PASSWORD_MSG));
    }

    let token = tokens::sign_email(&state.jwt_secret, &req.email)?;
    let hash = hash_password(&req.password)?;

    let account_id = Uuid::new_v4();
    state.db.create_account(
        &account_id.to_string(),
        &req.email,
        &req.username,
        &hash,
        &req.name,
    )?;

    let link = format!("{}/auth/verify-account/?xt={}", state.api_url, token);
    if let Err(err) = state
        .mailer
        .send(
            &req.email,
            "Activate your Petgram account",
            &templates::activation_email_body(&req.name, &link),
        )
        .await
    {
        error!("Error sending email: {:#}", err);
        return Err(ApiError::bad_request("Email could not be sent"));
    }

    Ok(Json(MessageBody {
        message: format!("Email has been sent to {}", req.email),
    }))
}

/// Activation link target. Always answers with an HTML page; a missing
/// token never reaches the database.
pub async fn verify_account(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Html<String>, ApiError> {
    let Some(token) = query.xt else {
        return Ok(Html(templates::verification_page("", Some("Not Authorized"))));
    };

    let claims = match tokens::verify_email(&state.jwt_secret, &token) {
        Ok(claims) => claims,
        Err(_) => {
            return Ok(Html(templates::verification_page(
                "",
                Some(TOKEN_FAILURE_MSG),
            )));
        }
    };

    state.db.mark_verified(&claims.email)?;
    Ok(Html(templates::verification_page(&claims.email, None)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.email.is_none() && req.username.is_none() {
        return Err(ApiError::bad_request("Email or Password not present"));
    }
    let Some(password) = req.password.filter(|p| !p.is_empty()) else {
        return Err(ApiError::bad_request("Email or Password not present"));
    };

    let row = if let Some(email) = &req.email {
        state.db.get_account_by_email(email)?
    } else if let Some(username) = &req.username {
        state.db.get_account_by_username(username)?
    } else {
        None
    };
    let row = row.ok_or_else(|| {
        ApiError::rejected("Your credentials are incorrect", "Login not successful")
    })?;

    if !password_matches(&row.password, &password) {
        return Err(ApiError::bad_request("Login not successful"));
    }
    if !row.is_verified {
        return Err(ApiError::rejected("User not verified", "Login not successful"));
    }

    let user = row.into_account()?;
    let token = tokens::sign_session(&state.jwt_secret, user.id, &user.email)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user,
        token,
        expiration: tokens::TOKEN_TTL_SECS,
    }))
}

/// Multipart profile update. An uploaded `avatar` lands in
/// `uploads/{id}.jpg` and wins over any `profile_pic` text field; an
/// empty `profile_pic` clears the picture and removes the file.
pub async fn edit_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Account>, ApiError> {
    let mut changes = ProfileChanges::default();
    let mut avatar_path: Option<String> = None;
    let mut pic_field: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(err.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "avatar" {
            let data = field
                .bytes()
                .await
                .map_err(|err| ApiError::bad_request(err.to_string()))?;
            tokio::fs::create_dir_all(&state.uploads_dir)
                .await
                .map_err(anyhow::Error::from)?;
            tokio::fs::write(state.uploads_dir.join(format!("{id}.jpg")), &data)
                .await
                .map_err(anyhow::Error::from)?;
            avatar_path = Some(format!("uploads/{id}.jpg"));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| ApiError::bad_request(err.to_string()))?;
        match name.as_str() {
            "username" => changes.username = Some(value),
            "name" => changes.name = Some(value),
            "bio" => changes.bio = Some(value),
            "is_private" => {
                let flag = value
                    .parse()
                    .map_err(|_| ApiError::bad_request("is_private must be true or false"))?;
                changes.is_private = Some(flag);
            }
            "profile_pic" => pic_field = Some(value),
            _ => {}
        }
    }

    let id_str = id.to_string();
    let updated = state.db.update_profile(&id_str, &changes)?;
    if updated == 0 {
        return Err(ApiError::rejected("Edit not successful", "User not found"));
    }

    match (avatar_path, pic_field) {
        (Some(path), _) => {
            state.db.set_profile_pic(&id_str, Some(&path))?;
        }
        (None, Some(value)) if value.is_empty() => {
            state.db.set_profile_pic(&id_str, None)?;
            let file = state.uploads_dir.join(format!("{id}.jpg"));
            if let Err(err) = tokio::fs::remove_file(&file).await {
                warn!("Error removing file {}: {}", file.display(), err);
            }
        }
        (None, Some(value)) => {
            state.db.set_profile_pic(&id_str, Some(&value))?;
        }
        (None, None) => {}
    }

    let row = state
        .db
        .get_account_by_id(&id_str)?
        .ok_or_else(|| ApiError::rejected("Edit not successful", "User not found"))?;
    Ok(Json(row.into_account()?))
}

/// New password travels in the `newpassword` request header.
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Account>, ApiError> {
    let new_password = headers
        .get("newpassword")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Missing newpassword header"))?;
    if new_password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(SHORT_PASSWORD_MSG));
    }

    let hash = hash_password(new_password)?;
    let id_str = id.to_string();
    let updated = state.db.update_password(&id_str, &hash)?;
    if updated == 0 {
        return Err(ApiError::rejected("Edit not successful", "User not found"));
    }

    let row = state
        .db
        .get_account_by_id(&id_str)?
        .ok_or_else(|| ApiError::rejected("Edit not successful", "User not found"))?;
    Ok(Json(row.into_account()?))
}

/// Compare the `password` request header against the stored hash. A
/// missing header is simply a wrong password.
pub async fn check_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<bool>, ApiError> {
    let row = state
        .db
        .get_account_by_id(&id.to_string())?
        .ok_or_else(|| ApiError::rejected("Could not check password", "User not found"))?;

    let matches = headers
        .get("password")
        .and_then(|v| v.to_str().ok())
        .map(|password| password_matches(&row.password, password))
        .unwrap_or(false);
    Ok(Json(matches))
}

/// Mail a reset link. The response body is identical whether or not the
/// email exists, and a mail failure here is only logged.
pub async fn forgot_password(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    if let Some(row) = state.db.get_account_by_email(&email)? {
        let account = row.into_account()?;
        let token = tokens::sign_reset(&state.jwt_secret, account.id)?;
        let link = format!("{}/auth/reset-password/?xt={}", state.api_url, token);

        if let Err(err) = state
            .mailer
            .send(
                &account.email,
                "Reset Password from Petgram",
                &templates::reset_email_body(&account.name, &link),
            )
            .await
        {
            error!("Error sending email: {:#}", err);
        }
    }

    Ok(Json(MessageBody {
        message: format!("Email has been sent to {email}"),
    }))
}

/// GET side of the reset flow: render the form with the token baked
/// into its action, or refuse without one.
pub async fn reset_password_form(
    Query(query): Query<TokenQuery>,
) -> Result<Html<String>, ApiError> {
    match query.xt {
        Some(token) => Ok(Html(templates::reset_form_page(&token))),
        None => Err(ApiError::unauthorized("Not Authorized")),
    }
}

/// POST side of the reset flow. Field validation runs before the token
/// is even looked at, matching the form's own error order.
pub async fn reset_password(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Html<String>, ApiError> {
    let new_password = form.new_password.filter(|p| !p.is_empty());
    let confirm_password = form.confirm_password.filter(|p| !p.is_empty());
    let (Some(new_password), Some(confirm_password)) = (new_password, confirm_password) else {
        return Err(ApiError::bad_request("There are empty fields"));
    };

    if new_password != confirm_password {
        return Err(ApiError::bad_request(
            "New Password and Confirm Password doesn't match",
        ));
    }
    if new_password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(SHORT_PASSWORD_MSG));
    }

    let Some(token) = query.xt else {
        return Err(ApiError::unauthorized("Not Authorized"));
    };
    let claims = tokens::verify_reset(&state.jwt_secret, &token)
        .map_err(|_| ApiError::unauthorized(TOKEN_FAILURE_MSG))?;

    let hash = hash_password(&new_password)?;
    let updated = state.db.update_password(&claims.sub.to_string(), &hash)?;
    if updated == 0 {
        return Err(ApiError::unauthorized("Password change not successful"));
    }

    Ok(Html(templates::reset_success_page()))
}

/// Remove the account and everything it authored in one transaction.
/// Chats and direct messages outlive their author.
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, ApiError> {
    let row = state
        .db
        .delete_account_cascade(&id.to_string())?
        .ok_or_else(|| ApiError::rejected("Delete not successful", "User not found"))?;
    Ok(Json(row.into_account()?))
}
