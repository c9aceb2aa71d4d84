use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;
use crate::tokens;

/// Extract and validate the session JWT from the Authorization header.
/// The secret comes from state, loaded once at startup.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Not authorized"))?;

    let claims = tokens::verify_session(&state.jwt_secret, token)
        .map_err(|_| ApiError::unauthorized("Not authorized"))?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
