use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use petgram_types::api::{EmailClaims, ResetClaims, SessionClaims};

/// All three token kinds expire after 3 hours, matching the session
/// cookie lifetime the clients were built around.
pub const TOKEN_TTL_SECS: u64 = 10_800;

fn expiry() -> usize {
    (chrono::Utc::now() + chrono::Duration::seconds(TOKEN_TTL_SECS as i64)).timestamp() as usize
}

pub fn sign_session(secret: &str, account_id: Uuid, email: &str) -> Result<String> {
    let claims = SessionClaims {
        sub: account_id,
        email: email.to_string(),
        exp: expiry(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn verify_session(secret: &str, token: &str) -> Result<SessionClaims> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

pub fn sign_email(secret: &str, email: &str) -> Result<String> {
    let claims = EmailClaims {
        email: email.to_string(),
        exp: expiry(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn verify_email(secret: &str, token: &str) -> Result<EmailClaims> {
    let data = decode::<EmailClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

pub fn sign_reset(secret: &str, account_id: Uuid) -> Result<String> {
    let claims = ResetClaims {
        sub: account_id,
        exp: expiry(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn verify_reset(secret: &str, token: &str) -> Result<ResetClaims> {
    let data = decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
