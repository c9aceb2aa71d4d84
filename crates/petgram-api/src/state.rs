use std::path::PathBuf;
use std::sync::Arc;

use petgram_db::Database;

use crate::mailer::Mailer;

/// Shared application state for all route handlers. The JWT secret and
/// the public API URL are loaded once at startup and travel here, so no
/// handler or middleware reads the environment.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub mailer: Arc<dyn Mailer>,
    pub jwt_secret: String,
    pub api_url: String,
    pub uploads_dir: PathBuf,
}
