pub mod auth;
pub mod chats;
pub mod comments;
pub mod direct_messages;
pub mod error;
pub mod follows;
pub mod liked_comments;
pub mod liked_posts;
pub mod mailer;
pub mod middleware;
pub mod pagination;
pub mod posts;
pub mod router;
pub mod saved_posts;
pub mod shared_posts;
pub mod state;
pub mod stories;
pub mod templates;
pub mod tokens;

pub use router::router;
pub use state::AppState;

/// Stored ids are written from `Uuid::to_string`, so a parse failure
/// here means the database was edited by hand.
pub(crate) fn parse_ids(ids: Vec<String>) -> anyhow::Result<Vec<uuid::Uuid>> {
    ids.iter()
        .map(|id| id.parse().map_err(anyhow::Error::from))
        .collect()
}
