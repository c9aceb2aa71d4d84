use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);",
    )?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE accounts (
                id          TEXT PRIMARY KEY,
                email       TEXT NOT NULL UNIQUE,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                name        TEXT NOT NULL,
                bio         TEXT,
                profile_pic TEXT,
                is_private  INTEGER NOT NULL DEFAULT 0,
                is_verified INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE posts (
                id          TEXT PRIMARY KEY,
                account_id  TEXT NOT NULL,
                content     TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_posts_account ON posts(account_id, created_at);

            CREATE TABLE stories (
                id          TEXT PRIMARY KEY,
                account_id  TEXT NOT NULL,
                content     TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_stories_account ON stories(account_id, created_at);

            CREATE TABLE comments (
                id          TEXT PRIMARY KEY,
                post_id     TEXT NOT NULL,
                account_id  TEXT NOT NULL,
                content     TEXT NOT NULL,
                replied_to  TEXT,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_comments_post ON comments(post_id, created_at);

            CREATE TABLE follows (
                id          TEXT PRIMARY KEY,
                follower_id TEXT NOT NULL,
                followed_id TEXT NOT NULL
            );

            CREATE INDEX idx_follows_follower ON follows(follower_id);
            CREATE INDEX idx_follows_followed ON follows(followed_id);

            CREATE TABLE liked_posts (
                id          TEXT PRIMARY KEY,
                post_id     TEXT NOT NULL,
                account_id  TEXT NOT NULL
            );

            CREATE INDEX idx_liked_posts_post ON liked_posts(post_id);

            CREATE TABLE liked_comments (
                id          TEXT PRIMARY KEY,
                comment_id  TEXT NOT NULL,
                account_id  TEXT NOT NULL
            );

            CREATE INDEX idx_liked_comments_comment ON liked_comments(comment_id);

            CREATE TABLE shared_posts (
                id          TEXT PRIMARY KEY,
                post_id     TEXT NOT NULL,
                account_id  TEXT NOT NULL
            );

            CREATE INDEX idx_shared_posts_post ON shared_posts(post_id);
            CREATE INDEX idx_shared_posts_account ON shared_posts(account_id);

            CREATE TABLE saved_posts (
                id          TEXT PRIMARY KEY,
                post_id     TEXT NOT NULL,
                account_id  TEXT NOT NULL
            );

            CREATE INDEX idx_saved_posts_account ON saved_posts(account_id);

            CREATE TABLE chats (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL
            );

            CREATE TABLE chat_members (
                chat_id     TEXT NOT NULL REFERENCES chats(id) ON DELETE CASCADE,
                account_id  TEXT NOT NULL,
                PRIMARY KEY (chat_id, account_id)
            );

            CREATE INDEX idx_chat_members_account ON chat_members(account_id);

            CREATE TABLE direct_messages (
                id          TEXT PRIMARY KEY,
                chat_id     TEXT NOT NULL,
                sender_id   TEXT NOT NULL,
                message     TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_direct_messages_chat ON direct_messages(chat_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
