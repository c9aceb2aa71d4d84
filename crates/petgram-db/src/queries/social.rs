use anyhow::Result;

use super::OptionalExt;
use crate::Database;
use crate::models::{CommentMarkRow, FollowRow, PostMarkRow};

// The three post-mark tables share one row shape, so the lookups below go
// through helpers parameterized by table name. Table names are fixed
// constants, never caller input.
const LIKED_POSTS: &str = "liked_posts";
const SHARED_POSTS: &str = "shared_posts";
const SAVED_POSTS: &str = "saved_posts";

impl Database {
    // -- Follows --

    pub fn insert_follow(&self, id: &str, follower_id: &str, followed_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO follows (id, follower_id, followed_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, follower_id, followed_id],
            )?;
            Ok(())
        })
    }

    pub fn get_follow(&self, id: &str) -> Result<Option<FollowRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, follower_id, followed_id FROM follows WHERE id = ?1")?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(FollowRow {
                        id: row.get(0)?,
                        follower_id: row.get(1)?,
                        followed_id: row.get(2)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    /// Accounts following `account_id`.
    pub fn list_follower_ids(
        &self,
        account_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<String>> {
        self.list_ids(
            "SELECT follower_id FROM follows WHERE followed_id = ?1
             ORDER BY rowid LIMIT ?2 OFFSET ?3",
            account_id,
            limit,
            offset,
        )
    }

    /// Accounts `account_id` follows.
    pub fn list_following_ids(
        &self,
        account_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<String>> {
        self.list_ids(
            "SELECT followed_id FROM follows WHERE follower_id = ?1
             ORDER BY rowid LIMIT ?2 OFFSET ?3",
            account_id,
            limit,
            offset,
        )
    }

    pub fn delete_follow(&self, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM follows WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    // -- Liked posts --

    pub fn insert_liked_post(&self, id: &str, post_id: &str, account_id: &str) -> Result<()> {
        self.insert_post_mark(LIKED_POSTS, id, post_id, account_id)
    }

    pub fn get_liked_post(&self, id: &str) -> Result<Option<PostMarkRow>> {
        self.get_post_mark(LIKED_POSTS, id)
    }

    pub fn list_post_likers(&self, post_id: &str, limit: i64, offset: i64) -> Result<Vec<String>> {
        self.list_ids(
            "SELECT account_id FROM liked_posts WHERE post_id = ?1
             ORDER BY rowid LIMIT ?2 OFFSET ?3",
            post_id,
            limit,
            offset,
        )
    }

    pub fn delete_liked_post(&self, id: &str) -> Result<usize> {
        self.delete_post_mark(LIKED_POSTS, id)
    }

    // -- Liked comments --

    pub fn insert_liked_comment(&self, id: &str, comment_id: &str, account_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO liked_comments (id, comment_id, account_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, comment_id, account_id],
            )?;
            Ok(())
        })
    }

    pub fn get_liked_comment(&self, id: &str) -> Result<Option<CommentMarkRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, comment_id, account_id FROM liked_comments WHERE id = ?1",
            )?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(CommentMarkRow {
                        id: row.get(0)?,
                        comment_id: row.get(1)?,
                        account_id: row.get(2)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_comment_likers(
        &self,
        comment_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<String>> {
        self.list_ids(
            "SELECT account_id FROM liked_comments WHERE comment_id = ?1
             ORDER BY rowid LIMIT ?2 OFFSET ?3",
            comment_id,
            limit,
            offset,
        )
    }

    pub fn delete_liked_comment(&self, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM liked_comments WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    // -- Shared posts --

    pub fn insert_shared_post(&self, id: &str, post_id: &str, account_id: &str) -> Result<()> {
        self.insert_post_mark(SHARED_POSTS, id, post_id, account_id)
    }

    pub fn get_shared_post(&self, id: &str) -> Result<Option<PostMarkRow>> {
        self.get_post_mark(SHARED_POSTS, id)
    }

    /// Post ids an account has shared.
    pub fn list_shared_post_ids(
        &self,
        account_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<String>> {
        self.list_ids(
            "SELECT post_id FROM shared_posts WHERE account_id = ?1
             ORDER BY rowid LIMIT ?2 OFFSET ?3",
            account_id,
            limit,
            offset,
        )
    }

    /// Account ids that shared a post.
    pub fn list_post_sharers(&self, post_id: &str, limit: i64, offset: i64) -> Result<Vec<String>> {
        self.list_ids(
            "SELECT account_id FROM shared_posts WHERE post_id = ?1
             ORDER BY rowid LIMIT ?2 OFFSET ?3",
            post_id,
            limit,
            offset,
        )
    }

    pub fn delete_shared_post(&self, id: &str) -> Result<usize> {
        self.delete_post_mark(SHARED_POSTS, id)
    }

    // -- Saved posts --

    pub fn insert_saved_post(&self, id: &str, post_id: &str, account_id: &str) -> Result<()> {
        self.insert_post_mark(SAVED_POSTS, id, post_id, account_id)
    }

    pub fn get_saved_post(&self, id: &str) -> Result<Option<PostMarkRow>> {
        self.get_post_mark(SAVED_POSTS, id)
    }

    pub fn list_saved_post_ids(
        &self,
        account_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<String>> {
        self.list_ids(
            "SELECT post_id FROM saved_posts WHERE account_id = ?1
             ORDER BY rowid LIMIT ?2 OFFSET ?3",
            account_id,
            limit,
            offset,
        )
    }

    pub fn delete_saved_post(&self, id: &str) -> Result<usize> {
        self.delete_post_mark(SAVED_POSTS, id)
    }

    // -- Shared helpers --

    fn insert_post_mark(&self, table: &str, id: &str, post_id: &str, account_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            let sql = format!("INSERT INTO {table} (id, post_id, account_id) VALUES (?1, ?2, ?3)");
            conn.execute(&sql, rusqlite::params![id, post_id, account_id])?;
            Ok(())
        })
    }

    fn get_post_mark(&self, table: &str, id: &str) -> Result<Option<PostMarkRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT id, post_id, account_id FROM {table} WHERE id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(PostMarkRow {
                        id: row.get(0)?,
                        post_id: row.get(1)?,
                        account_id: row.get(2)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    fn delete_post_mark(&self, table: &str, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let sql = format!("DELETE FROM {table} WHERE id = ?1");
            let n = conn.execute(&sql, [id])?;
            Ok(n)
        })
    }

    fn list_ids(&self, sql: &str, key: &str, limit: i64, offset: i64) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt
                .query_map(rusqlite::params![key, limit, offset], |row| {
                    row.get::<_, String>(0)
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}
