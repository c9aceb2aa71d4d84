use anyhow::Result;
use chrono::{DateTime, Utc};

use super::OptionalExt;
use crate::Database;
use crate::models::CommentRow;

impl Database {
    // -- Comments --

    pub fn insert_comment(
        &self,
        id: &str,
        post_id: &str,
        account_id: &str,
        content: &str,
        replied_to: Option<&str>,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let created_at = created_at.unwrap_or_else(Utc::now).to_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO comments (id, post_id, account_id, content, replied_to, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, post_id, account_id, content, replied_to, created_at],
            )?;
            Ok(())
        })
    }

    pub fn get_comment(&self, id: &str) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, post_id, account_id, content, replied_to, created_at
                 FROM comments WHERE id = ?1",
            )?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(CommentRow {
                        id: row.get(0)?,
                        post_id: row.get(1)?,
                        account_id: row.get(2)?,
                        content: row.get(3)?,
                        replied_to: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_comments_by_post(
        &self,
        post_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, post_id, account_id, content, replied_to, created_at
                 FROM comments WHERE post_id = ?1
                 ORDER BY created_at
                 LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![post_id, limit, offset], |row| {
                    Ok(CommentRow {
                        id: row.get(0)?,
                        post_id: row.get(1)?,
                        account_id: row.get(2)?,
                        content: row.get(3)?,
                        replied_to: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_comment_content(&self, id: &str, content: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE comments SET content = ?2 WHERE id = ?1",
                rusqlite::params![id, content],
            )?;
            Ok(n)
        })
    }

    pub fn delete_comment(&self, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(n)
        })
    }
}
