use anyhow::Result;
use chrono::{DateTime, Utc};

use super::OptionalExt;
use crate::Database;
use crate::models::PostRow;

impl Database {
    // -- Posts --

    pub fn insert_post(
        &self,
        id: &str,
        account_id: &str,
        content_json: &str,
        description: &str,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let created_at = created_at.unwrap_or_else(Utc::now).to_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO posts (id, account_id, content, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, account_id, content_json, description, created_at],
            )?;
            Ok(())
        })
    }

    pub fn get_post(&self, id: &str) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, content, description, created_at
                 FROM posts WHERE id = ?1",
            )?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(PostRow {
                        id: row.get(0)?,
                        account_id: row.get(1)?,
                        content: row.get(2)?,
                        description: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_posts_by_account(
        &self,
        account_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, content, description, created_at
                 FROM posts WHERE account_id = ?1
                 ORDER BY created_at
                 LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![account_id, limit, offset], |row| {
                    Ok(PostRow {
                        id: row.get(0)?,
                        account_id: row.get(1)?,
                        content: row.get(2)?,
                        description: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_post_description(&self, id: &str, description: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE posts SET description = ?2 WHERE id = ?1",
                rusqlite::params![id, description],
            )?;
            Ok(n)
        })
    }

    pub fn delete_post(&self, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(n)
        })
    }
}
