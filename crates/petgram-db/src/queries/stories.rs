use anyhow::Result;
use chrono::{DateTime, Utc};

use super::OptionalExt;
use crate::Database;
use crate::models::StoryRow;

impl Database {
    // -- Stories --

    pub fn insert_story(
        &self,
        id: &str,
        account_id: &str,
        content: &str,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let created_at = created_at.unwrap_or_else(Utc::now).to_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO stories (id, account_id, content, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, account_id, content, created_at],
            )?;
            Ok(())
        })
    }

    pub fn get_story(&self, id: &str) -> Result<Option<StoryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, content, created_at FROM stories WHERE id = ?1",
            )?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(StoryRow {
                        id: row.get(0)?,
                        account_id: row.get(1)?,
                        content: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_stories_by_account(
        &self,
        account_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StoryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, content, created_at
                 FROM stories WHERE account_id = ?1
                 ORDER BY created_at
                 LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![account_id, limit, offset], |row| {
                    Ok(StoryRow {
                        id: row.get(0)?,
                        account_id: row.get(1)?,
                        content: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_story(&self, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM stories WHERE id = ?1", [id])?;
            Ok(n)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    #[test]
    fn stories_come_back_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("petgram.db")).unwrap();

        db.insert_story("s1", "a1", "first", None).unwrap();
        db.insert_story("s2", "a1", "second", None).unwrap();

        let rows = db.list_stories_by_account("a1", -1, 0).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].content, "first");
        assert_eq!(rows[1].content, "second");
    }
}
