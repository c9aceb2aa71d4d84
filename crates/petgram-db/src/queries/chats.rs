use anyhow::Result;
use chrono::{DateTime, Utc};

use super::OptionalExt;
use crate::Database;
use crate::models::{ChatRow, DirectMessageRow};

impl Database {
    // -- Chats --

    /// Insert a chat and its membership rows in one transaction.
    pub fn create_chat(&self, id: &str, title: &str, member_ids: &[String]) -> Result<()> {
        self.with_txn(|txn| {
            txn.execute(
                "INSERT INTO chats (id, title) VALUES (?1, ?2)",
                rusqlite::params![id, title],
            )?;
            for member in member_ids {
                txn.execute(
                    "INSERT OR IGNORE INTO chat_members (chat_id, account_id) VALUES (?1, ?2)",
                    rusqlite::params![id, member],
                )?;
            }
            Ok(())
        })
    }

    pub fn get_chat(&self, id: &str) -> Result<Option<ChatRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, title FROM chats WHERE id = ?1")?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(ChatRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_chat_members(&self, chat_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT account_id FROM chat_members WHERE chat_id = ?1 ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([chat_id], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Chats the account is a member of.
    pub fn list_chats_for_account(
        &self,
        account_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChatRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.title
                 FROM chats c
                 JOIN chat_members m ON m.chat_id = c.id
                 WHERE m.account_id = ?1
                 ORDER BY c.rowid
                 LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![account_id, limit, offset], |row| {
                    Ok(ChatRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_chat_title(&self, id: &str, title: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE chats SET title = ?2 WHERE id = ?1",
                rusqlite::params![id, title],
            )?;
            Ok(n)
        })
    }

    /// Membership rows go with the chat (ON DELETE CASCADE); messages stay.
    pub fn delete_chat(&self, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM chats WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    // -- Direct messages --

    pub fn insert_direct_message(
        &self,
        id: &str,
        chat_id: &str,
        sender_id: &str,
        message: &str,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let created_at = created_at.unwrap_or_else(Utc::now).to_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO direct_messages (id, chat_id, sender_id, message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, chat_id, sender_id, message, created_at],
            )?;
            Ok(())
        })
    }

    pub fn get_direct_message(&self, id: &str) -> Result<Option<DirectMessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chat_id, sender_id, message, created_at
                 FROM direct_messages WHERE id = ?1",
            )?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(DirectMessageRow {
                        id: row.get(0)?,
                        chat_id: row.get(1)?,
                        sender_id: row.get(2)?,
                        message: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_messages_by_chat(
        &self,
        chat_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DirectMessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chat_id, sender_id, message, created_at
                 FROM direct_messages WHERE chat_id = ?1
                 ORDER BY created_at
                 LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![chat_id, limit, offset], |row| {
                    Ok(DirectMessageRow {
                        id: row.get(0)?,
                        chat_id: row.get(1)?,
                        sender_id: row.get(2)?,
                        message: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_direct_message(&self, id: &str, message: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE direct_messages SET message = ?2 WHERE id = ?1",
                rusqlite::params![id, message],
            )?;
            Ok(n)
        })
    }

    pub fn delete_direct_message(&self, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM direct_messages WHERE id = ?1", [id])?;
            Ok(n)
        })
    }
}
