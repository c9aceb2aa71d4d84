use anyhow::Result;
use rusqlite::Connection;

use super::OptionalExt;
use crate::Database;
use crate::models::AccountRow;

/// Partial profile update. `None` keeps the stored value; `profile_pic`
/// is handled separately because clearing it is a distinct operation.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub is_private: Option<bool>,
}

const ACCOUNT_COLUMNS: &str =
    "id, email, username, password, name, bio, profile_pic, is_private, is_verified, created_at";

impl Database {
    // -- Accounts --

    pub fn create_account(
        &self,
        id: &str,
        email: &str,
        username: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<()> {
        let created_at = chrono::Utc::now().to_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO accounts (id, email, username, password, name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, email, username, password_hash, name, created_at],
            )?;
            Ok(())
        })
    }

    pub fn get_account_by_id(&self, id: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account(conn, "id", id))
    }

    pub fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account(conn, "email", email))
    }

    pub fn get_account_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account(conn, "username", username))
    }

    /// Flip the verified flag for the account owning `email`.
    /// Returns the number of rows touched (0 when the email is unknown).
    pub fn mark_verified(&self, email: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE accounts SET is_verified = 1 WHERE email = ?1",
                [email],
            )?;
            Ok(n)
        })
    }

    pub fn update_profile(&self, id: &str, changes: &ProfileChanges) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE accounts SET
                    username   = COALESCE(?2, username),
                    name       = COALESCE(?3, name),
                    bio        = COALESCE(?4, bio),
                    is_private = COALESCE(?5, is_private)
                 WHERE id = ?1",
                rusqlite::params![
                    id,
                    changes.username,
                    changes.name,
                    changes.bio,
                    changes.is_private,
                ],
            )?;
            Ok(n)
        })
    }

    /// Set or clear the stored profile picture path.
    pub fn set_profile_pic(&self, id: &str, pic: Option<&str>) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE accounts SET profile_pic = ?2 WHERE id = ?1",
                rusqlite::params![id, pic],
            )?;
            Ok(n)
        })
    }

    pub fn update_password(&self, id: &str, password_hash: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE accounts SET password = ?2 WHERE id = ?1",
                rusqlite::params![id, password_hash],
            )?;
            Ok(n)
        })
    }

    /// Delete an account and every dependent row in one transaction.
    /// Chats, chat membership and direct messages are left in place.
    /// Returns the deleted account row, or None when the id is unknown.
    pub fn delete_account_cascade(&self, id: &str) -> Result<Option<AccountRow>> {
        self.with_txn(|txn| {
            let Some(row) = query_account(txn, "id", id)? else {
                return Ok(None);
            };

            txn.execute("DELETE FROM stories WHERE account_id = ?1", [id])?;
            txn.execute("DELETE FROM shared_posts WHERE account_id = ?1", [id])?;
            txn.execute("DELETE FROM saved_posts WHERE account_id = ?1", [id])?;
            txn.execute("DELETE FROM posts WHERE account_id = ?1", [id])?;
            txn.execute("DELETE FROM liked_posts WHERE account_id = ?1", [id])?;
            txn.execute("DELETE FROM liked_comments WHERE account_id = ?1", [id])?;
            txn.execute(
                "DELETE FROM follows WHERE follower_id = ?1 OR followed_id = ?1",
                [id],
            )?;
            txn.execute("DELETE FROM comments WHERE account_id = ?1", [id])?;
            txn.execute("DELETE FROM accounts WHERE id = ?1", [id])?;

            Ok(Some(row))
        })
    }
}

fn query_account(conn: &Connection, column: &str, value: &str) -> Result<Option<AccountRow>> {
    // `column` is one of our own identifiers, never caller input.
    let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = ?1");
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(AccountRow {
                id: row.get(0)?,
                email: row.get(1)?,
                username: row.get(2)?,
                password: row.get(3)?,
                name: row.get(4)?,
                bio: row.get(5)?,
                profile_pic: row.get(6)?,
                is_private: row.get(7)?,
                is_verified: row.get(8)?,
                created_at: row.get(9)?,
            })
        })
        .optional()?;

    Ok(row)
}
