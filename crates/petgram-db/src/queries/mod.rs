mod accounts;
mod chats;
mod comments;
mod posts;
mod social;
mod stories;

pub use accounts::ProfileChanges;

use anyhow::Result;

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Translate page/limit into SQL LIMIT/OFFSET. Limit 0 means "no limit",
/// which SQLite spells LIMIT -1.
pub fn page_bounds(page: u32, limit: u32) -> (i64, i64) {
    if limit == 0 {
        (-1, 0)
    } else {
        let page = page.max(1);
        (limit as i64, ((page - 1) as i64) * limit as i64)
    }
}
