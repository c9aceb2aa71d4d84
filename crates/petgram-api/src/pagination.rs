use serde::Deserialize;

fn default_page() -> u32 {
    1
}

/// Uniform list pagination: `?page=` starts at 1, `?limit=0` (the
/// default) returns everything.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

impl PageQuery {
    /// SQL LIMIT/OFFSET pair; limit -1 is SQLite's "no limit".
    pub fn bounds(&self) -> (i64, i64) {
        petgram_db::queries::page_bounds(self.page, self.limit)
    }
}
