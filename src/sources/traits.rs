use crate::models::RawRow;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that supplies raw listing rows
/// (the scraper's SQLite database, JSON exports, ...)
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch every raw row from the source
    async fn fetch_rows(&self) -> Result<Vec<RawRow>>;

    /// Get the name of the row source
    fn source_name(&self) -> &'static str;
}
