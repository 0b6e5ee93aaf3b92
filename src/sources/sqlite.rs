use crate::config::validate_table_name;
use crate::models::RawRow;
use crate::sources::traits::RowSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads every row of the scraper's listings table
pub struct SqliteSource {
    path: PathBuf,
    table: String,
}

impl SqliteSource {
    pub fn new(path: impl AsRef<Path>, table: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            table: table.into(),
        }
    }
}

fn cell_to_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(x) => x.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn fetch_table(path: &Path, table: &str) -> Result<Vec<RawRow>> {
    validate_table_name(table)?;

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open database {}", path.display()))?;

    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {}", table))
        .with_context(|| format!("Failed to query table {}", table))?;

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    debug!("Table {} has columns: {:?}", table, columns);

    let rows = stmt
        .query_map([], |row| {
            let mut raw = RawRow::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                raw.insert(name.clone(), cell_to_text(row.get_ref(i)?));
            }
            Ok(raw)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read listing rows")?;

    Ok(rows)
}

#[async_trait]
impl RowSource for SqliteSource {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        info!("Reading table {} from {}", self.table, self.path.display());

        let path = self.path.clone();
        let table = self.table.clone();
        let rows = tokio::task::spawn_blocking(move || fetch_table(&path, &table))
            .await
            .context("SQLite reader task failed")??;

        info!("Fetched {} rows from {}", rows.len(), self.table);
        Ok(rows)
    }

    fn source_name(&self) -> &'static str {
        "SQLite"
    }
}
