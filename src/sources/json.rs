use crate::models::RawRow;
use crate::sources::traits::RowSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads rows from a JSON array of objects, e.g. an export of the listings table
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn object_to_row(object: Map<String, Value>) -> RawRow {
    object
        .into_iter()
        .map(|(key, value)| (key, value_to_text(value)))
        .collect()
}

#[async_trait]
impl RowSource for JsonSource {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        info!("Reading rows from {}", self.path.display());

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let objects: Vec<Map<String, Value>> = serde_json::from_str(&content)
            .with_context(|| format!("Expected a JSON array of objects in {}", self.path.display()))?;

        Ok(objects.into_iter().map(object_to_row).collect())
    }

    fn source_name(&self) -> &'static str {
        "JSON"
    }
}
