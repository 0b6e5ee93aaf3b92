use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Where raw listing rows are read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceSettings {
    /// SQLite database written by the scraper
    Sqlite { path: PathBuf, table: String },
    /// JSON array of row objects
    Json { path: PathBuf },
}

/// Runtime settings for a normalization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub source: SourceSettings,
    /// Destination of the flattened rows (JSON array)
    pub output_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: SourceSettings::Sqlite {
                path: PathBuf::from("../local/apartments.db"),
                table: "apartments".to_string(),
            },
            output_path: PathBuf::from("flattened_listings.json"),
        }
    }
}

impl Settings {
    /// Load settings from the environment (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        // A missing .env file is not an error
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(path) = lookup("LISTINGS_JSON_PATH") {
            settings.source = SourceSettings::Json { path: path.into() };
        } else {
            let path = lookup("LISTINGS_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("../local/apartments.db"));
            let table = lookup("LISTINGS_TABLE").unwrap_or_else(|| "apartments".to_string());
            validate_table_name(&table)?;
            settings.source = SourceSettings::Sqlite { path, table };
        }

        if let Some(path) = lookup("LISTINGS_OUTPUT_PATH") {
            settings.output_path = path.into();
        }

        Ok(settings)
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass
pub fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid {
        bail!("Invalid table name: {:?}", table);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_json_source_wins() {
        let settings = Settings::from_lookup(lookup(&[
            ("LISTINGS_JSON_PATH", "rows.json"),
            ("LISTINGS_OUTPUT_PATH", "out.json"),
        ]))
        .unwrap();

        assert_eq!(
            settings.source,
            SourceSettings::Json {
                path: PathBuf::from("rows.json")
            }
        );
        assert_eq!(settings.output_path, PathBuf::from("out.json"));
    }

    #[test]
    fn test_rejects_injected_table_name() {
        assert!(Settings::from_lookup(lookup(&[("LISTINGS_TABLE", "apartments; DROP TABLE x")])).is_err());
        assert!(validate_table_name("apartments_2024").is_ok());
        assert!(validate_table_name("2024").is_err());
    }
}
