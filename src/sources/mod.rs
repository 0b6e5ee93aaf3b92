pub mod json;
pub mod sqlite;
pub mod traits;

pub use json::JsonSource;
pub use sqlite::SqliteSource;
pub use traits::RowSource;

use crate::config::SourceSettings;

/// Build the row source described by `settings`
pub fn from_settings(settings: &SourceSettings) -> Box<dyn RowSource> {
    match settings {
        SourceSettings::Sqlite { path, table } => Box::new(SqliteSource::new(path, table)),
        SourceSettings::Json { path } => Box::new(JsonSource::new(path)),
    }
}
