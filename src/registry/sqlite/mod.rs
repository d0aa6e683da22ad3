//! SQLite-backed registry.
//!
//! Each call opens its own connection so concurrent requests never share one;
//! SQLite's own locking (with a busy timeout) serializes the writes.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::{
    FrequencyMapping, FrequencySummary, ModelRegistry, PredictionRecord, RegistryError,
    TrainedModel, default_frequency_mappings,
};

mod read;
mod schema;
mod write;

/// Default database filename inside the app directory.
pub const DB_FILE_NAME: &str = "symptra.db";

/// Registry stored in a single SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteRegistry {
    path: PathBuf,
}

impl SqliteRegistry {
    /// Open (or create) the database, apply the schema and seed the built-in
    /// frequency mappings. Existing mappings are left untouched.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref().to_path_buf();
        create_parent_if_needed(&path)?;
        let registry = Self { path };
        let connection = registry.connect()?;
        schema::apply_schema(&connection)?;
        write::seed_frequency_mappings(&connection, &default_frequency_mappings())?;
        Ok(registry)
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace a frequency reference entry.
    pub fn upsert_frequency_mapping(&self, mapping: &FrequencyMapping) -> Result<(), RegistryError> {
        write::upsert_frequency_mapping(&self.connect()?, mapping)
    }

    /// Load a stored model by id.
    pub fn load_model(&self, id: &str) -> Result<Option<TrainedModel>, RegistryError> {
        read::load_model(&self.connect()?, id)
    }

    /// Load a stored prediction by id.
    pub fn load_prediction(&self, id: &str) -> Result<Option<PredictionRecord>, RegistryError> {
        read::load_prediction(&self.connect()?, id)
    }

    /// Number of stored predictions.
    pub fn prediction_count(&self) -> Result<u64, RegistryError> {
        read::prediction_count(&self.connect()?)
    }

    fn connect(&self) -> Result<Connection, RegistryError> {
        let connection = Connection::open(&self.path).map_err(map_sql_error)?;
        connection
            .execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout=5000;",
            )
            .map_err(map_sql_error)?;
        Ok(connection)
    }
}

impl ModelRegistry for SqliteRegistry {
    fn save_model(&self, model: &TrainedModel) -> Result<String, RegistryError> {
        let mut connection = self.connect()?;
        write::insert_model(&mut connection, model)
    }

    fn get_active_model(&self) -> Result<Option<String>, RegistryError> {
        read::active_model_id(&self.connect()?)
    }

    fn get_frequency_mapping(
        &self,
        condition: &str,
    ) -> Result<Option<FrequencyMapping>, RegistryError> {
        read::frequency_mapping(&self.connect()?, condition)
    }

    fn save_prediction(&self, record: &PredictionRecord) -> Result<String, RegistryError> {
        write::insert_prediction(&self.connect()?, record)
    }

    fn list_frequency_mappings(&self) -> Result<Vec<FrequencySummary>, RegistryError> {
        read::frequency_summaries(&self.connect()?)
    }
}

/// Translate rusqlite errors into registry errors, singling out lock contention.
pub(super) fn map_sql_error(err: rusqlite::Error) -> RegistryError {
    match err {
        rusqlite::Error::SqliteFailure(sql_err, _)
            if sql_err.code == rusqlite::ErrorCode::DatabaseBusy =>
        {
            RegistryError::Busy
        }
        other => RegistryError::Sql(other),
    }
}

fn create_parent_if_needed(path: &Path) -> Result<(), RegistryError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| RegistryError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(column: &'static str, value: &T) -> Result<String, RegistryError> {
    serde_json::to_string(value).map_err(|source| RegistryError::Json { column, source })
}

fn from_json<T: serde::de::DeserializeOwned>(
    column: &'static str,
    text: &str,
) -> Result<T, RegistryError> {
    serde_json::from_str(text).map_err(|source| RegistryError::Json { column, source })
}

#[cfg(test)]
mod tests;
