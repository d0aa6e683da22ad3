//! Model registry: where trained models, predictions and frequency reference
//! data are stored.
//!
//! Callers only see the [`ModelRegistry`] trait. [`SqliteRegistry`] keeps the
//! records in a local SQLite file and [`MemoryRegistry`] keeps them in
//! process. [`UnavailableRegistry`] stands in for a store that could not be
//! opened.
//!
//! Saving an active model clears the active flag on every other model. When
//! several training runs save concurrently the last write wins; that is the
//! intended behaviour, not a race to guard against.

mod frequencies;
mod memory;
mod records;
pub mod sqlite;
mod unavailable;

use std::path::PathBuf;

use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub use frequencies::default_frequency_mappings;
pub use memory::MemoryRegistry;
pub use records::{
    DatasetInfo, FrequencyMapping, FrequencySummary, ModelParams, PredictionRecord, TrainedModel,
};
pub use sqlite::SqliteRegistry;
pub use unavailable::UnavailableRegistry;

/// Errors returned by registry implementations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// SQLite query failed.
    #[error("Registry query failed: {0}")]
    Sql(#[from] rusqlite::Error),
    /// Database is locked or busy.
    #[error("Registry database is busy, please retry")]
    Busy,
    /// A JSON column could not be encoded or decoded.
    #[error("Invalid JSON in column {column}: {source}")]
    Json {
        column: &'static str,
        source: serde_json::Error,
    },
    /// Failed to create the directory holding the database.
    #[error("Could not write to {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The store could not be reached at all.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),
}

/// Minimal store contract consumed by training and prediction.
pub trait ModelRegistry: Send + Sync {
    /// Persist a trained model and return its id.
    fn save_model(&self, model: &TrainedModel) -> Result<String, RegistryError>;

    /// Id of the newest model flagged active, if any.
    fn get_active_model(&self) -> Result<Option<String>, RegistryError>;

    /// Frequency reference entry for a condition, if known.
    fn get_frequency_mapping(
        &self,
        condition: &str,
    ) -> Result<Option<FrequencyMapping>, RegistryError>;

    /// Persist a prediction and return its id.
    fn save_prediction(&self, record: &PredictionRecord) -> Result<String, RegistryError>;

    /// All known condition/frequency pairs.
    fn list_frequency_mappings(&self) -> Result<Vec<FrequencySummary>, RegistryError>;
}

/// Current UTC time as RFC 3339.
pub fn now_timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
