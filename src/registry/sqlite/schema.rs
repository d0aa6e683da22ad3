use rusqlite::Connection;

use super::map_sql_error;
use crate::registry::RegistryError;

pub(super) fn apply_schema(connection: &Connection) -> Result<(), RegistryError> {
    connection
        .execute_batch(
            "CREATE TABLE IF NOT EXISTS ml_models (
                id TEXT PRIMARY KEY,
                model_name TEXT NOT NULL,
                version TEXT NOT NULL,
                accuracy REAL NOT NULL,
                precision REAL NOT NULL,
                recall REAL NOT NULL,
                f1_score REAL NOT NULL,
                confusion_matrix TEXT NOT NULL,
                classification_report TEXT NOT NULL,
                dataset_info TEXT NOT NULL,
                model_params TEXT NOT NULL,
                created_at TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 0
             );
             CREATE INDEX IF NOT EXISTS idx_ml_models_active_created
                ON ml_models (is_active, created_at);
             CREATE TABLE IF NOT EXISTS symptom_predictions (
                id TEXT PRIMARY KEY,
                user_id TEXT,
                raw_symptoms TEXT NOT NULL,
                symptoms TEXT NOT NULL,
                predicted_disease TEXT NOT NULL,
                confidence_score REAL NOT NULL,
                suggested_frequency TEXT NOT NULL,
                model_id TEXT,
                created_at TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_symptom_predictions_user
                ON symptom_predictions (user_id, created_at);
             CREATE TABLE IF NOT EXISTS disease_frequency_mapping (
                disease_name TEXT PRIMARY KEY,
                frequency TEXT NOT NULL,
                description TEXT NOT NULL,
                benefits TEXT NOT NULL
             ) WITHOUT ROWID;",
        )
        .map_err(map_sql_error)
}
