use rusqlite::{Connection, params};

use super::{map_sql_error, to_json};
use crate::registry::{
    FrequencyMapping, PredictionRecord, RegistryError, TrainedModel, new_record_id,
};

/// Insert a model; when it is active, every other model is deactivated in the
/// same transaction.
pub(super) fn insert_model(
    connection: &mut Connection,
    model: &TrainedModel,
) -> Result<String, RegistryError> {
    let id = new_record_id();
    let confusion = to_json("confusion_matrix", &model.confusion_matrix)?;
    let report = to_json("classification_report", &model.classification_report())?;
    let dataset_info = to_json("dataset_info", &model.dataset_info)?;
    let model_params = to_json("model_params", &model.model_params)?;
    let tx = connection.transaction().map_err(map_sql_error)?;
    if model.is_active {
        tx.execute("UPDATE ml_models SET is_active = 0 WHERE is_active != 0", [])
            .map_err(map_sql_error)?;
    }
    tx.execute(
        "INSERT INTO ml_models (id, model_name, version, accuracy, precision, recall, f1_score,
                                confusion_matrix, classification_report, dataset_info,
                                model_params, created_at, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            id,
            model.name,
            model.version,
            model.accuracy,
            model.precision,
            model.recall,
            model.f1,
            confusion,
            report,
            dataset_info,
            model_params,
            model.created_at,
            model.is_active as i64,
        ],
    )
    .map_err(map_sql_error)?;
    tx.commit().map_err(map_sql_error)?;
    Ok(id)
}

pub(super) fn insert_prediction(
    connection: &Connection,
    record: &PredictionRecord,
) -> Result<String, RegistryError> {
    let id = new_record_id();
    let raw = to_json("raw_symptoms", &record.raw_symptoms)?;
    let normalized = to_json("symptoms", &record.normalized_symptoms)?;
    connection
        .execute(
            "INSERT INTO symptom_predictions (id, user_id, raw_symptoms, symptoms,
                                              predicted_disease, confidence_score,
                                              suggested_frequency, model_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                record.user_id,
                raw,
                normalized,
                record.predicted_condition,
                record.confidence,
                record.suggested_frequency,
                record.model_id,
                record.created_at,
            ],
        )
        .map_err(map_sql_error)?;
    Ok(id)
}

pub(super) fn seed_frequency_mappings(
    connection: &Connection,
    mappings: &[FrequencyMapping],
) -> Result<(), RegistryError> {
    let tx = connection.unchecked_transaction().map_err(map_sql_error)?;
    {
        let mut stmt = tx
            .prepare_cached(
                "INSERT OR IGNORE INTO disease_frequency_mapping
                    (disease_name, frequency, description, benefits)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(map_sql_error)?;
        for mapping in mappings {
            let benefits = to_json("benefits", &mapping.benefits)?;
            stmt.execute(params![
                mapping.disease_name,
                mapping.frequency,
                mapping.description,
                benefits
            ])
            .map_err(map_sql_error)?;
        }
    }
    tx.commit().map_err(map_sql_error)
}

pub(super) fn upsert_frequency_mapping(
    connection: &Connection,
    mapping: &FrequencyMapping,
) -> Result<(), RegistryError> {
    let benefits = to_json("benefits", &mapping.benefits)?;
    connection
        .execute(
            "INSERT INTO disease_frequency_mapping (disease_name, frequency, description, benefits)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(disease_name) DO UPDATE SET frequency = excluded.frequency,
                                                     description = excluded.description,
                                                     benefits = excluded.benefits",
            params![
                mapping.disease_name,
                mapping.frequency,
                mapping.description,
                benefits
            ],
        )
        .map_err(map_sql_error)?;
    Ok(())
}
