use rusqlite::{Connection, OptionalExtension, params};

use super::{from_json, map_sql_error};
use crate::ml::ClassificationReport;
use crate::registry::{
    FrequencyMapping, FrequencySummary, PredictionRecord, RegistryError, TrainedModel,
};

pub(super) fn active_model_id(connection: &Connection) -> Result<Option<String>, RegistryError> {
    connection
        .query_row(
            "SELECT id FROM ml_models
             WHERE is_active != 0
             ORDER BY created_at DESC, rowid DESC
             LIMIT 1",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(map_sql_error)
}

pub(super) fn frequency_mapping(
    connection: &Connection,
    condition: &str,
) -> Result<Option<FrequencyMapping>, RegistryError> {
    let row = connection
        .query_row(
            "SELECT disease_name, frequency, description, benefits
             FROM disease_frequency_mapping WHERE disease_name = ?1",
            params![condition],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()
        .map_err(map_sql_error)?;
    let Some((disease_name, frequency, description, benefits)) = row else {
        return Ok(None);
    };
    Ok(Some(FrequencyMapping {
        disease_name,
        frequency,
        description,
        benefits: from_json("benefits", &benefits)?,
    }))
}

pub(super) fn frequency_summaries(
    connection: &Connection,
) -> Result<Vec<FrequencySummary>, RegistryError> {
    let mut stmt = connection
        .prepare("SELECT disease_name, frequency FROM disease_frequency_mapping ORDER BY disease_name ASC")
        .map_err(map_sql_error)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(FrequencySummary {
                disease_name: row.get(0)?,
                frequency: row.get(1)?,
            })
        })
        .map_err(map_sql_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_sql_error)?;
    Ok(rows)
}

struct ModelRow {
    name: String,
    version: String,
    accuracy: f64,
    precision: f64,
    recall: f64,
    f1: f64,
    confusion_matrix: String,
    classification_report: String,
    dataset_info: String,
    model_params: String,
    created_at: String,
    is_active: bool,
}

pub(super) fn load_model(
    connection: &Connection,
    id: &str,
) -> Result<Option<TrainedModel>, RegistryError> {
    let row = connection
        .query_row(
            "SELECT model_name, version, accuracy, precision, recall, f1_score,
                    confusion_matrix, classification_report, dataset_info, model_params,
                    created_at, is_active
             FROM ml_models WHERE id = ?1",
            params![id],
            |row| {
                Ok(ModelRow {
                    name: row.get(0)?,
                    version: row.get(1)?,
                    accuracy: row.get(2)?,
                    precision: row.get(3)?,
                    recall: row.get(4)?,
                    f1: row.get(5)?,
                    confusion_matrix: row.get(6)?,
                    classification_report: row.get(7)?,
                    dataset_info: row.get(8)?,
                    model_params: row.get(9)?,
                    created_at: row.get(10)?,
                    is_active: row.get::<_, i64>(11)? != 0,
                })
            },
        )
        .optional()
        .map_err(map_sql_error)?;
    let Some(row) = row else {
        return Ok(None);
    };
    let report: ClassificationReport =
        from_json("classification_report", &row.classification_report)?;
    Ok(Some(TrainedModel {
        name: row.name,
        version: row.version,
        accuracy: row.accuracy,
        precision: row.precision,
        recall: row.recall,
        f1: row.f1,
        confusion_matrix: from_json("confusion_matrix", &row.confusion_matrix)?,
        class_metrics: report.classes,
        dataset_info: from_json("dataset_info", &row.dataset_info)?,
        model_params: from_json("model_params", &row.model_params)?,
        created_at: row.created_at,
        is_active: row.is_active,
    }))
}

pub(super) fn load_prediction(
    connection: &Connection,
    id: &str,
) -> Result<Option<PredictionRecord>, RegistryError> {
    let row = connection
        .query_row(
            "SELECT raw_symptoms, symptoms, predicted_disease, confidence_score,
                    suggested_frequency, model_id, user_id, created_at
             FROM symptom_predictions WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    PredictionRecord {
                        raw_symptoms: Vec::new(),
                        normalized_symptoms: Vec::new(),
                        predicted_condition: row.get(2)?,
                        confidence: row.get(3)?,
                        suggested_frequency: row.get(4)?,
                        model_id: row.get(5)?,
                        user_id: row.get(6)?,
                        created_at: row.get(7)?,
                    },
                ))
            },
        )
        .optional()
        .map_err(map_sql_error)?;
    let Some((raw, normalized, mut record)) = row else {
        return Ok(None);
    };
    record.raw_symptoms = from_json("raw_symptoms", &raw)?;
    record.normalized_symptoms = from_json("symptoms", &normalized)?;
    Ok(Some(record))
}

pub(super) fn prediction_count(connection: &Connection) -> Result<u64, RegistryError> {
    let count: i64 = connection
        .query_row("SELECT COUNT(*) FROM symptom_predictions", [], |row| {
            row.get(0)
        })
        .map_err(map_sql_error)?;
    Ok(count.max(0) as u64)
}
