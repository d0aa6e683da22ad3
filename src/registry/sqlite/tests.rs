use tempfile::tempdir;

use super::*;
use crate::ml::ClassMetric;
use crate::registry::{DatasetInfo, ModelParams};

fn model(created_at: &str, active: bool) -> TrainedModel {
    TrainedModel {
        name: "SimpleDecisionTree".into(),
        version: "1.0".into(),
        accuracy: 0.9,
        precision: 0.85,
        recall: 0.8,
        f1: 0.82,
        confusion_matrix: vec![vec![2, 0], vec![1, 1]],
        class_metrics: Vec::new(),
        dataset_info: DatasetInfo {
            total_samples: 20,
            train_samples: 16,
            test_samples: 4,
            unique_symptoms: 12,
            unique_diseases: 2,
        },
        model_params: ModelParams {
            algorithm: "DecisionTree".into(),
            feature_encoding: "binary".into(),
            train_test_split: 0.8,
        },
        created_at: created_at.into(),
        is_active: active,
    }
}

fn prediction() -> PredictionRecord {
    PredictionRecord {
        raw_symptoms: vec!["Headache".into(), "Nausea".into()],
        normalized_symptoms: vec!["headache".into(), "nausea".into()],
        predicted_condition: "Migraine".into(),
        confidence: 0.75,
        suggested_frequency: "528 Hz".into(),
        model_id: None,
        user_id: Some("user-1".into()),
        created_at: "2025-01-01T00:00:00Z".into(),
    }
}

#[test]
fn open_creates_parent_and_seeds_mappings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(DB_FILE_NAME);
    let registry = SqliteRegistry::open(&path).unwrap();
    assert!(path.exists());
    let summaries = registry.list_frequency_mappings().unwrap();
    assert_eq!(summaries.len(), default_frequency_mappings().len());
    let migraine = registry.get_frequency_mapping("Migraine").unwrap().unwrap();
    assert_eq!(migraine.frequency, "528 Hz");
    assert!(!migraine.benefits.is_empty());
    assert!(registry.get_frequency_mapping("Gout").unwrap().is_none());
}

#[test]
fn reopening_keeps_edited_mappings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DB_FILE_NAME);
    let registry = SqliteRegistry::open(&path).unwrap();
    let mut edited = registry.get_frequency_mapping("Stress").unwrap().unwrap();
    edited.frequency = "440 Hz".into();
    registry.upsert_frequency_mapping(&edited).unwrap();
    let reopened = SqliteRegistry::open(&path).unwrap();
    let stress = reopened.get_frequency_mapping("Stress").unwrap().unwrap();
    assert_eq!(stress.frequency, "440 Hz");
}

#[test]
fn saving_active_model_deactivates_previous() {
    let dir = tempdir().unwrap();
    let registry = SqliteRegistry::open(dir.path().join(DB_FILE_NAME)).unwrap();
    assert_eq!(registry.get_active_model().unwrap(), None);
    let first = registry
        .save_model(&model("2025-01-01T00:00:00Z", true))
        .unwrap();
    let second = registry
        .save_model(&model("2025-01-02T00:00:00Z", true))
        .unwrap();
    assert_eq!(registry.get_active_model().unwrap(), Some(second.clone()));
    assert!(!registry.load_model(&first).unwrap().unwrap().is_active);
    registry
        .save_model(&model("2025-01-03T00:00:00Z", false))
        .unwrap();
    assert_eq!(registry.get_active_model().unwrap(), Some(second));
}

#[test]
fn stored_model_keeps_json_columns() {
    let dir = tempdir().unwrap();
    let registry = SqliteRegistry::open(dir.path().join(DB_FILE_NAME)).unwrap();
    let saved = model("2025-01-01T00:00:00Z", true);
    let id = registry.save_model(&saved).unwrap();
    assert_eq!(registry.load_model(&id).unwrap(), Some(saved));
    assert_eq!(registry.load_model("missing").unwrap(), None);
}

#[test]
fn predictions_are_counted_and_loaded() {
    let dir = tempdir().unwrap();
    let registry = SqliteRegistry::open(dir.path().join(DB_FILE_NAME)).unwrap();
    assert_eq!(registry.prediction_count().unwrap(), 0);
    let record = prediction();
    let id = registry.save_prediction(&record).unwrap();
    assert_eq!(registry.prediction_count().unwrap(), 1);
    assert_eq!(registry.load_prediction(&id).unwrap(), Some(record));
}

#[test]
fn classification_report_column_carries_macro_average() {
    let dir = tempdir().unwrap();
    let registry = SqliteRegistry::open(dir.path().join(DB_FILE_NAME)).unwrap();
    let mut saved = model("2025-01-01T00:00:00Z", true);
    saved.class_metrics = vec![ClassMetric {
        label: "Asthma".into(),
        precision: 0.85,
        recall: 0.8,
        f1: 0.82,
        support: 4,
    }];
    let id = registry.save_model(&saved).unwrap();

    let connection = rusqlite::Connection::open(registry.path()).unwrap();
    let column: String = connection
        .query_row(
            "SELECT classification_report FROM ml_models WHERE id = ?1",
            [&id],
            |row| row.get(0),
        )
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&column).unwrap();
    assert_eq!(json["classes"][0]["label"], "Asthma");
    assert_eq!(json["macroAvg"]["precision"], 0.85);
    assert_eq!(json["macroAvg"]["f1"], 0.82);

    let loaded = registry.load_model(&id).unwrap().unwrap();
    assert_eq!(loaded.classification_report(), saved.classification_report());
}
