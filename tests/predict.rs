mod support;

use symptra::config::SymptraConfig;
use symptra::dataset::builtin_corpus;
use symptra::labeling::{KeywordPredictor, KeywordTable, PredictorSettings};
use symptra::registry::{ModelRegistry, SqliteRegistry, UnavailableRegistry};
use symptra::service::{
    self, FrequencyFallback, OperationWarning, PredictRequest, ServiceError,
};
use tempfile::tempdir;

use support::registry::ReadOnlyRegistry;
use support::symptra_env::SymptraEnvGuard;

fn request(symptoms: &[&str]) -> PredictRequest {
    PredictRequest {
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        user_id: None,
    }
}

#[test]
fn migraine_prediction_is_recorded_against_active_model() {
    let dir = tempdir().unwrap();
    let registry = SqliteRegistry::open(dir.path().join("registry.db")).unwrap();
    let mut config = SymptraConfig::default();
    config.evaluation.seed = Some(5);
    let model_id = service::train_evaluate(&builtin_corpus(), &config, &registry)
        .unwrap()
        .model_id
        .unwrap();

    let mut req = request(&["Headache", "nausea", "Light Sensitivity"]);
    req.user_id = Some("user-42".into());
    let response = service::predict(
        &req,
        &KeywordPredictor::default(),
        &FrequencyFallback::default(),
        &registry,
    )
    .unwrap();

    let prediction = &response.prediction;
    assert_eq!(prediction.disease, "Migraine");
    assert!((prediction.confidence - 0.5).abs() < 1e-12);
    assert_eq!(prediction.healing_frequency, "528 Hz");
    assert!(!prediction.benefits.is_empty());
    assert!(response.alternative_matches.len() <= 3);
    assert!(response.warnings.is_empty());

    let id = prediction.prediction_id.as_deref().unwrap();
    let record = registry.load_prediction(id).unwrap().unwrap();
    assert_eq!(
        record.normalized_symptoms,
        vec!["headache", "nausea", "light_sensitivity"]
    );
    assert_eq!(record.raw_symptoms[2], "Light Sensitivity");
    assert_eq!(record.model_id.as_deref(), Some(model_id.as_str()));
    assert_eq!(record.user_id.as_deref(), Some("user-42"));
    assert_eq!(record.suggested_frequency, "528 Hz");
}

#[test]
fn empty_symptoms_are_rejected_without_a_record() {
    let dir = tempdir().unwrap();
    let registry = SqliteRegistry::open(dir.path().join("registry.db")).unwrap();
    let err = service::predict(
        &request(&[]),
        &KeywordPredictor::default(),
        &FrequencyFallback::default(),
        &registry,
    )
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(err.status_code(), 400);
    assert_eq!(registry.prediction_count().unwrap(), 0);

    let missing = PredictRequest::from_json(r#"{"userId": "u"}"#).unwrap();
    let err = service::predict(
        &missing,
        &KeywordPredictor::default(),
        &FrequencyFallback::default(),
        &registry,
    )
    .unwrap_err();
    assert_eq!(err.to_payload().status, 400);
    assert_eq!(registry.prediction_count().unwrap(), 0);
}

#[test]
fn unreachable_registry_still_returns_prediction() {
    let registry = UnavailableRegistry::new("connection refused");
    let response = service::predict(
        &request(&["wheezing", "shortness of breath"]),
        &KeywordPredictor::default(),
        &FrequencyFallback::default(),
        &registry,
    )
    .unwrap();
    assert_eq!(response.prediction.disease, "Asthma");
    assert_eq!(response.prediction.prediction_id, None);
    assert_eq!(response.prediction.healing_frequency, "432 Hz");
    assert_eq!(response.prediction.description, "Natural healing frequency");
    assert_eq!(response.warnings.len(), 3);
    assert!(response
        .warnings
        .iter()
        .all(|w| matches!(w, OperationWarning::PersistenceFailure { .. })));
    let json = serde_json::to_value(&response).unwrap();
    assert!(json["prediction"]["predictionId"].is_null());
    assert_eq!(json["warnings"][0]["kind"], "persistenceFailure");
}

#[test]
fn failed_prediction_write_keeps_mapping_details() {
    let registry = ReadOnlyRegistry::new();
    let response = service::predict(
        &request(&["joint pain", "morning stiffness", "swelling"]),
        &KeywordPredictor::default(),
        &FrequencyFallback::default(),
        &registry,
    )
    .unwrap();
    assert_eq!(response.prediction.disease, "Arthritis");
    assert_eq!(response.prediction.healing_frequency, "285 Hz");
    assert_eq!(response.prediction.prediction_id, None);
    assert_eq!(registry.failed_writes(), 1);
    assert_eq!(registry.get_active_model().unwrap(), None);
}

#[test]
fn predictor_settings_and_fallback_follow_config() {
    let registry = UnavailableRegistry::new("offline");
    let mut config = SymptraConfig::default();
    config.predictor.confidence_scale = 1.0;
    config.predictor.max_alternatives = 1;
    config.predictor.fallback_frequency = "444 Hz".into();
    config.predictor.fallback_description = "Configured fallback".into();
    let predictor = KeywordPredictor::new(KeywordTable::builtin(), config.predictor.settings());
    let response = service::predict(
        &request(&["headache", "nausea", "light_sensitivity"]),
        &predictor,
        &FrequencyFallback::from(&config.predictor),
        &registry,
    )
    .unwrap();
    assert!((response.prediction.confidence - 3.0 / 9.0).abs() < 1e-12);
    assert_eq!(response.alternative_matches.len(), 1);
    assert_eq!(response.alternative_matches[0].disease, "Stress");
    assert_eq!(response.prediction.healing_frequency, "444 Hz");
    assert_eq!(response.prediction.description, "Configured fallback");
}

#[test]
fn keyword_rules_file_replaces_builtin_table() {
    let base = tempdir().unwrap();
    let _guard = SymptraEnvGuard::set_config_home(base.path().to_path_buf());
    let rules_path = symptra::labeling::keyword_rules_path().unwrap();
    std::fs::write(
        &rules_path,
        "[[conditions]]\nname = \"Common Cold\"\nkeywords = [\"runny nose\", \"sneezing\", \"sore throat\"]\nthreshold = 2\n",
    )
    .unwrap();
    let predictor = KeywordPredictor::new(
        KeywordTable::from_app_dir_or_builtin(),
        PredictorSettings::default(),
    );
    let registry = UnavailableRegistry::new("offline");
    let response = service::predict(
        &request(&["Runny Nose", "sneezing"]),
        &predictor,
        &FrequencyFallback::default(),
        &registry,
    )
    .unwrap();
    assert_eq!(response.prediction.disease, "Common Cold");
    assert!((response.prediction.confidence - 1.0).abs() < 1e-12);
}
