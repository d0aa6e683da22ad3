//! The two operations exposed to callers: train/evaluate and predict.
//!
//! Both return either a complete payload or a [`ServiceError`]. Registry
//! failures never fail an operation; they are logged and reported in the
//! payload's `warnings` list, with the affected ids left empty.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{PredictorConfig, SymptraConfig};
use crate::dataset::{EncodedDataset, SAMPLE_PROBES, TrainingSample};
use crate::labeling::{AlternativeMatch, KeywordPredictor, PredictError, normalize_symptoms};
use crate::ml::{DataInsufficiency, EvaluateError, evaluate};

pub use crate::ml::ClassificationReport;
use crate::registry::{
    ModelRegistry, PredictionRecord, RegistryError, SqliteRegistry, UnavailableRegistry,
    now_timestamp,
};

/// Failures surfaced to the caller instead of a payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Bad or empty input; nothing was computed.
    #[error("{0}")]
    Validation(String),
    /// Unexpected internal failure; the computation was aborted.
    #[error("{0}")]
    Computation(String),
}

impl ServiceError {
    /// HTTP-equivalent status code.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Computation(_) => 500,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.to_string(),
            status: self.status_code(),
        }
    }
}

impl From<EvaluateError> for ServiceError {
    fn from(err: EvaluateError) -> Self {
        match err {
            EvaluateError::EmptyCorpus | EvaluateError::InvalidSplitRatio(_) => {
                Self::Validation(err.to_string())
            }
            EvaluateError::LabelOutOfRange { .. } | EvaluateError::Untrained => {
                Self::Computation(err.to_string())
            }
        }
    }
}

impl From<PredictError> for ServiceError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::NoSymptoms => Self::Validation(SYMPTOMS_REQUIRED.to_string()),
            PredictError::EmptyTable => Self::Computation(err.to_string()),
        }
    }
}

/// Explicit error body returned in place of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    pub status: u16,
}

/// Non-fatal conditions attached to a successful payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OperationWarning {
    /// The metrics were computed but rest on too little data.
    DataInsufficiency { message: String },
    /// A registry read or write failed.
    PersistenceFailure { operation: String, message: String },
}

impl OperationWarning {
    fn persistence(operation: &str, err: &RegistryError) -> Self {
        let warning = Self::PersistenceFailure {
            operation: operation.to_string(),
            message: err.to_string(),
        };
        warn!("{warning}");
        warning
    }
}

impl From<DataInsufficiency> for OperationWarning {
    fn from(value: DataInsufficiency) -> Self {
        Self::DataInsufficiency {
            message: value.to_string(),
        }
    }
}

impl fmt::Display for OperationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataInsufficiency { message } => write!(f, "data insufficiency: {message}"),
            Self::PersistenceFailure { operation, message } => {
                write!(f, "registry {operation} failed: {message}")
            }
        }
    }
}

/// Open the SQLite registry named by `config`.
///
/// A store that cannot be opened is replaced by an [`UnavailableRegistry`], so
/// operations still return their payloads.
pub fn open_registry(config: &SymptraConfig) -> Box<dyn ModelRegistry> {
    let path = match config.database_path() {
        Ok(path) => path,
        Err(err) => {
            warn!("No registry database path: {err}");
            return Box::new(UnavailableRegistry::new(err.to_string()));
        }
    };
    match SqliteRegistry::open(&path) {
        Ok(registry) => Box::new(registry),
        Err(err) => {
            warn!("Registry at {} unavailable: {err}", path.display());
            Box::new(UnavailableRegistry::new(err.to_string()))
        }
    }
}

/// Probe run through the freshly trained classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamplePrediction {
    pub symptoms: Vec<String>,
    pub predicted: Option<String>,
    pub frequency: Option<String>,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainEvaluateResponse {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub confusion_matrix: Vec<Vec<u32>>,
    pub classification_report: ClassificationReport,
    pub disease_labels: Vec<String>,
    pub symptom_features: Vec<String>,
    pub disease_frequency_mapping: BTreeMap<String, String>,
    pub sample_predictions: Vec<SamplePrediction>,
    pub model_id: Option<String>,
    pub warnings: Vec<OperationWarning>,
}

/// Train on a shuffled split of `corpus`, score the held-out part and store
/// the resulting model as the active one.
pub fn train_evaluate(
    corpus: &[TrainingSample],
    config: &SymptraConfig,
    registry: &dyn ModelRegistry,
) -> Result<TrainEvaluateResponse, ServiceError> {
    info!("Training with {} samples", corpus.len());
    let dataset = EncodedDataset::from_corpus(corpus)
        .map_err(|err| ServiceError::Computation(err.to_string()))?;
    let evaluation = evaluate(&dataset, &config.evaluate_options())?;
    let mut warnings: Vec<OperationWarning> = evaluation
        .warnings
        .iter()
        .copied()
        .map(OperationWarning::from)
        .collect();

    let model = evaluation.trained_model(
        &config.classifier.model_name,
        &config.classifier.model_version,
        true,
    );
    let model_id = match registry.save_model(&model) {
        Ok(id) => {
            info!("Model saved: {id}");
            Some(id)
        }
        Err(err) => {
            warnings.push(OperationWarning::persistence("save_model", &err));
            None
        }
    };

    let frequencies: BTreeMap<String, String> = match registry.list_frequency_mappings() {
        Ok(mappings) => mappings
            .into_iter()
            .map(|m| (m.disease_name, m.frequency))
            .collect(),
        Err(err) => {
            warnings.push(OperationWarning::persistence("list_frequency_mappings", &err));
            BTreeMap::new()
        }
    };

    let sample_predictions = SAMPLE_PROBES
        .iter()
        .map(|probe| {
            let predicted = evaluation
                .predict_condition(probe.symptoms)
                .map(str::to_string);
            let frequency = predicted
                .as_ref()
                .and_then(|name| frequencies.get(name).cloned());
            info!(
                "Probe {:?}: predicted {:?} ({:?}), expected {}",
                probe.symptoms, predicted, frequency, probe.expected
            );
            SamplePrediction {
                symptoms: probe.symptoms.iter().map(|s| s.to_string()).collect(),
                predicted,
                frequency,
                expected: probe.expected.to_string(),
            }
        })
        .collect();

    let classification_report = model.classification_report();
    Ok(TrainEvaluateResponse {
        accuracy: evaluation.accuracy,
        precision: evaluation.macro_avg.precision,
        recall: evaluation.macro_avg.recall,
        f1_score: evaluation.macro_avg.f1,
        confusion_matrix: model.confusion_matrix,
        classification_report,
        disease_labels: evaluation.labels.names().to_vec(),
        symptom_features: evaluation.vocabulary.tokens().to_vec(),
        disease_frequency_mapping: frequencies,
        sample_predictions,
        model_id,
        warnings,
    })
}

const SYMPTOMS_REQUIRED: &str = "Symptoms array is required";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl PredictRequest {
    /// Parse a JSON request body; malformed bodies are validation errors.
    pub fn from_json(body: &str) -> Result<Self, ServiceError> {
        serde_json::from_str(body)
            .map_err(|err| ServiceError::Validation(format!("Invalid request body: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub disease: String,
    pub confidence: f64,
    pub healing_frequency: String,
    pub description: String,
    pub benefits: Vec<String>,
    pub prediction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub prediction: Prediction,
    pub alternative_matches: Vec<AlternativeMatch>,
    pub warnings: Vec<OperationWarning>,
}

/// Mapping details reported when the registry has none for a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyFallback {
    pub frequency: String,
    pub description: String,
}

impl From<&PredictorConfig> for FrequencyFallback {
    fn from(config: &PredictorConfig) -> Self {
        Self {
            frequency: config.fallback_frequency.clone(),
            description: config.fallback_description.clone(),
        }
    }
}

impl Default for FrequencyFallback {
    fn default() -> Self {
        Self::from(&PredictorConfig::default())
    }
}

/// Score the request's symptoms and record the prediction.
///
/// Scoring settings come from `predictor`; `fallback` only fills in mapping
/// details the registry cannot supply. Empty input is rejected before any
/// scoring or registry access.
pub fn predict(
    request: &PredictRequest,
    predictor: &KeywordPredictor,
    fallback: &FrequencyFallback,
    registry: &dyn ModelRegistry,
) -> Result<PredictResponse, ServiceError> {
    if request.symptoms.is_empty() {
        return Err(ServiceError::Validation(SYMPTOMS_REQUIRED.to_string()));
    }
    let normalized = normalize_symptoms(&request.symptoms);
    if normalized.is_empty() {
        return Err(ServiceError::Validation(SYMPTOMS_REQUIRED.to_string()));
    }
    info!("Received symptoms: {:?}", normalized);

    let scored = predictor.predict(&normalized)?;
    info!(
        "Predicted {} with confidence {:.3}",
        scored.condition, scored.confidence
    );

    let mut warnings = Vec::new();
    let mapping = match registry.get_frequency_mapping(&scored.condition) {
        Ok(mapping) => mapping,
        Err(err) => {
            warnings.push(OperationWarning::persistence("get_frequency_mapping", &err));
            None
        }
    };
    let (healing_frequency, description, benefits) = match mapping {
        Some(mapping) => (mapping.frequency, mapping.description, mapping.benefits),
        None => (
            fallback.frequency.clone(),
            fallback.description.clone(),
            Vec::new(),
        ),
    };

    let model_id = match registry.get_active_model() {
        Ok(id) => id,
        Err(err) => {
            warnings.push(OperationWarning::persistence("get_active_model", &err));
            None
        }
    };
    let record = PredictionRecord {
        raw_symptoms: request.symptoms.clone(),
        normalized_symptoms: normalized,
        predicted_condition: scored.condition.clone(),
        confidence: scored.confidence,
        suggested_frequency: healing_frequency.clone(),
        model_id,
        user_id: request.user_id.clone(),
        created_at: now_timestamp(),
    };
    let prediction_id = match registry.save_prediction(&record) {
        Ok(id) => Some(id),
        Err(err) => {
            warnings.push(OperationWarning::persistence("save_prediction", &err));
            None
        }
    };

    Ok(PredictResponse {
        prediction: Prediction {
            disease: scored.condition,
            confidence: scored.confidence,
            healing_frequency,
            description,
            benefits,
            prediction_id,
        },
        alternative_matches: scored.alternatives,
        warnings,
    })
}
