//! Records exchanged with the model registry.

use serde::{Deserialize, Serialize};

use crate::ml::{ClassMetric, ClassificationReport, MacroAverage};

/// Size of the corpus and its partitions for one training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub total_samples: usize,
    pub train_samples: usize,
    pub test_samples: usize,
    pub unique_symptoms: usize,
    pub unique_diseases: usize,
}

/// Static description of how the model was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelParams {
    pub algorithm: String,
    pub feature_encoding: String,
    pub train_test_split: f64,
}

/// Metrics and metadata of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainedModel {
    pub name: String,
    pub version: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion_matrix: Vec<Vec<u32>>,
    pub class_metrics: Vec<ClassMetric>,
    pub dataset_info: DatasetInfo,
    pub model_params: ModelParams,
    /// RFC 3339, UTC.
    pub created_at: String,
    pub is_active: bool,
}

impl TrainedModel {
    pub fn macro_avg(&self) -> MacroAverage {
        MacroAverage {
            precision: self.precision,
            recall: self.recall,
            f1: self.f1,
        }
    }

    /// Report shape stored in the `classification_report` column.
    pub fn classification_report(&self) -> ClassificationReport {
        ClassificationReport {
            classes: self.class_metrics.clone(),
            macro_avg: self.macro_avg(),
        }
    }
}

/// One live prediction as stored by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub raw_symptoms: Vec<String>,
    pub normalized_symptoms: Vec<String>,
    pub predicted_condition: String,
    pub confidence: f64,
    pub suggested_frequency: String,
    pub model_id: Option<String>,
    pub user_id: Option<String>,
    pub created_at: String,
}

/// Therapeutic frequency reference entry for a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyMapping {
    pub disease_name: String,
    pub frequency: String,
    pub description: String,
    pub benefits: Vec<String>,
}

/// Condition/frequency pair returned by registry listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencySummary {
    pub disease_name: String,
    pub frequency: String,
}

impl From<&FrequencyMapping> for FrequencySummary {
    fn from(mapping: &FrequencyMapping) -> Self {
        Self {
            disease_name: mapping.disease_name.clone(),
            frequency: mapping.frequency.clone(),
        }
    }
}
