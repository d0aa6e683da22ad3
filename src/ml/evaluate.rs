//! Train/test evaluation of the pattern classifier.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::metrics::{
    ClassMetric, ConfusionMatrix, MacroAverage, accuracy, class_metrics, macro_average,
};
use super::pattern::{PatternClassifier, TieBreak};
use crate::dataset::{
    DEFAULT_SPLIT_RATIO, EncodedDataset, LabelSet, Vocabulary, split_train_test,
};
use crate::registry::{DatasetInfo, ModelParams, TrainedModel, now_timestamp};

/// Fewer samples per class than this flags the corpus as near-empty.
pub const MIN_SAMPLES_PER_CLASS: usize = 2;

/// Options for one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluateOptions {
    /// Fraction of shuffled samples used for training, in `(0, 1)`.
    pub split_ratio: f64,
    /// Fixed shuffle seed; `None` draws a fresh split every run.
    pub seed: Option<u64>,
    pub tie_break: TieBreak,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            split_ratio: DEFAULT_SPLIT_RATIO,
            seed: None,
            tie_break: TieBreak::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EvaluateError {
    #[error("cannot evaluate an empty corpus")]
    EmptyCorpus,
    #[error("sample {sample} has label index {label} but only {labels} labels exist")]
    LabelOutOfRange {
        sample: usize,
        label: usize,
        labels: usize,
    },
    #[error("split ratio must lie strictly between 0 and 1, got {0}")]
    InvalidSplitRatio(f64),
    #[error("classifier has no memorized patterns")]
    Untrained,
}

/// Conditions under which the metrics are computed but carry little meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataInsufficiency {
    /// The test partition is empty; every metric is reported as zero.
    EmptyTestSplit,
    /// `sparse_labels` of the corpus's labels have fewer than
    /// [`MIN_SAMPLES_PER_CLASS`] samples each.
    SmallCorpus {
        samples: usize,
        labels: usize,
        sparse_labels: usize,
    },
}

impl std::fmt::Display for DataInsufficiency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTestSplit => {
                write!(f, "test partition is empty; metrics are reported as 0")
            }
            Self::SmallCorpus {
                samples,
                labels,
                sparse_labels,
            } => write!(
                f,
                "{sparse_labels} of {labels} labels have fewer than {MIN_SAMPLES_PER_CLASS} \
                 samples ({samples} samples in total); metrics are unreliable"
            ),
        }
    }
}

/// Everything one evaluation run produced.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub vocabulary: Vocabulary,
    pub labels: LabelSet,
    /// Classifier trained on the train partition, kept for probe predictions.
    pub classifier: PatternClassifier,
    pub confusion: ConfusionMatrix,
    pub class_metrics: Vec<ClassMetric>,
    pub macro_avg: MacroAverage,
    pub accuracy: f64,
    pub train_samples: usize,
    pub test_samples: usize,
    pub split_ratio: f64,
    pub warnings: Vec<DataInsufficiency>,
}

/// Evaluate with an RNG seeded from `options.seed`, or from OS entropy.
pub fn evaluate(
    dataset: &EncodedDataset,
    options: &EvaluateOptions,
) -> Result<Evaluation, EvaluateError> {
    match options.seed {
        Some(seed) => evaluate_with_rng(dataset, options, &mut StdRng::seed_from_u64(seed)),
        None => evaluate_with_rng(dataset, options, &mut rand::rng()),
    }
}

/// Shuffle, split, train, predict the test partition and score the result.
pub fn evaluate_with_rng<R: Rng + ?Sized>(
    dataset: &EncodedDataset,
    options: &EvaluateOptions,
    rng: &mut R,
) -> Result<Evaluation, EvaluateError> {
    check_preconditions(dataset, options.split_ratio)?;
    let n_labels = dataset.labels.len();

    let split = split_train_test(dataset.samples.clone(), options.split_ratio, rng);
    info!(
        "Evaluating on {} samples ({} train / {} test), {} symptoms, {} labels",
        dataset.samples.len(),
        split.train.len(),
        split.test.len(),
        dataset.vocabulary.len(),
        n_labels
    );

    let classifier = PatternClassifier::train(&split.train, options.tie_break);
    let mut confusion = ConfusionMatrix::new(n_labels);
    for sample in &split.test {
        let predicted = classifier
            .predict(&sample.features)
            .ok_or(EvaluateError::Untrained)?;
        confusion.add(sample.label, predicted);
    }

    let class_metrics = class_metrics(&confusion, dataset.labels.names());
    let mut warnings = Vec::new();
    let (accuracy, macro_avg) = if split.test.is_empty() {
        warnings.push(DataInsufficiency::EmptyTestSplit);
        (0.0, MacroAverage::default())
    } else {
        (accuracy(&confusion), macro_average(&class_metrics))
    };
    let sparse_labels = count_sparse_labels(dataset);
    if sparse_labels > 0 {
        warnings.push(DataInsufficiency::SmallCorpus {
            samples: dataset.samples.len(),
            labels: n_labels,
            sparse_labels,
        });
    }
    for warning in &warnings {
        warn!("{warning}");
    }

    info!(
        "accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
        accuracy, macro_avg.precision, macro_avg.recall, macro_avg.f1
    );
    for metric in &class_metrics {
        debug!(
            "{:<14} precision={:.3} recall={:.3} f1={:.3} support={}",
            metric.label, metric.precision, metric.recall, metric.f1, metric.support
        );
    }

    Ok(Evaluation {
        vocabulary: dataset.vocabulary.clone(),
        labels: dataset.labels.clone(),
        classifier,
        confusion,
        class_metrics,
        macro_avg,
        accuracy,
        train_samples: split.train.len(),
        test_samples: split.test.len(),
        split_ratio: options.split_ratio,
        warnings,
    })
}

fn check_preconditions(dataset: &EncodedDataset, split_ratio: f64) -> Result<(), EvaluateError> {
    if !(split_ratio > 0.0 && split_ratio < 1.0) {
        return Err(EvaluateError::InvalidSplitRatio(split_ratio));
    }
    if dataset.samples.is_empty() {
        return Err(EvaluateError::EmptyCorpus);
    }
    let labels = dataset.labels.len();
    if let Some((sample, encoded)) = dataset
        .samples
        .iter()
        .enumerate()
        .find(|(_, encoded)| encoded.label >= labels)
    {
        return Err(EvaluateError::LabelOutOfRange {
            sample,
            label: encoded.label,
            labels,
        });
    }
    Ok(())
}

/// Labels with fewer than [`MIN_SAMPLES_PER_CLASS`] samples in the whole corpus.
fn count_sparse_labels(dataset: &EncodedDataset) -> usize {
    let mut per_label = vec![0usize; dataset.labels.len()];
    for sample in &dataset.samples {
        per_label[sample.label] += 1;
    }
    per_label
        .iter()
        .filter(|&&count| count < MIN_SAMPLES_PER_CLASS)
        .count()
}

impl Evaluation {
    /// Predict the condition name for a raw symptom list.
    pub fn predict_condition<S: AsRef<str>>(&self, symptoms: &[S]) -> Option<&str> {
        let features = self.vocabulary.encode(symptoms);
        self.classifier
            .predict(&features)
            .and_then(|idx| self.labels.name(idx))
    }

    /// Package the run as a registry record.
    pub fn trained_model(&self, name: &str, version: &str, is_active: bool) -> TrainedModel {
        TrainedModel {
            name: name.to_string(),
            version: version.to_string(),
            accuracy: self.accuracy,
            precision: self.macro_avg.precision,
            recall: self.macro_avg.recall,
            f1: self.macro_avg.f1,
            confusion_matrix: self.confusion.to_rows(),
            class_metrics: self.class_metrics.clone(),
            dataset_info: DatasetInfo {
                total_samples: self.train_samples + self.test_samples,
                train_samples: self.train_samples,
                test_samples: self.test_samples,
                unique_symptoms: self.vocabulary.len(),
                unique_diseases: self.labels.len(),
            },
            model_params: ModelParams {
                algorithm: "DecisionTree".to_string(),
                feature_encoding: "binary".to_string(),
                train_test_split: self.split_ratio,
            },
            created_at: now_timestamp(),
            is_active,
        }
    }
}
