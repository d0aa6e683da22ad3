//! Symptom classifier training and evaluation.
//!
//! The classifier memorizes binary symptom vectors and falls back to the
//! nearest stored vector for unseen input. The evaluator shuffles an encoded
//! corpus, trains on one partition and scores the other.

pub mod evaluate;
pub mod metrics;
pub mod pattern;

pub use evaluate::{
    DataInsufficiency, EvaluateError, EvaluateOptions, Evaluation, evaluate, evaluate_with_rng,
};
pub use metrics::{ClassMetric, ClassificationReport, ConfusionMatrix, MacroAverage};
pub use pattern::{PatternClassifier, TieBreak, hamming_distance, pattern_key};
