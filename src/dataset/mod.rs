//! Training corpus and its encoding into classifier inputs.
//!
//! The corpus is turned into a sorted symptom vocabulary and condition label
//! set, each sample becomes a binary presence vector, and the encoded samples
//! are shuffled into train/test partitions for evaluation.

pub mod corpus;
pub mod split;
pub mod vocabulary;

use thiserror::Error;

pub use corpus::{Probe, SAMPLE_PROBES, TrainingSample, builtin_corpus};
pub use split::{DEFAULT_SPLIT_RATIO, TrainTestSplit, split_index, split_train_test};
pub use vocabulary::{
    EncodedDataset, EncodedSample, LabelSet, Vocabulary, build_vocabulary, encode,
};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("sample label {0:?} is missing from the label set")]
    UnknownLabel(String),
}
