//! Symptom vocabulary, condition label set and binary feature encoding.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::DatasetError;
use super::corpus::TrainingSample;

/// Sorted, de-duplicated symptom tokens. Position `i` is feature `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary(Vec<String>);

/// Sorted, de-duplicated condition names. Position `i` is class `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(Vec<String>);

/// A binary presence vector paired with its class index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSample {
    pub features: Vec<u8>,
    pub label: usize,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Encode a symptom list as a presence vector over this vocabulary.
    ///
    /// Tokens outside the vocabulary are ignored; duplicates and order are lost.
    pub fn encode<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<u8> {
        let present: HashSet<&str> = symptoms.iter().map(|s| s.as_ref()).collect();
        self.0
            .iter()
            .map(|token| u8::from(present.contains(token.as_str())))
            .collect()
    }
}

impl LabelSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.binary_search_by(|probe| probe.as_str().cmp(name)).ok()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

/// Derive the vocabulary and label set from a corpus.
///
/// Both are lexicographically sorted so feature and class positions are stable
/// for a given corpus regardless of sample order.
pub fn build_vocabulary(corpus: &[TrainingSample]) -> (Vocabulary, LabelSet) {
    let symptoms: BTreeSet<&str> = corpus
        .iter()
        .flat_map(|sample| sample.symptoms.iter().map(String::as_str))
        .collect();
    let labels: BTreeSet<&str> = corpus.iter().map(|sample| sample.label.as_str()).collect();
    (
        Vocabulary(symptoms.into_iter().map(str::to_string).collect()),
        LabelSet(labels.into_iter().map(str::to_string).collect()),
    )
}

/// Free-function form of [`Vocabulary::encode`].
pub fn encode<S: AsRef<str>>(symptoms: &[S], vocabulary: &Vocabulary) -> Vec<u8> {
    vocabulary.encode(symptoms)
}

/// A corpus encoded against its own vocabulary and label set.
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    pub vocabulary: Vocabulary,
    pub labels: LabelSet,
    pub samples: Vec<EncodedSample>,
}

impl EncodedDataset {
    pub fn from_corpus(corpus: &[TrainingSample]) -> Result<Self, DatasetError> {
        let (vocabulary, labels) = build_vocabulary(corpus);
        let samples = corpus
            .iter()
            .map(|sample| {
                let label = labels
                    .index_of(&sample.label)
                    .ok_or_else(|| DatasetError::UnknownLabel(sample.label.clone()))?;
                let symptoms: Vec<&str> = sample.symptoms.iter().map(String::as_str).collect();
                Ok(EncodedSample {
                    features: vocabulary.encode(&symptoms),
                    label,
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;
        Ok(Self {
            vocabulary,
            labels,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::corpus::builtin_corpus;

    fn tiny_corpus() -> Vec<TrainingSample> {
        vec![
            TrainingSample::new(&["nausea", "headache"], "Migraine"),
            TrainingSample::new(&["wheezing", "cough"], "Asthma"),
            TrainingSample::new(&["headache", "tension"], "Stress"),
        ]
    }

    #[test]
    fn vocabulary_is_sorted_and_unique() {
        let (vocabulary, labels) = build_vocabulary(&tiny_corpus());
        assert_eq!(
            vocabulary.tokens(),
            ["cough", "headache", "nausea", "tension", "wheezing"]
        );
        assert_eq!(labels.names(), ["Asthma", "Migraine", "Stress"]);
    }

    #[test]
    fn vocabulary_ignores_sample_order() {
        let corpus = builtin_corpus();
        let mut reversed = corpus.clone();
        reversed.reverse();
        assert_eq!(build_vocabulary(&corpus), build_vocabulary(&corpus));
        assert_eq!(build_vocabulary(&corpus), build_vocabulary(&reversed));
    }

    #[test]
    fn empty_corpus_yields_empty_sets() {
        let (vocabulary, labels) = build_vocabulary(&[]);
        assert!(vocabulary.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn encode_marks_present_tokens_and_skips_unknown() {
        let (vocabulary, _) = build_vocabulary(&tiny_corpus());
        let vector = encode(&["headache", "cough", "unheard_of"], &vocabulary);
        assert_eq!(vector, vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn encode_has_vocabulary_length_and_binary_entries() {
        let (vocabulary, _) = build_vocabulary(&builtin_corpus());
        for symptoms in [
            vec!["fatigue"],
            vec!["fatigue", "fatigue", "wheezing", "made_up"],
            vec!["made_up"],
        ] {
            let vector = vocabulary.encode(&symptoms);
            assert_eq!(vector.len(), vocabulary.len());
            assert!(vector.iter().all(|&bit| bit <= 1));
        }
    }

    #[test]
    fn label_lookup_round_trips_names() {
        let (_, labels) = build_vocabulary(&tiny_corpus());
        assert_eq!(labels.index_of("Migraine"), Some(1));
        assert_eq!(labels.name(1), Some("Migraine"));
        assert_eq!(labels.index_of("Gout"), None);
        assert_eq!(labels.name(9), None);
    }

    #[test]
    fn encoded_dataset_labels_match_corpus() {
        let corpus = tiny_corpus();
        let dataset = EncodedDataset::from_corpus(&corpus).unwrap();
        assert_eq!(dataset.samples.len(), 3);
        for (sample, encoded) in corpus.iter().zip(&dataset.samples) {
            assert_eq!(dataset.labels.name(encoded.label), Some(sample.label.as_str()));
            let ones = encoded.features.iter().filter(|&&bit| bit == 1).count();
            assert_eq!(ones, sample.symptoms.len());
        }
    }
}
