//! Exact-match pattern classifier with a nearest-neighbour fallback.
//!
//! Training memorizes every binary feature vector under a string key. A query
//! whose key was seen returns the stored label directly; anything else is
//! resolved by a linear scan for the stored vector with the smallest Hamming
//! distance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::EncodedSample;

/// Which stored pattern wins when several share the minimum distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The earliest inserted pattern wins.
    #[default]
    FirstInserted,
    /// The most recently inserted pattern wins.
    LastInserted,
}

#[derive(Debug, Clone)]
struct StoredPattern {
    features: Vec<u8>,
    label: usize,
}

/// Memorization table of training vectors keyed by their joined form.
#[derive(Debug, Clone, Default)]
pub struct PatternClassifier {
    patterns: Vec<StoredPattern>,
    index: HashMap<String, usize>,
    tie_break: TieBreak,
}

/// Join a feature vector into its lookup key (`"0,1,0"`).
pub fn pattern_key(features: &[u8]) -> String {
    features
        .iter()
        .map(|bit| bit.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Count positions where two vectors differ; a missing position counts as 0.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> u32 {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0) as i32;
            let y = b.get(i).copied().unwrap_or(0) as i32;
            (x - y).unsigned_abs()
        })
        .sum()
}

impl PatternClassifier {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            ..Self::default()
        }
    }

    /// Build a fresh classifier from training samples.
    pub fn train(samples: &[EncodedSample], tie_break: TieBreak) -> Self {
        let mut classifier = Self::new(tie_break);
        for sample in samples {
            classifier.insert(&sample.features, sample.label);
        }
        classifier
    }

    /// Memorize one vector. A repeated vector keeps its original position but
    /// takes the newer label.
    pub fn insert(&mut self, features: &[u8], label: usize) {
        let key = pattern_key(features);
        if let Some(&pos) = self.index.get(&key) {
            self.patterns[pos].label = label;
            return;
        }
        self.index.insert(key, self.patterns.len());
        self.patterns.push(StoredPattern {
            features: features.to_vec(),
            label,
        });
    }

    /// Number of distinct memorized vectors.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Label for an exact match, if the vector was memorized.
    pub fn exact(&self, features: &[u8]) -> Option<usize> {
        self.index
            .get(&pattern_key(features))
            .map(|&pos| self.patterns[pos].label)
    }

    /// Label and distance of the closest memorized vector.
    pub fn nearest(&self, features: &[u8]) -> Option<(usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for pattern in &self.patterns {
            let distance = hamming_distance(features, &pattern.features);
            let replace = match (best, self.tie_break) {
                (None, _) => true,
                (Some((_, d)), TieBreak::FirstInserted) => distance < d,
                (Some((_, d)), TieBreak::LastInserted) => distance <= d,
            };
            if replace {
                best = Some((pattern.label, distance));
            }
        }
        best
    }

    /// Predict a label index. `None` only when nothing was memorized.
    pub fn predict(&self, features: &[u8]) -> Option<usize> {
        self.exact(features)
            .or_else(|| self.nearest(features).map(|(label, _)| label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(features: &[u8], label: usize) -> EncodedSample {
        EncodedSample {
            features: features.to_vec(),
            label,
        }
    }

    #[test]
    fn keys_join_bits_with_commas() {
        assert_eq!(pattern_key(&[0, 1, 1]), "0,1,1");
        assert_eq!(pattern_key(&[]), "");
    }

    #[test]
    fn hamming_counts_disagreements() {
        assert_eq!(hamming_distance(&[1, 0, 1, 1], &[1, 1, 0, 1]), 2);
        assert_eq!(hamming_distance(&[1, 0], &[1, 0]), 0);
        assert_eq!(hamming_distance(&[1, 1], &[1]), 1);
    }

    #[test]
    fn exact_match_returns_stored_label() {
        let classifier = PatternClassifier::train(
            &[
                sample(&[1, 0, 0, 0], 0),
                sample(&[1, 1, 0, 0], 1),
                sample(&[0, 0, 1, 1], 2),
            ],
            TieBreak::FirstInserted,
        );
        assert_eq!(classifier.predict(&[1, 1, 0, 0]), Some(1));
        assert_eq!(classifier.exact(&[0, 0, 1, 1]), Some(2));
        assert_eq!(classifier.exact(&[0, 1, 1, 1]), None);
    }

    #[test]
    fn duplicate_vector_takes_last_label() {
        let classifier = PatternClassifier::train(
            &[sample(&[1, 0], 0), sample(&[0, 1], 1), sample(&[1, 0], 2)],
            TieBreak::FirstInserted,
        );
        assert_eq!(classifier.len(), 2);
        assert_eq!(classifier.predict(&[1, 0]), Some(2));
    }

    #[test]
    fn unseen_vector_uses_nearest_pattern() {
        let classifier = PatternClassifier::train(
            &[sample(&[1, 1, 1, 0, 0], 0), sample(&[0, 0, 0, 1, 1], 1)],
            TieBreak::FirstInserted,
        );
        assert_eq!(classifier.nearest(&[0, 0, 1, 1, 1]), Some((1, 1)));
        assert_eq!(classifier.predict(&[1, 1, 0, 0, 0]), Some(0));
    }

    #[test]
    fn ties_go_to_first_inserted_by_default() {
        let classifier = PatternClassifier::train(
            &[sample(&[1, 0, 0], 4), sample(&[0, 1, 0], 2)],
            TieBreak::default(),
        );
        assert_eq!(classifier.predict(&[0, 0, 1]), Some(4));
    }

    #[test]
    fn ties_can_go_to_last_inserted() {
        let classifier = PatternClassifier::train(
            &[sample(&[1, 0, 0], 4), sample(&[0, 1, 0], 2)],
            TieBreak::LastInserted,
        );
        assert_eq!(classifier.predict(&[0, 0, 1]), Some(2));
    }

    #[test]
    fn relabelled_duplicate_keeps_its_tie_position() {
        let classifier = PatternClassifier::train(
            &[sample(&[1, 0, 0], 0), sample(&[0, 1, 0], 1), sample(&[1, 0, 0], 3)],
            TieBreak::FirstInserted,
        );
        assert_eq!(classifier.predict(&[0, 0, 1]), Some(3));
    }

    #[test]
    fn empty_classifier_predicts_nothing() {
        let classifier = PatternClassifier::new(TieBreak::FirstInserted);
        assert!(classifier.is_empty());
        assert_eq!(classifier.predict(&[1, 0]), None);
    }
}
