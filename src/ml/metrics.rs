//! Evaluation metrics for classification models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    /// Build a matrix from `(truth, predicted)` pairs.
    pub fn from_pairs(n_classes: usize, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut cm = Self::new(n_classes);
        for (truth, predicted) in pairs {
            cm.add(truth, predicted);
        }
        cm
    }

    /// Count one prediction. Out-of-range indices are ignored.
    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    /// Sum of all cells, i.e. the number of evaluated samples.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&v| v as u64).sum()
    }

    /// Nested rows (`rows[truth][predicted]`) for serialization.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        if self.n_classes == 0 {
            return Vec::new();
        }
        self.counts
            .chunks(self.n_classes)
            .map(|row| row.to_vec())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `TP / (TP + FN)`.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Per-class entry of a classification report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetric {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u32,
}

/// Unweighted mean of the per-class metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroAverage {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-class rows plus their macro average, as returned and as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetric>,
    pub macro_avg: MacroAverage,
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `2pr / (p + r)`, or zero when both are zero.
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    ratio_or_zero(2.0 * precision * recall, precision + recall)
}

/// Compute per-class precision, recall and F1 from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    let mut stats = Vec::with_capacity(k);
    for class_idx in 0..k {
        let tp = cm.get(class_idx, class_idx) as f64;
        let mut fp = 0f64;
        let mut fn_ = 0f64;
        let mut support = 0u32;
        for j in 0..k {
            let v = cm.get(class_idx, j);
            support = support.saturating_add(v);
            if j != class_idx {
                fn_ += v as f64;
            }
        }
        for i in 0..k {
            if i != class_idx {
                fp += cm.get(i, class_idx) as f64;
            }
        }
        let precision = ratio_or_zero(tp, tp + fp);
        let recall = ratio_or_zero(tp, tp + fn_);
        stats.push(PerClassStats {
            precision,
            recall,
            f1: f1_score(precision, recall),
            support,
        });
    }
    stats
}

/// Attach class names to per-class statistics.
pub fn class_metrics(cm: &ConfusionMatrix, classes: &[String]) -> Vec<ClassMetric> {
    precision_recall_by_class(cm)
        .into_iter()
        .zip(classes)
        .map(|(stats, label)| ClassMetric {
            label: label.clone(),
            precision: stats.precision,
            recall: stats.recall,
            f1: stats.f1,
            support: stats.support,
        })
        .collect()
}

/// Average every class equally, including classes without test support.
pub fn macro_average(metrics: &[ClassMetric]) -> MacroAverage {
    if metrics.is_empty() {
        return MacroAverage::default();
    }
    let n = metrics.len() as f64;
    MacroAverage {
        precision: metrics.iter().map(|m| m.precision).sum::<f64>() / n,
        recall: metrics.iter().map(|m| m.recall).sum::<f64>() / n,
        f1: metrics.iter().map(|m| m.f1).sum::<f64>() / n,
    }
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let total = cm.total();
    let correct: u64 = (0..cm.n_classes).map(|c| cm.get(c, c) as u64).sum();
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}
