//! Keyword scoring of normalized symptoms against a [`KeywordTable`].

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::keywords::{ConditionRule, KeywordTable};

/// Multiplier applied to the raw match ratio before capping at 1.
pub const DEFAULT_CONFIDENCE_SCALE: f64 = 1.5;
/// Upper bound on runners-up reported with a prediction.
pub const MAX_ALTERNATIVES: usize = 3;
pub const DEFAULT_MAX_ALTERNATIVES: usize = MAX_ALTERNATIVES;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictorSettings {
    pub confidence_scale: f64,
    pub max_alternatives: usize,
}

impl Default for PredictorSettings {
    fn default() -> Self {
        Self {
            confidence_scale: DEFAULT_CONFIDENCE_SCALE,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictError {
    #[error("no symptoms left after normalization")]
    NoSymptoms,
    #[error("keyword table has no conditions")]
    EmptyTable,
}

/// Match statistics for one condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionScore {
    pub condition: String,
    pub matches: usize,
    /// `matches / keyword count`.
    pub score: f64,
    pub meets_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeMatch {
    pub disease: String,
    pub confidence: f64,
}

/// Chosen condition plus the ranked runners-up.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordPrediction {
    pub condition: String,
    pub confidence: f64,
    pub matches: usize,
    pub score: f64,
    pub alternatives: Vec<AlternativeMatch>,
    /// Per-condition statistics in table order.
    pub scores: Vec<ConditionScore>,
}

#[derive(Debug, Clone, Default)]
pub struct KeywordPredictor {
    table: KeywordTable,
    settings: PredictorSettings,
}

impl KeywordPredictor {
    pub fn new(table: KeywordTable, settings: PredictorSettings) -> Self {
        Self { table, settings }
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    pub fn settings(&self) -> PredictorSettings {
        self.settings
    }

    /// `min(score * scale, 1)`.
    pub fn confidence(&self, score: f64) -> f64 {
        (score * self.settings.confidence_scale).min(1.0)
    }

    /// Score already-normalized symptoms and pick the best condition.
    ///
    /// Among conditions meeting their threshold the highest score wins; if none
    /// does, the highest raw match count wins. Ties go to the condition
    /// declared first.
    pub fn predict(&self, symptoms: &[String]) -> Result<KeywordPrediction, PredictError> {
        if symptoms.is_empty() {
            return Err(PredictError::NoSymptoms);
        }
        let scores: Vec<ConditionScore> = self
            .table
            .rules()
            .iter()
            .map(|rule| score_condition(rule, symptoms))
            .collect();
        for score in &scores {
            debug!(
                "{:<14} matches={} score={:.3} meets_threshold={}",
                score.condition, score.matches, score.score, score.meets_threshold
            );
        }

        let best = first_max_by(scores.iter().filter(|s| s.meets_threshold), |s| s.score)
            .or_else(|| first_max_by(scores.iter(), |s| s.matches as f64))
            .ok_or(PredictError::EmptyTable)?;

        let mut runners_up: Vec<&ConditionScore> = scores
            .iter()
            .filter(|s| s.condition != best.condition && s.matches > 0)
            .collect();
        runners_up.sort_by(|a, b| b.score.total_cmp(&a.score));
        let alternatives = runners_up
            .into_iter()
            .take(self.settings.max_alternatives.min(MAX_ALTERNATIVES))
            .map(|s| AlternativeMatch {
                disease: s.condition.clone(),
                confidence: self.confidence(s.score),
            })
            .collect();

        Ok(KeywordPrediction {
            condition: best.condition.clone(),
            confidence: self.confidence(best.score),
            matches: best.matches,
            score: best.score,
            alternatives,
            scores: scores.clone(),
        })
    }
}

/// Count symptoms that contain, or are contained in, any keyword of `rule`.
fn score_condition(rule: &ConditionRule, symptoms: &[String]) -> ConditionScore {
    let matches = symptoms
        .iter()
        .filter(|symptom| {
            rule.keywords
                .iter()
                .any(|keyword| symptom.contains(keyword.as_str()) || keyword.contains(symptom.as_str()))
        })
        .count();
    let score = if rule.keywords.is_empty() {
        0.0
    } else {
        matches as f64 / rule.keywords.len() as f64
    };
    ConditionScore {
        condition: rule.name.clone(),
        matches,
        score,
        meets_threshold: matches >= rule.threshold,
    }
}

/// First item with the strictly greatest key.
fn first_max_by<'a, I, F>(items: I, key: F) -> Option<&'a ConditionScore>
where
    I: Iterator<Item = &'a ConditionScore>,
    F: Fn(&ConditionScore) -> f64,
{
    items.fold(None, |best, current| match best {
        Some(best) if key(current) <= key(best) => Some(best),
        _ => Some(current),
    })
}
