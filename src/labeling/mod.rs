//! Keyword-based condition scoring for live symptom queries.
//!
//! Free-text symptoms are normalized, matched against a per-condition keyword
//! table and ranked. This path is independent of the trained classifier.

pub mod keywords;
pub mod normalize;
pub mod predictor;

pub use keywords::{
    ConditionRule, DEFAULT_THRESHOLD, KEYWORD_RULES_FILE_NAME, KeywordTable, KeywordRulesToml,
    keyword_rules_path, load_keyword_rules_from_app_dir,
};
pub use normalize::{normalize_symptom, normalize_symptoms};
pub use predictor::{
    AlternativeMatch, ConditionScore, DEFAULT_CONFIDENCE_SCALE, DEFAULT_MAX_ALTERNATIVES,
    KeywordPrediction, KeywordPredictor, MAX_ALTERNATIVES, PredictError, PredictorSettings,
};
