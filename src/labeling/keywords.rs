//! Per-condition keyword sets used by the keyword predictor.
//!
//! The built-in table can be replaced by a `keyword_rules.toml` file in the
//! app directory:
//!
//! ```toml
//! [[conditions]]
//! name = "Migraine"
//! keywords = ["headache", "nausea", "light sensitivity"]
//! threshold = 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use super::normalize::normalize_symptom;

pub const KEYWORD_RULES_FILE_NAME: &str = "keyword_rules.toml";
/// Minimum keyword matches for a condition to count as supported.
pub const DEFAULT_THRESHOLD: usize = 2;

/// Keywords and support threshold for one condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRule {
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}

/// Ordered list of condition rules. Declaration order breaks score ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    rules: Vec<ConditionRule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordRulesToml {
    #[serde(default)]
    pub conditions: Vec<ConditionRule>,
}

impl KeywordTable {
    /// Build a table, normalizing keywords the same way as user input and
    /// dropping rules that end up without keywords.
    pub fn new(rules: Vec<ConditionRule>) -> Self {
        let rules = rules
            .into_iter()
            .filter_map(|rule| {
                let mut keywords = Vec::with_capacity(rule.keywords.len());
                for keyword in rule.keywords.iter().filter_map(|k| normalize_symptom(k)) {
                    if !keywords.contains(&keyword) {
                        keywords.push(keyword);
                    }
                }
                if keywords.is_empty() {
                    warn!("Keyword rule {:?} has no usable keywords; skipped", rule.name);
                    return None;
                }
                Some(ConditionRule {
                    name: rule.name,
                    keywords,
                    threshold: rule.threshold,
                })
            })
            .collect();
        Self { rules }
    }

    /// The built-in table covering the ten reference conditions.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|(name, keywords)| ConditionRule {
                    name: name.to_string(),
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                    threshold: DEFAULT_THRESHOLD,
                })
                .collect(),
        )
    }

    /// Rules from `keyword_rules.toml` when present and non-empty, otherwise
    /// the built-in table.
    pub fn from_app_dir_or_builtin() -> Self {
        load_keyword_rules_from_app_dir()
            .map(|rules| Self::new(rules.conditions))
            .filter(|table| !table.is_empty())
            .unwrap_or_else(Self::builtin)
    }

    pub fn rules(&self) -> &[ConditionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ConditionRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn keyword_rules_path() -> Option<PathBuf> {
    let dir = crate::app_dirs::app_root_dir().ok()?;
    Some(dir.join(KEYWORD_RULES_FILE_NAME))
}

/// Read `keyword_rules.toml` from the app directory.
///
/// A missing file yields `None`; an unreadable or malformed one is logged and
/// also yields `None`.
pub fn load_keyword_rules_from_app_dir() -> Option<KeywordRulesToml> {
    let path = keyword_rules_path()?;
    if !path.is_file() {
        return None;
    }
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            warn!("Failed to read {}: {err}", path.display());
            return None;
        }
    };
    match toml::from_str::<KeywordRulesToml>(&text) {
        Ok(rules) => Some(rules),
        Err(err) => {
            warn!("Ignoring malformed {}: {err}", path.display());
            None
        }
    }
}

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Migraine",
        &[
            "headache",
            "severe_headache",
            "pulsating_headache",
            "nausea",
            "vomiting",
            "light_sensitivity",
            "visual_disturbances",
            "aura",
            "throbbing_pain",
        ],
    ),
    (
        "Anxiety",
        &[
            "worry",
            "nervousness",
            "fear",
            "panic",
            "restlessness",
            "rapid_heartbeat",
            "increased_heart_rate",
            "sweating",
            "trembling",
            "shortness_of_breath",
            "dizziness",
            "tension",
        ],
    ),
    (
        "Insomnia",
        &[
            "difficulty_sleeping",
            "trouble_falling_asleep",
            "cant_sleep",
            "sleep_disturbance",
            "waking_up_frequently",
            "waking_too_early",
            "fatigue",
            "tiredness",
            "daytime_sleepiness",
            "poor_concentration",
        ],
    ),
    (
        "Stress",
        &[
            "tension",
            "overwhelmed",
            "pressure",
            "headache",
            "muscle_pain",
            "irritability",
            "anxiety",
            "worry",
            "difficulty_relaxing",
            "jaw_clenching",
            "stomach_upset",
        ],
    ),
    (
        "Fatigue",
        &[
            "tiredness",
            "exhaustion",
            "weakness",
            "lack_of_energy",
            "low_energy",
            "tired",
            "sleepiness",
            "sluggishness",
            "drowsiness",
            "body_aches",
            "mental_fog",
            "lack_of_stamina",
        ],
    ),
    (
        "Depression",
        &[
            "sadness",
            "hopelessness",
            "low_mood",
            "depression",
            "loss_of_interest",
            "loss_of_pleasure",
            "worthlessness",
            "withdrawal",
            "suicidal_thoughts",
            "appetite_changes",
            "sleep_changes",
        ],
    ),
    (
        "Hypertension",
        &[
            "high_blood_pressure",
            "elevated_bp",
            "high_bp",
            "hypertension",
            "chest_pain",
            "chest_discomfort",
            "pounding_in_chest",
            "dizziness",
            "shortness_of_breath",
            "nosebleeds",
            "severe_headache",
            "confusion",
            "vision_problems",
        ],
    ),
    (
        "Arthritis",
        &[
            "joint_pain",
            "joint_inflammation",
            "joint_ache",
            "stiffness",
            "stiff_joints",
            "morning_stiffness",
            "swelling",
            "reduced_range_of_motion",
            "difficulty_moving",
            "tenderness",
            "warmth_in_joints",
            "redness",
        ],
    ),
    (
        "Asthma",
        &[
            "wheezing",
            "shortness_of_breath",
            "breathlessness",
            "difficulty_breathing",
            "breathing_difficulty",
            "coughing",
            "cough",
            "chest_tightness",
            "chest_constriction",
            "rapid_breathing",
            "asthma_attack",
            "panic",
        ],
    ),
    (
        "Diabetes",
        &[
            "excessive_thirst",
            "polyuria",
            "polydipsia",
            "frequent_urination",
            "increased_hunger",
            "weight_loss",
            "fatigue",
            "blurred_vision",
            "high_blood_sugar",
            "slow_healing",
            "numbness",
            "infections",
        ],
    ),
];
