//! Hand-authored symptom/condition training corpus.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A labelled set of symptom tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Symptom tokens present in the sample.
    pub symptoms: BTreeSet<String>,
    /// Condition name.
    pub label: String,
}

impl TrainingSample {
    pub fn new<S: AsRef<str>>(symptoms: &[S], label: &str) -> Self {
        Self {
            symptoms: symptoms.iter().map(|s| s.as_ref().to_string()).collect(),
            label: label.to_string(),
        }
    }
}

/// A fixed symptom list with the condition it is expected to resolve to.
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    pub symptoms: &'static [&'static str],
    pub expected: &'static str,
}

/// Probes run through every freshly trained classifier as a smoke check.
pub const SAMPLE_PROBES: &[Probe] = &[
    Probe {
        symptoms: &["headache", "nausea", "light_sensitivity"],
        expected: "Migraine",
    },
    Probe {
        symptoms: &["worry", "restlessness", "rapid_heartbeat"],
        expected: "Anxiety",
    },
    Probe {
        symptoms: &["difficulty_sleeping", "fatigue", "irritability"],
        expected: "Insomnia",
    },
];

const CORPUS: &[(&str, [&str; 4])] = &[
    ("Migraine", ["headache", "nausea", "light_sensitivity", "visual_disturbances"]),
    ("Migraine", ["severe_headache", "vomiting", "light_sensitivity", "throbbing_pain"]),
    ("Migraine", ["headache", "nausea", "sound_sensitivity", "aura"]),
    ("Migraine", ["pulsating_headache", "nausea", "light_sensitivity", "neck_pain"]),
    ("Migraine", ["headache", "vomiting", "visual_disturbances", "fatigue"]),
    ("Anxiety", ["worry", "restlessness", "rapid_heartbeat", "sweating"]),
    ("Anxiety", ["nervousness", "tension", "increased_heart_rate", "trembling"]),
    ("Anxiety", ["fear", "panic", "shortness_of_breath", "dizziness"]),
    ("Anxiety", ["worry", "irritability", "muscle_tension", "sleep_problems"]),
    ("Anxiety", ["nervousness", "sweating", "rapid_heartbeat", "difficulty_concentrating"]),
    ("Insomnia", ["difficulty_sleeping", "fatigue", "irritability", "poor_concentration"]),
    ("Insomnia", ["trouble_falling_asleep", "waking_up_frequently", "daytime_sleepiness", "mood_changes"]),
    ("Insomnia", ["sleep_disturbance", "tiredness", "difficulty_concentrating", "anxiety"]),
    ("Insomnia", ["cant_sleep", "fatigue", "irritability", "headache"]),
    ("Insomnia", ["waking_too_early", "daytime_fatigue", "mood_disturbances", "poor_focus"]),
    ("Stress", ["tension", "headache", "muscle_pain", "fatigue"]),
    ("Stress", ["overwhelmed", "irritability", "anxiety", "sleep_problems"]),
    ("Stress", ["pressure", "worry", "rapid_heartbeat", "stomach_upset"]),
    ("Stress", ["tension", "difficulty_relaxing", "headache", "jaw_clenching"]),
    ("Stress", ["overwhelmed", "fatigue", "concentration_problems", "irritability"]),
    ("Fatigue", ["tiredness", "weakness", "lack_of_energy", "difficulty_concentrating"]),
    ("Fatigue", ["exhaustion", "muscle_weakness", "sleepiness", "reduced_motivation"]),
    ("Fatigue", ["low_energy", "tired", "sluggishness", "mental_fog"]),
    ("Fatigue", ["weakness", "fatigue", "lack_of_stamina", "drowsiness"]),
    ("Fatigue", ["exhaustion", "body_aches", "difficulty_staying_awake", "poor_concentration"]),
    ("Depression", ["sadness", "loss_of_interest", "fatigue", "sleep_changes"]),
    ("Depression", ["hopelessness", "lack_of_energy", "appetite_changes", "difficulty_concentrating"]),
    ("Depression", ["low_mood", "withdrawal", "sleep_problems", "worthlessness"]),
    ("Depression", ["sadness", "fatigue", "loss_of_pleasure", "suicidal_thoughts"]),
    ("Depression", ["depression", "irritability", "sleep_disturbance", "loss_of_appetite"]),
    ("Hypertension", ["high_blood_pressure", "headache", "dizziness", "chest_pain"]),
    ("Hypertension", ["elevated_bp", "shortness_of_breath", "nosebleeds", "vision_problems"]),
    ("Hypertension", ["high_bp", "headache", "fatigue", "irregular_heartbeat"]),
    ("Hypertension", ["hypertension", "dizziness", "chest_discomfort", "anxiety"]),
    ("Hypertension", ["high_blood_pressure", "pounding_in_chest", "severe_headache", "confusion"]),
    ("Arthritis", ["joint_pain", "stiffness", "swelling", "reduced_range_of_motion"]),
    ("Arthritis", ["joint_inflammation", "morning_stiffness", "pain", "warmth_in_joints"]),
    ("Arthritis", ["joint_pain", "swelling", "difficulty_moving", "tenderness"]),
    ("Arthritis", ["stiff_joints", "pain", "decreased_flexibility", "redness"]),
    ("Arthritis", ["joint_ache", "swelling", "stiffness", "fatigue"]),
    ("Asthma", ["wheezing", "shortness_of_breath", "coughing", "chest_tightness"]),
    ("Asthma", ["difficulty_breathing", "wheezing", "cough", "rapid_breathing"]),
    ("Asthma", ["breathlessness", "chest_constriction", "coughing", "wheezing"]),
    ("Asthma", ["asthma_attack", "shortness_of_breath", "wheezing", "panic"]),
    ("Asthma", ["breathing_difficulty", "chest_tightness", "cough", "fatigue"]),
    ("Diabetes", ["excessive_thirst", "frequent_urination", "fatigue", "blurred_vision"]),
    ("Diabetes", ["increased_hunger", "weight_loss", "frequent_urination", "slow_healing"]),
    ("Diabetes", ["high_blood_sugar", "thirst", "frequent_urination", "numbness"]),
    ("Diabetes", ["excessive_thirst", "fatigue", "blurred_vision", "infections"]),
    ("Diabetes", ["polyuria", "polydipsia", "weight_loss", "fatigue"]),
];

/// The built-in corpus: five samples for each of ten conditions.
pub fn builtin_corpus() -> Vec<TrainingSample> {
    CORPUS
        .iter()
        .map(|(label, symptoms)| TrainingSample::new(symptoms, label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn builtin_corpus_is_balanced() {
        let corpus = builtin_corpus();
        assert_eq!(corpus.len(), 50);
        let mut per_label: BTreeMap<&str, usize> = BTreeMap::new();
        for sample in &corpus {
            *per_label.entry(sample.label.as_str()).or_default() += 1;
            assert_eq!(sample.symptoms.len(), 4);
        }
        assert_eq!(per_label.len(), 10);
        assert!(per_label.values().all(|&count| count == 5));
    }

    #[test]
    fn probes_target_corpus_labels() {
        let corpus = builtin_corpus();
        for probe in SAMPLE_PROBES {
            assert!(corpus.iter().any(|sample| sample.label == probe.expected));
        }
    }
}
