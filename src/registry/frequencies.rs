//! Built-in condition → frequency reference data used to seed registries.

use super::records::FrequencyMapping;

struct Entry {
    disease: &'static str,
    frequency: &'static str,
    description: &'static str,
    benefits: &'static [&'static str],
}

const ENTRIES: &[Entry] = &[
    Entry {
        disease: "Migraine",
        frequency: "528 Hz",
        description: "Soft sustained tone for head tension and sensory overload",
        benefits: &["Eases head tension", "Calms light and sound sensitivity", "Supports rest"],
    },
    Entry {
        disease: "Anxiety",
        frequency: "396 Hz",
        description: "Grounding tone for releasing worry and nervous tension",
        benefits: &["Reduces worry", "Slows racing thoughts", "Encourages steady breathing"],
    },
    Entry {
        disease: "Insomnia",
        frequency: "174 Hz",
        description: "Low, slow tone to wind down before sleep",
        benefits: &["Helps falling asleep", "Deepens relaxation", "Quiets the mind"],
    },
    Entry {
        disease: "Stress",
        frequency: "432 Hz",
        description: "Balanced tone for everyday stress relief",
        benefits: &["Relieves muscle tension", "Improves mood", "Restores calm"],
    },
    Entry {
        disease: "Fatigue",
        frequency: "285 Hz",
        description: "Restorative tone for low energy and exhaustion",
        benefits: &["Supports recovery", "Lifts energy", "Clears mental fog"],
    },
    Entry {
        disease: "Depression",
        frequency: "639 Hz",
        description: "Warm tone for low mood and withdrawal",
        benefits: &["Encourages connection", "Lifts mood", "Eases emotional heaviness"],
    },
    Entry {
        disease: "Hypertension",
        frequency: "417 Hz",
        description: "Calming tone paired with slow breathing to settle the body",
        benefits: &["Promotes relaxation", "Slows breathing", "Reduces tension"],
    },
    Entry {
        disease: "Arthritis",
        frequency: "285 Hz",
        description: "Gentle tone to accompany rest for stiff and aching joints",
        benefits: &["Eases perceived discomfort", "Supports relaxation", "Encourages gentle movement"],
    },
    Entry {
        disease: "Asthma",
        frequency: "741 Hz",
        description: "Clear tone for paced breathing exercises",
        benefits: &["Guides slow breathing", "Reduces breathlessness-related panic", "Promotes calm"],
    },
    Entry {
        disease: "Diabetes",
        frequency: "528 Hz",
        description: "Steady tone for relaxation alongside routine care",
        benefits: &["Supports stress reduction", "Encourages mindful routines", "Promotes rest"],
    },
];

/// Reference mappings for every condition in the built-in corpus.
pub fn default_frequency_mappings() -> Vec<FrequencyMapping> {
    ENTRIES
        .iter()
        .map(|entry| FrequencyMapping {
            disease_name: entry.disease.to_string(),
            frequency: entry.frequency.to_string(),
            description: entry.description.to_string(),
            benefits: entry.benefits.iter().map(|b| b.to_string()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{build_vocabulary, builtin_corpus};

    #[test]
    fn every_corpus_condition_has_a_mapping() {
        let (_, labels) = build_vocabulary(&builtin_corpus());
        let mappings = default_frequency_mappings();
        for name in labels.names() {
            let mapping = mappings
                .iter()
                .find(|m| &m.disease_name == name)
                .unwrap_or_else(|| panic!("missing mapping for {name}"));
            assert!(mapping.frequency.ends_with("Hz"));
            assert!(!mapping.benefits.is_empty());
        }
    }
}
