use regex::Regex;
use std::sync::OnceLock;

/// Separator that replaces internal whitespace runs.
pub const SEPARATOR: &str = "_";

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex must compile"))
}

/// Lowercase, trim and join whitespace runs with `_`, so "Light Sensitivity"
/// and "light_sensitivity" compare equal. Returns `None` for blank input.
pub fn normalize_symptom(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    Some(
        whitespace_regex()
            .replace_all(&lowered, SEPARATOR)
            .into_owned(),
    )
}

/// Normalize a list, dropping blank entries and keeping input order.
pub fn normalize_symptoms<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .filter_map(|symptom| normalize_symptom(symptom.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_and_case_collapse() {
        assert_eq!(
            normalize_symptom("  Light   Sensitivity "),
            Some("light_sensitivity".to_string())
        );
        assert_eq!(
            normalize_symptom("light_sensitivity"),
            normalize_symptom("Light Sensitivity")
        );
        assert_eq!(normalize_symptom("Chest\tTightness"), Some("chest_tightness".into()));
    }

    #[test]
    fn blank_entries_are_dropped() {
        assert_eq!(normalize_symptom("   "), None);
        assert_eq!(
            normalize_symptoms(&["Headache", "", " \n", "Nausea"]),
            vec!["headache".to_string(), "nausea".to_string()]
        );
    }
}
