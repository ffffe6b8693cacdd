// fleetcheck-core/src/domain/check/normalizer.rs

use serde::{Deserialize, Serialize};

use crate::ports::data_source::ScalarValue;

const TRUE_WORDS: [&str; 5] = ["YES", "TRUE", "Y", "1", "ON"];
const FALSE_WORDS: [&str; 6] = ["NO", "FALSE", "N", "0", "OFF", "NONE"];

/// Canonicalises a raw fetched value before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalizer {
    /// Boolean-like words to "True"/"False", anything else uppercased.
    Boolean,
    /// Boolean plus ARCHIVELOG / NOARCHIVELOG.
    Archivelog,
    /// Boolean plus "FORCE LOGGING" / "NO FORCE LOGGING".
    ForceLogging,
    /// audit_trail: everything except the "off" words means enabled.
    AuditTrail,
    Uppercase,
    Lowercase,
}

impl Normalizer {
    pub fn apply(&self, raw: &ScalarValue) -> ScalarValue {
        let text = raw.to_string();
        let upper = text.trim().to_uppercase();
        let canonical = match self {
            Normalizer::Boolean => boolean_word(&upper).unwrap_or(upper),
            Normalizer::Archivelog => match upper.as_str() {
                "ARCHIVELOG" => "True".to_string(),
                "NOARCHIVELOG" => "False".to_string(),
                _ => boolean_word(&upper).unwrap_or(upper),
            },
            Normalizer::ForceLogging => match upper.as_str() {
                "FORCE LOGGING" => "True".to_string(),
                "NO FORCE LOGGING" => "False".to_string(),
                _ => boolean_word(&upper).unwrap_or(upper),
            },
            Normalizer::AuditTrail => {
                let off = matches!(upper.as_str(), "" | "NONE" | "FALSE" | "NO" | "0" | "OFF");
                if off { "False" } else { "True" }.to_string()
            }
            Normalizer::Uppercase => upper,
            Normalizer::Lowercase => text.trim().to_lowercase(),
        };
        ScalarValue::Text(canonical)
    }
}

fn boolean_word(upper: &str) -> Option<String> {
    if TRUE_WORDS.contains(&upper) {
        Some("True".to_string())
    } else if FALSE_WORDS.contains(&upper) {
        Some("False".to_string())
    } else {
        None
    }
}
