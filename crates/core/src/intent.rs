//! Navigation intent types

use serde::{Deserialize, Serialize};

/// How confidently the interpreter matched the utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentConfidence {
    /// Matched a canonical command template.
    Matched,
    /// Matched only a loose misrecognition-tolerant trigger.
    Fallback,
}

/// A parsed navigation request.
///
/// Produced once per recognized utterance or submitted text, then handed to
/// the coordinator and discarded. The destination is always non-empty; the
/// interpreter substitutes a generic placeholder rather than emitting an
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    /// Destination as captured from the utterance.
    pub destination: String,
    /// Match confidence.
    pub confidence: IntentConfidence,
}

impl NavigationIntent {
    /// Create an intent, normalizing whitespace in the destination.
    pub fn new(destination: impl Into<String>, confidence: IntentConfidence) -> Self {
        Self {
            destination: destination.into().trim().to_string(),
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_trims_destination() {
        let intent = NavigationIntent::new("  cardiology  ", IntentConfidence::Matched);
        assert_eq!(intent.destination, "cardiology");
    }

    #[test]
    fn test_intent_wire_format() {
        let intent = NavigationIntent::new("the pharmacy", IntentConfidence::Fallback);
        let json = serde_json::to_string(&intent).unwrap();
        assert_eq!(
            json,
            r#"{"destination":"the pharmacy","confidence":"fallback"}"#
        );
    }
}
