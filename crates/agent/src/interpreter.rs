//! Speech command interpretation
//!
//! Free text (a final recognition transcript or typed fallback) is mapped to
//! a [`NavigationIntent`] through three layers, applied in order:
//!
//! 1. canonical regex templates ("navigate to X", "take me to X", ...),
//! 2. a validation filter on the captured destination (location keyword,
//!    digit, or length above a minimal threshold),
//! 3. looser substring triggers tolerant of common misrecognitions, used
//!    only when the first two layers produced nothing.
//!
//! Interpretation is pure and deterministic: no state, no randomness, no
//! network. A miss is `None`, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use wayfinder_core::{IntentConfidence, NavigationIntent};

/// Canonical command templates, strictest layer first
static COMMAND_TEMPLATES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^navigate to (.+)$",
        r"^take me to (.+)$",
        r"^directions to (.+)$",
        r"^how do i get to (.+)$",
        r"^where is (.+)$",
        r"^guide me to (.+)$",
        r"^show me the way to (.+)$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static template must compile"))
    .collect()
});

/// Substrings that mark a destination as plausible on their own
const LOCATION_KEYWORDS: &[&str] = &[
    "room",
    "ward",
    "department",
    "clinic",
    "lab",
    "reception",
    "exit",
    "entrance",
    "cafeteria",
    "pharmacy",
    "elevator",
    "toilet",
    "washroom",
];

/// Shortest destination accepted without a keyword or digit
const MIN_DESTINATION_LEN: usize = 4;

/// Looser triggers tolerant of speech-recognition misrecognitions
const LOOSE_TRIGGERS: &[&str] = &[
    "get me to",
    "we navigate to",
    "i need to go to",
    "i want to go to",
    "need to get to",
    "going to",
];

/// Destination used when a loose trigger fires without a usable remainder
const PLACEHOLDER_DESTINATION: &str = "your destination";

/// Layered matcher from free text to navigation intents
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    loose_triggers_enabled: bool,
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self {
            loose_triggers_enabled: true,
        }
    }

    /// Interpreter without the misrecognition-tolerant layer
    pub fn strict() -> Self {
        Self {
            loose_triggers_enabled: false,
        }
    }

    /// Map free text to an intent, or `None` when nothing matches
    pub fn interpret(&self, text: &str) -> Option<NavigationIntent> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }

        for template in COMMAND_TEMPLATES.iter() {
            if let Some(captures) = template.captures(&normalized) {
                let candidate = captures[1].trim();
                if is_plausible_destination(candidate) {
                    tracing::debug!(destination = candidate, "canonical template matched");
                    return Some(NavigationIntent::new(candidate, IntentConfidence::Matched));
                }
            }
        }

        if self.loose_triggers_enabled {
            if let Some(intent) = self.interpret_loose(&normalized) {
                return Some(intent);
            }
        }

        None
    }

    fn interpret_loose(&self, normalized: &str) -> Option<NavigationIntent> {
        for trigger in LOOSE_TRIGGERS {
            if let Some(position) = normalized.find(trigger) {
                let remainder = normalized[position + trigger.len()..].trim();
                let destination = if is_plausible_destination(remainder) {
                    remainder
                } else {
                    PLACEHOLDER_DESTINATION
                };
                tracing::debug!(trigger, destination, "loose trigger matched");
                return Some(NavigationIntent::new(
                    destination,
                    IntentConfidence::Fallback,
                ));
            }
        }
        None
    }
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .trim_end_matches(&['?', '.', '!'][..])
        .trim()
        .to_string()
}

fn is_plausible_destination(candidate: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }
    LOCATION_KEYWORDS.iter().any(|kw| candidate.contains(kw))
        || candidate.chars().any(|c| c.is_ascii_digit())
        || candidate.len() >= MIN_DESTINATION_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(text: &str) -> Option<NavigationIntent> {
        CommandInterpreter::new().interpret(text)
    }

    #[test]
    fn test_canonical_templates_match() {
        for text in [
            "navigate to Conference Room",
            "take me to Cafeteria",
            "directions to radiology",
            "how do I get to the exit",
            "where is the reception",
            "guide me to ward 3",
            "show me the way to the lab",
        ] {
            let intent = interpret(text).unwrap_or_else(|| panic!("no intent for {text:?}"));
            assert_eq!(intent.confidence, IntentConfidence::Matched, "{text}");
            assert!(!intent.destination.is_empty());
        }
    }

    #[test]
    fn test_captured_destination_is_preserved() {
        let intent = interpret("take me to the pharmacy").unwrap();
        assert_eq!(intent.destination, "the pharmacy");
        assert_eq!(intent.confidence, IntentConfidence::Matched);
    }

    #[test]
    fn test_trailing_punctuation_is_stripped() {
        let intent = interpret("Where is the Conference Room?").unwrap();
        assert_eq!(intent.destination, "the conference room");
        assert_eq!(intent.confidence, IntentConfidence::Matched);
    }

    #[test]
    fn test_room_number_accepted_by_digit_rule() {
        let intent = interpret("navigate to 3b").unwrap();
        assert_eq!(intent.destination, "3b");
    }

    #[test]
    fn test_non_command_yields_no_intent() {
        assert!(interpret("hello").is_none());
        assert!(interpret("book an appointment").is_none());
        assert!(interpret("").is_none());
        assert!(interpret("   ").is_none());
    }

    #[test]
    fn test_implausible_capture_rejected() {
        // Captured destination is too short and carries no keyword or digit
        assert!(interpret("navigate to x").is_none());
    }

    #[test]
    fn test_loose_trigger_yields_fallback_confidence() {
        let intent = interpret("can you get me to the cardiology ward").unwrap();
        assert_eq!(intent.confidence, IntentConfidence::Fallback);
        assert_eq!(intent.destination, "the cardiology ward");
    }

    #[test]
    fn test_loose_trigger_without_remainder_uses_placeholder() {
        let intent = interpret("we navigate to").unwrap();
        assert_eq!(intent.confidence, IntentConfidence::Fallback);
        assert_eq!(intent.destination, PLACEHOLDER_DESTINATION);
    }

    #[test]
    fn test_strict_interpreter_skips_loose_layer() {
        let strict = CommandInterpreter::strict();
        assert!(strict.interpret("get me to the cafeteria").is_none());
        assert!(strict.interpret("take me to the cafeteria").is_some());
    }

    #[test]
    fn test_interpretation_is_deterministic() {
        let first = interpret("take me to the pharmacy");
        for _ in 0..10 {
            assert_eq!(interpret("take me to the pharmacy"), first);
        }
    }
}
