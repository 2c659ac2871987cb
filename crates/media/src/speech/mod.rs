//! Speech output and voice/text input normalization

mod input;
mod synth;

pub use input::TextSubmission;
pub use synth::{MemorySynthesizer, SpeechEvent, SpeechSynthesizer, Utterance};
