//! Speech synthesis output
//!
//! Spoken guidance is last-write-wins: every `speak` call interrupts
//! whatever is in progress before queueing the new utterance, so route
//! instructions never pile up behind each other.

use parking_lot::Mutex;
use tokio::sync::broadcast;

/// A single spoken phrase with prosody parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Speaking rate, slightly below normal by default for clarity
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rate: 0.9,
            pitch: 1.0,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }
}

/// Lifecycle events for spoken output
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Started { text: String },
    Interrupted { text: String },
    Cancelled { text: String },
}

/// Sink for spoken guidance
///
/// Implementations must interrupt any utterance in progress when `speak` is
/// called again before the previous one finished.
pub trait SpeechSynthesizer: Send + Sync {
    /// Begin speaking, interrupting anything in progress
    fn speak(&self, utterance: Utterance);

    /// Cancel the utterance in progress, if any
    fn cancel(&self);

    /// Subscribe to speech lifecycle events
    fn subscribe(&self) -> broadcast::Receiver<SpeechEvent>;
}

/// In-memory synthesizer that records everything it was asked to say
///
/// Utterances stay "in progress" until interrupted or cancelled, which makes
/// the last-write-wins contract observable in tests.
pub struct MemorySynthesizer {
    spoken: Mutex<Vec<Utterance>>,
    pending: Mutex<Option<String>>,
    event_tx: broadcast::Sender<SpeechEvent>,
}

impl MemorySynthesizer {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            spoken: Mutex::new(Vec::new()),
            pending: Mutex::new(None),
            event_tx,
        }
    }

    /// Every utterance passed to `speak`, in order
    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().clone()
    }

    /// Texts of every utterance passed to `speak`, in order
    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken.lock().iter().map(|u| u.text.clone()).collect()
    }

    /// Text currently "in progress", if any
    pub fn in_progress(&self) -> Option<String> {
        self.pending.lock().clone()
    }
}

impl Default for MemorySynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSynthesizer for MemorySynthesizer {
    fn speak(&self, utterance: Utterance) {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            let _ = self.event_tx.send(SpeechEvent::Interrupted { text: previous });
        }

        tracing::debug!(text = %utterance.text, rate = utterance.rate, "speaking");
        *pending = Some(utterance.text.clone());
        let _ = self.event_tx.send(SpeechEvent::Started {
            text: utterance.text.clone(),
        });
        self.spoken.lock().push(utterance);
    }

    fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            let _ = self.event_tx.send(SpeechEvent::Cancelled { text: previous });
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<SpeechEvent> {
        self.event_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speak_records_in_order() {
        let synth = MemorySynthesizer::new();
        synth.speak(Utterance::new("first"));
        synth.speak(Utterance::new("second"));

        assert_eq!(synth.spoken_texts(), vec!["first", "second"]);
        assert_eq!(synth.in_progress(), Some("second".to_string()));
    }

    #[test]
    fn test_new_utterance_interrupts_previous() {
        let synth = MemorySynthesizer::new();
        let mut events = synth.subscribe();

        synth.speak(Utterance::new("turn left"));
        synth.speak(Utterance::new("turn right"));

        assert_eq!(
            events.try_recv().unwrap(),
            SpeechEvent::Started {
                text: "turn left".to_string()
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            SpeechEvent::Interrupted {
                text: "turn left".to_string()
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            SpeechEvent::Started {
                text: "turn right".to_string()
            }
        );
    }

    #[test]
    fn test_cancel_clears_in_progress() {
        let synth = MemorySynthesizer::new();
        synth.speak(Utterance::new("follow me"));
        synth.cancel();

        assert_eq!(synth.in_progress(), None);
        // Cancel with nothing pending is a no-op
        synth.cancel();
    }

    #[test]
    fn test_prosody_builders() {
        let utterance = Utterance::new("hello").with_rate(1.2).with_pitch(0.8);
        assert_eq!(utterance.rate, 1.2);
        assert_eq!(utterance.pitch, 0.8);
    }
}
