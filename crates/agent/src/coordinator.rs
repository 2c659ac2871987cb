//! Voice-to-AR handoff coordination
//!
//! [`NavigationSession`] owns the whole flow from an accepted intent to
//! arrival: spoken confirmation, a fixed handoff delay, camera acquisition,
//! route planning, the tick loop with per-step instructions, and the arrival
//! announcement. State is an explicit finite-state machine transitioned only
//! by named operations; observers follow along on a broadcast channel.
//!
//! Cancellation is total: it aborts pending timers and the ticker, abandons
//! any in-flight camera acquisition, releases the stream, and interrupts
//! speech.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use wayfinder_config::Settings;
use wayfinder_core::{AcquireError, CameraError, Facing, NavigationIntent};
use wayfinder_media::{
    CameraConfig, CameraSessionManager, MemorySynthesizer, Resolution, SpeechSynthesizer,
    TextSubmission, Utterance,
};
use wayfinder_routing::{plan_route, OverlayFrame, RouteProgress, StepEvent, StepTicker};

use crate::interpreter::CommandInterpreter;

/// Spoken when input produced no navigation intent
const REPROMPT: &str =
    "I'm here to help with navigation. Try saying, navigate to conference room.";

/// Session-level configuration, usually derived from [`Settings`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub camera: CameraConfig,
    /// Cadence of simulated step advancement
    pub tick_interval: Duration,
    /// Pause between the spoken confirmation and the AR handoff
    pub handoff_delay: Duration,
    pub speech_rate: f32,
    pub speech_pitch: f32,
    /// Whether the misrecognition-tolerant trigger layer is enabled
    pub loose_triggers: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            tick_interval: Duration::from_millis(3_000),
            handoff_delay: Duration::from_millis(2_000),
            speech_rate: 0.9,
            speech_pitch: 1.0,
            loose_triggers: true,
        }
    }
}

impl SessionConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let facing = match settings.camera.preferred_facing.as_str() {
            "user" => Facing::User,
            _ => Facing::Environment,
        };
        Self {
            camera: CameraConfig {
                preferred_facing: facing,
                ideal: Resolution::new(settings.camera.ideal_width, settings.camera.ideal_height),
                min: Resolution::new(settings.camera.min_width, settings.camera.min_height),
                ready_timeout: Duration::from_millis(settings.camera.ready_timeout_ms),
            },
            tick_interval: Duration::from_millis(settings.navigation.tick_interval_ms),
            handoff_delay: Duration::from_millis(settings.navigation.handoff_delay_ms),
            speech_rate: settings.speech.rate,
            speech_pitch: settings.speech.pitch,
            loose_triggers: settings.features.loose_triggers,
        }
    }
}

/// Session finite-state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for input
    Idle,
    /// Intent accepted, confirmation being spoken
    Confirming,
    /// Fixed delay letting the confirmation finish
    HandingOff,
    /// Camera acquisition in flight
    AcquiringCamera,
    /// Route active, ticker running
    Navigating,
    /// Destination reached
    Arrived,
    /// Camera acquisition failed; `retry` may re-enter acquisition
    Failed,
}

/// Broadcast notifications for session observers
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged {
        from: SessionState,
        to: SessionState,
    },
    IntentRecognized(NavigationIntent),
    NoIntent {
        text: String,
    },
    Speaking {
        text: String,
    },
    CameraActive {
        facing: Facing,
    },
    CameraFailed {
        error: CameraError,
        message: String,
        retriable: bool,
    },
    StepAdvanced {
        index: usize,
        instruction: Option<String>,
    },
    Arrived {
        destination: String,
    },
    Cancelled,
}

struct SessionInner {
    id: String,
    config: SessionConfig,
    interpreter: CommandInterpreter,
    camera: Arc<CameraSessionManager>,
    speech: Arc<dyn SpeechSynthesizer>,
    state: RwLock<SessionState>,
    destination: RwLock<Option<String>>,
    last_error: RwLock<Option<CameraError>>,
    progress: Mutex<Option<Arc<Mutex<RouteProgress>>>>,
    ticker: Mutex<Option<StepTicker>>,
    handoff_task: Mutex<Option<JoinHandle<()>>>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Some(task) = self.handoff_task.lock().take() {
            task.abort();
        }
    }
}

/// One voice-triggered navigation session
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct NavigationSession {
    inner: Arc<SessionInner>,
}

impl NavigationSession {
    pub fn new(
        config: SessionConfig,
        camera: Arc<CameraSessionManager>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let interpreter = if config.loose_triggers {
            CommandInterpreter::new()
        } else {
            CommandInterpreter::strict()
        };
        let (event_tx, _) = broadcast::channel(256);
        let id = Uuid::new_v4().to_string();
        tracing::info!(session_id = %id, "navigation session created");

        Self {
            inner: Arc::new(SessionInner {
                id,
                config,
                interpreter,
                camera,
                speech,
                state: RwLock::new(SessionState::Idle),
                destination: RwLock::new(None),
                last_error: RwLock::new(None),
                progress: Mutex::new(None),
                ticker: Mutex::new(None),
                handoff_task: Mutex::new(None),
                event_tx,
            }),
        }
    }

    /// Session over a fully simulated device stack; the synthesizer is
    /// returned so callers can inspect spoken output
    pub fn simple(config: SessionConfig) -> (Self, Arc<MemorySynthesizer>) {
        let camera = Arc::new(CameraSessionManager::simple(config.camera.clone()));
        let speech = Arc::new(MemorySynthesizer::new());
        let session = Self::new(config, camera, speech.clone());
        (session, speech)
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }

    pub fn destination(&self) -> Option<String> {
        self.inner.destination.read().clone()
    }

    pub fn last_error(&self) -> Option<CameraError> {
        self.inner.last_error.read().clone()
    }

    pub fn camera(&self) -> &Arc<CameraSessionManager> {
        &self.inner.camera
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Guidance frame for the current cursor position, when a route is active
    pub fn overlay_frame(&self) -> Option<OverlayFrame> {
        self.inner
            .progress
            .lock()
            .as_ref()
            .map(|progress| OverlayFrame::for_progress(&progress.lock()))
    }

    /// Feed a structured submission (recognition result or typed fallback)
    pub fn submit(&self, submission: &TextSubmission) -> Option<NavigationIntent> {
        tracing::debug!(voice = submission.is_voice(), "input submitted");
        self.submit_text(&submission.normalized())
    }

    /// Feed recognized or typed text through the interpreter
    ///
    /// An accepted intent starts navigation toward its destination; a miss
    /// speaks a reprompt and leaves the session state untouched.
    pub fn submit_text(&self, text: &str) -> Option<NavigationIntent> {
        match self.inner.interpreter.interpret(text) {
            Some(intent) => {
                let _ = self
                    .inner
                    .event_tx
                    .send(SessionEvent::IntentRecognized(intent.clone()));
                self.start_navigation(intent.destination.clone());
                Some(intent)
            }
            None => {
                tracing::debug!(text, "no navigation intent");
                let _ = self.inner.event_tx.send(SessionEvent::NoIntent {
                    text: text.to_string(),
                });
                self.say(REPROMPT);
                None
            }
        }
    }

    /// Start the confirmation-to-arrival sequence toward a destination
    ///
    /// Any previous run is torn down first; a session drives at most one
    /// navigation at a time.
    pub fn start_navigation(&self, destination: String) {
        self.halt_tasks();
        *self.inner.destination.write() = Some(destination.clone());
        *self.inner.last_error.write() = None;
        *self.inner.progress.lock() = None;

        self.set_state(SessionState::Confirming);
        self.say(format!("Navigating to {destination}. Follow me!"));

        let session = self.clone();
        let task = tokio::spawn(async move {
            session.set_state(SessionState::HandingOff);
            tokio::time::sleep(session.inner.config.handoff_delay).await;
            session.run_ar(destination).await;
        });
        *self.inner.handoff_task.lock() = Some(task);
    }

    /// Re-enter camera acquisition after a retriable failure
    ///
    /// Returns false when the session is not in a failed state, the failure
    /// class does not allow an in-app retry, or no destination is pending.
    pub fn retry(&self) -> bool {
        if self.state() != SessionState::Failed {
            return false;
        }
        let retriable = self
            .inner
            .last_error
            .read()
            .as_ref()
            .map(CameraError::is_retriable)
            .unwrap_or(false);
        if !retriable {
            tracing::debug!("retry refused for non-retriable camera failure");
            return false;
        }
        let destination = match self.inner.destination.read().clone() {
            Some(destination) => destination,
            None => return false,
        };

        self.halt_tasks();
        let session = self.clone();
        let task = tokio::spawn(async move {
            session.run_ar(destination).await;
        });
        *self.inner.handoff_task.lock() = Some(task);
        true
    }

    /// Tear everything down and return to idle
    pub fn cancel(&self) {
        self.halt_tasks();
        self.inner.camera.release();
        self.inner.speech.cancel();
        *self.inner.destination.write() = None;
        *self.inner.progress.lock() = None;
        self.set_state(SessionState::Idle);
        let _ = self.inner.event_tx.send(SessionEvent::Cancelled);
        tracing::info!(session_id = %self.inner.id, "session cancelled");
    }

    async fn run_ar(&self, destination: String) {
        self.set_state(SessionState::AcquiringCamera);
        let facing = self.inner.config.camera.preferred_facing;
        match self.inner.camera.acquire(facing).await {
            Ok(()) => {}
            Err(AcquireError::Cancelled) => {
                tracing::debug!("camera acquisition abandoned");
                return;
            }
            Err(AcquireError::Camera(error)) => {
                *self.inner.last_error.write() = Some(error.clone());
                self.set_state(SessionState::Failed);
                let _ = self.inner.event_tx.send(SessionEvent::CameraFailed {
                    message: error.user_message().to_string(),
                    retriable: error.is_retriable(),
                    error,
                });
                return;
            }
        }
        let _ = self.inner.event_tx.send(SessionEvent::CameraActive {
            facing: self.inner.camera.facing(),
        });

        let route = plan_route(&destination);
        let progress = Arc::new(Mutex::new(RouteProgress::new(route)));
        *self.inner.progress.lock() = Some(progress.clone());

        self.set_state(SessionState::Navigating);
        self.say(format!(
            "Starting navigation to {destination}. Look for the green arrow to guide you."
        ));

        let (tx, mut rx) = mpsc::channel(16);
        *self.inner.ticker.lock() = Some(StepTicker::spawn(
            progress,
            self.inner.config.tick_interval,
            tx,
        ));

        while let Some(event) = rx.recv().await {
            match event {
                StepEvent::Advanced { index, instruction } => {
                    if let Some(text) = instruction {
                        self.say(text);
                    }
                    let _ = self.inner.event_tx.send(SessionEvent::StepAdvanced {
                        index,
                        instruction: instruction.map(str::to_string),
                    });
                }
                StepEvent::Arrived => {
                    self.set_state(SessionState::Arrived);
                    self.say(format!("You have arrived at {destination}!"));
                    let _ = self.inner.event_tx.send(SessionEvent::Arrived {
                        destination: destination.clone(),
                    });
                }
            }
        }
    }

    fn halt_tasks(&self) {
        if let Some(task) = self.inner.handoff_task.lock().take() {
            task.abort();
        }
        if let Some(ticker) = self.inner.ticker.lock().take() {
            ticker.cancel();
        }
    }

    fn say(&self, text: impl Into<String>) {
        let text = text.into();
        let _ = self.inner.event_tx.send(SessionEvent::Speaking { text: text.clone() });
        self.inner.speech.speak(
            Utterance::new(text)
                .with_rate(self.inner.config.speech_rate)
                .with_pitch(self.inner.config.speech_pitch),
        );
    }

    fn set_state(&self, to: SessionState) {
        let from = {
            let mut state = self.inner.state.write();
            std::mem::replace(&mut *state, to)
        };
        if from != to {
            tracing::info!(session_id = %self.inner.id, ?from, ?to, "session state changed");
            let _ = self.inner.event_tx.send(SessionEvent::StateChanged { from, to });
        }
    }
}
