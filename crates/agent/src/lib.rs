//! Voice-triggered navigation agent
//!
//! Ties the interpreter, camera session manager, route executor and speech
//! output together behind [`NavigationSession`], the coordinator owning the
//! voice-to-AR handoff flow.

pub mod coordinator;
pub mod interpreter;

pub use coordinator::{NavigationSession, SessionConfig, SessionEvent, SessionState};
pub use interpreter::CommandInterpreter;
