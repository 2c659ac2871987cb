//! Indoor route graph, step execution, and overlay math
//!
//! Routes are fixed waypoint sequences in a local metric frame. Progression
//! is simulated: a ticker advances the cursor one node per interval until the
//! destination node latches the arrived flag. The overlay module derives the
//! guidance arrow from the cursor position alone.

pub mod executor;
pub mod graph;
pub mod overlay;

pub use executor::{RouteProgress, StepEvent, StepTicker, TickOutcome};
pub use graph::{classify_destination, plan_route};
pub use overlay::{arrived, direction_to, distance, OverlayFrame};
