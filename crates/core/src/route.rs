//! Route graph and step cursor types
//!
//! Routes are small directed sequences of named waypoints in the simulated
//! indoor graph. They are recomputed per session and never persisted.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// Known route keys in the fixed indoor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKey {
    /// Main entrance to the conference room.
    EntranceToConference,
    /// Main entrance to the cafeteria.
    EntranceToCafeteria,
    /// Fallback route for unclassified destinations.
    Generic,
}

/// Role of a node within a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointKind {
    Waypoint,
    Turn,
    Destination,
}

/// A named point in the simulated indoor route graph.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointNode {
    /// Stable identifier within the route.
    pub id: &'static str,
    /// Position in route-local coordinates (metres).
    pub position: Vec3,
    /// Node role.
    pub kind: WaypointKind,
    /// Spoken guidance for this node, if any.
    pub instruction: Option<&'static str>,
}

impl WaypointNode {
    pub fn new(id: &'static str, position: Vec3, kind: WaypointKind) -> Self {
        Self {
            id,
            position,
            kind,
            instruction: None,
        }
    }

    pub fn with_instruction(mut self, instruction: &'static str) -> Self {
        self.instruction = Some(instruction);
        self
    }
}

/// An ordered sequence of waypoints for one destination class.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGraph {
    /// Which table entry produced this route.
    pub key: RouteKey,
    /// Waypoints in traversal order; never empty.
    pub nodes: Vec<WaypointNode>,
}

impl RouteGraph {
    /// Index of the final node.
    pub fn last_index(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The destination node.
    pub fn destination_node(&self) -> &WaypointNode {
        &self.nodes[self.last_index()]
    }
}

/// Position within an active route.
///
/// Mutated only by the step executor on timer ticks. The index is always a
/// valid index into the owning route and never decreases; advancing past the
/// final index latches the arrived flag instead.
#[derive(Debug, Clone, Copy)]
pub struct StepCursor {
    /// Key of the route this cursor traverses.
    pub route: RouteKey,
    /// Current node index.
    pub index: usize,
    /// When traversal began.
    pub started_at: Instant,
}

impl StepCursor {
    /// Cursor at the first node of a route.
    pub fn start(route: RouteKey) -> Self {
        Self {
            route,
            index: 0,
            started_at: Instant::now(),
        }
    }

    /// Whether this cursor sits on the final node of a route of `len` nodes.
    pub fn at_terminal(&self, len: usize) -> bool {
        len > 0 && self.index == len - 1
    }
}
