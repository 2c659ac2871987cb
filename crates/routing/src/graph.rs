//! Fixed indoor route table
//!
//! The building graph is a small static table keyed by destination class.
//! Classification is a substring match over the normalized destination
//! phrase; anything unrecognized gets the generic straight-line route so a
//! session can always start.

use wayfinder_core::{RouteGraph, RouteKey, Vec3, WaypointKind, WaypointNode};

/// Map a destination phrase to a route table entry
pub fn classify_destination(destination: &str) -> RouteKey {
    let normalized = destination.trim().to_lowercase();
    if normalized.contains("conference") {
        RouteKey::EntranceToConference
    } else if normalized.contains("cafeteria") {
        RouteKey::EntranceToCafeteria
    } else {
        RouteKey::Generic
    }
}

/// Build the route for a destination phrase
///
/// Never returns an empty route: an empty table entry falls back to the
/// generic route.
pub fn plan_route(destination: &str) -> RouteGraph {
    let key = classify_destination(destination);
    let graph = route_for_key(key);
    if graph.is_empty() {
        tracing::warn!(?key, "empty route table entry, using generic route");
        return route_for_key(RouteKey::Generic);
    }
    graph
}

fn route_for_key(key: RouteKey) -> RouteGraph {
    let nodes = match key {
        RouteKey::EntranceToConference => conference_nodes(),
        RouteKey::EntranceToCafeteria => cafeteria_nodes(),
        RouteKey::Generic => generic_nodes(),
    };
    RouteGraph { key, nodes }
}

fn conference_nodes() -> Vec<WaypointNode> {
    vec![
        WaypointNode::new("start", Vec3::new(0.0, 0.0, 0.0), WaypointKind::Waypoint),
        WaypointNode::new("hallway-1", Vec3::new(5.0, 0.0, 0.0), WaypointKind::Waypoint)
            .with_instruction("Go straight ahead"),
        WaypointNode::new("turn-1", Vec3::new(5.0, 0.0, 5.0), WaypointKind::Turn)
            .with_instruction("Turn left here"),
        WaypointNode::new("hallway-2", Vec3::new(0.0, 0.0, 5.0), WaypointKind::Waypoint)
            .with_instruction("Continue straight"),
        WaypointNode::new(
            "conference-room",
            Vec3::new(-3.0, 0.0, 5.0),
            WaypointKind::Destination,
        )
        .with_instruction("Conference room ahead"),
    ]
}

fn cafeteria_nodes() -> Vec<WaypointNode> {
    vec![
        WaypointNode::new("start", Vec3::new(0.0, 0.0, 0.0), WaypointKind::Waypoint),
        WaypointNode::new("hallway-1", Vec3::new(5.0, 0.0, 0.0), WaypointKind::Waypoint)
            .with_instruction("Go straight ahead"),
        WaypointNode::new("turn-1", Vec3::new(5.0, 0.0, -5.0), WaypointKind::Turn)
            .with_instruction("Turn right here"),
        WaypointNode::new(
            "cafeteria",
            Vec3::new(8.0, 0.0, -5.0),
            WaypointKind::Destination,
        )
        .with_instruction("Cafeteria entrance"),
    ]
}

fn generic_nodes() -> Vec<WaypointNode> {
    vec![
        WaypointNode::new("start", Vec3::new(0.0, 0.0, 0.0), WaypointKind::Waypoint),
        WaypointNode::new("hallway", Vec3::new(5.0, 0.0, 0.0), WaypointKind::Waypoint)
            .with_instruction("Continue straight"),
        WaypointNode::new(
            "destination",
            Vec3::new(8.0, 0.0, 0.0),
            WaypointKind::Destination,
        )
        .with_instruction("You have arrived at your destination"),
    ]
}
