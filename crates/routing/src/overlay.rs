//! Guidance overlay math
//!
//! Pure functions from cursor state to the rendered guidance arrow. The
//! overlay never owns state: every frame is derived from the route progress
//! it is given, so it can be recomputed freely on any cadence.

use wayfinder_core::{euclidean_distance, unit_direction, Vec3};

use crate::executor::RouteProgress;

/// Unit vector from the current position toward the next waypoint
///
/// Zero when the two positions coincide, which the render layer treats as
/// "suppress the arrow".
pub fn direction_to(current: &Vec3, next: &Vec3) -> Vec3 {
    unit_direction(current, next)
}

/// Metres from the current position to the next waypoint
pub fn distance(current: &Vec3, next: &Vec3) -> f32 {
    euclidean_distance(current, next)
}

/// Whether a cursor index sits on the destination node
pub fn arrived(index: usize, route_len: usize) -> bool {
    route_len > 0 && index == route_len - 1
}

/// One derived guidance frame
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    /// Unit vector toward the next waypoint; zero at the destination
    pub direction: Vec3,
    /// Metres to the next waypoint; zero at the destination
    pub distance: f32,
    /// Whether the destination has been reached
    pub arrived: bool,
}

impl OverlayFrame {
    /// Derive the frame for the current cursor position
    pub fn for_progress(progress: &RouteProgress) -> Self {
        let current = &progress.current_node().position;
        match progress.next_node() {
            Some(next) => Self {
                direction: unit_direction(current, &next.position),
                distance: euclidean_distance(current, &next.position),
                arrived: progress.arrived(),
            },
            None => Self {
                direction: Vec3::zeros(),
                distance: 0.0,
                arrived: progress.arrived(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::plan_route;
    use wayfinder_core::EPSILON;

    #[test]
    fn test_direction_is_unit_length_mid_route() {
        let progress = RouteProgress::new(plan_route("conference room"));
        let frame = OverlayFrame::for_progress(&progress);

        assert!((frame.direction.norm() - 1.0).abs() < EPSILON);
        assert!(frame.distance > 0.0);
        assert!(!frame.arrived);
    }

    #[test]
    fn test_direction_is_zero_at_destination() {
        let mut progress = RouteProgress::new(plan_route("cafeteria"));
        while !progress.arrived() {
            progress.tick();
        }

        let frame = OverlayFrame::for_progress(&progress);
        assert_eq!(frame.direction, Vec3::zeros());
        assert_eq!(frame.distance, 0.0);
        assert!(frame.arrived);
    }

    #[test]
    fn test_arrival_predicate() {
        assert!(!arrived(0, 3));
        assert!(!arrived(1, 3));
        assert!(arrived(2, 3));
        assert!(!arrived(0, 0));
    }

    #[test]
    fn test_frame_tracks_each_leg() {
        let mut progress = RouteProgress::new(plan_route("conference room"));

        // First leg runs along +x for 5 metres
        let frame = OverlayFrame::for_progress(&progress);
        assert!((frame.direction.x - 1.0).abs() < EPSILON);
        assert!((frame.distance - 5.0).abs() < EPSILON);

        // After the turn node the leg runs along -x
        progress.tick();
        progress.tick();
        progress.tick();
        let frame = OverlayFrame::for_progress(&progress);
        assert!((frame.direction.x + 1.0).abs() < EPSILON);
    }
}
