//! Step execution
//!
//! Progression is simulated on a fixed cadence rather than driven by real
//! positioning. [`RouteProgress`] is the synchronous core: each tick advances
//! the cursor one node and latches the arrived flag at the destination.
//! [`StepTicker`] wraps it in a timer task that reports advancement over a
//! channel and aborts itself on drop, so a session can never leak a ticker.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use wayfinder_core::{RouteGraph, StepCursor, WaypointNode};

/// Result of a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the cursor moved this tick
    pub advanced: bool,
    /// Cursor index after the tick
    pub index: usize,
    /// Instruction of the node the cursor landed on, if it moved
    pub instruction: Option<&'static str>,
    /// Whether the destination node has been reached
    pub arrived: bool,
}

/// Cursor state over one active route
#[derive(Debug)]
pub struct RouteProgress {
    graph: RouteGraph,
    cursor: StepCursor,
    arrived: bool,
}

impl RouteProgress {
    pub fn new(graph: RouteGraph) -> Self {
        let cursor = StepCursor::start(graph.key);
        let arrived = cursor.at_terminal(graph.len());
        Self {
            graph,
            cursor,
            arrived,
        }
    }

    /// Advance one node; once arrived every further tick is a no-op
    pub fn tick(&mut self) -> TickOutcome {
        if self.arrived {
            return TickOutcome {
                advanced: false,
                index: self.cursor.index,
                instruction: None,
                arrived: true,
            };
        }

        self.cursor.index += 1;
        if self.cursor.at_terminal(self.graph.len()) {
            self.arrived = true;
        }

        let node = self.current_node();
        tracing::debug!(index = self.cursor.index, node = node.id, "advanced step");
        TickOutcome {
            advanced: true,
            index: self.cursor.index,
            instruction: node.instruction,
            arrived: self.arrived,
        }
    }

    pub fn current_node(&self) -> &WaypointNode {
        &self.graph.nodes[self.cursor.index]
    }

    /// Node after the current one, if the cursor is not at the destination
    pub fn next_node(&self) -> Option<&WaypointNode> {
        self.graph.nodes.get(self.cursor.index + 1)
    }

    pub fn arrived(&self) -> bool {
        self.arrived
    }

    pub fn cursor(&self) -> StepCursor {
        self.cursor
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }
}

/// Advancement notifications from the ticker task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    Advanced {
        index: usize,
        instruction: Option<&'static str>,
    },
    Arrived,
}

/// Timer task advancing a shared [`RouteProgress`] on a fixed cadence
///
/// The task stops itself after reporting arrival. Dropping the ticker aborts
/// the task, which is how a cancelled or replaced session tears down its
/// route progression.
pub struct StepTicker {
    handle: JoinHandle<()>,
}

impl StepTicker {
    pub fn spawn(
        progress: Arc<Mutex<RouteProgress>>,
        interval: Duration,
        events: mpsc::Sender<StepEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first interval tick completes immediately; skip it so the
            // cursor holds the start node for a full period.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let outcome = { progress.lock().tick() };

                if outcome.advanced {
                    let sent = events
                        .send(StepEvent::Advanced {
                            index: outcome.index,
                            instruction: outcome.instruction,
                        })
                        .await;
                    if sent.is_err() {
                        return;
                    }
                }

                if outcome.arrived {
                    let _ = events.send(StepEvent::Arrived).await;
                    return;
                }
            }
        });

        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for StepTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::plan_route;

    #[test]
    fn test_n_ticks_arrive_on_n_node_route() {
        let route = plan_route("conference room");
        let len = route.len();
        let mut progress = RouteProgress::new(route);

        for _ in 0..len {
            progress.tick();
        }

        assert!(progress.arrived());
        assert_eq!(progress.cursor().index, len - 1);
    }

    #[test]
    fn test_ticks_after_arrival_are_noops() {
        let mut progress = RouteProgress::new(plan_route("cafeteria"));
        while !progress.arrived() {
            progress.tick();
        }

        let index = progress.cursor().index;
        let outcome = progress.tick();
        assert!(!outcome.advanced);
        assert!(outcome.arrived);
        assert_eq!(progress.cursor().index, index);
    }

    #[test]
    fn test_tick_reports_landed_instruction() {
        let mut progress = RouteProgress::new(plan_route("conference room"));
        let outcome = progress.tick();
        assert!(outcome.advanced);
        assert_eq!(outcome.index, 1);
        assert_eq!(outcome.instruction, Some("Go straight ahead"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_advances_to_arrival_and_stops() {
        let route = plan_route("somewhere");
        let len = route.len();
        let progress = Arc::new(Mutex::new(RouteProgress::new(route)));
        let (tx, mut rx) = mpsc::channel(16);

        let _ticker = StepTicker::spawn(progress.clone(), Duration::from_secs(3), tx);

        let mut advanced = 0;
        loop {
            match rx.recv().await.unwrap() {
                StepEvent::Advanced { .. } => advanced += 1,
                StepEvent::Arrived => break,
            }
        }

        assert_eq!(advanced, len - 1);
        assert!(progress.lock().arrived());
        // The task has stopped; the channel closes once the sender drops
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_ticker_stops_advancement() {
        let progress = Arc::new(Mutex::new(RouteProgress::new(plan_route("somewhere"))));
        let (tx, mut rx) = mpsc::channel(16);

        let ticker = StepTicker::spawn(progress.clone(), Duration::from_secs(3), tx);
        let first = rx.recv().await.unwrap();
        assert!(matches!(first, StepEvent::Advanced { index: 1, .. }));

        drop(ticker);
        assert!(rx.recv().await.is_none());
        assert!(!progress.lock().arrived());
    }
}
