//! Shortest-path engine over the road graph.
//!
//! Two algorithms, one contract:
//!
//! - [`dijkstra`]: label-setting search driven by an
//!   [`EdgeCostSource`](crate::cost::EdgeCostSource), the default for
//!   dispatch and the only variant that may see traffic-augmented costs.
//! - [`a_star`]: heuristic-guided variant over base weights only. The
//!   straight-line heuristic is admissible only while weights are true
//!   distances, which live traffic additions break, so `a_star` deliberately
//!   takes no cost source.
//!
//! "No path" is an empty [`RouteResult`], not an error; unreachable goals are
//! an expected input.

mod astar;
mod dijkstra;

pub use astar::a_star;
pub use dijkstra::dijkstra;

use crate::graph::NodeId;

/// Outcome of one path computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Node sequence from start to goal; empty when no path exists.
    pub nodes: Vec<NodeId>,
    /// Accumulated cost of the returned path.
    pub cost: f64,
    /// True when any edge cost consulted during the search fell back to its
    /// base weight after a failed traffic lookup.
    pub degraded: bool,
}

impl RouteResult {
    pub(crate) fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            cost: 0.0,
            degraded: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
