//! Label-setting shortest path with pluggable edge costs.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use super::RouteResult;
use crate::cost::EdgeCostSource;
use crate::graph::{NodeId, RoadGraph};

/// Frontier entry ordered by tentative cost, then node id, so equal-cost pops
/// settle the lexicographically-first node.
#[derive(Debug, Clone, PartialEq)]
struct QueueEntry {
    cost: f64,
    node: NodeId,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Compute the least-cost path from `start` to `goal`.
///
/// Costs come from `costs`, which may blend in live traffic; the search
/// itself only assumes they are non-negative. Terminates as soon as the goal
/// settles. Returns an empty [`RouteResult`] when either endpoint is unknown
/// or the goal is unreachable.
pub fn dijkstra(
    graph: &RoadGraph,
    costs: &dyn EdgeCostSource,
    start: &NodeId,
    goal: &NodeId,
) -> RouteResult {
    if !graph.has_node(start) || !graph.has_node(goal) {
        return RouteResult::empty();
    }

    let mut dist: BTreeMap<NodeId, f64> = BTreeMap::new();
    let mut prev: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    let mut settled: BTreeSet<NodeId> = BTreeSet::new();
    let mut frontier: BinaryHeap<Reverse<QueueEntry>> = BinaryHeap::new();
    let mut degraded = false;

    dist.insert(start.clone(), 0.0);
    frontier.push(Reverse(QueueEntry {
        cost: 0.0,
        node: start.clone(),
    }));

    while let Some(Reverse(entry)) = frontier.pop() {
        if !settled.insert(entry.node.clone()) {
            continue; // stale heap entry
        }
        if entry.node == *goal {
            break;
        }

        for (neighbor, _) in graph.neighbors(&entry.node) {
            if settled.contains(neighbor) {
                continue;
            }
            let Some(edge) = costs.edge_cost(graph, &entry.node, neighbor) else {
                continue;
            };
            degraded |= edge.degraded;

            let candidate = entry.cost + edge.weight;
            let improved = dist
                .get(neighbor)
                .map_or(true, |current| candidate < *current);
            if improved {
                dist.insert(neighbor.clone(), candidate);
                prev.insert(neighbor.clone(), entry.node.clone());
                frontier.push(Reverse(QueueEntry {
                    cost: candidate,
                    node: neighbor.clone(),
                }));
            }
        }
    }

    let Some(total) = dist.get(goal).copied() else {
        return RouteResult {
            degraded,
            ..RouteResult::empty()
        };
    };

    let mut nodes = vec![goal.clone()];
    let mut cursor = goal;
    while let Some(parent) = prev.get(cursor) {
        nodes.push(parent.clone());
        cursor = parent;
    }
    nodes.reverse();

    RouteResult {
        nodes,
        cost: total,
        degraded,
    }
}
