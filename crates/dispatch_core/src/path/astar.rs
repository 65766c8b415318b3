//! Heuristic-guided shortest path over base weights.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use super::RouteResult;
use crate::graph::{NodeId, RoadGraph};

#[derive(Debug, Clone, PartialEq)]
struct OpenEntry {
    estimate: f64,
    node: NodeId,
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.estimate
            .total_cmp(&other.estimate)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search using the great-circle distance to the goal as heuristic.
///
/// Only valid when edge weights are true kilometre distances: the heuristic
/// is then admissible and consistent and the result matches
/// [`dijkstra`](super::dijkstra) exactly. Live traffic additions void that
/// guarantee, which is why this function reads base weights directly and
/// accepts no cost source.
pub fn a_star(graph: &RoadGraph, start: &NodeId, goal: &NodeId) -> RouteResult {
    let Some(goal_node) = graph.node(goal) else {
        return RouteResult::empty();
    };
    if !graph.has_node(start) {
        return RouteResult::empty();
    }
    let goal_pos = goal_node.position;

    let heuristic = |id: &NodeId| -> f64 {
        graph
            .node(id)
            .map(|n| n.position.distance_km(&goal_pos))
            .unwrap_or(0.0)
    };

    let mut g_score: BTreeMap<NodeId, f64> = BTreeMap::new();
    let mut prev: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    let mut closed: BTreeSet<NodeId> = BTreeSet::new();
    let mut open: BinaryHeap<Reverse<OpenEntry>> = BinaryHeap::new();

    g_score.insert(start.clone(), 0.0);
    open.push(Reverse(OpenEntry {
        estimate: heuristic(start),
        node: start.clone(),
    }));

    while let Some(Reverse(entry)) = open.pop() {
        if !closed.insert(entry.node.clone()) {
            continue;
        }
        if entry.node == *goal {
            break;
        }
        let current_g = g_score[&entry.node];

        for (neighbor, weight) in graph.neighbors(&entry.node) {
            if closed.contains(neighbor) {
                continue;
            }
            let tentative = current_g + weight;
            let improved = g_score
                .get(neighbor)
                .map_or(true, |known| tentative < *known);
            if improved {
                g_score.insert(neighbor.clone(), tentative);
                prev.insert(neighbor.clone(), entry.node.clone());
                open.push(Reverse(OpenEntry {
                    estimate: tentative + heuristic(neighbor),
                    node: neighbor.clone(),
                }));
            }
        }
    }

    let Some(total) = g_score.get(goal).copied() else {
        return RouteResult::empty();
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
        degraded: false,
    }
}
