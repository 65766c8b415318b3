//! Node snapping: map a free coordinate onto the nearest usable graph node.
//!
//! Candidates are ranked by haversine distance with node-id tie-breaks, and
//! nodes are visited in ascending id order, so snapping the same input twice
//! against the same graph always yields the same node.

use std::cmp::Ordering;

use thiserror::Error;

use crate::geo::LatLng;
use crate::graph::{NodeId, RoadGraph};

/// Errors raised while snapping trip endpoints.
#[derive(Debug, Error, PartialEq)]
pub enum SnapError {
    /// No graph node lies within the distance threshold of an endpoint.
    #[error("no graph node within {max_km} km of ({lat}, {lng})")]
    OutOfRange { lat: f64, lng: f64, max_km: f64 },
    /// Both endpoints resolve to one node and neither has an alternative.
    #[error("start and goal snap to the same node and no alternative exists")]
    AmbiguousEndpoints,
}

/// A node within the snapping threshold of a query point.
#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    id: NodeId,
    distance_km: f64,
}

fn candidates(point: LatLng, graph: &RoadGraph, max_km: f64) -> Vec<Candidate> {
    let mut found: Vec<Candidate> = graph
        .nodes()
        .filter_map(|node| {
            let distance_km = point.distance_km(&node.position);
            (distance_km <= max_km).then(|| Candidate {
                id: node.id.clone(),
                distance_km,
            })
        })
        .collect();
    found.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    found
}

/// Snap `point` to the nearest node within `max_km`, or `None` if no node
/// qualifies. The first node (in ascending id order) at the strictly
/// smallest distance wins.
pub fn snap_nearest(point: LatLng, graph: &RoadGraph, max_km: f64) -> Option<NodeId> {
    candidates(point, graph, max_km).into_iter().next().map(|c| c.id)
}

/// Snap the start and goal of a trip, guaranteeing two distinct nodes.
///
/// When both endpoints resolve to the same node the goal is re-ranked and its
/// second-nearest candidate is taken; failing that, the start falls back to
/// its own second-nearest. The goal-then-start order is a carried-over policy,
/// kept for reproducibility rather than inferred intent. If neither endpoint
/// has an alternative within threshold, snapping fails with
/// [`SnapError::AmbiguousEndpoints`].
pub fn snap_endpoints(
    start: LatLng,
    goal: LatLng,
    graph: &RoadGraph,
    max_km: f64,
) -> Result<(NodeId, NodeId), SnapError> {
    let start_candidates = candidates(start, graph, max_km);
    let goal_candidates = candidates(goal, graph, max_km);

    let start_node = start_candidates.first().ok_or(SnapError::OutOfRange {
        lat: start.lat,
        lng: start.lng,
        max_km,
    })?;
    let goal_node = goal_candidates.first().ok_or(SnapError::OutOfRange {
        lat: goal.lat,
        lng: goal.lng,
        max_km,
    })?;

    if start_node.id != goal_node.id {
        return Ok((start_node.id.clone(), goal_node.id.clone()));
    }

    if let Some(alt_goal) = goal_candidates.get(1) {
        return Ok((start_node.id.clone(), alt_goal.id.clone()));
    }
    if let Some(alt_start) = start_candidates.get(1) {
        return Ok((alt_start.id.clone(), goal_node.id.clone()));
    }
    Err(SnapError::AmbiguousEndpoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    fn grid_graph() -> RoadGraph {
        // Three nodes spaced ~1.1 km apart along the equator.
        let nodes = vec![
            Node {
                id: "a".into(),
                position: LatLng::new(0.0, 0.00),
            },
            Node {
                id: "b".into(),
                position: LatLng::new(0.0, 0.01),
            },
            Node {
                id: "c".into(),
                position: LatLng::new(0.0, 0.02),
            },
        ];
        let edges = vec![
            Edge {
                from: "a".into(),
                to: "b".into(),
                weight: 1.0,
            },
            Edge {
                from: "b".into(),
                to: "c".into(),
                weight: 1.0,
            },
        ];
        RoadGraph::build(nodes, edges).unwrap()
    }

    #[test]
    fn snaps_to_nearest_node() {
        let g = grid_graph();
        let near_b = LatLng::new(0.0, 0.0101);
        assert_eq!(snap_nearest(near_b, &g, 100.0), Some("b".into()));
    }

    #[test]
    fn snapping_is_idempotent() {
        let g = grid_graph();
        let p = LatLng::new(0.001, 0.0149);
        let first = snap_nearest(p, &g, 100.0);
        let second = snap_nearest(p, &g, 100.0);
        assert_eq!(first, second);
    }

    #[test]
    fn respects_distance_threshold() {
        let g = grid_graph();
        let far = LatLng::new(10.0, 10.0);
        assert_eq!(snap_nearest(far, &g, 5.0), None);
    }

    #[test]
    fn equidistant_tie_breaks_on_smaller_id() {
        let g = grid_graph();
        // Exactly between a and b.
        let midpoint = LatLng::new(0.0, 0.005);
        assert_eq!(snap_nearest(midpoint, &g, 100.0), Some("a".into()));
    }

    #[test]
    fn same_node_conflict_moves_goal_to_second_nearest() {
        let g = grid_graph();
        let near_a = LatLng::new(0.0, 0.0001);
        let also_near_a = LatLng::new(0.0, 0.0002);
        let (start, goal) = snap_endpoints(near_a, also_near_a, &g, 100.0).unwrap();
        assert_eq!(start, "a".into());
        assert_eq!(goal, "b".into());
    }

    #[test]
    fn same_node_conflict_without_alternatives_fails() {
        let g = RoadGraph::build(
            vec![Node {
                id: "only".into(),
                position: LatLng::new(0.0, 0.0),
            }],
            vec![],
        )
        .unwrap();
        let p = LatLng::new(0.0, 0.0001);
        let err = snap_endpoints(p, p, &g, 100.0).unwrap_err();
        assert_eq!(err, SnapError::AmbiguousEndpoints);
    }

    #[test]
    fn endpoint_outside_threshold_fails() {
        let g = grid_graph();
        let near_a = LatLng::new(0.0, 0.0001);
        let far = LatLng::new(40.0, 40.0);
        assert!(matches!(
            snap_endpoints(near_a, far, &g, 5.0),
            Err(SnapError::OutOfRange { .. })
        ));
    }
}
