//! Shared test fixtures: canned graphs, agents, and scripted traffic signals.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::agents::Rider;
use crate::geo::LatLng;
use crate::graph::{Edge, Node, RoadGraph};
use crate::traffic::{TrafficError, TrafficSignal};

/// Longitude spacing between consecutive line-graph nodes, in degrees.
/// At the equator this is roughly 1.11 km per step.
pub const LINE_SPACING_DEG: f64 = 0.01;

/// Build a line graph: nodes on the equator, `LINE_SPACING_DEG` apart in id
/// order, consecutive nodes connected at `weight`.
///
/// # Panics
///
/// Panics if the ids are not unique (graph validation fails).
pub fn line_graph(ids: &[&str], weight: f64) -> RoadGraph {
    let nodes: Vec<Node> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| Node {
            id: (*id).into(),
            position: LatLng::new(0.0, i as f64 * LINE_SPACING_DEG),
        })
        .collect();
    let edges: Vec<Edge> = ids
        .windows(2)
        .map(|pair| Edge {
            from: pair[0].into(),
            to: pair[1].into(),
            weight,
        })
        .collect();
    RoadGraph::build(nodes, edges).expect("line graph fixture must be valid")
}

/// A rider fixture at the given coordinates.
pub fn rider_at(id: &str, lat: f64, lng: f64) -> Rider {
    Rider {
        id: id.into(),
        name: format!("rider {id}"),
        position: LatLng::new(lat, lng),
    }
}

type ScriptFn = Box<dyn Fn(LatLng, LatLng) -> Result<f64, TrafficError> + Send + Sync>;

enum FakeBehavior {
    Constant(f64),
    Failing,
    Scripted(ScriptFn),
}

/// Deterministic in-memory [`TrafficSignal`] that counts its lookups.
pub struct FakeTrafficSignal {
    behavior: FakeBehavior,
    calls: AtomicUsize,
}

impl FakeTrafficSignal {
    /// Always returns `secs` for every directed query.
    pub fn constant(secs: f64) -> Self {
        Self {
            behavior: FakeBehavior::Constant(secs),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every lookup fails, exercising the degraded fallback.
    pub fn failing() -> Self {
        Self {
            behavior: FakeBehavior::Failing,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer from a closure over the queried coordinates.
    pub fn scripted<F>(script: F) -> Self
    where
        F: Fn(LatLng, LatLng) -> Result<f64, TrafficError> + Send + Sync + 'static,
    {
        Self {
            behavior: FakeBehavior::Scripted(Box::new(script)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TrafficSignal for FakeTrafficSignal {
    fn travel_time_secs(&self, from: LatLng, to: LatLng) -> Result<f64, TrafficError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            FakeBehavior::Constant(secs) => Ok(*secs),
            FakeBehavior::Failing => Err(TrafficError::Api("scripted outage".to_string())),
            FakeBehavior::Scripted(script) => script(from, to),
        }
    }
}
