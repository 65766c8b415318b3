//! Edge cost sources: static base weights, or base weights blended with a
//! live traffic signal.
//!
//! The path engine depends only on [`EdgeCostSource`]; which implementation
//! backs it is a configuration concern. The traffic-aware source memoizes
//! directed-edge lookups for the lifetime of one source instance, and the
//! dispatcher builds a fresh instance per request, so samples never leak
//! across requests.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::graph::{NodeId, RoadGraph};
use crate::traffic::TrafficSignal;

/// Cap on memoized directed-edge samples within one request. Bounds both
/// memory and the number of distinct external calls a single path
/// computation can issue.
const TRAFFIC_MEMO_CAPACITY: usize = 4_096;

/// Seconds per base-weight unit (weights are minutes, samples are seconds).
const SECS_PER_WEIGHT_UNIT: f64 = 60.0;

/// Cost of traversing one directed edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCost {
    pub weight: f64,
    /// True when a traffic lookup failed and the cost fell back to the base
    /// weight alone.
    pub degraded: bool,
}

/// Capability supplying the traversal cost of a directed edge.
///
/// Returns `None` when the graph has no such edge.
pub trait EdgeCostSource: Send + Sync {
    fn edge_cost(&self, graph: &RoadGraph, from: &NodeId, to: &NodeId) -> Option<EdgeCost>;
}

/// Base graph weights only. Never degraded.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCostSource;

impl EdgeCostSource for StaticCostSource {
    fn edge_cost(&self, graph: &RoadGraph, from: &NodeId, to: &NodeId) -> Option<EdgeCost> {
        graph.edge_weight(from, to).map(|weight| EdgeCost {
            weight,
            degraded: false,
        })
    }
}

/// Base weight plus a live travel-time adjustment for the directed pair.
///
/// One external query per distinct directed edge per instance; both
/// successful and failed lookups are memoized so a dead signal costs at most
/// one timeout per edge. On failure the base weight is returned with
/// `degraded: true` and a warning is logged.
pub struct TrafficAwareCostSource<'a> {
    signal: &'a dyn TrafficSignal,
    memo: Mutex<LruCache<(NodeId, NodeId), Option<f64>>>,
}

impl<'a> TrafficAwareCostSource<'a> {
    pub fn new(signal: &'a dyn TrafficSignal) -> Self {
        let capacity = NonZeroUsize::new(TRAFFIC_MEMO_CAPACITY)
            .expect("memo capacity is a non-zero constant");
        Self {
            signal,
            memo: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn sample_secs(&self, graph: &RoadGraph, from: &NodeId, to: &NodeId) -> Option<f64> {
        let key = (from.clone(), to.clone());
        if let Ok(mut memo) = self.memo.lock() {
            if let Some(cached) = memo.get(&key) {
                return *cached;
            }
        }

        let from_pos = graph.node(from)?.position;
        let to_pos = graph.node(to)?.position;
        let sample = match self.signal.travel_time_secs(from_pos, to_pos) {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => Some(secs),
            Ok(secs) => {
                log::warn!("discarding invalid traffic sample {secs} for edge {from}->{to}");
                None
            }
            Err(err) => {
                log::warn!("traffic lookup failed for edge {from}->{to}: {err}");
                None
            }
        };

        if let Ok(mut memo) = self.memo.lock() {
            memo.put(key, sample);
        }
        sample
    }
}

impl EdgeCostSource for TrafficAwareCostSource<'_> {
    fn edge_cost(&self, graph: &RoadGraph, from: &NodeId, to: &NodeId) -> Option<EdgeCost> {
        let base = graph.edge_weight(from, to)?;
        match self.sample_secs(graph, from, to) {
            Some(secs) => Some(EdgeCost {
                weight: base + secs / SECS_PER_WEIGHT_UNIT,
                degraded: false,
            }),
            None => Some(EdgeCost {
                weight: base,
                degraded: true,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{line_graph, FakeTrafficSignal};

    #[test]
    fn static_source_returns_base_weight() {
        let g = line_graph(&["a", "b", "c"], 1.0);
        let cost = StaticCostSource
            .edge_cost(&g, &"a".into(), &"b".into())
            .unwrap();
        assert_eq!(cost.weight, 1.0);
        assert!(!cost.degraded);
    }

    #[test]
    fn static_source_missing_edge_is_none() {
        let g = line_graph(&["a", "b", "c"], 1.0);
        assert!(StaticCostSource
            .edge_cost(&g, &"a".into(), &"c".into())
            .is_none());
    }

    #[test]
    fn traffic_sample_is_added_in_weight_units() {
        let g = line_graph(&["a", "b"], 2.0);
        let signal = FakeTrafficSignal::constant(120.0);
        let source = TrafficAwareCostSource::new(&signal);
        let cost = source.edge_cost(&g, &"a".into(), &"b".into()).unwrap();
        assert_eq!(cost.weight, 4.0); // 2.0 base + 120 s / 60
        assert!(!cost.degraded);
    }

    #[test]
    fn failed_lookup_degrades_to_base_weight() {
        let g = line_graph(&["a", "b"], 2.0);
        let signal = FakeTrafficSignal::failing();
        let source = TrafficAwareCostSource::new(&signal);
        let cost = source.edge_cost(&g, &"a".into(), &"b".into()).unwrap();
        assert_eq!(cost.weight, 2.0);
        assert!(cost.degraded);
    }

    #[test]
    fn repeated_directed_queries_hit_the_memo() {
        let g = line_graph(&["a", "b"], 1.0);
        let signal = FakeTrafficSignal::constant(60.0);
        let source = TrafficAwareCostSource::new(&signal);
        for _ in 0..5 {
            let _ = source.edge_cost(&g, &"a".into(), &"b".into());
        }
        assert_eq!(signal.call_count(), 1);
        // The reverse direction is a distinct query.
        let _ = source.edge_cost(&g, &"b".into(), &"a".into());
        assert_eq!(signal.call_count(), 2);
    }

    #[test]
    fn failures_are_memoized_too() {
        let g = line_graph(&["a", "b"], 1.0);
        let signal = FakeTrafficSignal::failing();
        let source = TrafficAwareCostSource::new(&signal);
        for _ in 0..3 {
            let _ = source.edge_cost(&g, &"a".into(), &"b".into());
        }
        assert_eq!(signal.call_count(), 1);
    }

    #[test]
    fn negative_sample_is_discarded() {
        let g = line_graph(&["a", "b"], 1.0);
        let signal = FakeTrafficSignal::constant(-5.0);
        let source = TrafficAwareCostSource::new(&signal);
        let cost = source.edge_cost(&g, &"a".into(), &"b".into()).unwrap();
        assert_eq!(cost.weight, 1.0);
        assert!(cost.degraded);
    }
}
