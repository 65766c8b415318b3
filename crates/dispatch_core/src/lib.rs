//! Ride dispatch core: nearest-driver matching and routed trip quoting over
//! a road-segment graph.
//!
//! The flow for one request: snap the rider's and the claimed driver's
//! coordinates onto graph nodes ([`snap`]), run the shortest-path engine
//! ([`path`]) with a static or traffic-augmented cost source ([`cost`],
//! [`traffic`]), then derive distance, duration, ETA, and fare ([`pricing`]).
//! [`dispatch::Dispatcher`] orchestrates the whole of it, including the
//! atomic driver claim and its rollback on routing failure.

pub mod agents;
pub mod config;
pub mod cost;
pub mod dispatch;
pub mod geo;
pub mod graph;
pub mod loading;
pub mod path;
pub mod pricing;
pub mod snap;
pub mod traffic;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
