//! Ride dispatch orchestration.
//!
//! One [`Dispatcher`] owns the graph snapshot, the rider directory, the
//! driver store, and the optional traffic signal, and turns a
//! [`RideRequest`] into a [`TripQuote`] or a structured failure. The claim
//! protocol is strict: the nearest driver is claimed before any routing
//! work, and every failure after that point releases the claim before the
//! error is returned.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use thiserror::Error;

use crate::agents::{DriverStore, RiderDirectory, RiderId};
use crate::config::{CostSourceKind, DispatchConfig};
use crate::cost::{StaticCostSource, TrafficAwareCostSource};
use crate::geo::LatLng;
use crate::graph::RoadGraph;
use crate::path::{dijkstra, RouteResult};
use crate::pricing;
use crate::snap::snap_endpoints;
use crate::traffic::TrafficSignal;

/// One ride request. The simulate flags let the embedding layer exercise the
/// empty-driver-set and empty-route responses without fixture surgery; the
/// core treats them as valid, distinguishable inputs.
#[derive(Debug, Clone)]
pub struct RideRequest {
    pub rider_id: RiderId,
    pub simulate_no_drivers: bool,
    pub simulate_no_route: bool,
}

impl RideRequest {
    pub fn new(rider_id: impl Into<RiderId>) -> Self {
        Self {
            rider_id: rider_id.into(),
            simulate_no_drivers: false,
            simulate_no_route: false,
        }
    }
}

/// A priced, routed trip offer. All figures are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripQuote {
    pub driver_name: String,
    /// Minutes until pickup completes: trip duration plus dispatch delay.
    pub eta: f64,
    /// Trip duration in minutes.
    pub duration: f64,
    /// Routed distance in kilometres.
    pub distance: f64,
    pub fare: f64,
    pub path: Vec<LatLng>,
    /// True when any traffic lookup degraded to the static weight. Not part
    /// of the wire response.
    #[serde(skip)]
    pub degraded: bool,
}

/// Per-request failure taxonomy. Each variant maps to a distinct status at
/// the embedding layer; they are never conflated.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown rider `{0}`")]
    UnknownRider(RiderId),
    #[error("no driver available")]
    NoDriverAvailable,
    #[error("no route between rider and driver")]
    NoRoute,
    #[error("internal dispatch error: {0}")]
    Internal(String),
}

/// Dispatch engine: matches a rider to the nearest available driver and
/// quotes the routed trip.
pub struct Dispatcher {
    graph: RwLock<Arc<RoadGraph>>,
    riders: RiderDirectory,
    drivers: DriverStore,
    signal: Option<Box<dyn TrafficSignal>>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(
        graph: RoadGraph,
        riders: RiderDirectory,
        drivers: DriverStore,
        config: DispatchConfig,
    ) -> Self {
        Self {
            graph: RwLock::new(Arc::new(graph)),
            riders,
            drivers,
            signal: None,
            config,
        }
    }

    /// Install a live traffic signal. Only consulted when the config selects
    /// [`CostSourceKind::TrafficAugmented`].
    pub fn with_traffic_signal(mut self, signal: Box<dyn TrafficSignal>) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Current graph snapshot. In-flight computations keep the snapshot they
    /// started with across reloads.
    pub fn graph(&self) -> Arc<RoadGraph> {
        self.graph
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Atomically publish a freshly built graph. Never mutates in place.
    pub fn reload_graph(&self, graph: RoadGraph) {
        let mut slot = self.graph.write().unwrap_or_else(|e| e.into_inner());
        *slot = Arc::new(graph);
    }

    pub fn drivers(&self) -> &DriverStore {
        &self.drivers
    }

    /// Handle one ride request end to end.
    pub fn request_ride(&self, request: &RideRequest) -> Result<TripQuote, DispatchError> {
        let rider = self
            .riders
            .get(&request.rider_id)
            .ok_or_else(|| DispatchError::UnknownRider(request.rider_id.clone()))?;

        if request.simulate_no_drivers {
            return Err(DispatchError::NoDriverAvailable);
        }
        let driver = self
            .drivers
            .claim_nearest(rider.position)
            .ok_or(DispatchError::NoDriverAvailable)?;

        // The driver is claimed from here on; every failure path must
        // release before returning.
        let graph = self.graph();
        let result = self.route_trip(&graph, rider.position, driver.position, request);
        match result {
            Ok(route) => match Self::quote(&graph, &driver.name, &route) {
                Ok(quote) => Ok(quote),
                Err(err) => {
                    self.drivers.release(&driver.id);
                    Err(err)
                }
            },
            Err(err) => {
                self.drivers.release(&driver.id);
                Err(err)
            }
        }
    }

    fn route_trip(
        &self,
        graph: &RoadGraph,
        rider_pos: LatLng,
        driver_pos: LatLng,
        request: &RideRequest,
    ) -> Result<RouteResult, DispatchError> {
        let (start, goal) = snap_endpoints(rider_pos, driver_pos, graph, self.config.snap_max_km)
            .map_err(|err| {
            log::debug!("endpoint snapping failed: {err}");
            DispatchError::NoRoute
        })?;

        let route = if request.simulate_no_route {
            RouteResult::empty()
        } else {
            match (&self.config.cost_source, self.signal.as_deref()) {
                (CostSourceKind::TrafficAugmented, Some(signal)) => {
                    // Fresh per-request source: traffic samples are valid for
                    // one path computation only.
                    let source = TrafficAwareCostSource::new(signal);
                    dijkstra(graph, &source, &start, &goal)
                }
                _ => dijkstra(graph, &StaticCostSource, &start, &goal),
            }
        };

        if route.is_empty() {
            return Err(DispatchError::NoRoute);
        }
        Ok(route)
    }

    fn quote(
        graph: &RoadGraph,
        driver_name: &str,
        route: &RouteResult,
    ) -> Result<TripQuote, DispatchError> {
        let mut path = Vec::with_capacity(route.nodes.len());
        for id in &route.nodes {
            let node = graph.node(id).ok_or_else(|| {
                DispatchError::Internal(format!("routed node `{id}` missing from graph"))
            })?;
            path.push(node.position);
        }

        let distance_km: f64 = path
            .windows(2)
            .map(|pair| pair[0].distance_km(&pair[1]))
            .sum();
        let duration_min = pricing::duration_minutes(distance_km);

        Ok(TripQuote {
            driver_name: driver_name.to_string(),
            eta: pricing::round2(pricing::eta_minutes(duration_min)),
            duration: pricing::round2(duration_min),
            distance: pricing::round2(distance_km),
            fare: pricing::round2(pricing::fare(distance_km)),
            path,
            degraded: route.degraded,
        })
    }
}
