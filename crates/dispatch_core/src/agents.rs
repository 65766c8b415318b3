//! Riders, drivers, and the shared driver availability store.
//!
//! Driver availability is the only cross-request mutable state in the core.
//! [`DriverStore`] keeps it behind one mutex and performs
//! filter-select-claim as a single critical section, so two concurrent
//! requests can never claim the same driver.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiderId(pub String);

impl From<&str> for RiderId {
    fn from(value: &str) -> Self {
        RiderId(value.to_string())
    }
}

impl From<String> for RiderId {
    fn from(value: String) -> Self {
        RiderId(value)
    }
}

impl std::fmt::Display for RiderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(pub String);

impl From<&str> for DriverId {
    fn from(value: &str) -> Self {
        DriverId(value.to_string())
    }
}

impl std::fmt::Display for DriverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ride requester. Read-only per request.
#[derive(Debug, Clone, PartialEq)]
pub struct Rider {
    pub id: RiderId,
    pub name: String,
    pub position: LatLng,
}

/// A driver with a mutable availability flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub position: LatLng,
    pub available: bool,
}

/// Read-only rider lookup.
#[derive(Debug, Default, Clone)]
pub struct RiderDirectory {
    riders: BTreeMap<RiderId, Rider>,
}

impl RiderDirectory {
    pub fn new(riders: Vec<Rider>) -> Self {
        Self {
            riders: riders.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn get(&self, id: &RiderId) -> Option<&Rider> {
        self.riders.get(id)
    }

    pub fn len(&self) -> usize {
        self.riders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.riders.is_empty()
    }
}

/// Shared driver table with atomic claim/release.
#[derive(Debug, Default)]
pub struct DriverStore {
    inner: Mutex<BTreeMap<DriverId, Driver>>,
}

impl DriverStore {
    pub fn new(drivers: Vec<Driver>) -> Self {
        Self {
            inner: Mutex::new(drivers.into_iter().map(|d| (d.id.clone(), d)).collect()),
        }
    }

    /// Claim the nearest available driver to `point`.
    ///
    /// Ties break on smallest distance, then smallest driver id (the store
    /// iterates in ascending id order, so the first strict minimum wins).
    /// Selection and the availability flip happen under one lock; the caller
    /// must [`release`](Self::release) the driver if downstream routing
    /// fails. Returns `None` when no driver is available.
    pub fn claim_nearest(&self, point: LatLng) -> Option<Driver> {
        let mut table = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        let mut best: Option<(f64, DriverId)> = None;
        for driver in table.values().filter(|d| d.available) {
            let distance = point.distance_km(&driver.position);
            let closer = best
                .as_ref()
                .map_or(true, |(best_distance, _)| distance < *best_distance);
            if closer {
                best = Some((distance, driver.id.clone()));
            }
        }

        let (_, id) = best?;
        let driver = table.get_mut(&id)?;
        driver.available = false;
        log::debug!("claimed driver {id}");
        Some(driver.clone())
    }

    /// Return a claimed driver to the available pool. Idempotent.
    pub fn release(&self, id: &DriverId) {
        let mut table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(driver) = table.get_mut(id) {
            driver.available = true;
            log::debug!("released driver {id}");
        }
    }

    pub fn available_count(&self) -> usize {
        let table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        table.values().filter(|d| d.available).count()
    }

    pub fn get(&self, id: &DriverId) -> Option<Driver> {
        let table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        table.get(id).cloned()
    }
}
