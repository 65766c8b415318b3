//! Live traffic signal: capability trait plus a blocking HTTP implementation.
//!
//! The path engine never talks to a concrete network client; it sees only
//! [`TrafficSignal`], so tests substitute scripted fakes and the HTTP client
//! stays an opt-in backend behind the `traffic-http` feature.

use thiserror::Error;

use crate::geo::LatLng;

/// Errors from a single traffic lookup. Absorbed at the cost layer; a failed
/// lookup degrades one edge cost, it never fails a request.
#[derive(Debug, Error)]
pub enum TrafficError {
    #[cfg(feature = "traffic-http")]
    #[error("traffic request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("traffic api error: {0}")]
    Api(String),
    #[error("traffic response carried no usable travel time")]
    NoData,
}

/// Source of live travel times for a directed edge query.
///
/// `Send + Sync` so one signal instance can back concurrent dispatches.
pub trait TrafficSignal: Send + Sync {
    /// Current travel time in seconds from `from` to `to`.
    fn travel_time_secs(&self, from: LatLng, to: LatLng) -> Result<f64, TrafficError>;
}

#[cfg(feature = "traffic-http")]
pub use http::HttpTrafficSignal;

#[cfg(feature = "traffic-http")]
mod http {
    use std::time::Duration;

    use reqwest::{blocking::Client, Url};
    use serde::Deserialize;

    use super::{TrafficError, TrafficSignal};
    use crate::geo::LatLng;

    /// Per-lookup deadline. A slow signal degrades one edge, never the request.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

    /// Blocking client for a directions-style traffic endpoint.
    ///
    /// Expects a JSON body shaped like
    /// `{"routes": [{"legs": [{"duration_in_traffic": {"value": <secs>}}]}]}`,
    /// falling back to the leg's free-flow `duration` when the in-traffic
    /// figure is absent.
    #[derive(Debug, Clone)]
    pub struct HttpTrafficSignal {
        client: Client,
        endpoint: String,
        api_key: String,
    }

    impl HttpTrafficSignal {
        /// Create a signal for the given endpoint, e.g. a Directions API base URL.
        pub fn new(endpoint: &str, api_key: &str) -> Result<Self, TrafficError> {
            let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
            Ok(Self {
                client,
                endpoint: endpoint.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
            })
        }
    }

    #[derive(Deserialize)]
    struct DirectionsResponse {
        routes: Vec<Route>,
    }

    #[derive(Deserialize)]
    struct Route {
        legs: Vec<Leg>,
    }

    #[derive(Deserialize)]
    struct Leg {
        duration_in_traffic: Option<Seconds>,
        duration: Option<Seconds>,
    }

    #[derive(Deserialize)]
    struct Seconds {
        value: f64,
    }

    impl TrafficSignal for HttpTrafficSignal {
        fn travel_time_secs(&self, from: LatLng, to: LatLng) -> Result<f64, TrafficError> {
            let mut url = Url::parse(&self.endpoint)
                .map_err(|err| TrafficError::Api(format!("invalid traffic endpoint: {err}")))?;
            url.query_pairs_mut()
                .append_pair("origin", &format!("{},{}", from.lat, from.lng))
                .append_pair("destination", &format!("{},{}", to.lat, to.lng))
                .append_pair("departure_time", "now")
                .append_pair("key", &self.api_key);

            let response = self.client.get(url).send()?;
            let parsed: DirectionsResponse = response.json()?;

            let leg = parsed
                .routes
                .first()
                .and_then(|route| route.legs.first())
                .ok_or(TrafficError::NoData)?;
            leg.duration_in_traffic
                .as_ref()
                .or(leg.duration.as_ref())
                .map(|d| d.value)
                .ok_or(TrafficError::NoData)
        }
    }
}
