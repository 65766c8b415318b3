//! Input parsing: CSV rider/driver records and the JSON graph document.
//!
//! Formats are fixed by the collaborating data layer:
//!
//! - riders/drivers: CSV with `id,name,latitude,longitude` headers;
//! - graph: `{"nodes": {"<id>": {"lat": .., "lng": ..}}, "edges":
//!   [{"from": .., "to": .., "weight": ..}]}`.
//!
//! Drivers start available; availability is runtime state, not input.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;
use thiserror::Error;

use crate::agents::{Driver, Rider};
use crate::geo::LatLng;
use crate::graph::{Edge, GraphError, Node, RoadGraph};

/// Load-time input errors. Fatal to startup.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("graph document parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Deserialize)]
struct PersonRecord {
    id: String,
    name: String,
    latitude: f64,
    longitude: f64,
}

/// Parse rider records from CSV.
pub fn load_riders_csv<R: Read>(reader: R) -> Result<Vec<Rider>, DataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize()
        .map(|record| {
            let record: PersonRecord = record?;
            Ok(Rider {
                id: record.id.into(),
                name: record.name,
                position: LatLng::new(record.latitude, record.longitude),
            })
        })
        .collect()
}

/// Parse driver records from CSV. Every driver starts available.
pub fn load_drivers_csv<R: Read>(reader: R) -> Result<Vec<Driver>, DataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize()
        .map(|record| {
            let record: PersonRecord = record?;
            Ok(Driver {
                id: crate::agents::DriverId(record.id),
                name: record.name,
                position: LatLng::new(record.latitude, record.longitude),
                available: true,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct GraphDocument {
    nodes: BTreeMap<String, LatLng>,
    edges: Vec<EdgeRecord>,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: String,
    to: String,
    weight: f64,
}

/// Parse and validate the JSON graph document.
pub fn load_graph_json<R: Read>(reader: R) -> Result<RoadGraph, DataError> {
    let document: GraphDocument = serde_json::from_reader(reader)?;
    let nodes = document
        .nodes
        .into_iter()
        .map(|(id, position)| Node {
            id: crate::graph::NodeId(id),
            position,
        })
        .collect();
    let edges = document
        .edges
        .into_iter()
        .map(|record| Edge {
            from: crate::graph::NodeId(record.from),
            to: crate::graph::NodeId(record.to),
            weight: record.weight,
        })
        .collect();
    Ok(RoadGraph::build(nodes, edges)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIDERS_CSV: &str = "\
id,name,latitude,longitude
r1,Avery,37.77,-122.41
r2,Blake,37.80,-122.27
";

    const GRAPH_JSON: &str = r#"{
        "nodes": {
            "a": {"lat": 0.0, "lng": 0.0},
            "b": {"lat": 0.0, "lng": 0.01}
        },
        "edges": [
            {"from": "a", "to": "b", "weight": 1.5}
        ]
    }"#;

    #[test]
    fn parses_rider_records() {
        let riders = load_riders_csv(RIDERS_CSV.as_bytes()).unwrap();
        assert_eq!(riders.len(), 2);
        assert_eq!(riders[0].id, "r1".into());
        assert_eq!(riders[0].name, "Avery");
        assert_eq!(riders[1].position.lat, 37.80);
    }

    #[test]
    fn drivers_start_available() {
        let drivers = load_drivers_csv(RIDERS_CSV.as_bytes()).unwrap();
        assert!(drivers.iter().all(|d| d.available));
    }

    #[test]
    fn malformed_csv_is_an_error() {
        let bad = "id,name,latitude,longitude\nr1,Avery,not-a-number,0.0\n";
        assert!(matches!(
            load_riders_csv(bad.as_bytes()),
            Err(DataError::Csv(_))
        ));
    }

    #[test]
    fn parses_and_validates_the_graph_document() {
        let graph = load_graph_json(GRAPH_JSON.as_bytes()).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_weight(&"a".into(), &"b".into()), Some(1.5));
    }

    #[test]
    fn dangling_edge_in_document_is_a_graph_error() {
        let bad = r#"{
            "nodes": {"a": {"lat": 0.0, "lng": 0.0}},
            "edges": [{"from": "a", "to": "missing", "weight": 1.0}]
        }"#;
        assert!(matches!(
            load_graph_json(bad.as_bytes()),
            Err(DataError::Graph(GraphError::UnknownNode(_)))
        ));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            load_graph_json("not json".as_bytes()),
            Err(DataError::Json(_))
        ));
    }
}
