//! Reqwest-backed Overpass network provider.
//!
//! This adapter owns transport details only: query construction, timeout and
//! HTTP error mapping, and JSON decoding into a street graph.

use std::time::Duration;

use reqwest::{StatusCode, Url, blocking::Client};

use super::dto::OverpassResponseDto;
use crate::config::OverpassConfig;
use crate::loading::{NetworkProvider, NetworkRequest};
use crate::{Error, Mode, StreetGraph};

/// Highway filter for drivable public roads
const DRIVE_FILTER: &str = concat!(
    r#"["highway"]["area"!~"yes"]"#,
    r#"["highway"!~"abandoned|bridleway|bus_guideway|construction|corridor|cycleway|elevator|"#,
    r#"escalator|footway|no|path|pedestrian|planned|platform|proposed|raceway|razed|steps|track"]"#,
    r#"["motor_vehicle"!~"no"]["motorcar"!~"no"]["access"!~"private"]"#,
    r#"["service"!~"alley|driveway|emergency_access|parking|parking_aisle|private"]"#,
);

/// Highway filter for ways open to pedestrians
const WALK_FILTER: &str = concat!(
    r#"["highway"]["area"!~"yes"]"#,
    r#"["highway"!~"abandoned|bus_guideway|construction|cycleway|motor|no|planned|platform|"#,
    r#"proposed|raceway|razed"]"#,
    r#"["foot"!~"no"]["access"!~"private"]["service"!~"private"]"#,
);

/// Network provider downloading highway ways from an Overpass API endpoint
pub struct OverpassNetworkProvider {
    client: Client,
    endpoint: Url,
    user_agent: String,
    timeout: Duration,
}

impl OverpassNetworkProvider {
    /// # Errors
    ///
    /// Returns an error when the endpoint is not a valid URL or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &OverpassConfig) -> Result<Self, Error> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| Error::InvalidConfig(format!("overpass endpoint: {e}")))?;
        let timeout = Duration::from_secs(config.request_timeout_secs.max(1));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            user_agent: config.user_agent.clone(),
            timeout,
        })
    }

    fn map_transport_error(&self, error: &reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Http(error.to_string())
        }
    }
}

impl NetworkProvider for OverpassNetworkProvider {
    fn build_graph(&self, request: &NetworkRequest) -> Result<StreetGraph, Error> {
        let query = build_overpass_query(request, self.timeout.as_secs())?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("data", query)])
            .send()
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        let body = response.bytes().map_err(|e| self.map_transport_error(&e))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let builder = parse_network(body.as_ref(), request.mode)?;
        if builder.way_count() == 0 {
            return Err(Error::GraphUnavailable(format!(
                "no {} ways within {:.0} m",
                request.mode, request.distance_m
            )));
        }
        builder.build(request.simplify)
    }
}

fn parse_network(body: &[u8], mode: Mode) -> Result<crate::loading::StreetGraphBuilder, Error> {
    let decoded: OverpassResponseDto = serde_json::from_slice(body)
        .map_err(|e| Error::Decode(format!("invalid Overpass JSON payload: {e}")))?;
    decoded.into_builder(mode).map_err(Error::Decode)
}

fn build_overpass_query(request: &NetworkRequest, timeout_secs: u64) -> Result<String, Error> {
    let (lat, lon) = (request.center.y(), request.center.x());
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(Error::InvalidInput(format!(
            "center ({lat}, {lon}) outside WGS84 ranges"
        )));
    }
    if !request.distance_m.is_finite() || request.distance_m <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "network distance must be positive, got {}",
            request.distance_m
        )));
    }

    let filter = match request.mode {
        Mode::Drive => DRIVE_FILTER,
        Mode::Walk => WALK_FILTER,
    };
    Ok(format!(
        "[out:json][timeout:{timeout_secs}];\n(\n  way{filter}(around:{distance:.0},{lat},{lon});\n  >;\n);\nout;",
        distance = request.distance_m,
    ))
}

fn map_status_error(status: StatusCode, body: &[u8]) -> Error {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    Error::Http(format!("status {}: {preview}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mode: Mode) -> NetworkRequest {
        NetworkRequest::for_mode(41.0, 29.0, 1000.0, mode)
    }

    #[test]
    fn builds_around_query_per_mode() {
        let drive = build_overpass_query(&request(Mode::Drive), 180).unwrap();
        assert!(drive.starts_with("[out:json][timeout:180];"));
        assert!(drive.contains("(around:2000,41,29);"));
        assert!(drive.contains(r#"["motor_vehicle"!~"no"]"#));

        let walk = build_overpass_query(&request(Mode::Walk), 60).unwrap();
        assert!(walk.contains("(around:1500,41,29);"));
        assert!(walk.contains(r#"["foot"!~"no"]"#));
        assert!(!walk.contains("footway"));
    }

    #[test]
    fn rejects_out_of_range_center() {
        let mut bad = request(Mode::Walk);
        bad.center = geo::Point::new(200.0, 41.0);
        assert!(matches!(
            build_overpass_query(&bad, 60),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn parses_overpass_json_into_graph() {
        let body = r#"{
            "elements": [
                { "type": "node", "id": 1, "lat": 41.000, "lon": 29.000 },
                { "type": "node", "id": 2, "lat": 41.000, "lon": 29.001 },
                { "type": "node", "id": 3, "lat": 41.001, "lon": 29.001 },
                { "type": "way", "id": 10, "nodes": [1, 2], "tags": { "highway": "residential" } },
                { "type": "way", "id": 11, "nodes": [2, 3],
                  "tags": { "highway": "residential", "oneway": "yes" } },
                { "type": "relation", "id": 20, "members": [] }
            ]
        }"#;

        let drive = parse_network(body.as_bytes(), Mode::Drive)
            .unwrap()
            .build(false)
            .unwrap();
        assert_eq!(drive.node_count(), 3);
        assert_eq!(drive.edge_count(), 3);

        let walk = parse_network(body.as_bytes(), Mode::Walk)
            .unwrap()
            .build(false)
            .unwrap();
        assert_eq!(walk.edge_count(), 4);
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            parse_network(b"<html>busy</html>", Mode::Drive),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn status_errors_include_compact_body_preview() {
        let err = map_status_error(StatusCode::TOO_MANY_REQUESTS, b"rate   limited\n  retry");
        assert_eq!(err.to_string(), "HTTP error: status 429: rate limited retry");
    }
}
