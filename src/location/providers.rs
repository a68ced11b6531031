//! Geocoding providers: the `Geocoder` seam and the Nominatim client.

use super::types::{Coordinates, LocationError};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "FRG";
/// Nominatim can stall for minutes under load; we wait it out.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(9999);

/// Free-text address lookup.
///
/// `Ok(None)` means the service answered but found nothing.
pub trait Geocoder {
    fn geocode(&mut self, address: &str) -> Result<Option<Coordinates>, LocationError>;
}

// ─── Nominatim provider ─────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
}

/// Blocking client for an OpenStreetMap Nominatim search endpoint.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn with_options(endpoint: &str, user_agent: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(user_agent)
            .timeout(timeout)
            .build();
        Self {
            agent,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn search_request(&self, address: &str) -> ureq::Request {
        self.agent
            .get(&self.endpoint)
            .query("q", address)
            .query("format", "json")
            .query("limit", "1")
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&mut self, address: &str) -> Result<Option<Coordinates>, LocationError> {
        let response = self
            .search_request(address)
            .call()
            .map_err(|e| LocationError::Network(e.to_string()))?;

        let body = response
            .into_string()
            .map_err(|e| LocationError::Network(e.to_string()))?;

        parse_search_response(&body)
    }
}

/// Take the top hit of a Nominatim `format=json` search body.
fn parse_search_response(body: &str) -> Result<Option<Coordinates>, LocationError> {
    let results: Vec<NominatimResult> =
        serde_json::from_str(body).map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

    let Some(top) = results.first() else {
        return Ok(None);
    };

    let lat = parse_coord(&top.lat, "lat")?;
    let lon = parse_coord(&top.lon, "lon")?;
    Ok(Some(Coordinates { lat, lon }))
}

fn parse_coord(raw: &str, field: &str) -> Result<f64, LocationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| LocationError::InvalidResponse(format!("bad {} '{}'", field, raw)))
}
