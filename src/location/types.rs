//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point returned by the geocoding service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One geocoded team, as written to fragment and merged CSVs.
///
/// Field order is the column order: `teamNumber,nameShort,location,latitude,longitude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub team_number: String,
    pub name_short: String,
    /// The candidate address that produced the coordinates.
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

pub const LOCATION_COLUMNS: [&str; 5] =
    ["teamNumber", "nameShort", "location", "latitude", "longitude"];

/// Geocoding service errors. A plain no-match is not an error.
#[derive(Debug)]
pub enum LocationError {
    Network(String),
    InvalidResponse(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
        }
    }
}

impl std::error::Error for LocationError {}
