//! Location subsystem: geocoding providers and the roster resolver.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{Geocoder, NominatimGeocoder};
pub use resolver::{geocode_range, resolve_candidates, GeocodedBatch};
pub use types::{Coordinates, LocationError, LocationRecord, LOCATION_COLUMNS};
