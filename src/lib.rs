//! FRC team geocoding.
//!
//! Reads a yearly roster, resolves each team's location through a
//! geocoding service with a three-step address fallback, and merges the
//! resulting batch files into one CSV per year.

pub mod error;
pub mod layout;
pub mod location;
pub mod merge;
pub mod roster;

pub use error::Error;
pub use layout::DataLayout;
pub use location::{geocode_range, Geocoder, LocationRecord, NominatimGeocoder};
pub use merge::merge_fragments;
