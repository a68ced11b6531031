//! Location resolver: candidate fallback and batch geocoding of a roster slice.
//!
//! Per team: full address → city, state → state → dropped.

use super::providers::Geocoder;
use super::types::{Coordinates, LocationError, LocationRecord, LOCATION_COLUMNS};
use crate::error::{Error, Result};
use crate::layout::DataLayout;
use crate::roster::{clamp_range, load_roster, AddressCandidates};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::ops::Range;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Query each candidate in order and return the first that geocodes,
/// together with the address string that matched.
///
/// At most three requests are made. Blank candidates (an empty `stateProv`
/// cell) count as misses and are never sent. A service error aborts
/// immediately.
pub fn resolve_candidates<G: Geocoder + ?Sized>(
    geocoder: &mut G,
    candidates: &AddressCandidates,
) -> std::result::Result<Option<(String, Coordinates)>, LocationError> {
    for (attempt, address) in candidates.iter().enumerate() {
        if address.trim().is_empty() {
            debug!(attempt = attempt + 1, "blank candidate, skipping");
            continue;
        }
        debug!(attempt = attempt + 1, address, "geocoding");
        if let Some(coords) = geocoder.geocode(address)? {
            return Ok(Some((address.to_string(), coords)));
        }
    }
    Ok(None)
}

/// Result of one `geocode_range` run.
#[derive(Debug, Serialize)]
pub struct GeocodedBatch {
    pub year: u16,
    /// The roster slice actually processed, after clamping.
    pub range: Range<usize>,
    pub path: PathBuf,
    pub records: Vec<LocationRecord>,
}

/// Geocode roster rows `[start, end)` of `FRC{year}.csv` and write them to
/// `Location/{year}/{start}-{end}.csv`.
///
/// `end` is clamped to the roster length. Teams whose three candidates all
/// miss are left out. Rows are flushed as they resolve, so an aborted run
/// keeps what it had.
pub fn geocode_range<G: Geocoder + ?Sized>(
    layout: &DataLayout,
    geocoder: &mut G,
    year: u16,
    start: usize,
    end: usize,
) -> Result<GeocodedBatch> {
    info!(year, "compiling latitude and longitude of teams");

    let roster = load_roster(&layout.roster_path(year))?;
    let range = clamp_range(start, end, roster.len());

    let dir = layout.year_dir(year);
    fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
    let path = layout.fragment_path(year, range.start, range.end);
    let file = File::create(&path).map_err(|e| Error::io(&path, e))?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer.write_record(LOCATION_COLUMNS).map_err(|e| Error::csv(&path, e))?;

    let mut records = Vec::new();
    for (i, entry) in roster[range.clone()].iter().enumerate() {
        info!(i, team = %entry.team_number, "resolving");

        let candidates = AddressCandidates::from_entry(entry);
        let Some((location, coords)) = resolve_candidates(geocoder, &candidates)? else {
            warn!(team = %entry.team_number, "no candidate address geocoded, skipping");
            continue;
        };

        let record = LocationRecord {
            team_number: entry.team_number.clone(),
            name_short: entry.name_short.clone(),
            location,
            latitude: coords.lat,
            longitude: coords.lon,
        };
        writer.serialize(&record).map_err(|e| Error::csv(&path, e))?;
        writer.flush().map_err(|e| Error::io(&path, e))?;
        records.push(record);
    }

    writer.flush().map_err(|e| Error::io(&path, e))?;
    info!(path = %path.display(), rows = records.len(), "saved batch");

    Ok(GeocodedBatch { year, range, path, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// In-memory geocoder keyed on exact address text.
    #[derive(Default)]
    struct FakeGeocoder {
        known: HashMap<String, Coordinates>,
        failing: Option<String>,
        calls: Vec<String>,
    }

    impl FakeGeocoder {
        fn with(mut self, address: &str, lat: f64, lon: f64) -> Self {
            self.known.insert(address.to_string(), Coordinates { lat, lon });
            self
        }
    }

    impl Geocoder for FakeGeocoder {
        fn geocode(
            &mut self,
            address: &str,
        ) -> std::result::Result<Option<Coordinates>, LocationError> {
            self.calls.push(address.to_string());
            if self.failing.as_deref() == Some(address) {
                return Err(LocationError::Network("connection reset".into()));
            }
            Ok(self.known.get(address).copied())
        }
    }

    const ROSTER: &str = "\
city,stateProv,schoolName,teamNumber,nameShort
Austin,TX,Lincoln High School,118,Robowranglers
San Jose,CA,Bellarmine College Preparatory,254,The Cheesy Poofs
Nowhere,ZZ,Ghost High School,9999,Phantoms
Pontiac,MI,Pontiac High School,33,Killer Bees
";

    fn setup() -> (DataLayout, TempDir) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("FRC2023.csv"), ROSTER).unwrap();
        (DataLayout::new(dir.path()), dir)
    }

    fn candidates(full: &str, city_state: &str, state: &str) -> AddressCandidates {
        AddressCandidates {
            full: full.into(),
            city_state: city_state.into(),
            state: state.into(),
        }
    }

    #[test]
    fn test_full_address_hit_stops_early() {
        let mut g = FakeGeocoder::default()
            .with("Lincoln , Austin, TX", 30.1, -97.7)
            .with("Austin, TX", 30.2, -97.8);
        let c = candidates("Lincoln , Austin, TX", "Austin, TX", "TX");
        let (location, coords) = resolve_candidates(&mut g, &c).unwrap().unwrap();
        assert_eq!(location, "Lincoln , Austin, TX");
        assert_relative_eq!(coords.lat, 30.1);
        assert_eq!(g.calls.len(), 1);
    }

    #[test]
    fn test_state_only_hit() {
        let mut g = FakeGeocoder::default().with("TX", 31.0, -100.0);
        let c = candidates("Lincoln , Austin, TX", "Austin, TX", "TX");
        let (location, _) = resolve_candidates(&mut g, &c).unwrap().unwrap();
        assert_eq!(location, "TX");
        assert_eq!(g.calls, vec!["Lincoln , Austin, TX", "Austin, TX", "TX"]);
    }

    #[test]
    fn test_all_miss_after_three_attempts() {
        let mut g = FakeGeocoder::default();
        let c = candidates("a", "b", "c");
        assert!(resolve_candidates(&mut g, &c).unwrap().is_none());
        assert_eq!(g.calls.len(), 3);
    }

    #[test]
    fn test_blank_candidate_not_sent() {
        // An empty query would be rejected by the service and abort the run.
        let mut g = FakeGeocoder {
            failing: Some("".into()),
            ..Default::default()
        };
        let c = candidates("Ghost , Nowhere, ", "Nowhere, ", "");
        assert!(resolve_candidates(&mut g, &c).unwrap().is_none());
        assert_eq!(g.calls, vec!["Ghost , Nowhere, ", "Nowhere, "]);
    }

    #[test]
    fn test_geocode_range_drops_team_without_state() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("FRC2024.csv"),
            "city,stateProv,schoolName,teamNumber,nameShort\n\
             Nowhere,,Ghost High School,9999,Phantoms\n\
             Pontiac,MI,Pontiac High School,33,Killer Bees\n",
        )
        .unwrap();
        let layout = DataLayout::new(dir.path());
        let mut g = FakeGeocoder {
            failing: Some("".into()),
            ..Default::default()
        }
        .with("MI", 44.0, -85.0);

        let batch = geocode_range(&layout, &mut g, 2024, 0, 2).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].team_number, "33");
        assert!(g.calls.iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn test_service_error_propagates() {
        let mut g = FakeGeocoder {
            failing: Some("b".into()),
            ..Default::default()
        }
        .with("c", 1.0, 1.0);
        let c = candidates("a", "b", "c");
        assert!(resolve_candidates(&mut g, &c).is_err());
        assert_eq!(g.calls, vec!["a", "b"]);
    }

    #[test]
    fn test_geocode_range_writes_fragment() {
        let (layout, _dir) = setup();
        let mut g = FakeGeocoder::default()
            .with("Lincoln , Austin, TX", 30.27, -97.74)
            .with("San Jose, CA", 37.33, -121.89)
            .with("MI", 44.0, -85.0);

        let batch = geocode_range(&layout, &mut g, 2023, 0, 4).unwrap();
        assert_eq!(batch.range, 0..4);
        assert_eq!(batch.path, layout.fragment_path(2023, 0, 4));

        let teams: Vec<&str> = batch.records.iter().map(|r| r.team_number.as_str()).collect();
        assert_eq!(teams, vec!["118", "254", "33"]);
        assert_eq!(batch.records[0].location, "Lincoln , Austin, TX");
        assert_eq!(batch.records[0].name_short, "Robowranglers");
        assert_eq!(batch.records[1].location, "San Jose, CA");
        assert_eq!(batch.records[2].location, "MI");

        let written = fs::read_to_string(&batch.path).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("teamNumber,nameShort,location,latitude,longitude"));
        assert_eq!(lines.next(), Some("118,Robowranglers,\"Lincoln , Austin, TX\",30.27,-97.74"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_geocode_range_clamps_end() {
        let (layout, _dir) = setup();
        let mut g = FakeGeocoder::default().with("MI", 44.0, -85.0);

        let batch = geocode_range(&layout, &mut g, 2023, 2, 500).unwrap();
        assert_eq!(batch.range, 2..4);
        assert!(layout.fragment_path(2023, 2, 4).exists());
        // Rows 0 and 1 are never queried.
        assert!(g.calls.iter().all(|a| !a.contains("Austin") && !a.contains("San Jose")));
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].team_number, "33");
    }

    #[test]
    fn test_geocode_range_empty_slice_writes_header_only() {
        let (layout, _dir) = setup();
        let mut g = FakeGeocoder::default();
        let batch = geocode_range(&layout, &mut g, 2023, 10, 20).unwrap();
        assert!(batch.records.is_empty());
        assert!(g.calls.is_empty());
        let written = fs::read_to_string(&batch.path).unwrap();
        assert_eq!(written.trim_end(), "teamNumber,nameShort,location,latitude,longitude");
    }

    #[test]
    fn test_geocode_range_keeps_rows_before_failure() {
        let (layout, _dir) = setup();
        let mut g = FakeGeocoder {
            failing: Some("Bellarmine College Preparatory, San Jose, CA".into()),
            ..Default::default()
        }
        .with("Lincoln , Austin, TX", 30.27, -97.74);

        let err = geocode_range(&layout, &mut g, 2023, 0, 4).unwrap_err();
        assert!(matches!(err, Error::Location(LocationError::Network(_))));

        let written = fs::read_to_string(layout.fragment_path(2023, 0, 4)).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.contains("Robowranglers"));
    }

    #[test]
    fn test_geocode_range_missing_roster() {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path());
        let mut g = FakeGeocoder::default();
        let err = geocode_range(&layout, &mut g, 2001, 0, 10).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
