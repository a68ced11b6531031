//! Yearly team roster: loading and address candidate construction.

use crate::error::{Error, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::ops::Range;
use std::path::Path;

/// Columns a roster must carry. Any others are ignored.
pub const ROSTER_COLUMNS: [&str; 5] =
    ["city", "stateProv", "schoolName", "teamNumber", "nameShort"];

/// One team as listed in `FRC{year}.csv`. Cells are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state_prov: String,
    #[serde(default)]
    pub school_name: String,
    pub team_number: String,
    #[serde(default)]
    pub name_short: String,
}

/// Read every team from a roster file, in file order.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    read_roster(BufReader::new(file), path)
}

fn read_roster<R: std::io::Read>(reader: R, path: &Path) -> Result<Vec<RosterEntry>> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| Error::csv(path, e))?.clone();
    for column in ROSTER_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn { path: path.to_path_buf(), column });
        }
    }

    csv_reader
        .deserialize::<RosterEntry>()
        .map(|row| row.map_err(|e| Error::csv(path, e)))
        .collect()
}

/// The three addresses tried for a team, most specific first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressCandidates {
    pub full: String,
    pub city_state: String,
    pub state: String,
}

impl AddressCandidates {
    /// "Lincoln High School" in Austin, TX becomes `"Lincoln , Austin, TX"`,
    /// then `"Austin, TX"`, then `"TX"`.
    pub fn from_entry(entry: &RosterEntry) -> Self {
        let school = entry.school_name.replace("High School", "");
        Self {
            full: format!("{}, {}, {}", school, entry.city, entry.state_prov),
            city_state: format!("{}, {}", entry.city, entry.state_prov),
            state: entry.state_prov.clone(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [self.full.as_str(), self.city_state.as_str(), self.state.as_str()].into_iter()
    }
}

/// Clamp a requested `[start, end)` batch to a roster of `len` rows.
pub fn clamp_range(start: usize, end: usize, len: usize) -> Range<usize> {
    let end = end.min(len);
    start.min(end)..end
}
