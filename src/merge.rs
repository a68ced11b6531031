//! Concatenation of batch fragments into one per-year location file.

use crate::error::{Error, Result};
use crate::layout::DataLayout;
use crate::location::{LocationRecord, LOCATION_COLUMNS};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct MergedFile {
    pub year: u16,
    pub path: PathBuf,
    pub fragments: usize,
    pub rows: usize,
}

/// Merge `Location/{year}/0.csv` .. `{quantity - 1}.csv` into
/// `Location/{year}/{year}Location.csv`.
///
/// Rows keep fragment order, then in-file order. Columns other than the
/// five location columns are dropped. Every fragment is read before the
/// output is touched, so a missing one leaves no partial merge behind.
/// Merging zero fragments is an error.
pub fn merge_fragments(layout: &DataLayout, year: u16, quantity: usize) -> Result<MergedFile> {
    if quantity == 0 {
        return Err(Error::NoFragments { year });
    }

    let mut combined = Vec::new();
    for i in 0..quantity {
        let path = layout.merge_input_path(year, i);
        let rows = read_fragment(&path)?;
        info!(fragment = %path.display(), rows = rows.len(), "read fragment");
        combined.extend(rows);
    }

    let path = layout.merged_path(year);
    let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer.write_record(LOCATION_COLUMNS).map_err(|e| Error::csv(&path, e))?;
    for record in &combined {
        writer.serialize(record).map_err(|e| Error::csv(&path, e))?;
    }
    writer.flush().map_err(|e| Error::io(&path, e))?;

    info!(path = %path.display(), rows = combined.len(), "merged");
    Ok(MergedFile {
        year,
        path,
        fragments: quantity,
        rows: combined.len(),
    })
}

fn read_fragment(path: &Path) -> Result<Vec<LocationRecord>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers = reader.headers().map_err(|e| Error::csv(path, e))?.clone();
    for column in LOCATION_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn { path: path.to_path_buf(), column });
        }
    }

    reader
        .deserialize::<LocationRecord>()
        .map(|row| row.map_err(|e| Error::csv(path, e)))
        .collect()
}
