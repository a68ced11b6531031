//! Crate-level error type.

use crate::location::LocationError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io { path: PathBuf, source: std::io::Error },
    Csv { path: PathBuf, source: csv::Error },
    /// A CSV file lacks one of the columns we project on.
    MissingColumn { path: PathBuf, column: &'static str },
    /// A merge was asked to combine zero fragments.
    NoFragments { year: u16 },
    Location(LocationError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv { path: path.into(), source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            Self::Csv { path, source } => write!(f, "CSV error in {}: {}", path.display(), source),
            Self::MissingColumn { path, column } => {
                write!(f, "{} has no '{}' column", path.display(), column)
            }
            Self::NoFragments { year } => write!(f, "No fragments to merge for {}", year),
            Self::Location(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::MissingColumn { .. } | Self::NoFragments { .. } => None,
            Self::Location(e) => Some(e),
        }
    }
}

impl From<LocationError> for Error {
    fn from(e: LocationError) -> Self {
        Self::Location(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
