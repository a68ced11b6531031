//! On-disk naming of rosters, batch fragments and merged outputs.
//!
//! Rosters live at `{root}/FRC{year}.csv`; everything we produce goes
//! under `{root}/Location/{year}/`.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn roster_path(&self, year: u16) -> PathBuf {
        self.root.join(format!("FRC{}.csv", year))
    }

    pub fn year_dir(&self, year: u16) -> PathBuf {
        self.root.join("Location").join(year.to_string())
    }

    /// Output of one geocoding batch covering `[start, end)`.
    pub fn fragment_path(&self, year: u16, start: usize, end: usize) -> PathBuf {
        self.year_dir(year).join(format!("{}-{}.csv", start, end))
    }

    /// The i-th input of a merge. Batch outputs are renamed to `0.csv`,
    /// `1.csv`, ... by hand before merging.
    pub fn merge_input_path(&self, year: u16, index: usize) -> PathBuf {
        self.year_dir(year).join(format!("{}.csv", index))
    }

    pub fn merged_path(&self, year: u16) -> PathBuf {
        self.year_dir(year).join(format!("{}Location.csv", year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = DataLayout::new("/data");
        assert_eq!(layout.roster_path(2023), PathBuf::from("/data/FRC2023.csv"));
        assert_eq!(
            layout.fragment_path(2023, 3000, 3585),
            PathBuf::from("/data/Location/2023/3000-3585.csv")
        );
        assert_eq!(layout.merge_input_path(2023, 4), PathBuf::from("/data/Location/2023/4.csv"));
        assert_eq!(
            layout.merged_path(2023),
            PathBuf::from("/data/Location/2023/2023Location.csv")
        );
    }

    #[test]
    fn test_default_root_is_cwd() {
        let layout = DataLayout::default();
        assert_eq!(layout.roster_path(2019), PathBuf::from("./FRC2019.csv"));
    }
}
