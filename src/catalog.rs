//! The fixed catalog of grid presets.
//!
//! A [`GridPreset`] is a named grid shape: an ordered list of per-row
//! column counts. Rows may have unequal widths ("irregular" grids), so a
//! cell is addressed by a single zero-based linear index in row-major
//! order rather than by a uniform (row, col) pair.
//!
//! The catalog is static: nine presets keyed "1" through "9", matching the
//! number row of a keyboard so a picker UI can map keys directly.

/// A named grid shape.
///
/// Invariant: at least one row, and every row has at least one column.
/// The compiled-in catalog satisfies this by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPreset {
    /// Column count per row, top to bottom.
    pub rows: &'static [usize],
    /// Display name for picker UIs.
    pub name: &'static str,
}

impl GridPreset {
    /// Number of rows in the grid.
    pub fn rows_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of cells (sum of the row widths).
    pub fn total_cells(&self) -> usize {
        self.rows.iter().sum()
    }
}

/// Preset used whenever a persisted or requested key is unknown.
pub const DEFAULT_PRESET_KEY: &str = "9";

static PRESETS: &[(&str, GridPreset)] = &[
    ("1", GridPreset { rows: &[1], name: "Full" }),
    ("2", GridPreset { rows: &[2], name: "1x2 Split" }),
    ("3", GridPreset { rows: &[3], name: "1x3 Columns" }),
    ("4", GridPreset { rows: &[4], name: "1x4 Columns" }),
    ("5", GridPreset { rows: &[2, 2], name: "2x2 Quarter" }),
    ("6", GridPreset { rows: &[3, 3], name: "2x3 Grid" }),
    ("7", GridPreset { rows: &[3, 4], name: "Complex 3/4" }),
    ("8", GridPreset { rows: &[4, 4], name: "2x4 Grid" }),
    ("9", GridPreset { rows: &[3, 3, 3], name: "3x3 Grid" }),
];

/// Look up a preset by key.
pub fn get(key: &str) -> Option<&'static GridPreset> {
    PRESETS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, preset)| preset)
}

/// Look up a preset, falling back to the default for unknown keys.
///
/// Returns the key actually used alongside the preset, so callers can
/// persist the resolved key rather than a corrupted one.
pub fn get_or_default(key: &str) -> (&'static str, &'static GridPreset) {
    match PRESETS.iter().find(|(k, _)| *k == key) {
        Some((k, preset)) => (k, preset),
        None => (
            DEFAULT_PRESET_KEY,
            get(DEFAULT_PRESET_KEY).expect("default preset must exist"),
        ),
    }
}

/// All presets in key order, for picker UIs.
pub fn all() -> impl Iterator<Item = (&'static str, &'static GridPreset)> {
    PRESETS.iter().map(|(k, preset)| (*k, preset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_nine_presets() {
        assert_eq!(all().count(), 9);
    }

    #[test]
    fn every_preset_satisfies_shape_invariant() {
        for (key, preset) in all() {
            assert!(!preset.rows.is_empty(), "preset {} has no rows", key);
            for (r, cols) in preset.rows.iter().enumerate() {
                assert!(*cols >= 1, "preset {} row {} has no columns", key, r);
            }
        }
    }

    #[test]
    fn lookup_known_keys() {
        assert_eq!(get("1").unwrap().name, "Full");
        assert_eq!(get("5").unwrap().rows, &[2, 2]);
        assert_eq!(get("9").unwrap().rows, &[3, 3, 3]);
    }

    #[test]
    fn lookup_unknown_key_is_none() {
        assert!(get("0").is_none());
        assert!(get("10").is_none());
        assert!(get("").is_none());
    }

    #[test]
    fn get_or_default_falls_back() {
        let (key, preset) = get_or_default("banana");
        assert_eq!(key, DEFAULT_PRESET_KEY);
        assert_eq!(preset.rows, &[3, 3, 3]);
    }

    #[test]
    fn get_or_default_passes_through_known_key() {
        let (key, preset) = get_or_default("7");
        assert_eq!(key, "7");
        assert_eq!(preset.rows, &[3, 4]);
    }

    #[test]
    fn total_cells_sums_irregular_rows() {
        assert_eq!(get("1").unwrap().total_cells(), 1);
        assert_eq!(get("7").unwrap().total_cells(), 7);
        assert_eq!(get("9").unwrap().total_cells(), 9);
    }

    #[test]
    fn default_key_is_in_catalog() {
        assert!(get(DEFAULT_PRESET_KEY).is_some());
    }
}
