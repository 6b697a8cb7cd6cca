//! Electrode table and row regions
//!
//! The electrode table is owned by the container, not by any series. A
//! series that measures per-electrode currents carries an
//! [`ElectrodeRegion`]: a weak reference to a subset of the table's rows.

use serde::{Deserialize, Serialize};

/// One recording electrode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Electrode {
    /// Anatomical location of the electrode
    pub location: String,
    /// Name of the electrode group this electrode belongs to
    pub group: String,
}

impl Electrode {
    /// Create an electrode.
    #[must_use]
    pub fn new(location: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            group: group.into(),
        }
    }
}

/// The container-owned table of recording electrodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectrodeTable {
    rows: Vec<Electrode>,
}

impl ElectrodeTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an electrode row, returning its index.
    pub fn add(&mut self, electrode: Electrode) -> usize {
        self.rows.push(electrode);
        self.rows.len() - 1
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Electrode> {
        self.rows.get(index)
    }

    /// Build a region covering rows `0..n`.
    #[must_use]
    pub fn region(&self, indices: Vec<usize>, description: impl Into<String>) -> ElectrodeRegion {
        ElectrodeRegion::new(indices, description)
    }
}

/// A weak reference to a subset of electrode table rows.
///
/// Rows may be contiguous or arbitrary; order is preserved and maps onto the
/// column order of the referencing series' data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectrodeRegion {
    indices: Vec<usize>,
    description: String,
}

impl ElectrodeRegion {
    /// Create a region over the given row indices.
    #[must_use]
    pub fn new(indices: Vec<usize>, description: impl Into<String>) -> Self {
        Self {
            indices,
            description: description.into(),
        }
    }

    /// Row indices in column order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// What this region selects.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of referenced rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the region references no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_add_and_get() {
        let mut table = ElectrodeTable::new();
        assert!(table.is_empty());

        let idx = table.add(Electrode::new("striatum", "shank0"));
        assert_eq!(idx, 0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).map(|e| e.location.as_str()), Some("striatum"));
        assert!(table.get(1).is_none());
    }

    #[test]
    fn test_region_preserves_order() {
        let region = ElectrodeRegion::new(vec![3, 1, 2], "FSCV electrodes");
        assert_eq!(region.len(), 3);
        assert_eq!(region.indices(), &[3, 1, 2]);
        assert_eq!(region.description(), "FSCV electrodes");
    }
}
