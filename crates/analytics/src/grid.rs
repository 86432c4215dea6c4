//! Row x column bucketing for the storage grid view.

use crate::stats::GridDimensions;
use filetrack_location::{Cluster, FileRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// One (row, column) position; ordered row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GridCell {
    pub row: u8,
    pub column: u8,
}

impl GridCell {
    pub fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }
}

/// Sparse grid: only occupied cells are present
pub type GridMap<'a> = BTreeMap<GridCell, Vec<&'a FileRecord>>;

/// Bucket records by (row, column), optionally keeping a single cluster.
/// Records inside a cell keep their input order.
pub fn project(records: &[FileRecord], filter_cluster: Option<Cluster>) -> GridMap<'_> {
    let mut grid = GridMap::new();
    for record in records
        .iter()
        .filter(|r| filter_cluster.map_or(true, |c| r.cluster == c))
    {
        grid.entry(GridCell::new(record.row, record.column))
            .or_default()
            .push(record);
    }
    grid
}

/// Sparse map plus the extent needed to draw it as a full rectangle
#[derive(Debug, Clone)]
pub struct GridProjection<'a> {
    pub cluster: Option<Cluster>,
    pub cells: GridMap<'a>,
    /// Extent of the filtered records
    pub dimensions: GridDimensions,
    pub total_records: usize,
}

impl<'a> GridProjection<'a> {
    pub fn build(records: &'a [FileRecord], filter_cluster: Option<Cluster>) -> Self {
        let cells = project(records, filter_cluster);
        let dimensions = GridDimensions {
            rows: cells.keys().map(|c| usize::from(c.row) + 1).max().unwrap_or(0),
            columns: cells.keys().map(|c| usize::from(c.column) + 1).max().unwrap_or(0),
        };

        Self {
            cluster: filter_cluster,
            dimensions,
            total_records: cells.values().map(Vec::len).sum(),
            cells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Records at a cell; empty for unoccupied cells
    pub fn cell(&self, row: u8, column: u8) -> &[&'a FileRecord] {
        self.cells
            .get(&GridCell::new(row, column))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Dense rows of per-cell record counts, `dimensions.rows` x `dimensions.columns`
    pub fn occupancy(&self) -> Vec<Vec<usize>> {
        (0..self.dimensions.rows)
            .map(|row| {
                (0..self.dimensions.columns)
                    .map(|column| self.cell(row as u8, column as u8).len())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetrack_location::RecordId;
    use pretty_assertions::assert_eq;

    fn record(id: &str, cluster: Cluster, row: u8, column: u8) -> FileRecord {
        FileRecord {
            id: RecordId::new(id),
            file_id: id.to_string(),
            cluster,
            row,
            column,
            address: None,
        }
    }

    fn sample() -> Vec<FileRecord> {
        vec![
            record("1", Cluster::Colombo, 1, 2),
            record("2", Cluster::Kandy, 1, 2),
            record("3", Cluster::Colombo, 0, 0),
            record("4", Cluster::Colombo, 1, 2),
        ]
    }

    #[test]
    fn test_project_buckets_all_clusters() {
        let records = sample();
        let grid = project(&records, None);
        assert_eq!(grid.len(), 2);

        let shared: Vec<&str> = grid[&GridCell::new(1, 2)].iter().map(|r| r.id.as_str()).collect();
        assert_eq!(shared, vec!["1", "2", "4"]);
        assert!(!grid.contains_key(&GridCell::new(0, 1)));
    }

    #[test]
    fn test_project_filters_cluster() {
        let records = sample();
        let grid = project(&records, Some(Cluster::Kandy));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[&GridCell::new(1, 2)].len(), 1);

        assert!(project(&records, Some(Cluster::Jaffna)).is_empty());
    }

    #[test]
    fn test_projection_dimensions_follow_filter() {
        let records = vec![
            record("1", Cluster::Colombo, 0, 0),
            record("2", Cluster::Kandy, 5, 7),
        ];
        let view = GridProjection::build(&records, Some(Cluster::Colombo));
        assert_eq!(view.dimensions, GridDimensions { rows: 1, columns: 1 });
        assert_eq!(view.total_records, 1);
        assert_eq!(view.occupancy(), vec![vec![1]]);
    }

    #[test]
    fn test_occupancy_is_dense() {
        let records = sample();
        let view = GridProjection::build(&records, Some(Cluster::Colombo));
        assert_eq!(view.occupancy(), vec![vec![1, 0, 0], vec![0, 0, 2]]);
        assert!(view.cell(0, 2).is_empty());
        assert_eq!(view.cell(1, 2).len(), 2);
    }

    #[test]
    fn test_empty_projection() {
        let view = GridProjection::build(&[], None);
        assert!(view.is_empty());
        assert!(view.occupancy().is_empty());
        assert_eq!(view.total_records, 0);
    }
}
