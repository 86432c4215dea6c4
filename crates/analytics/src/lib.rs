//! # Filetrack Analytics
//!
//! Aggregate views over a record set: distributions, grid extent,
//! utilization, hot locations, and the sparse storage grid.
//!
//! Everything is recomputed from the full set on each call. Record sets are
//! bounded by physical storage, so there is no incremental bookkeeping.
//!
//! ## Example
//!
//! ```rust
//! use filetrack_analytics::{hot_locations, utilization, AnalyticsConfig, AnalyticsReport};
//! use filetrack_location::{FileRecord, RecordDraft, RecordId};
//!
//! let records: Vec<FileRecord> = [("F1", "C", 8, 9), ("F2", "C", 8, 9), ("F3", "K", 3, 4)]
//!     .into_iter()
//!     .enumerate()
//!     .map(|(i, (file_id, cluster, row, column))| {
//!         let valid = RecordDraft::new(file_id, cluster, row, column).validate().unwrap();
//!         FileRecord::from_new(RecordId::new(i.to_string()), valid)
//!     })
//!     .collect();
//!
//! assert_eq!(hot_locations(&records, 5)[0].token.as_str(), "C89");
//! assert_eq!(utilization(&records), 2);
//!
//! let report = AnalyticsReport::build(&records, &AnalyticsConfig::default());
//! assert_eq!(report.summary.clusters, 2);
//! ```

mod config;
pub mod grid;
mod report;
mod stats;

pub use config::AnalyticsConfig;
pub use grid::{project, GridCell, GridMap, GridProjection};
pub use report::{capacity_warning, AnalyticsReport, CapacityWarning};
pub use stats::{
    cluster_distribution, cluster_shares, column_distribution, grid_dimensions, hot_locations,
    row_distribution, total_slots, utilization, ClusterShare, Distribution, GridDimensions,
    HotLocation, StorageSummary, DEFAULT_HOT_LOCATION_LIMIT,
};
