use crate::config::AnalyticsConfig;
use crate::stats::{
    self, ClusterShare, Distribution, GridDimensions, HotLocation, StorageSummary,
};
use filetrack_location::{Cluster, FileRecord};
use serde::Serialize;

/// Utilization crossed the configured threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityWarning {
    /// Unrounded utilization percentage
    pub percent_used: f64,
    pub threshold_percent: f64,
}

impl CapacityWarning {
    pub fn message(&self) -> String {
        format!(
            "Storage is {}% full. Consider expanding storage.",
            self.percent_used.round()
        )
    }
}

/// `Some` when unrounded utilization is strictly above `threshold_percent`
pub fn capacity_warning(records: &[FileRecord], threshold_percent: f64) -> Option<CapacityWarning> {
    let percent_used = stats::utilization_ratio(records)? * 100.0;
    (percent_used > threshold_percent).then(|| {
        log::debug!("Capacity at {percent_used:.1}% (threshold {threshold_percent}%)");
        CapacityWarning {
            percent_used,
            threshold_percent,
        }
    })
}

/// Every dashboard statistic for one record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub summary: StorageSummary,
    pub cluster_distribution: Distribution<Cluster>,
    pub cluster_shares: Vec<ClusterShare>,
    pub row_distribution: Distribution<u8>,
    pub column_distribution: Distribution<u8>,
    pub grid: GridDimensions,
    pub utilization: u32,
    pub hot_locations: Vec<HotLocation>,
    pub capacity_warning: Option<CapacityWarning>,
}

impl AnalyticsReport {
    pub fn build(records: &[FileRecord], config: &AnalyticsConfig) -> Self {
        Self {
            summary: StorageSummary::from_records(records),
            cluster_distribution: stats::cluster_distribution(records),
            cluster_shares: stats::cluster_shares(records),
            row_distribution: stats::row_distribution(records),
            column_distribution: stats::column_distribution(records),
            grid: stats::grid_dimensions(records),
            utilization: stats::utilization(records),
            hot_locations: stats::hot_locations(records, config.hot_location_limit),
            capacity_warning: capacity_warning(records, config.capacity_warning_percent),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.total_records == 0
    }
}
