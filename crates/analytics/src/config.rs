use crate::stats::DEFAULT_HOT_LOCATION_LIMIT;
use serde::{Deserialize, Serialize};

/// Dashboard tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// How many hot locations a report lists
    pub hot_location_limit: usize,

    /// Utilization (percent, unrounded) above which a capacity warning is raised
    pub capacity_warning_percent: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            hot_location_limit: DEFAULT_HOT_LOCATION_LIMIT,
            capacity_warning_percent: 80.0,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.hot_location_limit == 0 {
            return Err("hot_location_limit must be > 0".to_string());
        }
        if !self.capacity_warning_percent.is_finite() || self.capacity_warning_percent < 0.0 {
            return Err(format!(
                "capacity_warning_percent ({}) must be a non-negative number",
                self.capacity_warning_percent
            ));
        }
        Ok(())
    }
}
