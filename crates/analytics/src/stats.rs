use filetrack_location::{Cluster, FileRecord, LocationToken};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Number of hot locations dashboards show by default
pub const DEFAULT_HOT_LOCATION_LIMIT: usize = 5;

/// Key -> record count, ordered by key
pub type Distribution<K> = BTreeMap<K, usize>;

/// Extent of the known grid: highest row/column seen plus one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: usize,
    pub columns: usize,
}

impl GridDimensions {
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Row x column cells of a single cluster
    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }
}

/// A slot ranked by how many records it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotLocation {
    pub token: LocationToken,
    pub count: usize,
}

/// A cluster's slice of the record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterShare {
    pub cluster: Cluster,
    pub name: String,
    pub count: usize,
    /// Rounded share of all records, 0-100
    pub percent: u32,
}

/// Headline counts for the overview cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSummary {
    pub total_records: usize,
    pub clusters: usize,
    pub distinct_rows: usize,
    pub distinct_columns: usize,
}

impl StorageSummary {
    pub fn from_records(records: &[FileRecord]) -> Self {
        Self {
            total_records: records.len(),
            clusters: unique_clusters(records),
            distinct_rows: records.iter().map(|r| r.row).collect::<BTreeSet<_>>().len(),
            distinct_columns: records.iter().map(|r| r.column).collect::<BTreeSet<_>>().len(),
        }
    }
}

pub fn cluster_distribution(records: &[FileRecord]) -> Distribution<Cluster> {
    count_by(records, |r| r.cluster)
}

pub fn row_distribution(records: &[FileRecord]) -> Distribution<u8> {
    count_by(records, |r| r.row)
}

pub fn column_distribution(records: &[FileRecord]) -> Distribution<u8> {
    count_by(records, |r| r.column)
}

/// Per-cluster counts and shares, largest first. Equal counts keep cluster order.
pub fn cluster_shares(records: &[FileRecord]) -> Vec<ClusterShare> {
    let total = records.len();
    let mut shares: Vec<ClusterShare> = cluster_distribution(records)
        .into_iter()
        .map(|(cluster, count)| ClusterShare {
            cluster,
            name: cluster.name().to_string(),
            count,
            percent: rounded_percent(count, total),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// `{0, 0}` for an empty set
pub fn grid_dimensions(records: &[FileRecord]) -> GridDimensions {
    let rows = records.iter().map(|r| usize::from(r.row) + 1).max().unwrap_or(0);
    let columns = records
        .iter()
        .map(|r| usize::from(r.column) + 1)
        .max()
        .unwrap_or(0);
    GridDimensions { rows, columns }
}

/// Nominal slots of the known grid: rows x columns x clusters in use
pub fn total_slots(records: &[FileRecord]) -> usize {
    grid_dimensions(records).cells() * unique_clusters(records)
}

/// Records per nominal slot as a rounded percentage, `0` when there are no
/// slots. Shared slots can push this past 100; the value is not clamped.
pub fn utilization(records: &[FileRecord]) -> u32 {
    utilization_ratio(records).map_or(0, |ratio| (ratio * 100.0).round() as u32)
}

/// Unrounded records / slots, `None` when there are no slots
pub(crate) fn utilization_ratio(records: &[FileRecord]) -> Option<f64> {
    let slots = total_slots(records);
    (slots > 0).then(|| records.len() as f64 / slots as f64)
}

/// Slots ordered by record count, ties in first-seen order, at most `limit`
pub fn hot_locations(records: &[FileRecord], limit: usize) -> Vec<HotLocation> {
    let mut ranked: Vec<HotLocation> = Vec::new();
    let mut positions: HashMap<LocationToken, usize> = HashMap::new();

    for record in records {
        let token = record.location();
        match positions.get(&token) {
            Some(&pos) => ranked[pos].count += 1,
            None => {
                positions.insert(token.clone(), ranked.len());
                ranked.push(HotLocation { token, count: 1 });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

pub(crate) fn unique_clusters(records: &[FileRecord]) -> usize {
    records
        .iter()
        .map(|r| r.cluster)
        .collect::<BTreeSet<_>>()
        .len()
}

fn count_by<K: Ord>(records: &[FileRecord], key: impl Fn(&FileRecord) -> K) -> Distribution<K> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(key(record)).or_insert(0) += 1;
    }
    counts
}

fn rounded_percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}
