use filetrack_analytics::{AnalyticsReport, GridProjection, HotLocation};
use filetrack_location::{DecodedToken, FileRecord};
use filetrack_registry::BulkDeleteOutcome;

pub fn render_records(records: &[&FileRecord]) -> String {
    if records.is_empty() {
        return "No files found\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<26} {:<16} {:<8} {:<14} {}\n",
        "ID", "FILE ID", "SLOT", "CLUSTER", "ADDRESS"
    ));
    for record in records {
        out.push_str(&format!(
            "{:<26} {:<16} {:<8} {:<14} {}\n",
            record.id,
            record.file_id,
            record.location(),
            record.cluster.name(),
            record.address.as_deref().unwrap_or("-"),
        ));
    }
    out.push_str(&format!("\n{} file(s)\n", records.len()));
    out
}

pub fn render_record(record: &FileRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("File {} ({})\n", record.file_id, record.id));
    out.push_str(&format!(
        "  Cluster: {} ({})\n",
        record.cluster,
        record.cluster.name()
    ));
    out.push_str(&format!("  Row:     {}\n", record.row));
    out.push_str(&format!("  Column:  {}\n", record.column));
    out.push_str(&format!("  Slot:    {}\n", record.location()));
    if let Some(address) = &record.address {
        out.push_str(&format!("  Address: {address}\n"));
    }
    out
}

pub fn render_token(token: &str, decoded: &DecodedToken) -> String {
    format!(
        "{}: cluster {} ({}), row {}, column {}\n",
        token.to_uppercase(),
        decoded.cluster,
        decoded.cluster.name(),
        decoded.row,
        decoded.column
    )
}

pub fn render_hot_locations(hot: &[HotLocation]) -> String {
    if hot.is_empty() {
        return "No locations in use\n".to_string();
    }
    let mut out = String::new();
    for (rank, location) in hot.iter().enumerate() {
        out.push_str(&format!(
            "#{} Location {} - {} file(s) stored\n",
            rank + 1,
            location.token,
            location.count
        ));
    }
    out
}

pub fn render_report(report: &AnalyticsReport) -> String {
    if report.is_empty() {
        return "No data available for analytics\n".to_string();
    }

    let mut out = String::new();
    out.push_str("Overview\n");
    out.push_str(&format!("  Total files:     {}\n", report.summary.total_records));
    out.push_str(&format!("  Active clusters: {}\n", report.summary.clusters));
    out.push_str(&format!(
        "  Grid size:       {}x{}\n",
        report.grid.rows, report.grid.columns
    ));
    out.push_str(&format!("  Utilization:     {}%\n", report.utilization));
    if let Some(warning) = &report.capacity_warning {
        out.push_str(&format!("  Warning:         {}\n", warning.message()));
    }

    out.push_str("\nClusters\n");
    for share in &report.cluster_shares {
        out.push_str(&format!(
            "  {} {:<14} {:>4} {:>4}%\n",
            share.cluster, share.name, share.count, share.percent
        ));
    }

    out.push_str("\nRows\n");
    for (row, count) in &report.row_distribution {
        out.push_str(&format!("  Row {row:<3} {count:>4}\n"));
    }

    out.push_str("\nColumns\n");
    for (column, count) in &report.column_distribution {
        out.push_str(&format!("  Column {column:<3} {count:>4}\n"));
    }

    out.push_str("\nMost active locations\n");
    for line in render_hot_locations(&report.hot_locations).lines() {
        out.push_str(&format!("  {line}\n"));
    }
    out
}

/// Occupancy counts laid out as a table; `.` marks an empty cell
pub fn render_grid(view: &GridProjection<'_>) -> String {
    if view.is_empty() {
        return "No files found for this cluster\n".to_string();
    }

    let mut out = String::new();
    match view.cluster {
        Some(cluster) => out.push_str(&format!(
            "Storage grid - {} ({})\n",
            cluster.name(),
            cluster
        )),
        None => out.push_str("Storage grid - all clusters\n"),
    }
    out.push_str(&format!(
        "{} files, {}x{} grid\n\n",
        view.total_records, view.dimensions.rows, view.dimensions.columns
    ));

    out.push_str("    ");
    for column in 0..view.dimensions.columns {
        out.push_str(&format!("{column:>3}"));
    }
    out.push('\n');
    for (row, cells) in view.occupancy().iter().enumerate() {
        out.push_str(&format!("{row:>3} "));
        for count in cells {
            if *count == 0 {
                out.push_str("  .");
            } else {
                out.push_str(&format!("{count:>3}"));
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_bulk_delete(outcome: &BulkDeleteOutcome) -> String {
    let mut out = String::new();
    if outcome.is_complete() {
        out.push_str(&format!("Deleted {} file(s)\n", outcome.succeeded.len()));
    } else if outcome.is_total_failure() {
        out.push_str(&format!("Failed to delete {} file(s)\n", outcome.failed.len()));
    } else {
        out.push_str(&format!("Partially completed: {}\n", outcome.summary()));
    }
    for id in &outcome.failed {
        out.push_str(&format!("  failed: {id}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetrack_analytics::AnalyticsConfig;
    use filetrack_location::{Cluster, RecordId};

    fn record(id: &str, cluster: Cluster, row: u8, column: u8) -> FileRecord {
        FileRecord {
            id: RecordId::new(id),
            file_id: format!("FILE-{id}"),
            cluster,
            row,
            column,
            address: None,
        }
    }

    #[test]
    fn test_grid_marks_empty_cells() {
        let records = vec![
            record("1", Cluster::Colombo, 0, 0),
            record("2", Cluster::Colombo, 1, 1),
            record("3", Cluster::Colombo, 1, 1),
        ];
        let view = GridProjection::build(&records, Some(Cluster::Colombo));
        let text = render_grid(&view);
        assert!(text.starts_with("Storage grid - Colombo (C)"));
        assert!(text.contains("  0   1  ."));
        assert!(text.contains("  1   .  2"));
    }

    #[test]
    fn test_report_lists_hot_locations() {
        let records = vec![
            record("1", Cluster::Colombo, 8, 9),
            record("2", Cluster::Colombo, 8, 9),
            record("3", Cluster::Kandy, 3, 4),
        ];
        let report = AnalyticsReport::build(&records, &AnalyticsConfig::default());
        let text = render_report(&report);
        assert!(text.contains("#1 Location C89 - 2 file(s) stored"));
        assert!(text.contains("#2 Location K34 - 1 file(s) stored"));
    }

    #[test]
    fn test_bulk_delete_wording() {
        let partial = BulkDeleteOutcome {
            succeeded: vec![RecordId::new("a")],
            failed: vec![RecordId::new("b")],
        };
        assert!(render_bulk_delete(&partial).starts_with("Partially completed: 1 of 2 deleted"));

        let failed = BulkDeleteOutcome {
            succeeded: vec![],
            failed: vec![RecordId::new("b")],
        };
        assert!(render_bulk_delete(&failed).starts_with("Failed to delete 1 file(s)"));
    }
}
