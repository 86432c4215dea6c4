use filetrack_location::{Cluster, FileRecord};
use serde::{Deserialize, Serialize};

/// List-view narrowing. Every set criterion must hold; an empty filter
/// keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub cluster: Option<Cluster>,
    pub row: Option<u8>,
    pub column: Option<u8>,
    /// Case-insensitive substring of the file id
    pub file_id: Option<String>,
    /// Case-insensitive substring of file id, address note or location token
    pub term: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cluster(mut self, cluster: Cluster) -> Self {
        self.cluster = Some(cluster);
        self
    }

    pub fn row(mut self, row: u8) -> Self {
        self.row = Some(row);
        self
    }

    pub fn column(mut self, column: u8) -> Self {
        self.column = Some(column);
        self
    }

    pub fn file_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = non_blank(file_id.into());
        self
    }

    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = non_blank(term.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cluster.is_none()
            && self.row.is_none()
            && self.column.is_none()
            && self.file_id.is_none()
            && self.term.is_none()
    }

    pub fn matches(&self, record: &FileRecord) -> bool {
        if self.cluster.is_some_and(|c| c != record.cluster)
            || self.row.is_some_and(|r| r != record.row)
            || self.column.is_some_and(|c| c != record.column)
        {
            return false;
        }

        if let Some(file_id) = &self.file_id {
            if !contains_ignore_case(&record.file_id, file_id) {
                return false;
            }
        }

        match &self.term {
            Some(term) => {
                contains_ignore_case(&record.file_id, term)
                    || contains_ignore_case(record.location().as_str(), term)
                    || record
                        .address
                        .as_deref()
                        .is_some_and(|address| contains_ignore_case(address, term))
            }
            None => true,
        }
    }

    /// Matching records in their original order
    pub fn apply<'a>(&self, records: &'a [FileRecord]) -> Vec<&'a FileRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetrack_location::RecordId;
    use pretty_assertions::assert_eq;

    fn record(id: &str, file_id: &str, cluster: Cluster, row: u8, column: u8, address: Option<&str>) -> FileRecord {
        FileRecord {
            id: RecordId::new(id),
            file_id: file_id.to_string(),
            cluster,
            row,
            column,
            address: address.map(str::to_string),
        }
    }

    fn sample() -> Vec<FileRecord> {
        vec![
            record("1", "FILE-123", Cluster::Colombo, 8, 9, Some("Legal archive")),
            record("2", "FILE-789", Cluster::Galle, 1, 2, None),
            record("3", "FILE-456", Cluster::Kandy, 3, 4, Some("Finance")),
            record("4", "INV-001", Cluster::Colombo, 1, 2, None),
        ]
    }

    fn ids(records: Vec<&FileRecord>) -> Vec<&str> {
        records.into_iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let records = sample();
        let filter = RecordFilter::new().term("   ");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&records).len(), records.len());
    }

    #[test]
    fn test_structural_criteria_combine() {
        let records = sample();
        let filter = RecordFilter::new().cluster(Cluster::Colombo).row(1);
        assert_eq!(ids(filter.apply(&records)), vec!["4"]);

        let filter = RecordFilter::new().column(2);
        assert_eq!(ids(filter.apply(&records)), vec!["2", "4"]);
    }

    #[test]
    fn test_file_id_substring() {
        let records = sample();
        let filter = RecordFilter::new().file_id("file-");
        assert_eq!(ids(filter.apply(&records)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_term_covers_address_and_location() {
        let records = sample();
        assert_eq!(ids(RecordFilter::new().term("legal").apply(&records)), vec!["1"]);
        assert_eq!(ids(RecordFilter::new().term("k34").apply(&records)), vec!["3"]);
        assert_eq!(ids(RecordFilter::new().term("inv").apply(&records)), vec!["4"]);
    }
}
