//! Address codec: `(cluster, row, column)` <-> three character token.

use crate::error::MalformedToken;
use crate::types::FileRecord;
use crate::Cluster;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical slot key, e.g. `"C89"`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationToken(String);

impl LocationToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LocationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for LocationToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Triple recovered from a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedToken {
    pub cluster: Cluster,
    pub row: u8,
    pub column: u8,
}

/// Concatenate cluster code, row and column.
///
/// No validation happens here: callers pass coordinates already checked
/// against `0..=9`, otherwise the token is longer than three characters.
pub fn encode(cluster: Cluster, row: u8, column: u8) -> LocationToken {
    LocationToken(format!("{}{}{}", cluster.code(), row, column))
}

pub fn decode(token: &str) -> Result<DecodedToken, MalformedToken> {
    let chars: Vec<char> = token.chars().collect();
    let &[code, row, column] = chars.as_slice() else {
        return Err(MalformedToken::new(token, "expected exactly 3 characters"));
    };

    let row = digit(row).ok_or_else(|| MalformedToken::new(token, "row is not a digit"))?;
    let column =
        digit(column).ok_or_else(|| MalformedToken::new(token, "column is not a digit"))?;
    let cluster =
        Cluster::from_code(code).ok_or_else(|| MalformedToken::new(token, "unknown cluster code"))?;

    Ok(DecodedToken {
        cluster,
        row,
        column,
    })
}

/// Case-insensitive comparison of the record's slot against `token`
pub fn matches(record: &FileRecord, token: &str) -> bool {
    encode(record.cluster, record.row, record.column)
        .as_str()
        .eq_ignore_ascii_case(token)
}

fn digit(c: char) -> Option<u8> {
    c.to_digit(10).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordId;

    fn record(cluster: Cluster, row: u8, column: u8) -> FileRecord {
        FileRecord {
            id: RecordId::new("r1"),
            file_id: "F1".to_string(),
            cluster,
            row,
            column,
            address: None,
        }
    }

    #[test]
    fn test_encode_concatenates_fields() {
        assert_eq!(encode(Cluster::Colombo, 8, 9).as_str(), "C89");
        assert_eq!(encode(Cluster::Kandy, 0, 0).as_str(), "K00");
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        for token in ["9", "", "CC89", "C8"] {
            let err = decode(token).unwrap_err();
            assert_eq!(err.token, token);
        }
    }

    #[test]
    fn test_decode_rejects_non_digit_coordinates() {
        assert!(decode("C8X").is_err());
        assert!(decode("CX9").is_err());
        assert!(decode("C８9").is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_cluster() {
        assert!(decode("Z99").is_err());
    }

    #[test]
    fn test_decode_accepts_lowercase_cluster() {
        let decoded = decode("k34").unwrap();
        assert_eq!(decoded.cluster, Cluster::Kandy);
        assert_eq!((decoded.row, decoded.column), (3, 4));
    }

    #[test]
    fn test_matches_ignores_case() {
        let r = record(Cluster::Colombo, 8, 9);
        assert!(matches(&r, "C89"));
        assert!(matches(&r, "c89"));
        assert!(!matches(&r, "C98"));
        assert!(!matches(&r, " C89"));
    }
}
