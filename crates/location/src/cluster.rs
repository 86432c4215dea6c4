use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical storage site. The core only ever stores the letter code; the
/// place names exist for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cluster {
    Colombo,
    Kandy,
    Galle,
    Jaffna,
    Anuradhapura,
    Batticaloa,
    Matara,
    Negombo,
    Polonnaruwa,
    Trincomalee,
}

impl Cluster {
    pub const ALL: [Cluster; 10] = [
        Cluster::Colombo,
        Cluster::Kandy,
        Cluster::Galle,
        Cluster::Jaffna,
        Cluster::Anuradhapura,
        Cluster::Batticaloa,
        Cluster::Matara,
        Cluster::Negombo,
        Cluster::Polonnaruwa,
        Cluster::Trincomalee,
    ];

    /// Uppercase single-letter code
    pub fn code(self) -> char {
        match self {
            Self::Colombo => 'C',
            Self::Kandy => 'K',
            Self::Galle => 'G',
            Self::Jaffna => 'J',
            Self::Anuradhapura => 'A',
            Self::Batticaloa => 'B',
            Self::Matara => 'M',
            Self::Negombo => 'N',
            Self::Polonnaruwa => 'P',
            Self::Trincomalee => 'T',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Colombo => "Colombo",
            Self::Kandy => "Kandy",
            Self::Galle => "Galle",
            Self::Jaffna => "Jaffna",
            Self::Anuradhapura => "Anuradhapura",
            Self::Batticaloa => "Batticaloa",
            Self::Matara => "Matara",
            Self::Negombo => "Negombo",
            Self::Polonnaruwa => "Polonnaruwa",
            Self::Trincomalee => "Trincomalee",
        }
    }

    /// Look up a cluster by letter, ignoring ASCII case
    pub fn from_code(code: char) -> Option<Self> {
        let upper = code.to_ascii_uppercase();
        Self::ALL.into_iter().find(|cluster| cluster.code() == upper)
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; 4];
        f.pad(self.code().encode_utf8(&mut buf))
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => {
                Self::from_code(code).ok_or_else(|| format!("unknown cluster code '{trimmed}'"))
            }
            (None, _) => Err("cluster code is required".to_string()),
            _ => Err(format!("cluster code '{trimmed}' must be a single letter")),
        }
    }
}

impl TryFrom<String> for Cluster {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cluster> for String {
    fn from(cluster: Cluster) -> Self {
        cluster.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_uppercase() {
        let mut codes: Vec<char> = Cluster::ALL.iter().map(|c| c.code()).collect();
        assert!(codes.iter().all(|c| c.is_ascii_uppercase()));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), Cluster::ALL.len());
    }

    #[test]
    fn test_parse_ignores_case_and_whitespace() {
        assert_eq!(" k ".parse::<Cluster>(), Ok(Cluster::Kandy));
        assert_eq!("T".parse::<Cluster>(), Ok(Cluster::Trincomalee));
    }

    #[test]
    fn test_parse_rejects_unknown_and_multi_letter() {
        assert!("Z".parse::<Cluster>().is_err());
        assert!("CK".parse::<Cluster>().is_err());
        assert!("".parse::<Cluster>().is_err());
    }

    #[test]
    fn test_serde_uses_letter_code() {
        let json = serde_json::to_string(&Cluster::Galle).unwrap();
        assert_eq!(json, "\"G\"");
        let back: Cluster = serde_json::from_str("\"j\"").unwrap();
        assert_eq!(back, Cluster::Jaffna);
    }
}
