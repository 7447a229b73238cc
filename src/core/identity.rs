//! Identifiers using type-prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Identifier prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdPrefix {
    /// Quote document
    Quot,
    /// Plating step within a quote
    Step,
}

impl IdPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Quot => "QUOT",
            IdPrefix::Step => "STEP",
        }
    }

    pub fn all() -> &'static [IdPrefix] {
        &[IdPrefix::Quot, IdPrefix::Step]
    }
}

impl fmt::Display for IdPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IdPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "QUOT" => Ok(IdPrefix::Quot),
            "STEP" => Ok(IdPrefix::Step),
            _ => Err(IdParseError::InvalidPrefix(s.to_string())),
        }
    }
}

/// A unique identifier combining a type prefix and ULID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id {
    prefix: IdPrefix,
    ulid: Ulid,
}

impl Id {
    pub fn new(prefix: IdPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    pub fn prefix(&self) -> IdPrefix {
        self.prefix
    }

    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }

    /// Whether `text` refers to this ID
    ///
    /// Accepts the full ID, the bare ULID, or a prefix of the ULID at least
    /// four characters long, case-insensitively.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim().to_ascii_uppercase();
        let bare = self.ulid.to_string();
        if text == self.to_string() || text == bare {
            return true;
        }
        let partial = text
            .strip_prefix(&format!("{}-", self.prefix))
            .unwrap_or(text.as_str());
        partial.len() >= 4 && bare.starts_with(partial)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl FromStr for Id {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix_str, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        let prefix = prefix_str.parse()?;
        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { prefix, ulid })
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid ID prefix: '{0}' (valid: QUOT, STEP)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation() {
        let id = Id::new(IdPrefix::Quot);
        assert!(id.to_string().starts_with("QUOT-"));
        assert_eq!(id.to_string().len(), 31);
    }

    #[test]
    fn test_id_roundtrip() {
        for prefix in IdPrefix::all() {
            let id = Id::new(*prefix);
            let parsed = Id::parse(&id.to_string()).unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn test_id_invalid_prefix() {
        let err = Id::parse("XXX-01HQ3K4N5M6P7R8S9T0UVWXYZ").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidPrefix(_)));
    }

    #[test]
    fn test_id_missing_delimiter() {
        let err = Id::parse("STEP01HQ3K4N5M6P7R8S9T0UVWXYZ").unwrap_err();
        assert!(matches!(err, IdParseError::MissingDelimiter(_)));
    }

    #[test]
    fn test_id_invalid_ulid() {
        let err = Id::parse("STEP-notaulid").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidUlid(_, _)));
    }

    #[test]
    fn test_id_matching() {
        let id = Id::new(IdPrefix::Step);
        let full = id.to_string();
        assert!(id.matches(&full));
        assert!(id.matches(&full.to_lowercase()));
        assert!(id.matches(&full[5..]));
        assert!(id.matches(&full[..11]));
        assert!(!id.matches("STEP-"));
        assert!(!id.matches("STEP-01"));
    }
}
