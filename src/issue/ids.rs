//! Type-safe issue identifier

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a client-supplied id is not a valid issue id
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed issue id: {0}")]
pub struct IdError(pub String);

/// Type-safe wrapper for issue IDs
///
/// Assigned by the store on insert and never changed afterwards.
/// Rendered as a hyphenated lowercase UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueId(Uuid);

impl IssueId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a client-supplied id
    ///
    /// Surrounding whitespace is ignored. Anything that is not a UUID is
    /// rejected with [`IdError`].
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        Uuid::try_parse(raw.trim())
            .map(Self)
            .map_err(|_| IdError(raw.to_string()))
    }

    /// Canonical string form
    pub fn as_string(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for IssueId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = IssueId::generate();
        let b = IssueId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_round_trips_display() {
        let id = IssueId::generate();
        let parsed = IssueId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.as_string(), id.to_string());
    }

    #[test]
    fn test_parse_normalizes_case() {
        let id = IssueId::parse("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            IssueId::parse("jhicekbfjrefef"),
            Err(IdError("jhicekbfjrefef".to_string()))
        );
        assert!(IssueId::parse("").is_err());
        assert!(IssueId::parse("62cde0850119240d41e").is_err());
    }

    #[test]
    fn test_from_str() {
        let id: IssueId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }
}
