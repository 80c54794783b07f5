//! Domain identifier types with validation
//!
//! Newtype wrappers for LimsRest identifiers. Both are transparent strings on
//! the wire; deserialization rejects blank values because a blank identifier
//! cannot be looked up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// IGO request identifier (e.g. `06000_AB`)
///
/// # Examples
///
/// ```
/// use metadb_checker::domain::ids::RequestId;
/// use std::str::FromStr;
///
/// let request_id = RequestId::from_str("06000_AB").unwrap();
/// assert_eq!(request_id.as_str(), "06000_AB");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestId(String);

impl RequestId {
    /// Creates a new RequestId, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Request ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the request ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// IGO sample identifier (e.g. `06000_AB_1`)
///
/// # Examples
///
/// ```
/// use metadb_checker::domain::ids::SampleId;
///
/// let sample_id = SampleId::new("06000_AB_1").unwrap();
/// assert_eq!(sample_id.to_string(), "06000_AB_1");
/// assert!(SampleId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SampleId(String);

impl SampleId {
    /// Creates a new SampleId, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Sample ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the sample ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! impl_id_traits {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(id: $ty) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_id_traits!(RequestId);
impl_id_traits!(SampleId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_valid() {
        let id = RequestId::new("06000_AB").unwrap();
        assert_eq!(id.as_str(), "06000_AB");
        assert_eq!(id.to_string(), "06000_AB");
        assert_eq!(id.into_inner(), "06000_AB");
    }

    #[test]
    fn test_request_id_blank_rejected() {
        assert!(RequestId::new("").is_err());
        assert!(RequestId::from_str("   ").is_err());
    }

    #[test]
    fn test_sample_id_serde_is_transparent() {
        let id = SampleId::new("06000_AB_1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"06000_AB_1\"");

        let back: SampleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_sample_id_deserialize_blank_fails() {
        let result = serde_json::from_str::<SampleId>("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_ids_order_lexically() {
        let a = RequestId::new("06000_AA").unwrap();
        let b = RequestId::new("06000_AB").unwrap();
        assert!(a < b);
    }
}
