//! Delivery-date cutoff
//!
//! The cutoff selects which deliveries LimsRest reports. It is given on the
//! command line as `YYYY/MM/DD`, interpreted as local midnight, and sent to
//! the service as epoch milliseconds.

use crate::domain::{CheckerError, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format accepted for `--delivery-date`
pub const DELIVERY_DATE_FORMAT: &str = "%Y/%m/%d";

/// Delivery-date cutoff in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cutoff(i64);

impl Cutoff {
    /// Creates a cutoff from epoch milliseconds
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Creates a cutoff at the given instant
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self(at.timestamp_millis())
    }

    /// Parses a `YYYY/MM/DD` delivery date as local midnight
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the date is malformed or local
    /// midnight does not exist on that day.
    ///
    /// # Examples
    ///
    /// ```
    /// use metadb_checker::domain::Cutoff;
    ///
    /// let cutoff = Cutoff::parse_delivery_date("2021/02/25").unwrap();
    /// assert!(cutoff.as_millis() > 0);
    /// assert!(Cutoff::parse_delivery_date("2021-02-25").is_err());
    /// ```
    pub fn parse_delivery_date(input: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(input.trim(), DELIVERY_DATE_FORMAT).map_err(|e| {
            CheckerError::Configuration(format!(
                "Invalid delivery date '{input}': {e}. Expected format YYYY/MM/DD"
            ))
        })?;

        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
            CheckerError::Configuration(format!("Invalid delivery date '{input}'"))
        })?;

        // Days that skip midnight for DST have no local midnight at all
        let local = Local.from_local_datetime(&midnight).earliest().ok_or_else(|| {
            CheckerError::Configuration(format!(
                "Delivery date '{input}' has no local midnight in this time zone"
            ))
        })?;

        Ok(Self::from_datetime(&local))
    }

    /// Epoch milliseconds, as sent in the `timestamp` query parameter
    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cutoff {
    type Err = CheckerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_delivery_date(s)
    }
}
