//! JSON-lines rendering of aggregation results
//!
//! Each enriched request becomes one compact JSON document on its own line,
//! in the order the result set holds them.

use crate::domain::{Result, ResultSet};
use std::io::Write;

/// Write one JSON line per request
///
/// Every line is rendered before anything is written, so a serialization
/// failure leaves the writer untouched.
///
/// Returns the number of lines written.
///
/// # Example
///
/// ```
/// use metadb_checker::core::output::write_json_lines;
/// use metadb_checker::domain::ResultSet;
///
/// let mut out = Vec::new();
/// let written = write_json_lines(&ResultSet::default(), &mut out).unwrap();
/// assert_eq!(written, 0);
/// assert!(out.is_empty());
/// ```
pub fn write_json_lines<W: Write>(results: &ResultSet, mut writer: W) -> Result<usize> {
    let lines = results
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    for line in &lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;

    Ok(lines.len())
}
