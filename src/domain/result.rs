//! Result type alias for the checker

use super::errors::CheckerError;

/// Result type alias for checker operations
///
/// # Examples
///
/// ```
/// use metadb_checker::domain::result::Result;
/// use metadb_checker::domain::errors::CheckerError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CheckerError::Configuration("missing --username".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CheckerError>;
