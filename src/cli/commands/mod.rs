//! CLI command implementations

pub mod fetch;

pub use fetch::{exit_code_for, FetchArgs};
