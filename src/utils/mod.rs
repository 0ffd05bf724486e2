//! Utility functions for timestamp and string formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_optional, format_signed, format_timestamp, parse_timestamp, truncate_string};
