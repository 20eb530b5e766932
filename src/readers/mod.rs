pub mod dataset_reader;

pub use dataset_reader::DatasetReader;

use crate::error::{QueryError, Result};
use csv::StringRecord;

/// Position of the first header matching any alias, ignoring case.
pub(crate) fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
}

pub(crate) fn require_column(headers: &StringRecord, aliases: &[&str]) -> Result<usize> {
    find_column(headers, aliases).ok_or_else(|| {
        QueryError::InvalidFormat(format!(
            "Missing required column '{}' (accepted: {})",
            aliases[0],
            aliases.join(", ")
        ))
    })
}
