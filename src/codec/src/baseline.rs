//! Reference search over the raw string column, no dictionary involved.
//!
//! Used to validate the encoded query paths and as the benchmark baseline.

/// Rows whose value equals `needle`, ascending.
pub(crate) fn search_equal(rows: &[String], needle: &str) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, value)| value.as_str() == needle)
        .map(|(row, _)| row)
        .collect()
}

/// Rows whose value starts with `prefix`, byte-wise, ascending.
pub(crate) fn search_prefix(rows: &[String], prefix: &str) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, value)| value.as_bytes().starts_with(prefix.as_bytes()))
        .map(|(row, _)| row)
        .collect()
}
