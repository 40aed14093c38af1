//! Data-table access: rows of named columns keyed by the header row.

use std::collections::HashMap;

use cucumber::gherkin::Step;

/// Rows of the step's table as column-name → cell maps. Empty when the step
/// carries no table.
pub(crate) fn rows(step: &Step) -> Vec<HashMap<String, String>> {
    let Some(table) = step.table.as_ref() else {
        return Vec::new();
    };
    let mut iter = table.rows.iter();
    let Some(header) = iter.next() else {
        return Vec::new();
    };
    iter.map(|row| header.iter().cloned().zip(row.iter().cloned()).collect()).collect()
}

/// Cell accessor defaulting missing columns to the empty string.
pub(crate) fn cell<'a>(row: &'a HashMap<String, String>, column: &str) -> &'a str {
    row.get(column).map_or("", String::as_str)
}
