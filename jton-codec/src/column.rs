//! Column analyzer for arrays of row-uniform objects

use serde_json::Value;

/// Columns extracted from a row-uniform object array
#[derive(Debug)]
pub struct ColumnSet<'a> {
    /// Shared keys in row insertion order
    pub keys: Vec<&'a str>,
    /// Per-key value vectors, row order preserved
    pub columns: Vec<Vec<&'a Value>>,
}

/// Decide whether an array qualifies for columnar encoding
///
/// Qualifying arrays have at least two rows, every row an object, and all
/// rows carrying the exact same keys in the same insertion order. Zero-key
/// rows are rejected because the row count would not survive a round trip.
pub fn analyze(items: &[Value]) -> Option<ColumnSet<'_>> {
    if items.len() < 2 {
        return None;
    }
    let first = items[0].as_object()?;
    if first.is_empty() {
        return None;
    }
    let keys: Vec<&str> = first.keys().map(String::as_str).collect();
    for item in &items[1..] {
        let obj = item.as_object()?;
        if obj.len() != keys.len() || !obj.keys().map(String::as_str).eq(keys.iter().copied()) {
            return None;
        }
    }

    let mut columns: Vec<Vec<&Value>> = keys
        .iter()
        .map(|_| Vec::with_capacity(items.len()))
        .collect();
    for item in items {
        let obj = item.as_object()?;
        for (ci, key) in keys.iter().enumerate() {
            columns[ci].push(obj.get(*key)?);
        }
    }
    Some(ColumnSet { keys, columns })
}
