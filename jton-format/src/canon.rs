//! Canonical minified JSON text

use crate::error::{JtonError, Result};
use crate::limits::Limits;
use serde_json::Value;

/// Serialize a value as canonical minified JSON
///
/// Compact `,` and `:` separators, no whitespace, integers without a
/// decimal point, floats in their shortest round-trip form, object key
/// order preserved, no trailing newline.
pub fn to_canonical_string(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Walk a value checking it stays inside the supported domain
///
/// Rejects nesting beyond `Limits::max_depth` and (defensively) non-finite
/// numbers, which `serde_json` cannot normally represent.
pub fn validate(value: &Value, limits: &Limits) -> Result<()> {
    check(value, limits.max_depth)
}

fn check(value: &Value, budget: usize) -> Result<()> {
    match value {
        Value::Array(items) => {
            if budget == 0 {
                return Err(JtonError::DepthExceeded);
            }
            for item in items {
                check(item, budget - 1)?;
            }
        }
        Value::Object(map) => {
            if budget == 0 {
                return Err(JtonError::DepthExceeded);
            }
            for value in map.values() {
                check(value, budget - 1)?;
            }
        }
        Value::Number(n) => {
            if n.is_f64() {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if !f.is_finite() {
                    return Err(JtonError::UnsupportedValue(format!(
                        "non-finite number {}",
                        f
                    )));
                }
            }
        }
        _ => {}
    }
    Ok(())
}
