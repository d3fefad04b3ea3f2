//! Sequence packer candidates
//!
//! Each packer inspects a same-typed run and either offers a candidate
//! descriptor or reports itself not applicable; the encoder driver keeps
//! the cheapest applicable candidate.

use crate::EncodeOptions;
use jton_format::packed;
use serde_json::{json, Number, Value};

/// Leaf type classification of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqKind {
    /// All booleans
    Bools,
    /// All integers within i64
    Ints,
    /// All floats
    Floats,
    /// All strings
    Strs,
    /// Mixed types or container elements
    Mixed,
}

/// Classify a sequence by its leaf type
pub fn classify(values: &[&Value]) -> SeqKind {
    if values.iter().all(|v| v.is_boolean()) {
        SeqKind::Bools
    } else if values.iter().all(|v| v.as_i64().is_some()) {
        SeqKind::Ints
    } else if values.iter().all(|v| v.is_f64()) {
        SeqKind::Floats
    } else if values.iter().all(|v| v.is_string()) {
        SeqKind::Strs
    } else {
        SeqKind::Mixed
    }
}

/// Strict equality for round-trip purposes
///
/// An integer never equals a float, floats compare bit-for-bit (so `0.0`
/// and `-0.0` stay distinct), and object key order matters.
pub fn literal_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => number_eq(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(va, vb)| literal_eq(va, vb))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && literal_eq(va, vb))
        }
        _ => false,
    }
}

fn number_eq(x: &Number, y: &Number) -> bool {
    if x.is_f64() != y.is_f64() {
        return false;
    }
    if x.is_f64() {
        match (x.as_f64(), y.as_f64()) {
            (Some(a), Some(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    } else {
        x == y
    }
}

/// Arithmetic progression descriptor, if the run is one
pub fn ap_candidate(values: &[&Value], kind: SeqKind) -> Option<Value> {
    if values.len() < 2 {
        return None;
    }
    match kind {
        SeqKind::Ints => {
            let first = values[0].as_i64()?;
            let delta = values[1].as_i64()?.checked_sub(first)?;
            for (i, v) in values.iter().enumerate() {
                let expected = (i as i64).checked_mul(delta)?.checked_add(first)?;
                if v.as_i64()? != expected {
                    return None;
                }
            }
            Some(json!({"s": first, "d": delta, "n": values.len()}))
        }
        SeqKind::Floats => {
            let first = values[0].as_f64()?;
            let delta = values[1].as_f64()? - first;
            for (i, v) in values.iter().enumerate() {
                // Recomputation must be bit-exact or the decode drifts.
                let expected = first + (i as f64) * delta;
                if expected.to_bits() != v.as_f64()?.to_bits() {
                    return None;
                }
            }
            Some(json!({"s": first, "d": delta, "n": values.len()}))
        }
        _ => None,
    }
}

/// Prefix-factored string list, if a shared prefix of two or more
/// characters exists
pub fn prefix_candidate(values: &[&Value]) -> Option<Value> {
    if values.len() < 2 {
        return None;
    }
    let strings: Vec<&str> = values.iter().map(|v| v.as_str()).collect::<Option<_>>()?;
    let mut prefix_len = strings[0].len();
    for s in &strings[1..] {
        prefix_len = common_prefix_len(&strings[0][..prefix_len], s);
        if prefix_len == 0 {
            return None;
        }
    }
    let prefix = &strings[0][..prefix_len];
    if prefix.chars().count() < 2 {
        return None;
    }
    let suffixes: Vec<Value> = strings
        .iter()
        .map(|s| Value::String(s[prefix_len..].to_string()))
        .collect();
    Some(json!({"p": prefix, "x": suffixes}))
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}

/// Binary packed-string candidate for a same-typed leaf run
pub fn binary_candidate(
    values: &[&Value],
    kind: SeqKind,
    opts: &EncodeOptions,
) -> Option<Value> {
    if !opts.binary_packers {
        return None;
    }
    match kind {
        SeqKind::Bools if values.len() >= opts.min_bool_pack => {
            let bools: Vec<bool> = values.iter().map(|v| v.as_bool()).collect::<Option<_>>()?;
            Some(Value::String(packed::pack_bools(&bools)))
        }
        SeqKind::Ints if values.len() >= opts.min_numeric_pack => {
            let ints: Vec<i64> = values.iter().map(|v| v.as_i64()).collect::<Option<_>>()?;
            Some(Value::String(packed::pack_ints(&ints)))
        }
        SeqKind::Floats if values.len() >= opts.min_numeric_pack => {
            let floats: Vec<f64> = values.iter().map(|v| v.as_f64()).collect::<Option<_>>()?;
            Some(Value::String(packed::pack_floats(&floats)))
        }
        _ => None,
    }
}
