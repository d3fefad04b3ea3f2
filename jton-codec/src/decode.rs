//! Decoder: envelope detection and descriptor materialization

use jton_format::packed::{self, Unpacked};
use jton_format::{JtonError, Limits, Result};
use serde_json::{Map, Number, Value};
use std::cell::Cell;
use std::collections::HashMap;

/// Decode a JTON text with default limits
pub fn decompress_json(text: &str) -> Result<Value> {
    decompress_json_with(text, &Limits::default())
}

/// Decode a JTON text
///
/// Non-envelope documents are returned verbatim; descriptor errors only
/// surface for documents that carry the `d` + `m` envelope markers.
pub fn decompress_json_with(text: &str, limits: &Limits) -> Result<Value> {
    let value: Value = serde_json::from_str(text)?;
    match envelope_parts(&value) {
        Some((data, mapping)) => {
            let decoder = Decoder {
                inv: invert_mapping(mapping)?,
                limits,
                synthesized: Cell::new(0),
            };
            // Escape wrappers and columnar descriptors make the encoded
            // tree up to twice as deep as its source, so the walk gets a
            // matching budget.
            let budget = limits.max_depth.saturating_mul(2).saturating_add(2);
            decoder.dec_tree(data, budget)
        }
        None => Ok(value),
    }
}

/// Whether a raw JSON value would be read as an encoded envelope
pub fn looks_like_envelope(value: &Value) -> bool {
    envelope_parts(value).is_some()
}

fn envelope_parts(value: &Value) -> Option<(&Value, &Map<String, Value>)> {
    let obj = value.as_object()?;
    if obj.len() != 2 {
        return None;
    }
    let data = obj.get("d")?;
    let mapping = obj.get("m")?.as_object()?;
    if !mapping.values().all(Value::is_string) {
        return None;
    }
    Some((data, mapping))
}

fn invert_mapping(mapping: &Map<String, Value>) -> Result<HashMap<String, String>> {
    let mut inv = HashMap::with_capacity(mapping.len());
    for (original, token) in mapping {
        let token = token.as_str().unwrap_or_default();
        if inv.insert(token.to_string(), original.clone()).is_some() {
            return Err(JtonError::MalformedInput(format!(
                "duplicate key token '{}'",
                token
            )));
        }
    }
    Ok(inv)
}

struct Decoder<'a> {
    inv: HashMap<String, String>,
    limits: &'a Limits,
    synthesized: Cell<u64>,
}

impl Decoder<'_> {
    /// Account for values synthesized beyond the literal input size
    fn charge(&self, count: u64) -> Result<()> {
        let total = self.synthesized.get().saturating_add(count);
        self.synthesized.set(total);
        if total > self.limits.max_total_values {
            return Err(JtonError::LimitExceeded(format!(
                "decode would materialize more than {} values",
                self.limits.max_total_values
            )));
        }
        Ok(())
    }

    fn run_length(&self, n: &Value) -> Result<usize> {
        let count = n.as_u64().ok_or_else(|| {
            JtonError::MalformedInput("run length must be a non-negative integer".to_string())
        })?;
        if count < 2 {
            return Err(JtonError::MalformedInput(
                "run length below two".to_string(),
            ));
        }
        if count > self.limits.max_run_len as u64 {
            return Err(JtonError::LimitExceeded(format!(
                "run length {} exceeds limit {}",
                count, self.limits.max_run_len
            )));
        }
        Ok(count as usize)
    }

    fn dec_tree(&self, value: &Value, depth: usize) -> Result<Value> {
        match value {
            Value::Object(map) => {
                let depth = descend(depth)?;
                self.dec_object(map, depth)
            }
            Value::Array(items) => {
                let depth = descend(depth)?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.dec_tree(item, depth)?);
                }
                Ok(Value::Array(out))
            }
            Value::String(s) if packed::collides_with_packed(s) => {
                Ok(Value::Array(self.unpack_values(s)?))
            }
            _ => Ok(value.clone()),
        }
    }

    fn dec_object(&self, map: &Map<String, Value>, depth: usize) -> Result<Value> {
        if map.len() == 1 {
            if let Some(inner) = map.get("S") {
                return match inner {
                    Value::String(s) => Ok(Value::String(s.clone())),
                    _ => Err(JtonError::MalformedInput(
                        "escaped literal must hold a string".to_string(),
                    )),
                };
            }
        }
        if map.contains_key("a") {
            return self.dec_rows(map, depth);
        }
        if map.len() == 3 {
            if let (Some(s), Some(d), Some(n)) = (map.get("s"), map.get("d"), map.get("n")) {
                return Ok(Value::Array(self.progression_values(s, d, n)?));
            }
        }
        if map.len() == 2 {
            if let (Some(c), Some(n)) = (map.get("c"), map.get("n")) {
                return Ok(Value::Array(self.run_values(c, n, depth)?));
            }
            if let (Some(p), Some(x)) = (map.get("p"), map.get("x")) {
                return Ok(Value::Array(self.prefix_values(p, x)?));
            }
        }
        // Ordinary object: every key must be a dictionary token.
        let mut out = Map::with_capacity(map.len());
        for (token, child) in map {
            let original = self.inv.get(token).ok_or_else(|| {
                JtonError::MalformedInput(format!("unknown key token '{}'", token))
            })?;
            out.insert(original.clone(), self.dec_tree(child, depth)?);
        }
        Ok(Value::Object(out))
    }

    fn dec_rows(&self, map: &Map<String, Value>, depth: usize) -> Result<Value> {
        if map.len() != 3 {
            return Err(JtonError::MalformedInput(
                "columnar descriptor must have exactly a, k, d".to_string(),
            ));
        }
        let version = map.get("a").and_then(Value::as_i64);
        if version != Some(1) {
            return Err(JtonError::MalformedInput(
                "unsupported columnar version".to_string(),
            ));
        }
        let tokens = map
            .get("k")
            .and_then(Value::as_array)
            .ok_or_else(|| JtonError::MalformedInput("columnar key list missing".to_string()))?;
        let cols = map
            .get("d")
            .and_then(Value::as_array)
            .ok_or_else(|| JtonError::MalformedInput("columnar data list missing".to_string()))?;
        if tokens.is_empty() || tokens.len() != cols.len() {
            return Err(JtonError::MalformedInput(
                "columnar key and data lists disagree".to_string(),
            ));
        }

        let mut names = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_str().ok_or_else(|| {
                JtonError::MalformedInput("column key must be a token string".to_string())
            })?;
            let original = self.inv.get(token).ok_or_else(|| {
                JtonError::MalformedInput(format!("unknown key token '{}'", token))
            })?;
            names.push(original);
        }

        let mut columns = Vec::with_capacity(cols.len());
        for col in cols {
            columns.push(self.dec_column(col, depth)?);
        }
        let rows = columns[0].len();
        if columns.iter().any(|c| c.len() != rows) {
            return Err(JtonError::MalformedInput(
                "column length mismatch".to_string(),
            ));
        }

        let mut out = Vec::with_capacity(rows);
        for r in 0..rows {
            let mut obj = Map::with_capacity(names.len());
            for (ci, name) in names.iter().enumerate() {
                obj.insert((*name).clone(), std::mem::take(&mut columns[ci][r]));
            }
            out.push(Value::Object(obj));
        }
        Ok(Value::Array(out))
    }

    fn dec_column(&self, col: &Value, depth: usize) -> Result<Vec<Value>> {
        let depth = descend(depth)?;
        match col {
            Value::Object(map) => {
                if map.len() == 3 {
                    if let (Some(s), Some(d), Some(n)) =
                        (map.get("s"), map.get("d"), map.get("n"))
                    {
                        return self.progression_values(s, d, n);
                    }
                }
                if map.len() == 2 {
                    if let (Some(c), Some(n)) = (map.get("c"), map.get("n")) {
                        return self.run_values(c, n, depth);
                    }
                    if let (Some(p), Some(x)) = (map.get("p"), map.get("x")) {
                        return self.prefix_values(p, x);
                    }
                }
                Err(JtonError::MalformedInput(
                    "invalid column encoding".to_string(),
                ))
            }
            Value::String(s) if packed::collides_with_packed(s) => self.unpack_values(s),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.dec_tree(item, depth)?);
                }
                Ok(out)
            }
            _ => Err(JtonError::MalformedInput(
                "invalid column encoding".to_string(),
            )),
        }
    }

    fn progression_values(&self, s: &Value, d: &Value, n: &Value) -> Result<Vec<Value>> {
        let count = self.run_length(n)?;
        self.charge(count as u64)?;
        if let (Some(start), Some(delta)) = (s.as_i64(), d.as_i64()) {
            let mut out = Vec::with_capacity(count);
            for i in 0..count {
                let value = (i as i64)
                    .checked_mul(delta)
                    .and_then(|x| x.checked_add(start))
                    .ok_or_else(|| {
                        JtonError::MalformedInput("integer progression overflows".to_string())
                    })?;
                out.push(Value::from(value));
            }
            return Ok(out);
        }
        let start = s.as_f64().ok_or_else(|| {
            JtonError::MalformedInput("progression start must be a number".to_string())
        })?;
        let delta = d.as_f64().ok_or_else(|| {
            JtonError::MalformedInput("progression step must be a number".to_string())
        })?;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let number = Number::from_f64(start + (i as f64) * delta).ok_or_else(|| {
                JtonError::MalformedInput("progression leaves the JSON domain".to_string())
            })?;
            out.push(Value::Number(number));
        }
        Ok(out)
    }

    fn run_values(&self, c: &Value, n: &Value, depth: usize) -> Result<Vec<Value>> {
        let count = self.run_length(n)?;
        let element = self.dec_tree(c, depth)?;
        // Charge the full cloned size so nested runs cannot multiply past
        // the cap before allocation happens.
        self.charge((count as u64).saturating_mul(weight(&element)))?;
        Ok(vec![element; count])
    }

    fn prefix_values(&self, p: &Value, x: &Value) -> Result<Vec<Value>> {
        let prefix = p.as_str().ok_or_else(|| {
            JtonError::MalformedInput("prefix must be a string".to_string())
        })?;
        let suffixes = x.as_array().ok_or_else(|| {
            JtonError::MalformedInput("suffix list must be an array".to_string())
        })?;
        self.charge(suffixes.len() as u64)?;
        let mut out = Vec::with_capacity(suffixes.len());
        for suffix in suffixes {
            let suffix = suffix.as_str().ok_or_else(|| {
                JtonError::MalformedInput("suffixes must be strings".to_string())
            })?;
            out.push(Value::String(format!("{}{}", prefix, suffix)));
        }
        Ok(out)
    }

    fn unpack_values(&self, s: &str) -> Result<Vec<Value>> {
        let values: Vec<Value> = match packed::unpack(s)? {
            Unpacked::Bools(bools) => bools.into_iter().map(Value::Bool).collect(),
            Unpacked::Ints(ints) => ints.into_iter().map(Value::from).collect(),
            Unpacked::Floats(floats) => {
                let mut out = Vec::with_capacity(floats.len());
                for f in floats {
                    let number = Number::from_f64(f).ok_or_else(|| {
                        JtonError::MalformedInput(
                            "packed float outside the JSON domain".to_string(),
                        )
                    })?;
                    out.push(Value::Number(number));
                }
                out
            }
        };
        self.charge(values.len() as u64)?;
        Ok(values)
    }
}

fn weight(value: &Value) -> u64 {
    match value {
        Value::Array(items) => 1 + items.iter().map(weight).sum::<u64>(),
        Value::Object(map) => 1 + map.values().map(weight).sum::<u64>(),
        _ => 1,
    }
}

fn descend(depth: usize) -> Result<usize> {
    if depth == 0 {
        Err(JtonError::DepthExceeded)
    } else {
        Ok(depth - 1)
    }
}
