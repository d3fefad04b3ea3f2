//! Encoder driver, envelope assembly, and global fallback

use crate::column;
use crate::decode;
use crate::packer;
use crate::EncodeOptions;
use jton_format::packed;
use jton_format::{canon, KeyDict, Result};
use serde_json::{Map, Value};

/// Re-encode a JSON value with default options
pub fn compress_json(value: &Value) -> Result<String> {
    compress_json_with(value, &EncodeOptions::default())
}

/// Re-encode a JSON value
///
/// Returns the envelope text when it is strictly shorter than the
/// canonical JSON of the input, the canonical JSON otherwise. The one
/// exception is an input that itself looks like an envelope: it is always
/// wrapped so the decoder cannot misread it.
pub fn compress_json_with(value: &Value, opts: &EncodeOptions) -> Result<String> {
    canon::validate(value, &opts.limits)?;
    let canonical = canon::to_canonical_string(value)?;

    let mut encoder = Encoder {
        dict: KeyDict::new(),
        opts,
    };
    let root = encoder.enc_value(value, opts.limits.max_depth)?;

    let mut envelope = Map::with_capacity(2);
    envelope.insert("d".to_string(), root);
    envelope.insert("m".to_string(), Value::Object(encoder.dict.to_map()));
    let envelope_text = canon::to_canonical_string(&Value::Object(envelope))?;

    if envelope_text.len() < canonical.len() || decode::looks_like_envelope(value) {
        Ok(envelope_text)
    } else {
        Ok(canonical)
    }
}

struct Encoder<'a> {
    dict: KeyDict,
    opts: &'a EncodeOptions,
}

impl Encoder<'_> {
    fn enc_value(&mut self, value: &Value, depth: usize) -> Result<Value> {
        match value {
            Value::Object(map) => {
                let depth = descend(depth)?;
                let mut out = Map::with_capacity(map.len());
                for (key, child) in map {
                    let token = self.dict.intern(key);
                    out.insert(token, self.enc_value(child, depth)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => {
                let depth = descend(depth)?;
                self.enc_array(items, depth)
            }
            Value::String(s) => Ok(escape_literal(s)),
            _ => Ok(value.clone()),
        }
    }

    fn enc_array(&mut self, items: &[Value], depth: usize) -> Result<Value> {
        if let Some(set) = column::analyze(items) {
            let tokens: Vec<Value> = set
                .keys
                .iter()
                .map(|key| Value::String(self.dict.intern(key)))
                .collect();
            let mut cols = Vec::with_capacity(set.columns.len());
            for col in &set.columns {
                cols.push(self.enc_sequence(col, depth)?);
            }
            let mut out = Map::with_capacity(3);
            out.insert("a".to_string(), Value::from(1));
            out.insert("k".to_string(), Value::Array(tokens));
            out.insert("d".to_string(), Value::Array(cols));
            return Ok(Value::Object(out));
        }
        let refs: Vec<&Value> = items.iter().collect();
        self.enc_sequence(&refs, depth)
    }

    /// Pick the cheapest encoding for one same-position run of values
    ///
    /// Pattern descriptors (progression, constant, prefix) are preferred
    /// whenever one beats the plain list; binary packs only compete when
    /// no pattern holds, so short regular runs stay structural.
    fn enc_sequence(&mut self, values: &[&Value], depth: usize) -> Result<Value> {
        let mut plain_items = Vec::with_capacity(values.len());
        for v in values {
            plain_items.push(self.enc_value(v, depth)?);
        }
        if values.len() < 2 {
            return Ok(Value::Array(plain_items));
        }

        let kind = packer::classify(values);
        let constant = values[1..]
            .iter()
            .all(|&v| packer::literal_eq(values[0], v));
        let const_candidate = constant.then(|| {
            let mut out = Map::with_capacity(2);
            out.insert("c".to_string(), plain_items[0].clone());
            out.insert("n".to_string(), Value::from(values.len()));
            Value::Object(out)
        });

        let plain = Value::Array(plain_items);
        let plain_cost = text_len(&plain)?;

        // Prefix factoring must save outright; progressions and constant
        // runs also win ties against the plain list, being declared first.
        let mut best: Option<(Value, usize)> = None;
        let candidates = [
            (packer::ap_candidate(values, kind), false),
            (const_candidate, false),
            (packer::prefix_candidate(values), true),
        ];
        for (candidate, strict) in candidates {
            let Some(candidate) = candidate else { continue };
            let cost = text_len(&candidate)?;
            let beats_plain = if strict {
                cost < plain_cost
            } else {
                cost <= plain_cost
            };
            if beats_plain && best.as_ref().map_or(true, |(_, c)| cost < *c) {
                best = Some((candidate, cost));
            }
        }
        if let Some((candidate, _)) = best {
            return Ok(candidate);
        }

        if let Some(candidate) = packer::binary_candidate(values, kind, self.opts) {
            if text_len(&candidate)? <= plain_cost {
                return Ok(candidate);
            }
        }
        Ok(plain)
    }
}

fn descend(depth: usize) -> Result<usize> {
    if depth == 0 {
        Err(jton_format::JtonError::DepthExceeded)
    } else {
        Ok(depth - 1)
    }
}

fn text_len(value: &Value) -> Result<usize> {
    Ok(canon::to_canonical_string(value)?.len())
}

/// Wrap a literal string that would be mistaken for a packed sequence
fn escape_literal(s: &str) -> Value {
    if packed::collides_with_packed(s) {
        let mut out = Map::with_capacity(1);
        out.insert("S".to_string(), Value::String(s.to_string()));
        Value::Object(out)
    } else {
        Value::String(s.to_string())
    }
}
