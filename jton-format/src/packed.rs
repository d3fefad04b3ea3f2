//! Packed binary sequence primitives
//!
//! Same-typed runs are carried inside the output document as single JSON
//! strings: a one-character type prefix followed by the standard base64 of
//! a little-endian byte image. Boolean packs append a `~<count>` suffix so
//! padding bits can be discarded on decode.

use crate::error::{JtonError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bitvec::prelude::*;

/// Prefix characters that introduce a packed sequence
pub const PACKED_PREFIXES: [char; 10] = ['T', 'U', 'B', 'V', 'H', 'I', 'L', 'F', 'G', 'D'];

/// Scale applied by the `F` packer
const SCALE_F: f64 = 100.0;
/// Scale applied by the `G` packer
const SCALE_G: f64 = 1000.0;
/// Tolerance for treating a scaled float as an integer
const SCALE_TOLERANCE: f64 = 1e-9;

/// Values recovered from a packed-sequence string
#[derive(Debug, Clone, PartialEq)]
pub enum Unpacked {
    /// Booleans from a `T` pack
    Bools(Vec<bool>),
    /// Integers from a width pack (`U`, `B`, `V`, `H`, `I`, `L`)
    Ints(Vec<i64>),
    /// Floats from a scaled (`F`, `G`) or raw (`D`) pack
    Floats(Vec<f64>),
}

/// True if a literal string would be mistaken for a packed sequence
pub fn collides_with_packed(s: &str) -> bool {
    match s.chars().next() {
        Some(c) => PACKED_PREFIXES.contains(&c),
        None => false,
    }
}

/// Pack booleans eight to a byte, most significant bit first
pub fn pack_bools(values: &[bool]) -> String {
    let mut bits: BitVec<u8, Msb0> = BitVec::repeat(false, values.len());
    for (i, &b) in values.iter().enumerate() {
        if b {
            bits.set(i, true);
        }
    }
    format!("T{}~{}", STANDARD.encode(bits.as_raw_slice()), values.len())
}

/// Pack integers in the narrowest width covering every element
pub fn pack_ints(values: &[i64]) -> String {
    let lo = values.iter().copied().min().unwrap_or(0);
    let hi = values.iter().copied().max().unwrap_or(0);

    if lo >= 0 && hi <= u8::MAX as i64 {
        let bytes: Vec<u8> = values.iter().map(|&v| v as u8).collect();
        format!("U{}", STANDARD.encode(&bytes))
    } else if lo >= i8::MIN as i64 && hi <= i8::MAX as i64 {
        let bytes: Vec<u8> = values.iter().map(|&v| (v as i8) as u8).collect();
        format!("B{}", STANDARD.encode(&bytes))
    } else if lo >= 0 && hi <= u16::MAX as i64 {
        let bytes: Vec<u8> = values
            .iter()
            .flat_map(|&v| (v as u16).to_le_bytes())
            .collect();
        format!("V{}", STANDARD.encode(&bytes))
    } else if lo >= i16::MIN as i64 && hi <= i16::MAX as i64 {
        let bytes: Vec<u8> = values
            .iter()
            .flat_map(|&v| (v as i16).to_le_bytes())
            .collect();
        format!("H{}", STANDARD.encode(&bytes))
    } else if lo >= i32::MIN as i64 && hi <= i32::MAX as i64 {
        let bytes: Vec<u8> = values
            .iter()
            .flat_map(|&v| (v as i32).to_le_bytes())
            .collect();
        format!("I{}", STANDARD.encode(&bytes))
    } else {
        let bytes: Vec<u8> = values.iter().flat_map(|&v| v.to_le_bytes()).collect();
        format!("L{}", STANDARD.encode(&bytes))
    }
}

/// Pack floats, preferring scaled integer images over raw doubles
///
/// `F` stores `f * 100` as i16 and `G` stores `f * 1000` as i32; both are
/// used only when the scaled value is within `1e-9` of an integer and
/// dividing back reproduces the input bit-for-bit. Anything else falls
/// through to `D`, raw IEEE-754 doubles.
pub fn pack_floats(values: &[f64]) -> String {
    if let Some(scaled) = scale_exact(values, SCALE_F, i16::MIN as i64, i16::MAX as i64) {
        let bytes: Vec<u8> = scaled
            .iter()
            .flat_map(|&v| (v as i16).to_le_bytes())
            .collect();
        return format!("F{}", STANDARD.encode(&bytes));
    }
    if let Some(scaled) = scale_exact(values, SCALE_G, i32::MIN as i64, i32::MAX as i64) {
        let bytes: Vec<u8> = scaled
            .iter()
            .flat_map(|&v| (v as i32).to_le_bytes())
            .collect();
        return format!("G{}", STANDARD.encode(&bytes));
    }
    let bytes: Vec<u8> = values.iter().flat_map(|&v| v.to_le_bytes()).collect();
    format!("D{}", STANDARD.encode(&bytes))
}

fn scale_exact(values: &[f64], scale: f64, min: i64, max: i64) -> Option<Vec<i64>> {
    let mut scaled = Vec::with_capacity(values.len());
    for &f in values {
        let x = f * scale;
        let r = x.round();
        if !((x - r).abs() <= SCALE_TOLERANCE) {
            return None;
        }
        let i = r as i64;
        if i < min || i > max {
            return None;
        }
        // Division must reproduce the exact input bits to stay lossless.
        if (i as f64 / scale).to_bits() != f.to_bits() {
            return None;
        }
        scaled.push(i);
    }
    Some(scaled)
}

/// Decode a packed-sequence string, prefix included
pub fn unpack(s: &str) -> Result<Unpacked> {
    let prefix = s
        .chars()
        .next()
        .ok_or_else(|| JtonError::MalformedInput("empty packed sequence".to_string()))?;
    let body = &s[prefix.len_utf8()..];
    match prefix {
        'T' => Ok(Unpacked::Bools(unpack_bools(body)?)),
        'U' => unpack_fixed(body, 1, |c| c[0] as i64).map(Unpacked::Ints),
        'B' => unpack_fixed(body, 1, |c| (c[0] as i8) as i64).map(Unpacked::Ints),
        'V' => unpack_fixed(body, 2, |c| u16::from_le_bytes([c[0], c[1]]) as i64)
            .map(Unpacked::Ints),
        'H' => unpack_fixed(body, 2, |c| i16::from_le_bytes([c[0], c[1]]) as i64)
            .map(Unpacked::Ints),
        'I' => unpack_fixed(body, 4, |c| {
            i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as i64
        })
        .map(Unpacked::Ints),
        'L' => unpack_fixed(body, 8, |c| {
            i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
        })
        .map(Unpacked::Ints),
        'F' => unpack_fixed(body, 2, |c| {
            i16::from_le_bytes([c[0], c[1]]) as f64 / SCALE_F
        })
        .map(Unpacked::Floats),
        'G' => unpack_fixed(body, 4, |c| {
            i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64 / SCALE_G
        })
        .map(Unpacked::Floats),
        'D' => unpack_fixed(body, 8, |c| {
            f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
        })
        .map(Unpacked::Floats),
        other => Err(JtonError::MalformedInput(format!(
            "unknown packed prefix '{}'",
            other
        ))),
    }
}

fn unpack_bools(body: &str) -> Result<Vec<bool>> {
    let (b64, count_text) = body.rsplit_once('~').ok_or_else(|| {
        JtonError::MalformedInput("boolean pack missing count suffix".to_string())
    })?;
    let count: usize = count_text
        .parse()
        .map_err(|_| JtonError::MalformedInput("invalid boolean pack count".to_string()))?;
    let bytes = STANDARD
        .decode(b64)
        .map_err(|e| JtonError::MalformedInput(format!("bad base64 in boolean pack: {}", e)))?;
    if count < 2 {
        return Err(JtonError::MalformedInput(
            "boolean pack shorter than two elements".to_string(),
        ));
    }
    if bytes.len() != (count + 7) / 8 {
        return Err(JtonError::MalformedInput(
            "boolean pack length does not match count".to_string(),
        ));
    }
    let mut bits = BitVec::<u8, Msb0>::from_slice(&bytes);
    bits.truncate(count);
    Ok(bits.iter().map(|b| *b).collect())
}

fn unpack_fixed<T>(body: &str, width: usize, read: impl Fn(&[u8]) -> T) -> Result<Vec<T>> {
    let bytes = STANDARD
        .decode(body)
        .map_err(|e| JtonError::MalformedInput(format!("bad base64 in packed sequence: {}", e)))?;
    if bytes.is_empty() || bytes.len() % width != 0 {
        return Err(JtonError::MalformedInput(format!(
            "packed sequence length {} not a multiple of width {}",
            bytes.len(),
            width
        )));
    }
    let count = bytes.len() / width;
    if count < 2 {
        return Err(JtonError::MalformedInput(
            "packed sequence shorter than two elements".to_string(),
        ));
    }
    Ok(bytes.chunks_exact(width).map(|c| read(c)).collect())
}
