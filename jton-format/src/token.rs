//! Base62 key tokens and the key dictionary

use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::collections::HashMap;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Descriptor keys a token must never collide with
pub const RESERVED_WORDS: [&str; 9] = ["s", "d", "n", "c", "p", "x", "a", "k", "S"];

/// Encode a non-negative integer as base62, most significant digit first
pub fn base62(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits: SmallVec<[u8; 11]> = SmallVec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 62) as usize]);
        n /= 62;
    }
    digits.iter().rev().map(|&b| b as char).collect()
}

/// Check whether a candidate token collides with a descriptor key
pub fn is_reserved(token: &str) -> bool {
    RESERVED_WORDS.contains(&token)
}

/// Append-only insertion-ordered key dictionary
///
/// Every object key seen during an encoding walk is assigned the next free
/// base62 token in first-encounter order. Candidates that equal a reserved
/// descriptor key are skipped, consuming their counter value.
#[derive(Debug, Default)]
pub struct KeyDict {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    counter: u64,
}

impl KeyDict {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a key, assigning a token on first sight
    pub fn intern(&mut self, key: &str) -> String {
        if let Some(&i) = self.index.get(key) {
            return self.entries[i].1.clone();
        }
        let token = loop {
            let candidate = base62(self.counter);
            self.counter += 1;
            if !is_reserved(&candidate) {
                break candidate;
            }
        };
        self.index.insert(key.to_string(), self.entries.len());
        self.entries.push((key.to_string(), token.clone()));
        token
    }

    /// Number of interned keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no key has been interned
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the `m` envelope object: original key -> token
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::with_capacity(self.entries.len());
        for (original, token) in &self.entries {
            map.insert(original.clone(), Value::String(token.clone()));
        }
        map
    }
}
