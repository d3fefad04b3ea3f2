//! JTON Codec - encoder and decoder engines
//!
//! This crate turns JSON values into semantically equivalent but
//! token-sparser JSON texts and back:
//!
//! - Column analyzer for arrays of row-uniform objects
//! - Sequence packer selection (progressions, runs, prefixes, binary packs)
//! - Recursive encoder driver with envelope and global fallback
//! - Symmetric recursive decoder

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod column;
pub mod decode;
pub mod encode;
pub mod packer;

// Re-export commonly used types
pub use jton_format::{JtonError, Limits, Result};

pub use decode::{decompress_json, decompress_json_with};
pub use encode::{compress_json, compress_json_with};

/// Encoding options
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Emit base64 binary packs; disable for the human-readable variant
    pub binary_packers: bool,
    /// Minimum run length before boolean bit-packing applies
    pub min_bool_pack: usize,
    /// Minimum run length before numeric binary packing applies
    pub min_numeric_pack: usize,
    /// Depth and materialization limits, shared with the decoder
    pub limits: Limits,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            binary_packers: true,
            min_bool_pack: 8,
            min_numeric_pack: 4,
            limits: Limits::default(),
        }
    }
}

impl EncodeOptions {
    /// Options for the human-readable variant: no base64 binary packs
    pub fn readable() -> Self {
        Self {
            binary_packers: false,
            ..Self::default()
        }
    }
}
