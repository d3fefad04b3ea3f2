//! JTON Format - Core primitives for token-sparse JSON re-encoding
//!
//! This crate provides the fundamental building blocks for the JTON codec
//! with no encoding policy of its own. It includes:
//!
//! - Canonical minified JSON serialization
//! - Base62 key tokens and the key dictionary
//! - Packed binary sequence primitives (bools, integers, floats)
//! - Error types
//! - Resource limits

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod canon;
pub mod error;
pub mod limits;
pub mod packed;
pub mod token;

// Re-export commonly used types
pub use error::{JtonError, Result};
pub use limits::Limits;
pub use token::KeyDict;
