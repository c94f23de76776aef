//! Fixed-width field decoding.
//!
//! Each decoder follows a layered structure:
//! - `layout`: widths, byte ranges and scale constants (source of truth)
//! - `reader`: exact-width checks and little-endian access
//! - `parser`: domain-level decoding (no direct byte indexing)
//!
//! Decoders are pure: they accept exactly one window, never retain it, and
//! either return one value or fail with [`crate::InvalidInput`].

pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{humidity, lat_lng, temp, uint8, uint16, unixtime};
