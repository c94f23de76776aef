//! bufmask core library for fixed-layout binary payload decoding.
//!
//! This crate turns raw telemetry bytes into keyed records: fixed-width field
//! decoders (layout/reader/parser) each convert one byte window into a typed
//! value, and the composer walks a buffer through an ordered mask of decoders.
//! Decoding is byte-oriented and side-effect free; all I/O is isolated in
//! `source` modules.
//!
//! Invariants:
//! - Every decoder accepts exactly its declared width and nothing else.
//! - A decode call validates the whole mask against the buffer before any
//!   field is decoded, so records are never partial.
//! - Equal masks and equal bytes always yield equal records.
//!
//! # Examples
//! ```
//! use bufmask_core::{Field, decode};
//!
//! let bytes = [0x9d, 0x5b, 0xff];
//! let record = decode(&bytes, &[Field::Uint16, Field::Uint8], None::<&[&str]>)?;
//! assert_eq!(serde_json::to_string(&record)?, r#"{"0":23453,"1":255}"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::Serialize;

mod batch;
mod compose;
mod config;
mod decoder;
mod error;
pub mod fields;
mod source;
mod value;

pub use batch::{DecodeRunError, InputFormat, decode_file, decode_source};
pub use compose::{Key, Record, decode};
pub use config::{FieldSpec, Layout, LayoutError};
pub use decoder::{Field, FieldDecoder, FnDecoder, UnknownField, decode_field, mask_width};
pub use error::InvalidInput;
pub use fields::{humidity, lat_lng, temp, uint8, uint16, unixtime};
pub use source::{FileSource, HexLinesSource, Payload, PayloadSource, SourceError};
pub use value::{Centi, LatLng, Value};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no generation time is supplied.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Result of decoding every payload of one input.
///
/// # Examples
/// ```
/// use bufmask_core::make_stub_report;
///
/// let report = make_stub_report("payloads.hex", 64);
/// assert_eq!(report.report_version, bufmask_core::REPORT_VERSION);
/// assert!(report.records.is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    pub input: InputInfo,
    /// Layout in compact `name:type,...` form.
    pub layout: String,
    pub summary: DecodeSummary,
    /// Decoded records in payload order.
    pub records: Vec<RecordEntry>,
    /// Rejected payloads in payload order.
    pub rejections: Vec<Rejection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DecodeSummary {
    pub payloads_total: u64,
    pub records_total: u64,
    pub rejected_total: u64,
}

/// One successfully decoded payload.
#[derive(Debug, Clone, Serialize)]
pub struct RecordEntry {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub record: Record,
}

/// One payload that could not be decoded.
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Human-readable reason, as rendered by [`InvalidInput`].
    pub message: String,
}

/// Build a stub report with base fields filled and empty aggregates.
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "bufmask".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        layout: String::new(),
        summary: DecodeSummary::default(),
        records: vec![],
        rejections: vec![],
    }
}
