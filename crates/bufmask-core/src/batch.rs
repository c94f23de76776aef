use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Layout;
use crate::source::{FileSource, HexLinesSource, Payload, PayloadSource, SourceError};
use crate::{DecodeSummary, RecordEntry, Rejection, Report, make_stub_report};

#[derive(Debug, Error)]
pub enum DecodeRunError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// How an input file carries its payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// The whole file is one binary payload.
    Binary,
    /// One hex-encoded payload per line.
    HexLines,
}

impl InputFormat {
    /// Guess from the file extension: `.hex` and `.txt` are hex lines.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "hex" | "txt" => InputFormat::HexLines,
            _ => InputFormat::Binary,
        }
    }
}

pub fn decode_file(
    path: &Path,
    format: InputFormat,
    layout: &Layout,
) -> Result<Report, DecodeRunError> {
    match format {
        InputFormat::Binary => decode_source(path, FileSource::open(path)?, layout),
        InputFormat::HexLines => decode_source(path, HexLinesSource::open(path)?, layout),
    }
}

/// Decode every payload of `source` with `layout`.
///
/// A payload that fails to decode becomes a [`Rejection`] and contributes no
/// record. Source errors abort the run.
pub fn decode_source<S: PayloadSource>(
    path: &Path,
    mut source: S,
    layout: &Layout,
) -> Result<Report, DecodeRunError> {
    let mut records = Vec::new();
    let mut rejections = Vec::new();
    let mut payloads_total = 0u64;

    while let Some(Payload { index, line, bytes }) = source.next_payload()? {
        payloads_total += 1;
        match layout.decode(&bytes) {
            Ok(record) => records.push(RecordEntry {
                index,
                line,
                record,
            }),
            Err(err) => {
                warn!(index, ?line, error = %err, "payload rejected");
                rejections.push(Rejection {
                    index,
                    line,
                    message: err.to_string(),
                });
            }
        }
    }

    debug!(
        payloads_total,
        records = records.len(),
        rejected = rejections.len(),
        "decode run finished"
    );

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.layout = layout.to_string();
    report.summary = DecodeSummary {
        payloads_total,
        records_total: records.len() as u64,
        rejected_total: rejections.len() as u64,
    };
    report.records = records;
    report.rejections = rejections;
    Ok(report)
}
