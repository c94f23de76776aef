//! Payload sources.
//!
//! Sources isolate all file I/O from decoding: they hand out owned byte
//! buffers and never interpret them.

mod file;
mod hex_lines;

pub use file::FileSource;
pub use hex_lines::HexLinesSource;

use thiserror::Error;

/// One buffer handed to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Zero-based position within the source.
    pub index: usize,
    /// One-based line number for line-oriented sources.
    pub line: Option<usize>,
    pub bytes: Vec<u8>,
}

pub trait PayloadSource {
    fn next_payload(&mut self) -> Result<Option<Payload>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("hex decode error on line {line}: {message}")]
    Hex { line: usize, message: String },
}
