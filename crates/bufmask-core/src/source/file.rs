use std::fs;
use std::path::Path;

use super::{Payload, PayloadSource, SourceError};

/// A whole file read as a single binary payload.
pub struct FileSource {
    bytes: Option<Vec<u8>>,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes: Some(bytes) }
    }
}

impl PayloadSource for FileSource {
    fn next_payload(&mut self) -> Result<Option<Payload>, SourceError> {
        Ok(self.bytes.take().map(|bytes| Payload {
            index: 0,
            line: None,
            bytes,
        }))
    }
}
