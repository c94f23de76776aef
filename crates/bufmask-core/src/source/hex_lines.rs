use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use super::{Payload, PayloadSource, SourceError};

const COMMENT_PREFIX: char = '#';

/// Text input with one hex-encoded payload per line.
///
/// Blank lines and lines starting with `#` are skipped; whitespace inside a
/// line is ignored, so `1d 4b 7a 57` and `1d4b7a57` are the same payload.
pub struct HexLinesSource<R = BufReader<File>> {
    lines: Lines<R>,
    line_no: usize,
    index: usize,
}

impl HexLinesSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        Ok(Self::from_reader(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> HexLinesSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            index: 0,
        }
    }
}

impl<R: BufRead> PayloadSource for HexLinesSource<R> {
    fn next_payload(&mut self) -> Result<Option<Payload>, SourceError> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
                continue;
            }

            let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = hex::decode(&compact).map_err(|err| SourceError::Hex {
                line: self.line_no,
                message: err.to_string(),
            })?;

            let payload = Payload {
                index: self.index,
                line: Some(self.line_no),
                bytes,
            };
            self.index += 1;
            return Ok(Some(payload));
        }
        Ok(None)
    }
}
