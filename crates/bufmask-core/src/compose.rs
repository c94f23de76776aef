use std::collections::HashSet;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, trace};

use crate::decoder::FieldDecoder;
use crate::error::InvalidInput;
use crate::value::Value;

/// Record key: a mask position or a caller-supplied name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// Keyed output of one decode call, in mask order.
///
/// Serializes as a JSON object whose keys keep mask order; index keys render
/// as decimal strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(Key, Value)>,
}

impl Record {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value at mask position `index`, whatever the key kind.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, value)| value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| matches!(key, Key::Name(n) if n == name))
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn into_entries(self) -> Vec<(Key, Value)> {
        self.entries
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

/// Decode `buffer` through `mask`, keyed by `names` when given.
///
/// The buffer is partitioned into consecutive windows starting at offset 0,
/// one per decoder. All size checks happen before any decoder runs, so the
/// call either yields a complete record or fails. Bytes past the total mask
/// width are ignored.
///
/// # Examples
/// ```
/// use bufmask_core::{Field, Value, decode};
///
/// let bytes = [0x1d, 0x4b, 0x7a, 0x57, 0xff];
/// let record = decode(&bytes, &[Field::Unixtime, Field::Uint8], Some(&["time", "battery"]))?;
/// assert_eq!(record.get("time"), Some(&Value::UnixTime(1467632413)));
/// assert_eq!(record.get("battery"), Some(&Value::U8(255)));
/// # Ok::<(), bufmask_core::InvalidInput>(())
/// ```
pub fn decode<D, S>(
    buffer: &[u8],
    mask: &[D],
    names: Option<&[S]>,
) -> Result<Record, InvalidInput>
where
    D: FieldDecoder,
    S: AsRef<str>,
{
    let keys = mask_keys(mask.len(), names)?;

    // Widths are read once; the same values bound the check and the windows.
    let widths: Vec<usize> = mask.iter().map(|decoder| decoder.width()).collect();
    let needed = widths
        .iter()
        .try_fold(0usize, |total, width| total.checked_add(*width))
        .ok_or(InvalidInput::MaskLongerThanBuffer {
            needed: usize::MAX,
            actual: buffer.len(),
        })?;
    if needed > buffer.len() {
        return Err(InvalidInput::MaskLongerThanBuffer {
            needed,
            actual: buffer.len(),
        });
    }
    if needed < buffer.len() {
        debug!(
            trailing = buffer.len() - needed,
            "ignoring bytes past mask width"
        );
    }

    let mut entries = Vec::with_capacity(mask.len());
    let mut offset = 0usize;
    for ((decoder, width), key) in mask.iter().zip(widths).zip(keys) {
        let end = offset + width;
        let window = &buffer[offset..end];
        trace!(field = decoder.name(), offset, width, "decoding field");
        let value = decoder.decode(window)?;
        entries.push((key, value));
        offset = end;
    }

    Ok(Record { entries })
}

pub(crate) fn mask_keys<S: AsRef<str>>(
    mask_len: usize,
    names: Option<&[S]>,
) -> Result<Vec<Key>, InvalidInput> {
    if mask_len == 0 {
        return Err(InvalidInput::EmptyMask);
    }
    let Some(names) = names else {
        return Ok((0..mask_len).map(Key::Index).collect());
    };
    if names.len() != mask_len {
        return Err(InvalidInput::NamesMaskMismatch {
            names: names.len(),
            mask: mask_len,
        });
    }

    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(InvalidInput::DuplicateName {
                    name: name.to_string(),
                });
            }
            Ok(Key::Name(name.to_string()))
        })
        .collect()
}
