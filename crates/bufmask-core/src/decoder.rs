use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::InvalidInput;
use crate::fields::{self, layout};
use crate::value::Value;

/// A fixed-width, stateless byte-to-value conversion.
///
/// Implementations must be deterministic: equal windows always decode to
/// equal values, and no call observes another.
pub trait FieldDecoder {
    /// Wire name used in layouts and diagnostics.
    fn name(&self) -> &str;
    /// Exact number of bytes consumed.
    fn width(&self) -> usize;
    /// Decode a window of exactly [`FieldDecoder::width`] bytes.
    fn decode(&self, bytes: &[u8]) -> Result<Value, InvalidInput>;
}

impl<D: FieldDecoder + ?Sized> FieldDecoder for &D {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn width(&self) -> usize {
        (**self).width()
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, InvalidInput> {
        (**self).decode(bytes)
    }
}

impl<D: FieldDecoder + ?Sized> FieldDecoder for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn width(&self) -> usize {
        (**self).width()
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, InvalidInput> {
        (**self).decode(bytes)
    }
}

/// Built-in field decoders.
///
/// # Examples
/// ```
/// use bufmask_core::{Field, FieldDecoder, Value};
///
/// let field: Field = "uint16".parse()?;
/// assert_eq!(field.width(), 2);
/// assert_eq!(field.decode(&[0x9d, 0x5b])?, Value::U16(23453));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "unixtime")]
    Unixtime,
    #[serde(rename = "latLng")]
    LatLng,
    #[serde(rename = "uint16")]
    Uint16,
    #[serde(rename = "uint8")]
    Uint8,
    #[serde(rename = "temp")]
    Temp,
    #[serde(rename = "humidity")]
    Humidity,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Unixtime,
        Field::LatLng,
        Field::Uint16,
        Field::Uint8,
        Field::Temp,
        Field::Humidity,
    ];

    pub const fn wire_name(self) -> &'static str {
        match self {
            Field::Unixtime => "unixtime",
            Field::LatLng => "latLng",
            Field::Uint16 => "uint16",
            Field::Uint8 => "uint8",
            Field::Temp => "temp",
            Field::Humidity => "humidity",
        }
    }

    pub const fn byte_width(self) -> usize {
        match self {
            Field::Unixtime => layout::UNIXTIME_WIDTH,
            Field::LatLng => layout::LAT_LNG_WIDTH,
            Field::Uint16 => layout::UINT16_WIDTH,
            Field::Uint8 => layout::UINT8_WIDTH,
            Field::Temp => layout::TEMP_WIDTH,
            Field::Humidity => layout::HUMIDITY_WIDTH,
        }
    }

    /// One-line description of the wire encoding.
    pub const fn encoding(self) -> &'static str {
        match self {
            Field::Unixtime => "u32 little-endian, seconds since epoch",
            Field::LatLng => "2 x i32 little-endian micro-degrees (lat, lng)",
            Field::Uint16 => "u16 little-endian",
            Field::Uint8 => "u8",
            Field::Temp => "i16 little-endian, hundredths",
            Field::Humidity => "u16 little-endian, hundredths",
        }
    }

    fn decode_fn(self) -> fn(&[u8]) -> Result<Value, InvalidInput> {
        match self {
            Field::Unixtime => fields::unixtime,
            Field::LatLng => fields::lat_lng,
            Field::Uint16 => fields::uint16,
            Field::Uint8 => fields::uint8,
            Field::Temp => fields::temp,
            Field::Humidity => fields::humidity,
        }
    }
}

impl FieldDecoder for Field {
    fn name(&self) -> &str {
        self.wire_name()
    }

    fn width(&self) -> usize {
        self.byte_width()
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, InvalidInput> {
        (self.decode_fn())(bytes)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field type '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Lifts a plain function or closure into a [`FieldDecoder`].
///
/// # Examples
/// ```
/// use bufmask_core::{FieldDecoder, FnDecoder, InvalidInput, Value};
///
/// let flags = FnDecoder::new("flags", 1, |bytes: &[u8]| {
///     Ok::<_, InvalidInput>(Value::Int(i64::from(bytes[0] & 0x0f)))
/// });
/// assert_eq!(flags.decode(&[0xf3])?, Value::Int(3));
/// assert!(flags.decode(&[0xf3, 0x00]).is_err());
/// # Ok::<(), InvalidInput>(())
/// ```
pub struct FnDecoder<F> {
    name: String,
    width: usize,
    f: F,
}

impl<F> FnDecoder<F>
where
    F: Fn(&[u8]) -> Result<Value, InvalidInput>,
{
    pub fn new(name: impl Into<String>, width: usize, f: F) -> Self {
        Self {
            name: name.into(),
            width,
            f,
        }
    }
}

impl<F> FieldDecoder for FnDecoder<F>
where
    F: Fn(&[u8]) -> Result<Value, InvalidInput>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> usize {
        self.width
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, InvalidInput> {
        fields::reader::require_width(bytes, self.width)?;
        (self.f)(bytes)
    }
}

impl<F> fmt::Debug for FnDecoder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDecoder")
            .field("name", &self.name)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

/// Total byte width of a mask, or `None` if it overflows `usize`.
pub fn mask_width<D: FieldDecoder>(mask: &[D]) -> Option<usize> {
    mask.iter()
        .try_fold(0usize, |total, decoder| total.checked_add(decoder.width()))
}

/// Decode a single optional window, failing when no bytes were supplied.
pub fn decode_field<D: FieldDecoder>(
    decoder: &D,
    bytes: Option<&[u8]>,
) -> Result<Value, InvalidInput> {
    let bytes = bytes.ok_or(InvalidInput::MissingBuffer)?;
    decoder.decode(bytes)
}

#[cfg(test)]
mod tests {
    use super::{Field, FieldDecoder, FnDecoder, decode_field, mask_width};
    use crate::error::InvalidInput;
    use crate::value::Value;

    #[test]
    fn field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.wire_name().parse::<Field>().unwrap(), field);
        }
    }

    #[test]
    fn unknown_field_name() {
        let err = "float32".parse::<Field>().unwrap_err();
        assert_eq!(err.to_string(), "unknown field type 'float32'");
    }

    #[test]
    fn field_serde_uses_wire_names() {
        let json = serde_json::to_string(&Field::LatLng).unwrap();
        assert_eq!(json, "\"latLng\"");
        let field: Field = serde_json::from_str("\"humidity\"").unwrap();
        assert_eq!(field, Field::Humidity);
    }

    #[test]
    fn widths_match_table() {
        let widths: Vec<usize> = Field::ALL.iter().map(|f| f.width()).collect();
        assert_eq!(widths, vec![4, 8, 2, 1, 2, 2]);
        assert_eq!(mask_width(&Field::ALL), Some(19));
    }

    #[test]
    fn mask_width_overflow() {
        let huge = FnDecoder::new("huge", usize::MAX, |_: &[u8]| Ok(Value::Int(0)));
        assert_eq!(mask_width(&[&huge, &huge]), None);
    }

    #[test]
    fn missing_buffer() {
        for field in Field::ALL {
            let err = decode_field(&field, None).unwrap_err();
            assert_eq!(err, InvalidInput::MissingBuffer, "{field}");
        }
        let raw = FnDecoder::new("raw", 1, |b: &[u8]| Ok(Value::Bytes(b.to_vec())));
        assert_eq!(
            decode_field(&raw, None).unwrap_err(),
            InvalidInput::MissingBuffer
        );
        assert_eq!(
            decode_field(&Field::Uint8, Some(&[7])).unwrap(),
            Value::U8(7)
        );
    }

    #[test]
    fn fn_decoder_checks_width() {
        let decoder = FnDecoder::new("pair", 2, |b: &[u8]| Ok(Value::Bytes(b.to_vec())));
        let err = decoder.decode(&[1]).unwrap_err();
        assert_eq!(
            err,
            InvalidInput::BadLength {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn boxed_decoders_mix() {
        let raw = FnDecoder::new("raw", 3, |b: &[u8]| Ok(Value::Bytes(b.to_vec())));
        let mask: Vec<Box<dyn FieldDecoder>> = vec![Box::new(Field::Uint8), Box::new(raw)];
        assert_eq!(mask_width(&mask), Some(4));
        assert_eq!(mask[1].name(), "raw");
    }
}
