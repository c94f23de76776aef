use std::fmt;

use serde::{Serialize, Serializer};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::fields::layout;

/// Fixed-point decimal with exactly two fraction digits.
///
/// The raw integer counts hundredths, so values that are exact multiples of
/// 0.01 never drift.
///
/// # Examples
/// ```
/// use bufmask_core::Centi;
///
/// let value = Centi::from_raw(-12345);
/// assert_eq!(value.to_string(), "-123.45");
/// assert_eq!(value.to_f64(), -123.45);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Centi(i32);

impl Centi {
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Nearest `f64` to the exact decimal value.
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / f64::from(layout::CENTI_SCALE)
    }
}

impl fmt::Display for Centi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = layout::CENTI_SCALE.unsigned_abs();
        let abs = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{}.{:02}", abs / scale, abs % scale)
    }
}

impl Serialize for Centi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

/// Coordinate pair stored as signed micro-degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LatLng {
    lat_micro: i32,
    lng_micro: i32,
}

impl LatLng {
    pub const fn from_micro(lat_micro: i32, lng_micro: i32) -> Self {
        Self {
            lat_micro,
            lng_micro,
        }
    }

    pub fn lat(&self) -> f64 {
        f64::from(self.lat_micro) / layout::MICRODEGREES_PER_DEGREE
    }

    pub fn lng(&self) -> f64 {
        f64::from(self.lng_micro) / layout::MICRODEGREES_PER_DEGREE
    }

    pub fn lat_micro(&self) -> i32 {
        self.lat_micro
    }

    pub fn lng_micro(&self) -> i32 {
        self.lng_micro
    }

    /// Ordered `[lat, lng]` pair in degrees.
    pub fn to_pair(&self) -> [f64; 2] {
        [self.lat(), self.lng()]
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lat(), self.lng())
    }
}

impl Serialize for LatLng {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_pair().serialize(serializer)
    }
}

/// A single decoded field value.
///
/// The first six variants are produced by the built-in decoders; the rest are
/// available to caller-defined decoders.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Seconds since the Unix epoch.
    UnixTime(u32),
    LatLng(LatLng),
    U16(u16),
    U8(u8),
    /// Degrees, two fraction digits.
    Temperature(Centi),
    /// Relative humidity, two fraction digits.
    Humidity(Centi),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
}

impl Value {
    /// Integer view of integral values.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::UnixTime(v) => Some(i64::from(*v)),
            Value::U16(v) => Some(i64::from(*v)),
            Value::U8(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of scalar values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Temperature(c) | Value::Humidity(c) => Some(c.to_f64()),
            Value::Float(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_lat_lng(&self) -> Option<LatLng> {
        match self {
            Value::LatLng(pair) => Some(*pair),
            _ => None,
        }
    }

    /// RFC 3339 rendering of a Unix timestamp value.
    pub fn to_rfc3339(&self) -> Option<String> {
        match self {
            Value::UnixTime(secs) => unix_to_rfc3339(i64::from(*secs)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::UnixTime(secs) => match self.to_rfc3339() {
                Some(ts) => write!(f, "{secs} ({ts})"),
                None => write!(f, "{secs}"),
            },
            Value::LatLng(pair) => fmt::Display::fmt(pair, f),
            Value::U16(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::Temperature(c) | Value::Humidity(c) => fmt::Display::fmt(c, f),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bytes(bytes) => f.write_str(&hex::encode(bytes)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::UnixTime(v) => serializer.serialize_u32(*v),
            Value::LatLng(pair) => pair.serialize(serializer),
            Value::U16(v) => serializer.serialize_u16(*v),
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::Temperature(c) | Value::Humidity(c) => c.serialize(serializer),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Bytes(bytes) => serializer.serialize_str(&hex::encode(bytes)),
        }
    }
}

pub(crate) fn unix_to_rfc3339(secs: i64) -> Option<String> {
    OffsetDateTime::from_unix_timestamp(secs)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
