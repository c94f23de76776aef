use super::layout;
use super::reader::FieldReader;
use crate::error::InvalidInput;
use crate::value::{Centi, LatLng, Value};

/// Unsigned 32-bit little-endian seconds since the Unix epoch.
pub fn unixtime(bytes: &[u8]) -> Result<Value, InvalidInput> {
    let reader = FieldReader::new(bytes, layout::UNIXTIME_WIDTH)?;
    let secs = reader.read_u32_le(0..layout::UNIXTIME_WIDTH)?;
    Ok(Value::UnixTime(secs))
}

/// Two signed 32-bit little-endian micro-degree values, latitude first.
pub fn lat_lng(bytes: &[u8]) -> Result<Value, InvalidInput> {
    let reader = FieldReader::new(bytes, layout::LAT_LNG_WIDTH)?;
    let lat = reader.read_i32_le(layout::LAT_RANGE.clone())?;
    let lng = reader.read_i32_le(layout::LNG_RANGE.clone())?;
    Ok(Value::LatLng(LatLng::from_micro(lat, lng)))
}

pub fn uint16(bytes: &[u8]) -> Result<Value, InvalidInput> {
    let reader = FieldReader::new(bytes, layout::UINT16_WIDTH)?;
    Ok(Value::U16(reader.read_u16_le(0..layout::UINT16_WIDTH)?))
}

pub fn uint8(bytes: &[u8]) -> Result<Value, InvalidInput> {
    let reader = FieldReader::new(bytes, layout::UINT8_WIDTH)?;
    Ok(Value::U8(reader.read_u8(0)?))
}

/// Signed 16-bit two's complement little-endian hundredths of a degree.
pub fn temp(bytes: &[u8]) -> Result<Value, InvalidInput> {
    let reader = FieldReader::new(bytes, layout::TEMP_WIDTH)?;
    let raw = reader.read_i16_le(0..layout::TEMP_WIDTH)?;
    Ok(Value::Temperature(Centi::from_raw(i32::from(raw))))
}

/// Unsigned 16-bit little-endian hundredths of a percent.
pub fn humidity(bytes: &[u8]) -> Result<Value, InvalidInput> {
    let reader = FieldReader::new(bytes, layout::HUMIDITY_WIDTH)?;
    let raw = reader.read_u16_le(0..layout::HUMIDITY_WIDTH)?;
    Ok(Value::Humidity(Centi::from_raw(i32::from(raw))))
}

#[cfg(test)]
mod tests {
    use super::{humidity, lat_lng, temp, uint8, uint16, unixtime};
    use crate::error::InvalidInput;
    use crate::value::{Centi, Value};

    const UNIXTIME_BYTES: [u8; 4] = [0x1d, 0x4b, 0x7a, 0x57];
    const LAT_LNG_BYTES: [u8; 8] = [0x64, 0xa6, 0xfa, 0xfd, 0x6a, 0x24, 0x04, 0x09];

    fn bad_length(expected: usize, actual: usize) -> InvalidInput {
        InvalidInput::BadLength { expected, actual }
    }

    #[test]
    fn unixtime_decodes() {
        assert_eq!(
            unixtime(&UNIXTIME_BYTES).unwrap(),
            Value::UnixTime(1_467_632_413)
        );
    }

    #[test]
    fn unixtime_rejects_wrong_size() {
        assert_eq!(unixtime(&[0u8; 2]).unwrap_err(), bad_length(4, 2));
        assert_eq!(unixtime(&[]).unwrap_err(), bad_length(4, 0));
    }

    #[test]
    fn lat_lng_decodes() {
        let pair = lat_lng(&LAT_LNG_BYTES).unwrap().as_lat_lng().unwrap();
        assert!((pair.lat() - -33.905052).abs() < 1e-6);
        assert!((pair.lng() - 151.26641).abs() < 1e-6);
        assert_eq!(pair.to_pair(), [-33.905052, 151.26641]);
    }

    #[test]
    fn lat_lng_rejects_wrong_size() {
        assert_eq!(lat_lng(&[0u8; 9]).unwrap_err(), bad_length(8, 9));
        assert_eq!(lat_lng(&[]).unwrap_err(), bad_length(8, 0));
    }

    #[test]
    fn uint16_decodes() {
        assert_eq!(uint16(&[0x9d, 0x5b]).unwrap(), Value::U16(23453));
        assert_eq!(uint16(&[0xff, 0xff]).unwrap(), Value::U16(u16::MAX));
    }

    #[test]
    fn uint16_rejects_wrong_size() {
        assert_eq!(uint16(&[0u8; 1]).unwrap_err(), bad_length(2, 1));
    }

    #[test]
    fn uint8_decodes() {
        assert_eq!(uint8(&[0xff]).unwrap(), Value::U8(255));
        assert_eq!(uint8(&[0x00]).unwrap(), Value::U8(0));
    }

    #[test]
    fn uint8_rejects_wrong_size() {
        assert_eq!(uint8(&[0u8; 2]).unwrap_err(), bad_length(1, 2));
        assert_eq!(uint8(&[]).unwrap_err(), bad_length(1, 0));
    }

    #[test]
    fn temp_decodes_positive() {
        let value = temp(&[0x4c, 0x1f]).unwrap();
        assert_eq!(value, Value::Temperature(Centi::from_raw(8012)));
        assert_eq!(value.as_f64(), Some(80.12));
    }

    #[test]
    fn temp_decodes_negative() {
        let value = temp(&[0xc7, 0xcf]).unwrap();
        assert_eq!(value.as_f64(), Some(-123.45));
        assert_eq!(value.to_string(), "-123.45");
    }

    #[test]
    fn temp_rejects_wrong_size() {
        assert_eq!(temp(&[0u8; 1]).unwrap_err(), bad_length(2, 1));
    }

    #[test]
    fn humidity_decodes() {
        let value = humidity(&[0x0f, 0x27]).unwrap();
        assert_eq!(value.as_f64(), Some(99.99));
        assert_eq!(value.to_string(), "99.99");
    }

    #[test]
    fn humidity_is_unsigned() {
        let value = humidity(&[0xff, 0xff]).unwrap();
        assert_eq!(value.to_string(), "655.35");
    }

    #[test]
    fn humidity_rejects_wrong_size() {
        assert_eq!(humidity(&[0u8; 1]).unwrap_err(), bad_length(2, 1));
    }

    #[test]
    fn decoders_are_repeatable() {
        assert_eq!(unixtime(&UNIXTIME_BYTES), unixtime(&UNIXTIME_BYTES));
        assert_eq!(lat_lng(&LAT_LNG_BYTES), lat_lng(&LAT_LNG_BYTES));
    }
}
