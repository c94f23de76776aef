use bufmask_core::{
    Field, FieldDecoder, InvalidInput, Key, Value, decode, humidity, lat_lng, temp, uint8, uint16,
    unixtime,
};

const UNIXTIME_BYTES: [u8; 4] = [0x1d, 0x4b, 0x7a, 0x57];
const LAT_LNG_BYTES: [u8; 8] = [0x64, 0xa6, 0xfa, 0xfd, 0x6a, 0x24, 0x04, 0x09];
const UINT16_BYTES: [u8; 2] = [0x9d, 0x5b];
const TEMP_BYTES: [u8; 2] = [0x4c, 0x1f];
const UINT8_BYTES: [u8; 1] = [0xff];
const HUMIDITY_BYTES: [u8; 2] = [0x0f, 0x27];

type DecodeFn = fn(&[u8]) -> Result<Value, InvalidInput>;

#[test]
fn every_decoder_rejects_every_other_width() {
    let decoders: [(DecodeFn, usize); 6] = [
        (unixtime as DecodeFn, 4),
        (lat_lng as DecodeFn, 8),
        (uint16 as DecodeFn, 2),
        (uint8 as DecodeFn, 1),
        (temp as DecodeFn, 2),
        (humidity as DecodeFn, 2),
    ];
    let buffer = [0u8; 16];
    for (decoder, width) in decoders {
        for len in 0..buffer.len() {
            let result = decoder(&buffer[..len]);
            if len == width {
                assert!(result.is_ok(), "width {width} should decode");
            } else {
                assert_eq!(
                    result.unwrap_err(),
                    InvalidInput::BadLength {
                        expected: width,
                        actual: len
                    }
                );
            }
        }
    }
}

#[test]
fn composes_reference_telemetry() {
    let buffer = [
        &LAT_LNG_BYTES[..],
        &UNIXTIME_BYTES,
        &UINT16_BYTES,
        &TEMP_BYTES,
        &UINT8_BYTES,
        &HUMIDITY_BYTES,
    ]
    .concat();
    let mask = [
        Field::LatLng,
        Field::Unixtime,
        Field::Uint16,
        Field::Temp,
        Field::Uint8,
        Field::Humidity,
    ];

    let record = decode(&buffer, &mask, None::<&[&str]>).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "0": [-33.905052, 151.26641],
            "1": 1467632413,
            "2": 23453,
            "3": 80.12,
            "4": 255,
            "5": 99.99
        })
    );

    for (position, field) in mask.iter().enumerate() {
        let start: usize = mask[..position].iter().map(|f| f.width()).sum();
        let window = &buffer[start..start + field.width()];
        let expected = field.decode(window).unwrap();
        assert_eq!(record.get_index(position), Some(&expected));
    }
}

#[test]
fn mask_longer_than_buffer_fails() {
    let err = decode(&[0u8; 7], &[Field::LatLng], None::<&[&str]>).unwrap_err();
    assert!(err.to_string().contains("mask longer than buffer"));
}

#[test]
fn named_record() {
    let record = decode(&UNIXTIME_BYTES, &[Field::Unixtime], Some(&["time"])).unwrap();
    let keys: Vec<&Key> = record.keys().collect();
    assert_eq!(keys, vec![&Key::Name("time".to_string())]);
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        serde_json::json!({ "time": 1467632413 })
    );
}

#[test]
fn repeated_calls_agree() {
    let mask = [Field::Uint16, Field::Uint8];
    let buffer = [0x9d, 0x5b, 0xff, 0x00];
    let first = decode(&buffer, &mask, Some(&["count", "battery"])).unwrap();
    let second = decode(&buffer, &mask, Some(&["count", "battery"])).unwrap();
    assert_eq!(first, second);
}

#[test]
fn concurrent_decodes_share_nothing() {
    let handles: Vec<_> = (0u8..8)
        .map(|n| {
            std::thread::spawn(move || {
                let buffer = [n, 0x00, n];
                decode(&buffer, &[Field::Uint16, Field::Uint8], None::<&[&str]>).unwrap()
            })
        })
        .collect();
    for (n, handle) in handles.into_iter().enumerate() {
        let record = handle.join().unwrap();
        assert_eq!(record.get_index(0), Some(&Value::U16(n as u16)));
        assert_eq!(record.get_index(1), Some(&Value::U8(n as u8)));
    }
}
