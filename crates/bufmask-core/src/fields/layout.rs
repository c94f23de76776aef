pub const UNIXTIME_WIDTH: usize = 4;
pub const LAT_LNG_WIDTH: usize = 8;
pub const UINT16_WIDTH: usize = 2;
pub const UINT8_WIDTH: usize = 1;
pub const TEMP_WIDTH: usize = 2;
pub const HUMIDITY_WIDTH: usize = 2;

pub const LAT_RANGE: std::ops::Range<usize> = 0..4;
pub const LNG_RANGE: std::ops::Range<usize> = 4..8;

/// Raw units per degree for coordinates.
pub const MICRODEGREES_PER_DEGREE: f64 = 1_000_000.0;
/// Raw units per whole unit for fixed-point temperature and humidity.
pub const CENTI_SCALE: i32 = 100;
