use crate::error::InvalidInput;

/// Width-checked little-endian access to a single field window.
///
/// Construction fails unless the window is exactly `width` bytes, so every
/// read afterwards stays in bounds of a window the decoder agreed to.
pub struct FieldReader<'a> {
    window: &'a [u8],
}

impl<'a> FieldReader<'a> {
    pub fn new(window: &'a [u8], width: usize) -> Result<Self, InvalidInput> {
        require_width(window, width)?;
        Ok(Self { window })
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, InvalidInput> {
        self.window
            .get(offset)
            .copied()
            .ok_or(InvalidInput::BadLength {
                expected: offset + 1,
                actual: self.window.len(),
            })
    }

    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, InvalidInput> {
        Ok(u16::from_le_bytes(self.read_array(range)?))
    }

    pub fn read_i16_le(&self, range: std::ops::Range<usize>) -> Result<i16, InvalidInput> {
        Ok(i16::from_le_bytes(self.read_array(range)?))
    }

    pub fn read_u32_le(&self, range: std::ops::Range<usize>) -> Result<u32, InvalidInput> {
        Ok(u32::from_le_bytes(self.read_array(range)?))
    }

    pub fn read_i32_le(&self, range: std::ops::Range<usize>) -> Result<i32, InvalidInput> {
        Ok(i32::from_le_bytes(self.read_array(range)?))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], InvalidInput> {
        self.window
            .get(range.clone())
            .ok_or(InvalidInput::BadLength {
                expected: range.end,
                actual: self.window.len(),
            })
    }

    fn read_array<const N: usize>(
        &self,
        range: std::ops::Range<usize>,
    ) -> Result<[u8; N], InvalidInput> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| InvalidInput::BadLength {
            expected: N,
            actual: bytes.len(),
        })
    }
}

/// Fail unless `window` is exactly `width` bytes long.
pub fn require_width(window: &[u8], width: usize) -> Result<(), InvalidInput> {
    if window.len() != width {
        return Err(InvalidInput::BadLength {
            expected: width,
            actual: window.len(),
        });
    }
    Ok(())
}
