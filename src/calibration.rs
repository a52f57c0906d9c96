use byteorder::{ByteOrder, LittleEndian};

/// Factory pressure coefficients `dig_P1` to `dig_P9` of a BMP280.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

/// Error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// Fewer than [`Calibration::BYTES`] bytes, carries the actual length
    TooShort(usize),
}

impl Calibration {
    /// Length of the packed coefficient block
    pub const BYTES: usize = 18;

    /// Unpacks nine little endian fields at offsets 0, 2, ..., 16. The first
    /// one is unsigned, the rest are signed.
    pub fn from_bytes(bytes: &[u8; Self::BYTES]) -> Self {
        Calibration {
            dig_p1: LittleEndian::read_u16(&bytes[0..2]),
            dig_p2: LittleEndian::read_i16(&bytes[2..4]),
            dig_p3: LittleEndian::read_i16(&bytes[4..6]),
            dig_p4: LittleEndian::read_i16(&bytes[6..8]),
            dig_p5: LittleEndian::read_i16(&bytes[8..10]),
            dig_p6: LittleEndian::read_i16(&bytes[10..12]),
            dig_p7: LittleEndian::read_i16(&bytes[12..14]),
            dig_p8: LittleEndian::read_i16(&bytes[14..16]),
            dig_p9: LittleEndian::read_i16(&bytes[16..18]),
        }
    }
}

/// Uses the first [`Calibration::BYTES`] bytes, anything after them is ignored.
impl TryFrom<&[u8]> for Calibration {
    type Error = CalibrationError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        bytes
            .get(..Self::BYTES)
            .and_then(|head| <&[u8; Self::BYTES]>::try_from(head).ok())
            .map(Self::from_bytes)
            .ok_or(CalibrationError::TooShort(bytes.len()))
    }
}
