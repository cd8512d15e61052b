//! OpenThings message header and footer
//!
//! Both regions are fixed-size and are read and written through explicit byte
//! offsets, never by reinterpreting the buffer as a struct.

use super::{CRC_START, Error, FOOTER_SIZE, HEADER_SIZE, Result};

const MANUFACTURER_OFFSET: usize = 0;
const PRODUCT_OFFSET: usize = 1;
const PIP_OFFSET: usize = 2;
const SENSOR_ID_OFFSET: usize = 4;
const HEADER_LENGTH_OFFSET: usize = 7;

/// Largest value the three-byte sensor id can carry
pub const SENSOR_ID_MAX: u32 = 0x00FF_FFFF;

/// OpenThings message header (8 bytes)
///
/// # Wire Format
///
/// ```text
/// 0        1        2        3        4        5        6        7
/// +--------+--------+--------+--------+--------+--------+--------+--------+
/// | manu   | prod   |   pip (LE)      |     sensor id (LE, 24)   | hdr len|
/// +--------+--------+--------+--------+--------+--------+--------+--------+
///                                              ^ CRC coverage starts (5)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageHeader {
    manufacturer_id: u8,
    product_id: u8,
    pip: u16,
    sensor_id: u32,
    header_length: u8,
}

impl MessageHeader {
    /// Create a header for a message that has not been sealed yet.
    ///
    /// Only the low 24 bits of `sensor_id` are kept.
    #[must_use]
    pub const fn new(manufacturer_id: u8, product_id: u8, pip: u16, sensor_id: u32) -> Self {
        Self {
            manufacturer_id,
            product_id,
            pip,
            sensor_id: sensor_id & SENSOR_ID_MAX,
            header_length: 0,
        }
    }

    /// Get manufacturer ID
    #[must_use]
    pub const fn manufacturer_id(&self) -> u8 {
        self.manufacturer_id
    }

    /// Get product ID
    #[must_use]
    pub const fn product_id(&self) -> u8 {
        self.product_id
    }

    /// Get product instance parameter
    #[must_use]
    pub const fn pip(&self) -> u16 {
        self.pip
    }

    /// Get sensor ID (24 bits)
    #[must_use]
    pub const fn sensor_id(&self) -> u32 {
        self.sensor_id
    }

    /// Number of checksum-covered bytes before the footer
    #[must_use]
    pub const fn header_length(&self) -> u8 {
        self.header_length
    }

    /// Offset of the footer implied by [`Self::header_length`]
    #[must_use]
    pub const fn footer_offset(&self) -> usize {
        CRC_START + self.header_length as usize
    }

    /// Convert to bytes (little-endian)
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        self.write_to(&mut bytes);
        bytes
    }

    /// Write the header into the first [`HEADER_SIZE`] bytes of `buf`.
    ///
    /// Caller must ensure `buf` is at least [`HEADER_SIZE`] bytes.
    pub(crate) fn write_to(&self, buf: &mut [u8]) {
        let sensor = self.sensor_id.to_le_bytes();

        buf[MANUFACTURER_OFFSET] = self.manufacturer_id;
        buf[PRODUCT_OFFSET] = self.product_id;
        buf[PIP_OFFSET..PIP_OFFSET + 2].copy_from_slice(&self.pip.to_le_bytes());
        buf[SENSOR_ID_OFFSET..SENSOR_ID_OFFSET + 3].copy_from_slice(&sensor[..3]);
        buf[HEADER_LENGTH_OFFSET] = self.header_length;
    }

    /// Patch the header length byte of an encoded header.
    pub(crate) fn write_header_length(buf: &mut [u8], header_length: u8) {
        buf[HEADER_LENGTH_OFFSET] = header_length;
    }

    /// Parse from bytes (little-endian)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::Truncated {
                needed: HEADER_SIZE,
                got: bytes.len(),
            });
        }

        Ok(Self {
            manufacturer_id: bytes[MANUFACTURER_OFFSET],
            product_id: bytes[PRODUCT_OFFSET],
            pip: u16::from_le_bytes([bytes[PIP_OFFSET], bytes[PIP_OFFSET + 1]]),
            sensor_id: u32::from_le_bytes([
                bytes[SENSOR_ID_OFFSET],
                bytes[SENSOR_ID_OFFSET + 1],
                bytes[SENSOR_ID_OFFSET + 2],
                0,
            ]),
            header_length: bytes[HEADER_LENGTH_OFFSET],
        })
    }
}

/// OpenThings message footer (3 bytes): end-of-data sentinel then CRC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    eod: u8,
    crc: u16,
}

impl Footer {
    /// Footer for a well-formed message carrying `crc`
    #[must_use]
    pub const fn new(crc: u16) -> Self {
        Self { eod: 0, crc }
    }

    /// End-of-data sentinel
    #[must_use]
    pub const fn eod(&self) -> u8 {
        self.eod
    }

    /// Stored checksum
    #[must_use]
    pub const fn crc(&self) -> u16 {
        self.crc
    }

    /// Convert to bytes
    #[must_use]
    pub fn to_bytes(&self) -> [u8; FOOTER_SIZE] {
        let crc = self.crc.to_le_bytes();
        [self.eod, crc[0], crc[1]]
    }

    /// Parse from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FOOTER_SIZE {
            return Err(Error::Truncated {
                needed: FOOTER_SIZE,
                got: bytes.len(),
            });
        }

        Ok(Self {
            eod: bytes[0],
            crc: u16::from_le_bytes([bytes[1], bytes[2]]),
        })
    }
}
