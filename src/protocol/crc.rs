//! CRC-16 used by the OpenThings footer.
//!
//! Polynomial `0x1021`, initial register `0`, no input or output reflection
//! and no final XOR. This parameter set is catalogued as CRC-16/XMODEM; it is
//! not CRC-16/CCITT-FALSE, which starts from `0xFFFF`.

const POLYNOMIAL: u16 = 0x1021;

/// Compute the checksum of `bytes`.
#[must_use]
pub fn crc16(bytes: &[u8]) -> u16 {
    let mut rem: u16 = 0;
    for &byte in bytes {
        rem ^= u16::from(byte) << 8;
        for _ in 0..8 {
            rem = if rem & 0x8000 != 0 {
                (rem << 1) ^ POLYNOMIAL
            } else {
                rem << 1
            };
        }
    }
    rem
}
