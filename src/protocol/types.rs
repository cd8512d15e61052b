//! Record tag byte

use std::fmt;

/// Opaque type/flags byte carried by every record description.
///
/// The codec never interprets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordTag(u8);

impl RecordTag {
    /// Create from byte
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        Self(value)
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl From<u8> for RecordTag {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_byte_roundtrip() {
        let tag = RecordTag::from(0xA5);
        assert_eq!(tag.as_u8(), 0xA5);
        assert_eq!(tag.to_string(), "0xa5");
    }
}
