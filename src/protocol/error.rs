//! OpenThings codec error types

use thiserror::Error;

/// OpenThings framing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Write would run past the end of the codec buffer
    #[error("buffer capacity exceeded: need {needed} bytes, capacity is {capacity}")]
    BoundsExceeded {
        /// Offset one past the last byte the write would touch
        needed: usize,
        /// Buffer capacity
        capacity: usize,
    },

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:#06x}, got {found:#06x}")]
    ChecksumMismatch {
        /// Checksum computed over the received bytes
        expected: u16,
        /// Checksum stored in the footer
        found: u16,
    },

    /// End-of-data sentinel is not zero
    #[error("malformed end-of-data sentinel: {found:#04x}")]
    MalformedSentinel {
        /// Sentinel byte found in the footer
        found: u8,
    },

    /// Header length points outside the populated frame
    #[error("truncated frame: need {needed} bytes, got {got}")]
    Truncated {
        /// Bytes required by the header length field
        needed: usize,
        /// Bytes actually populated
        got: usize,
    },

    /// Header length places the footer inside the header
    #[error("invalid header length {found}: must be at least {min}")]
    InvalidHeaderLength {
        /// Header length byte found
        found: u8,
        /// Smallest header length that clears the header
        min: u8,
    },

    /// Record description does not tile the record region
    #[error("malformed record at offset {offset}: length {length}")]
    MalformedRecord {
        /// Buffer offset of the record description
        offset: usize,
        /// Declared record length
        length: u8,
    },

    /// Record payload does not fit the one-byte length field
    #[error("record too large: {size} payload bytes (max {max})")]
    RecordTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Encode operation issued before `start_message`
    #[error("no message in progress")]
    MessageNotStarted,

    /// Record read issued without a successful validation
    #[error("message has not been validated")]
    NotValidated,

    /// Configured capacity cannot hold a frame
    #[error("invalid capacity {capacity}: must be between {min} and {max}")]
    InvalidCapacity {
        /// Requested capacity
        capacity: usize,
        /// Smallest usable capacity
        min: usize,
        /// Largest addressable frame
        max: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
