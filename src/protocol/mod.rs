//! OpenThings framing core
//!
//! This module provides the wire layout, the CRC and the buffer codec.

mod codec;
mod crc;
mod error;
mod header;
mod message;
mod record;
mod types;

pub use codec::{CodecConfig, MIN_CAPACITY, MessageCodec, decode, encode};
pub use crc::crc16;
pub use error::{Error, Result};
pub use header::{Footer, MessageHeader, SENSOR_ID_MAX};
pub use message::Message;
pub use record::{
    DESCRIPTION_SIZE, MAX_RECORD_PAYLOAD, MAX_RECORD_SIZE, Record, RecordDescription, RecordRef,
    Records,
};
pub use types::RecordTag;

/// Offset where checksum coverage begins (inside the header)
pub const CRC_START: usize = 5;

/// Header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Smallest header length: the footer starts right after the header
pub const MIN_HEADER_LENGTH: u8 = 3;

/// Footer size in bytes: end-of-data sentinel plus CRC-16
pub const FOOTER_SIZE: usize = 3;

/// Largest frame the one-byte header length can describe
pub const MAX_FRAME_SIZE: usize = CRC_START + u8::MAX as usize + FOOTER_SIZE;
