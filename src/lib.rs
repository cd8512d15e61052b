//! OpenThings - message framing codec for low-power radio telemetry
//!
//! A frame is a fixed 8-byte header, a run of length-delimited records and a
//! 3-byte footer holding an end-of-data sentinel and a CRC-16. This crate
//! builds frames in a fixed-capacity buffer and validates and walks received
//! ones. Radio transport and record payload semantics are left to the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use openthings::{MessageCodec, Record};
//!
//! let mut codec = MessageCodec::new();
//! codec.start_message(0x04, 0x02, 0x0101, 0x00_1234);
//! codec.append_record(&Record::new(0x74_u8, &b"\x00\x15"[..])?)?;
//! let frame = codec.seal_message()?.to_vec();
//!
//! let mut rx = MessageCodec::new();
//! rx.load(&frame)?;
//! rx.validate_message()?;
//! while let Some(record) = rx.next_record()? {
//!     assert_eq!(record.payload(), b"\x00\x15");
//! }
//! # Ok::<(), openthings::Error>(())
//! ```
//!
//! # Features
//!
//! - **In-place encoding** - one buffer allocation per codec, reused via `reset`
//! - **Zero-copy record views** - `next_record` borrows payloads from the buffer
//! - **CRC-16 integrity** - polynomial `0x1021`, zero initial value
//! - **`serde`** (optional) - serialize headers, records and configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;

pub use protocol::{
    CRC_START, CodecConfig, Error, FOOTER_SIZE, HEADER_SIZE, MAX_FRAME_SIZE, MIN_HEADER_LENGTH,
    Message, MessageCodec, MessageHeader, Record, RecordRef, RecordTag, Result, crc16,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
