//! OpenThings message codec
//!
//! [`MessageCodec`] owns one fixed-capacity frame buffer and a cursor. The
//! encode side builds a frame in place (`start_message`, `append_record`,
//! `seal_message`); the decode side checks a received frame
//! (`validate_message`) and walks its records (`next_record`).
//!
//! ```text
//! [HEADER (8 bytes)] [RECORD]* [EOD (1)] [CRC-16 (2)]
//!       ^ CRC coverage starts at offset 5 and ends before EOD
//! ```

use tracing::{debug, trace};

use super::record::read_record;
use super::{
    CRC_START, Error, FOOTER_SIZE, Footer, HEADER_SIZE, MAX_FRAME_SIZE, MIN_HEADER_LENGTH, Message,
    MessageHeader, Record, RecordRef, Records, Result, crc16,
};

/// Smallest buffer that can hold an empty frame
pub const MIN_CAPACITY: usize = HEADER_SIZE + FOOTER_SIZE;

/// Codec buffer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Buffer capacity in bytes
    pub capacity: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_FRAME_SIZE,
        }
    }
}

impl CodecConfig {
    /// Default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buffer capacity
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Check the capacity fits an empty frame and stays addressable by the
    /// one-byte header length.
    pub fn validate(&self) -> Result<()> {
        if self.capacity < MIN_CAPACITY || self.capacity > MAX_FRAME_SIZE {
            return Err(Error::InvalidCapacity {
                capacity: self.capacity,
                min: MIN_CAPACITY,
                max: MAX_FRAME_SIZE,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Building,
    Sealed,
    Validated { footer_offset: usize },
}

/// Frame buffer plus cursor for one in-flight message
///
/// The buffer is allocated once and reused across messages via
/// [`MessageCodec::reset`] or a new [`MessageCodec::start_message`].
#[derive(Debug, Clone)]
pub struct MessageCodec {
    buf: Box<[u8]>,
    /// End of message: write position while encoding, read position while decoding.
    eom: usize,
    /// Bytes holding frame data, written or loaded.
    filled: usize,
    state: State,
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCodec {
    /// Create a codec with the default (largest) frame capacity
    #[must_use]
    pub fn new() -> Self {
        Self::allocate(MAX_FRAME_SIZE)
    }

    /// Create a codec from a configuration
    pub fn with_config(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::allocate(config.capacity))
    }

    fn allocate(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            eom: CRC_START,
            filled: 0,
            state: State::Idle,
        }
    }

    /// Buffer capacity in bytes
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Current cursor offset
    #[must_use]
    pub const fn position(&self) -> usize {
        self.eom
    }

    /// Bytes left between the cursor and the end of the buffer
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.eom)
    }

    /// Populated bytes: the frame built so far, the sealed frame, or the
    /// loaded frame.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    /// Parse the header currently in the buffer
    pub fn header(&self) -> Result<MessageHeader> {
        MessageHeader::from_bytes(self.as_bytes())
    }

    /// Begin a new message: write the header at offset 0 and place the
    /// cursor at the first record.
    pub fn start_message(&mut self, manufacturer_id: u8, product_id: u8, pip: u16, sensor_id: u32) {
        self.eom = 0;

        let header = MessageHeader::new(manufacturer_id, product_id, pip, sensor_id);
        header.write_to(&mut self.buf[..HEADER_SIZE]);

        self.eom += HEADER_SIZE;
        self.filled = self.eom;
        self.state = State::Building;
    }

    /// Append one record at the cursor.
    ///
    /// # Errors
    ///
    /// - [`Error::MessageNotStarted`] outside `start_message`/`seal_message`
    /// - [`Error::BoundsExceeded`] if the record would run past the buffer;
    ///   the buffer and cursor are left unchanged
    pub fn append_record(&mut self, record: &Record) -> Result<()> {
        if self.state != State::Building {
            return Err(Error::MessageNotStarted);
        }

        let len = record.encoded_len();
        let needed = self.eom + len;
        if needed > self.capacity() {
            return Err(Error::BoundsExceeded {
                needed,
                capacity: self.capacity(),
            });
        }

        record.write_to(&mut self.buf[self.eom..needed]);
        trace!(offset = self.eom, len, tag = %record.tag(), "appended record");

        self.eom = needed;
        self.filled = self.eom;
        Ok(())
    }

    /// Write the footer and header length, returning the finished frame.
    ///
    /// # Errors
    ///
    /// - [`Error::MessageNotStarted`] if no message is being built
    /// - [`Error::BoundsExceeded`] if the footer does not fit
    pub fn seal_message(&mut self) -> Result<&[u8]> {
        if self.state != State::Building {
            return Err(Error::MessageNotStarted);
        }

        let footer_offset = self.eom;
        let needed = footer_offset + FOOTER_SIZE;
        let bounds = Error::BoundsExceeded {
            needed,
            capacity: self.capacity(),
        };
        if needed > self.capacity() {
            return Err(bounds);
        }
        let header_length = u8::try_from(footer_offset - CRC_START).map_err(|_| bounds)?;

        // The length byte sits inside checksum coverage; write it first.
        MessageHeader::write_header_length(&mut self.buf, header_length);
        let crc = crc16(&self.buf[CRC_START..footer_offset]);
        self.buf[footer_offset..needed].copy_from_slice(&Footer::new(crc).to_bytes());

        self.eom = needed;
        self.filled = self.eom;
        self.state = State::Sealed;
        debug!(len = self.eom, header_length, crc, "sealed message");

        Ok(self.as_bytes())
    }

    /// Copy a received frame into the buffer for validation.
    ///
    /// The cursor is rewound as by [`Self::reset`]; bytes past `frame` keep
    /// their previous contents but are not treated as populated.
    pub fn load(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() > self.capacity() {
            return Err(Error::BoundsExceeded {
                needed: frame.len(),
                capacity: self.capacity(),
            });
        }

        self.buf[..frame.len()].copy_from_slice(frame);
        self.filled = frame.len();
        self.reset();
        Ok(())
    }

    /// Check the frame in the buffer and prepare record iteration.
    ///
    /// On success the cursor sits at the first record and the parsed header
    /// is returned. On failure the whole frame must be dropped and
    /// [`Self::next_record`] refuses to iterate.
    ///
    /// # Errors
    ///
    /// - [`Error::Truncated`] / [`Error::InvalidHeaderLength`] if the header
    ///   length does not locate a footer inside the populated bytes
    /// - [`Error::ChecksumMismatch`] if the CRC disagrees
    /// - [`Error::MalformedSentinel`] if the end-of-data byte is not zero
    /// - [`Error::MalformedRecord`] if the records do not tile the region
    ///   between header and footer
    ///
    /// A corrupted header length byte moves the footer as well as breaking
    /// the checksum, so it may surface as `Truncated`, `InvalidHeaderLength`
    /// or `MalformedRecord` rather than `ChecksumMismatch`. The frame is
    /// rejected either way.
    pub fn validate_message(&mut self) -> Result<MessageHeader> {
        self.state = State::Idle;

        match self.check_frame() {
            Ok(header) => {
                let footer_offset = header.footer_offset();
                self.eom = HEADER_SIZE;
                self.state = State::Validated { footer_offset };
                trace!(footer_offset, "validated message");
                Ok(header)
            }
            Err(err) => {
                debug!(error = %err, len = self.filled, "rejecting message");
                Err(err)
            }
        }
    }

    fn check_frame(&self) -> Result<MessageHeader> {
        let frame = self.as_bytes();
        let header = MessageHeader::from_bytes(frame)?;

        if header.header_length() < MIN_HEADER_LENGTH {
            return Err(Error::InvalidHeaderLength {
                found: header.header_length(),
                min: MIN_HEADER_LENGTH,
            });
        }

        let footer_offset = header.footer_offset();
        let frame_end = footer_offset + FOOTER_SIZE;
        if frame_end > frame.len() {
            return Err(Error::Truncated {
                needed: frame_end,
                got: frame.len(),
            });
        }

        let footer = Footer::from_bytes(&frame[footer_offset..frame_end])?;
        let expected = crc16(&frame[CRC_START..footer_offset]);
        if footer.crc() != expected {
            return Err(Error::ChecksumMismatch {
                expected,
                found: footer.crc(),
            });
        }
        if footer.eod() != 0 {
            return Err(Error::MalformedSentinel { found: footer.eod() });
        }

        for record in Records::new(frame, HEADER_SIZE, footer_offset) {
            record?;
        }

        Ok(header)
    }

    /// Read the record at the cursor and advance past it.
    ///
    /// Returns `Ok(None)` once the cursor reaches the footer. The view
    /// borrows the codec, so it cannot outlive the next call.
    ///
    /// # Errors
    ///
    /// [`Error::NotValidated`] unless the last `validate_message` succeeded.
    pub fn next_record(&mut self) -> Result<Option<RecordRef<'_>>> {
        let State::Validated { footer_offset } = self.state else {
            return Err(Error::NotValidated);
        };
        if self.eom >= footer_offset {
            return Ok(None);
        }

        let record = read_record(&self.buf, self.eom, footer_offset)?;
        trace!(offset = self.eom, tag = %record.tag(), "read record");
        self.eom += usize::from(record.description().length());
        Ok(Some(record))
    }

    /// Iterate every record of the validated frame, independent of the cursor.
    pub fn records(&self) -> Result<Records<'_>> {
        let State::Validated { footer_offset } = self.state else {
            return Err(Error::NotValidated);
        };
        Ok(Records::new(&self.buf, HEADER_SIZE, footer_offset))
    }

    /// Rewind the cursor to `CRC_START` without clearing the buffer.
    pub fn reset(&mut self) {
        self.eom = CRC_START;
        self.state = State::Idle;
    }
}

/// Encode a message to a freshly allocated frame
///
/// # Errors
///
/// Returns [`Error::BoundsExceeded`] if the records do not fit a frame.
pub fn encode(message: &Message) -> Result<Vec<u8>> {
    let mut codec = MessageCodec::new();
    let header = message.header();

    codec.start_message(
        header.manufacturer_id(),
        header.product_id(),
        header.pip(),
        header.sensor_id(),
    );
    for record in message.records() {
        codec.append_record(record)?;
    }

    Ok(codec.seal_message()?.to_vec())
}

/// Decode and validate a frame into an owned message
///
/// Bytes past the footer are ignored.
///
/// # Errors
///
/// Any validation error of [`MessageCodec::validate_message`], or
/// [`Error::BoundsExceeded`] if `bytes` is longer than the largest frame.
pub fn decode(bytes: &[u8]) -> Result<Message> {
    let mut codec = MessageCodec::new();
    codec.load(bytes)?;

    let header = codec.validate_message()?;
    let records = codec
        .records()?
        .map(|record| record.map(|record| record.to_record()))
        .collect::<Result<Vec<_>>>()?;

    Ok(Message::from_parts(header, records))
}
