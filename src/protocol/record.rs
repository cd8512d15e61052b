//! Length-delimited OpenThings records

use bytes::Bytes;

use super::{Error, RecordTag, Result};

/// Size of the record description in bytes
pub const DESCRIPTION_SIZE: usize = 2;

/// Largest encoded record the one-byte length field can describe
pub const MAX_RECORD_SIZE: usize = u8::MAX as usize;

/// Largest payload a single record can carry
pub const MAX_RECORD_PAYLOAD: usize = MAX_RECORD_SIZE - DESCRIPTION_SIZE;

/// Record description: total length (description included) then tag
///
/// ```text
/// +--------+--------+---------------------------+
/// | length |  tag   | payload (length - 2)      |
/// +--------+--------+---------------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDescription {
    length: u8,
    tag: RecordTag,
}

impl RecordDescription {
    /// Total encoded record length
    #[must_use]
    pub const fn length(&self) -> u8 {
        self.length
    }

    /// Record tag
    #[must_use]
    pub const fn tag(&self) -> RecordTag {
        self.tag
    }

    /// Convert to bytes
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; DESCRIPTION_SIZE] {
        [self.length, self.tag.as_u8()]
    }

    /// Parse a description at `offset` of `buf`.
    fn read_at(buf: &[u8], offset: usize) -> Option<Self> {
        let bytes = buf.get(offset..offset + DESCRIPTION_SIZE)?;
        Some(Self {
            length: bytes[0],
            tag: RecordTag::from_u8(bytes[1]),
        })
    }
}

/// Owned record, ready to be appended to a message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRecord"))]
pub struct Record {
    tag: RecordTag,
    payload: Bytes,
}

impl Record {
    /// Create a record, rejecting payloads the length byte cannot describe.
    pub fn new(tag: impl Into<RecordTag>, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > MAX_RECORD_PAYLOAD {
            return Err(Error::RecordTooLarge {
                size: payload.len(),
                max: MAX_RECORD_PAYLOAD,
            });
        }

        Ok(Self {
            tag: tag.into(),
            payload,
        })
    }

    /// Record tag
    #[must_use]
    pub const fn tag(&self) -> RecordTag {
        self.tag
    }

    /// Record payload
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Total encoded size, description included
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        DESCRIPTION_SIZE + self.payload.len()
    }

    /// Description this record encodes with
    #[must_use]
    pub fn description(&self) -> RecordDescription {
        RecordDescription {
            // `new` bounds the payload, so the length always fits.
            length: u8::try_from(self.encoded_len()).unwrap_or(u8::MAX),
            tag: self.tag,
        }
    }

    /// Write the encoded record into the front of `buf`.
    ///
    /// Caller must ensure `buf` holds at least [`Self::encoded_len`] bytes.
    pub(crate) fn write_to(&self, buf: &mut [u8]) {
        buf[..DESCRIPTION_SIZE].copy_from_slice(&self.description().to_bytes());
        buf[DESCRIPTION_SIZE..self.encoded_len()].copy_from_slice(&self.payload);
    }
}

/// Unchecked wire shape; deserialized records go through [`Record::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRecord {
    tag: RecordTag,
    payload: Bytes,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRecord> for Record {
    type Error = Error;

    fn try_from(raw: RawRecord) -> Result<Self> {
        Self::new(raw.tag, raw.payload)
    }
}

/// Borrowed view of a record inside a frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRef<'a> {
    offset: usize,
    description: RecordDescription,
    payload: &'a [u8],
}

impl<'a> RecordRef<'a> {
    /// Buffer offset of the record description
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Record description
    #[must_use]
    pub const fn description(&self) -> RecordDescription {
        self.description
    }

    /// Record tag
    #[must_use]
    pub const fn tag(&self) -> RecordTag {
        self.description.tag
    }

    /// Payload bytes
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Copy the view into an owned [`Record`]
    #[must_use]
    pub fn to_record(&self) -> Record {
        Record {
            tag: self.description.tag,
            payload: Bytes::copy_from_slice(self.payload),
        }
    }
}

/// Read the record starting at `offset`, which must end at or before `end`.
pub(crate) fn read_record(buf: &[u8], offset: usize, end: usize) -> Result<RecordRef<'_>> {
    let end = end.min(buf.len());
    let malformed = |length: u8| Error::MalformedRecord { offset, length };

    if offset + DESCRIPTION_SIZE > end {
        let length = buf.get(offset).copied().unwrap_or(0);
        return Err(malformed(length));
    }
    let description = RecordDescription::read_at(buf, offset).ok_or_else(|| malformed(0))?;

    let length = usize::from(description.length);
    if length < DESCRIPTION_SIZE || offset + length > end {
        return Err(malformed(description.length));
    }

    Ok(RecordRef {
        offset,
        description,
        payload: &buf[offset + DESCRIPTION_SIZE..offset + length],
    })
}

/// Iterator over the records of a region `[start, end)` of a frame
///
/// Yields an error once and then stops if a description does not fit.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    buf: &'a [u8],
    offset: usize,
    end: usize,
    failed: bool,
}

impl<'a> Records<'a> {
    pub(crate) fn new(buf: &'a [u8], start: usize, end: usize) -> Self {
        Self {
            buf,
            offset: start,
            end,
            failed: false,
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<RecordRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.end {
            return None;
        }

        match read_record(self.buf, self.offset, self.end) {
            Ok(record) => {
                self.offset += usize::from(record.description.length);
                Some(Ok(record))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
