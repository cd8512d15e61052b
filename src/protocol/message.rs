//! Owned OpenThings message

use super::{MessageHeader, Record, Result};

/// Header plus ordered records, detached from any codec buffer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    header: MessageHeader,
    records: Vec<Record>,
}

impl Message {
    /// Create an empty message for a device
    #[must_use]
    pub fn new(manufacturer_id: u8, product_id: u8, pip: u16, sensor_id: u32) -> Self {
        Self {
            header: MessageHeader::new(manufacturer_id, product_id, pip, sensor_id),
            records: Vec::new(),
        }
    }

    pub(crate) fn from_parts(header: MessageHeader, records: Vec<Record>) -> Self {
        Self { header, records }
    }

    /// Add a record after the existing ones
    #[must_use]
    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    /// Add a record after the existing ones
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Get header
    #[must_use]
    pub const fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// Records in wire order
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Encoded frame size, footer included
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        super::HEADER_SIZE
            + self.records.iter().map(Record::encoded_len).sum::<usize>()
            + super::FOOTER_SIZE
    }

    /// Encode message to bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        super::encode(self)
    }

    /// Decode message from bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        super::decode(bytes)
    }
}
