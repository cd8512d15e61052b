use openthings::protocol::MIN_CAPACITY;
use openthings::{
    CRC_START, CodecConfig, Error, FOOTER_SIZE, HEADER_SIZE, Message, MessageCodec, Record, crc16,
};

/// Minimal stand-in for the radio side: frames travel as owned byte vectors.
#[derive(Default)]
struct Loopback {
    in_flight: Vec<Vec<u8>>,
}

impl Loopback {
    fn send(&mut self, frame: &[u8]) {
        self.in_flight.push(frame.to_vec());
    }

    fn receive(&mut self) -> Option<Vec<u8>> {
        if self.in_flight.is_empty() {
            None
        } else {
            Some(self.in_flight.remove(0))
        }
    }
}

fn temperature(value: i16) -> Record {
    Record::new(0x74_u8, value.to_be_bytes().to_vec()).unwrap()
}

fn voltage(millivolts: u16) -> Record {
    Record::new(0x76_u8, millivolts.to_be_bytes().to_vec()).unwrap()
}

#[test]
fn producer_and_consumer_reuse_their_buffers() {
    let mut link = Loopback::default();
    let mut producer = MessageCodec::new();
    let mut consumer = MessageCodec::new();

    for (sensor, reading) in [(0x0001_u32, 215_i16), (0x0002, -40), (0x0003, 0)] {
        producer.reset();
        producer.start_message(0x04, 0x02, 0x0101, sensor);
        producer.append_record(&temperature(reading)).unwrap();
        producer.append_record(&voltage(3300)).unwrap();
        link.send(producer.seal_message().unwrap());
    }

    let mut seen = Vec::new();
    while let Some(frame) = link.receive() {
        consumer.load(&frame).unwrap();
        let header = consumer.validate_message().unwrap();

        let first = consumer.next_record().unwrap().unwrap();
        let reading = i16::from_be_bytes([first.payload()[0], first.payload()[1]]);
        let second = consumer.next_record().unwrap().unwrap();
        assert_eq!(second.payload(), &3300_u16.to_be_bytes());
        assert!(consumer.next_record().unwrap().is_none());

        seen.push((header.sensor_id(), reading));
    }

    assert_eq!(seen, vec![(1, 215), (2, -40), (3, 0)]);
}

#[test]
fn corrupted_frame_is_dropped_whole() {
    let message = Message::new(0x04, 0x02, 0x0101, 0x00_BEEF)
        .with_record(temperature(180))
        .with_record(voltage(2900));
    let mut frame = message.encode().unwrap();
    let last_payload_byte = frame.len() - FOOTER_SIZE - 1;
    frame[last_payload_byte] ^= 0x01;

    let mut codec = MessageCodec::new();
    codec.load(&frame).unwrap();
    assert!(matches!(
        codec.validate_message(),
        Err(Error::ChecksumMismatch { .. })
    ));
    assert_eq!(codec.next_record(), Err(Error::NotValidated));
    assert!(Message::decode(&frame).is_err());
}

#[test]
fn frame_built_by_hand_validates() {
    // Header: manu 0x04, prod 0x02, pip 0x0101, sensor 0x000123, length 5
    let mut frame = vec![0x04, 0x02, 0x01, 0x01, 0x23, 0x01, 0x00, 0x05];
    frame.extend_from_slice(&[2, 0x40]);
    let crc = crc16(&frame[CRC_START..]);
    frame.push(0);
    frame.extend_from_slice(&crc.to_le_bytes());

    let message = Message::decode(&frame).unwrap();
    assert_eq!(message.header().sensor_id(), 0x0123);
    assert_eq!(message.records().len(), 1);
    assert_eq!(message.records()[0].tag().as_u8(), 0x40);
    assert!(message.records()[0].payload().is_empty());
}

#[test]
fn record_iterator_matches_cursor_walk() {
    let mut codec = MessageCodec::new();
    codec.start_message(1, 1, 1, 1);
    for tag in 0..5_u8 {
        codec
            .append_record(&Record::new(tag, vec![tag; usize::from(tag)]).unwrap())
            .unwrap();
    }
    codec.seal_message().unwrap();
    codec.validate_message().unwrap();

    let via_iter: Vec<Record> = codec
        .records()
        .unwrap()
        .map(|record| record.unwrap().to_record())
        .collect();

    let mut via_cursor = Vec::new();
    while let Some(record) = codec.next_record().unwrap() {
        via_cursor.push(record.to_record());
    }

    assert_eq!(via_iter.len(), 5);
    assert_eq!(via_iter, via_cursor);
}

#[test]
fn small_capacity_codec_fills_exactly() {
    let capacity = 24;
    let mut codec = MessageCodec::with_config(CodecConfig::new().with_capacity(capacity)).unwrap();
    codec.start_message(0, 0, 0, 0);

    // Leave exactly room for the footer.
    let fill = capacity - HEADER_SIZE - FOOTER_SIZE;
    codec
        .append_record(&Record::new(0x01_u8, vec![0xEE; fill - 2]).unwrap())
        .unwrap();
    let frame = codec.seal_message().unwrap().to_vec();
    assert_eq!(frame.len(), capacity);

    let mut rx = MessageCodec::with_config(CodecConfig::new().with_capacity(MIN_CAPACITY)).unwrap();
    assert!(matches!(rx.load(&frame), Err(Error::BoundsExceeded { .. })));

    let mut rx = MessageCodec::new();
    rx.load(&frame).unwrap();
    rx.validate_message().unwrap();
    let records: Vec<_> = rx.records().unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].payload().len(), fill - 2);
}

#[test]
fn stale_bytes_after_shorter_frame_are_ignored() {
    let mut codec = MessageCodec::new();
    codec.start_message(7, 7, 7, 7);
    codec.append_record(&Record::new(1_u8, vec![0xAB; 100]).unwrap()).unwrap();
    codec.seal_message().unwrap();

    let short = Message::new(1, 2, 3, 4).encode().unwrap();
    codec.load(&short).unwrap();
    assert_eq!(codec.as_bytes().len(), short.len());
    codec.validate_message().unwrap();
    assert!(codec.next_record().unwrap().is_none());
}
