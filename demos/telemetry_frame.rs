//! Build a sensor report, pass it through a noisy "radio", and decode it.

use openthings::{Error, MessageCodec, Record};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("OpenThings Frame Example");
    println!("========================\n");

    let mut tx = MessageCodec::new();
    tx.start_message(0x04, 0x02, 0x0101, 0x00_1A2B);
    tx.append_record(&Record::new(0x74_u8, 215_i16.to_be_bytes().to_vec())?)?;
    tx.append_record(&Record::new(0x76_u8, 3300_u16.to_be_bytes().to_vec())?)?;
    let frame = tx.seal_message()?.to_vec();
    println!("Encoded {} bytes: {:02x?}", frame.len(), frame);

    let mut rx = MessageCodec::new();
    rx.load(&frame)?;
    let header = rx.validate_message()?;
    println!(
        "Sensor {:#08x} (manufacturer {:#04x}, product {:#04x})",
        header.sensor_id(),
        header.manufacturer_id(),
        header.product_id()
    );
    while let Some(record) = rx.next_record()? {
        println!("  record tag={} payload={:02x?}", record.tag(), record.payload());
    }

    // Flip one bit in the first record, as radio noise would.
    let mut noisy = frame.clone();
    noisy[9] ^= 0x04;
    rx.load(&noisy)?;
    match rx.validate_message() {
        Err(err @ Error::ChecksumMismatch { .. }) => println!("\nCorrupted frame dropped: {err}"),
        other => println!("\nUnexpected result: {other:?}"),
    }

    Ok(())
}
