use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use openthings::{Message, MessageCodec, Record, crc16};

fn readings(count: usize, payload: usize) -> Vec<Record> {
    (0..count)
        .map(|i| Record::new(0x74_u8, vec![i as u8; payload]).unwrap())
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    // Typical sensor report: a handful of short records
    let small = readings(4, 2);
    let small_len = small
        .iter()
        .fold(Message::new(4, 2, 1, 1), |message, record| {
            message.with_record(record.clone())
        })
        .encoded_len();
    let mut codec = MessageCodec::new();
    group.throughput(Throughput::Bytes(small_len as u64));
    group.bench_function("encode_small", |b| {
        b.iter(|| {
            codec.reset();
            codec.start_message(4, 2, 1, 1);
            for record in &small {
                codec.append_record(record).unwrap();
            }
            black_box(codec.seal_message().unwrap().len());
        });
    });

    // Largest frame: one record filling the header length range
    let full = readings(1, 250);
    group.throughput(Throughput::Bytes(openthings::MAX_FRAME_SIZE as u64));
    group.bench_function("encode_full", |b| {
        b.iter(|| {
            codec.start_message(4, 2, 1, 1);
            codec.append_record(&full[0]).unwrap();
            black_box(codec.seal_message().unwrap().len());
        });
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let mut message = Message::new(4, 2, 1, 1);
    for record in readings(4, 2) {
        message.push(record);
    }
    let frame = message.encode().unwrap();
    let mut codec = MessageCodec::new();

    group.throughput(Throughput::Bytes(frame.len() as u64));
    group.bench_function("validate_and_walk_small", |b| {
        b.iter(|| {
            codec.load(&frame).unwrap();
            codec.validate_message().unwrap();
            let mut total = 0;
            while let Some(record) = codec.next_record().unwrap() {
                total += record.payload().len();
            }
            black_box(total);
        });
    });

    group.bench_function("decode_owned_small", |b| {
        b.iter(|| {
            black_box(Message::decode(&frame).unwrap());
        });
    });

    group.finish();
}

fn bench_crc(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc16");

    let data = vec![0xA5_u8; 255];
    group.throughput(Throughput::Bytes(255));
    group.bench_function("crc16_255b", |b| {
        b.iter(|| {
            black_box(crc16(black_box(&data)));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_crc);
criterion_main!(benches);
