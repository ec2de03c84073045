//! Frame codec benchmarks
//!
//! Measures header and body encode/decode throughput for the frame types
//! a trace session sees most often.
//!
//! Run with: cargo bench --bench codec

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use h2trace::codec::FrameCodec;
use h2trace::frames::{DataFrame, Frame, FrameFlags, FrameType, HeadersFrame, SettingsFrame};
use h2trace::settings::SettingId;
use h2trace::FRAME_HEADER_SIZE;

fn bench_header_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_header");

    group.bench_function("encode", |b| {
        b.iter(|| {
            let header = FrameCodec::encode_header(
                black_box(FrameType::Data.as_u8()),
                black_box(FrameFlags::from_u8(0x01)),
                black_box(1),
                black_box(1024),
            );
            black_box(header)
        });
    });

    let encoded =
        FrameCodec::encode_header(FrameType::Data.as_u8(), FrameFlags::from_u8(0x01), 1, 1024)
            .unwrap();
    group.bench_function("decode", |b| {
        b.iter(|| black_box(FrameCodec::decode_header(black_box(&encoded))));
    });

    group.finish();
}

fn bench_frame_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_encode");

    let data = Frame::Data(DataFrame::new(1, Bytes::from(vec![0xAB; 16384]), false));
    group.throughput(Throughput::Bytes(16384));
    group.bench_function("data_16k", |b| {
        b.iter(|| black_box(FrameCodec::encode(black_box(&data)).unwrap()));
    });

    let headers = Frame::Headers(HeadersFrame::new(
        1,
        Bytes::from(vec![0x82; 256]),
        true,
        true,
    ));
    group.throughput(Throughput::Bytes(256));
    group.bench_function("headers_256", |b| {
        b.iter(|| black_box(FrameCodec::encode(black_box(&headers)).unwrap()));
    });

    let settings = Frame::Settings(SettingsFrame::new(vec![
        (SettingId::HeaderTableSize, 4096),
        (SettingId::InitialWindowSize, 65535),
        (SettingId::MaxFrameSize, 16384),
    ]));
    group.throughput(Throughput::Bytes(18));
    group.bench_function("settings_3_entries", |b| {
        b.iter(|| black_box(FrameCodec::encode(black_box(&settings)).unwrap()));
    });

    group.finish();
}

fn bench_frame_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_decode");

    let frames = [
        (
            "data_16k",
            Frame::Data(DataFrame::new(1, Bytes::from(vec![0xAB; 16384]), false)),
        ),
        (
            "settings_3_entries",
            Frame::Settings(SettingsFrame::new(vec![
                (SettingId::HeaderTableSize, 4096),
                (SettingId::InitialWindowSize, 65535),
                (SettingId::MaxFrameSize, 16384),
            ])),
        ),
    ];

    for (name, frame) in &frames {
        let encoded = FrameCodec::encode(frame).unwrap();
        let mut header_bytes = [0u8; FRAME_HEADER_SIZE];
        header_bytes.copy_from_slice(&encoded[..FRAME_HEADER_SIZE]);
        let header = FrameCodec::decode_header(&header_bytes);
        let payload = encoded.slice(FRAME_HEADER_SIZE..);

        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_function(*name, |b| {
            b.iter(|| {
                black_box(
                    FrameCodec::decode_body(black_box(&header), black_box(payload.clone()))
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_header_codec,
    bench_frame_encode,
    bench_frame_decode
);
criterion_main!(benches);
