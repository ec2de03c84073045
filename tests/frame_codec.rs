//! Frame codec round-trip and boundary tests

use bytes::{BufMut, Bytes, BytesMut};
use h2trace::codec::FrameCodec;
use h2trace::frames::*;
use h2trace::{Error, ErrorCode, SettingId, FRAME_HEADER_SIZE, MAX_STREAM_ID};

/// Encode a frame, then decode it back through header + body codecs
fn round_trip(frame: Frame) -> Frame {
    let encoded = FrameCodec::encode(&frame).unwrap();
    decode_bytes(&encoded).unwrap()
}

fn decode_bytes(encoded: &Bytes) -> Result<Frame, Error> {
    let mut header_bytes = [0u8; FRAME_HEADER_SIZE];
    header_bytes.copy_from_slice(&encoded[..FRAME_HEADER_SIZE]);
    let header = FrameCodec::decode_header(&header_bytes);
    assert_eq!(
        header.length,
        encoded.len() - FRAME_HEADER_SIZE,
        "declared length must match serialized body size"
    );
    FrameCodec::decode_body(&header, encoded.slice(FRAME_HEADER_SIZE..))
}

#[test]
fn data_round_trip() {
    let frame = Frame::Data(DataFrame::new(1, Bytes::from("hello world"), true));
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn data_round_trip_with_padding() {
    let frame = Frame::Data(DataFrame::new(3, Bytes::from("abc"), false).with_padding(16));
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn headers_round_trip() {
    let frame = Frame::Headers(HeadersFrame::new(1, Bytes::from_static(&[0x82]), true, true));
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn headers_round_trip_with_priority_and_padding() {
    let frame = Frame::Headers(
        HeadersFrame::new(5, Bytes::from_static(&[0x82, 0x86]), false, false)
            .with_priority(PrioritySpec::new(3, true, 255))
            .with_padding(4),
    );
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn priority_round_trip() {
    let frame = Frame::Priority(PriorityFrame {
        stream_id: 7,
        priority: PrioritySpec::new(1, false, 0),
    });
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn rst_stream_round_trip() {
    let frame = Frame::RstStream(RstStreamFrame {
        stream_id: 9,
        error_code: ErrorCode::Cancel,
    });
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn settings_round_trip_preserves_order_and_unknown_ids() {
    let frame = Frame::Settings(SettingsFrame::new(vec![
        (SettingId::MaxFrameSize, 16384),
        (SettingId::Unknown(0xf00d), 77),
        (SettingId::HeaderTableSize, 4096),
    ]));
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn push_promise_round_trip() {
    let frame = Frame::PushPromise(PushPromiseFrame {
        stream_id: 1,
        promised_stream_id: 2,
        header_block: Bytes::from_static(&[0x88]),
        end_headers: true,
        padding: Some(3),
    });
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn ping_round_trip() {
    let frame = Frame::Ping(PingFrame::ack([9, 8, 7, 6, 5, 4, 3, 2]));
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn goaway_round_trip_with_debug_data() {
    let frame = Frame::Goaway(GoawayFrame::new(
        15,
        ErrorCode::EnhanceYourCalm,
        Bytes::from("slow down"),
    ));
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn window_update_round_trip() {
    let frame = Frame::WindowUpdate(WindowUpdateFrame::new(0, 65535));
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn continuation_round_trip() {
    let frame = Frame::Continuation(ContinuationFrame {
        stream_id: 1,
        header_block: Bytes::from_static(&[0x84]),
        end_headers: true,
    });
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn unknown_type_round_trips_unchanged() {
    let frame = Frame::Unknown(UnknownFrame {
        kind: 0x20,
        flags: FrameFlags::from_u8(0xff),
        stream_id: 11,
        payload: Bytes::from_static(b"altsvc-ish"),
    });
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn max_stream_id_round_trips() {
    let frame = Frame::Data(DataFrame::new(MAX_STREAM_ID, Bytes::from("x"), false));
    assert_eq!(round_trip(frame.clone()), frame);
}

#[test]
fn oversized_stream_id_fails_encode() {
    let frame = Frame::Data(DataFrame::new(MAX_STREAM_ID + 1, Bytes::new(), false));
    assert!(matches!(
        FrameCodec::encode(&frame),
        Err(Error::InvalidField(_))
    ));
}

#[test]
fn reserved_bit_ignored_on_decode() {
    // Stream ID field with the reserved bit set and the low 31 bits equal 5
    let mut encoded = BytesMut::new();
    let mut header =
        FrameCodec::encode_header(FrameType::Ping.as_u8(), FrameFlags::empty(), 5, 8).unwrap();
    header[5] |= 0x80;
    encoded.put_slice(&header);
    encoded.put_bytes(0, 8);

    let frame = decode_bytes(&encoded.freeze()).unwrap();
    assert_eq!(frame.stream_id(), 5);
}

#[test]
fn padded_data_with_excess_padding_fails() {
    // PADDED flag, pad length 255, total body length 10
    let mut encoded = BytesMut::new();
    let header = FrameCodec::encode_header(
        FrameType::Data.as_u8(),
        FrameFlags::from_u8(FrameFlags::PADDED),
        1,
        10,
    )
    .unwrap();
    encoded.put_slice(&header);
    encoded.put_u8(255);
    encoded.put_bytes(0, 9);

    assert!(matches!(
        decode_bytes(&encoded.freeze()),
        Err(Error::FrameSize(_))
    ));
}

#[test]
fn settings_body_length_boundaries() {
    for (entries, expect_ok) in [(0usize, true), (1, true), (2, true)] {
        let mut encoded = BytesMut::new();
        let header = FrameCodec::encode_header(
            FrameType::Settings.as_u8(),
            FrameFlags::empty(),
            0,
            entries * 6,
        )
        .unwrap();
        encoded.put_slice(&header);
        for _ in 0..entries {
            encoded.put_u16(4);
            encoded.put_u32(65535);
        }
        let result = decode_bytes(&encoded.freeze());
        assert_eq!(result.is_ok(), expect_ok);
        if let Ok(Frame::Settings(f)) = result {
            assert_eq!(f.settings.len(), entries);
        }
    }

    // 7 bytes is not a multiple of 6
    let mut encoded = BytesMut::new();
    let header =
        FrameCodec::encode_header(FrameType::Settings.as_u8(), FrameFlags::empty(), 0, 7).unwrap();
    encoded.put_slice(&header);
    encoded.put_bytes(0, 7);
    assert!(matches!(
        decode_bytes(&encoded.freeze()),
        Err(Error::FrameSize(_))
    ));
}

#[test]
fn rst_stream_with_unallocated_code_decodes() {
    let mut encoded = BytesMut::new();
    let header =
        FrameCodec::encode_header(FrameType::RstStream.as_u8(), FrameFlags::empty(), 1, 4).unwrap();
    encoded.put_slice(&header);
    encoded.put_u32(255);

    match decode_bytes(&encoded.freeze()).unwrap() {
        Frame::RstStream(f) => {
            assert_eq!(f.error_code, ErrorCode::Unknown(255));
            assert_eq!(f.error_code.as_u32(), 255);
        }
        other => panic!("expected RST_STREAM, got {:?}", other),
    }
}
