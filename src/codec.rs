//! HTTP/2 frame encoding and decoding
//!
//! Frame headers are a fixed 9-byte prefix; bodies are type-polymorphic
//! with flag-dependent layouts. Decoding is strict about body shape within
//! a recognized type (a misparsed length desyncs the whole connection) but
//! never fails solely because a type code is unrecognized.

use crate::error::{Error, ErrorCode, Result};
use crate::frames::*;
use crate::settings::SettingId;
use crate::{FRAME_HEADER_SIZE, MAX_FRAME_SIZE, MAX_STREAM_ID};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Frame codec for encoding/decoding HTTP/2 frames
pub struct FrameCodec;

impl FrameCodec {
    /// Encode a frame header into a 9-byte buffer
    ///
    /// Fails with `InvalidField` if the payload length exceeds 2^24-1 or the
    /// stream ID exceeds 2^31-1. The reserved bit is always written as zero.
    pub fn encode_header(
        kind: u8,
        flags: FrameFlags,
        stream_id: u32,
        length: usize,
    ) -> Result<[u8; FRAME_HEADER_SIZE]> {
        if length > MAX_FRAME_SIZE {
            return Err(Error::InvalidField(format!(
                "payload length {} exceeds 2^24-1",
                length
            )));
        }
        if stream_id > MAX_STREAM_ID {
            return Err(Error::InvalidField(format!(
                "stream ID {} exceeds 2^31-1",
                stream_id
            )));
        }

        let mut header = [0u8; FRAME_HEADER_SIZE];

        // Length (24 bits, big-endian)
        header[0] = ((length >> 16) & 0xFF) as u8;
        header[1] = ((length >> 8) & 0xFF) as u8;
        header[2] = (length & 0xFF) as u8;

        // Type (8 bits)
        header[3] = kind;

        // Flags (8 bits)
        header[4] = flags.as_u8();

        // Stream ID (31 bits, big-endian, reserved bit is 0)
        header[5] = ((stream_id >> 24) & 0x7F) as u8;
        header[6] = ((stream_id >> 16) & 0xFF) as u8;
        header[7] = ((stream_id >> 8) & 0xFF) as u8;
        header[8] = (stream_id & 0xFF) as u8;

        Ok(header)
    }

    /// Decode a frame header from 9 bytes
    ///
    /// The reserved bit of the stream ID field is ignored regardless of its
    /// value, per RFC 7540 Section 4.1.
    pub fn decode_header(bytes: &[u8; FRAME_HEADER_SIZE]) -> FrameHeader {
        // Length (24 bits, big-endian)
        let length =
            ((bytes[0] as usize) << 16) | ((bytes[1] as usize) << 8) | (bytes[2] as usize);

        let kind = bytes[3];
        let flags = FrameFlags::from_u8(bytes[4]);

        // Stream ID (31 bits, ignore reserved bit)
        let stream_id = ((bytes[5] as u32 & 0x7F) << 24)
            | ((bytes[6] as u32) << 16)
            | ((bytes[7] as u32) << 8)
            | (bytes[8] as u32);

        FrameHeader {
            length,
            kind,
            flags,
            stream_id,
        }
    }

    /// Decode a frame body given its header
    ///
    /// `payload` must contain exactly `header.length` bytes; the session is
    /// responsible for reading that much off the transport.
    pub fn decode_body(header: &FrameHeader, payload: Bytes) -> Result<Frame> {
        let frame_type = match header.frame_type() {
            Some(t) => t,
            None => {
                return Ok(Frame::Unknown(UnknownFrame {
                    kind: header.kind,
                    flags: header.flags,
                    stream_id: header.stream_id,
                    payload,
                }))
            }
        };

        match frame_type {
            FrameType::Data => Self::decode_data(header, payload),
            FrameType::Headers => Self::decode_headers(header, payload),
            FrameType::Priority => Self::decode_priority(header, payload),
            FrameType::RstStream => Self::decode_rst_stream(header, payload),
            FrameType::Settings => Self::decode_settings(header, payload),
            FrameType::PushPromise => Self::decode_push_promise(header, payload),
            FrameType::Ping => Self::decode_ping(header, payload),
            FrameType::Goaway => Self::decode_goaway(header, payload),
            FrameType::WindowUpdate => Self::decode_window_update(header, payload),
            FrameType::Continuation => Ok(Frame::Continuation(ContinuationFrame {
                stream_id: header.stream_id,
                header_block: payload,
                end_headers: header.flags.is_end_headers(),
            })),
        }
    }

    /// Encode a full frame (header + body) into a single buffer
    ///
    /// One buffer means one transport write, so header and body can never be
    /// interleaved with a concurrent writer.
    pub fn encode(frame: &Frame) -> Result<Bytes> {
        match frame {
            Frame::Data(f) => Self::encode_data(f),
            Frame::Headers(f) => Self::encode_headers(f),
            Frame::Priority(f) => Self::encode_priority(f),
            Frame::RstStream(f) => Self::encode_rst_stream(f),
            Frame::Settings(f) => Self::encode_settings(f),
            Frame::PushPromise(f) => Self::encode_push_promise(f),
            Frame::Ping(f) => Self::encode_ping(f),
            Frame::Goaway(f) => Self::encode_goaway(f),
            Frame::WindowUpdate(f) => Self::encode_window_update(f),
            Frame::Continuation(f) => Self::encode_continuation(f),
            Frame::Unknown(f) => Self::encode_unknown(f),
        }
    }

    // Body decoders

    /// Consume the pad-length byte if the PADDED flag is set
    fn take_pad_length(flags: FrameFlags, payload: &mut Bytes) -> Result<Option<u8>> {
        if !flags.is_padded() {
            return Ok(None);
        }
        if payload.is_empty() {
            return Err(Error::FrameSize(
                "PADDED frame too short for pad length field".to_string(),
            ));
        }
        Ok(Some(payload.get_u8()))
    }

    /// Strip trailing padding, validating it fits in the remaining body
    fn strip_padding(padding: Option<u8>, payload: Bytes) -> Result<Bytes> {
        let pad = padding.unwrap_or(0) as usize;
        if pad > payload.len() {
            return Err(Error::FrameSize(format!(
                "pad length {} exceeds remaining body of {} bytes",
                pad,
                payload.len()
            )));
        }
        let keep = payload.len() - pad;
        Ok(payload.slice(..keep))
    }

    fn decode_data(header: &FrameHeader, mut payload: Bytes) -> Result<Frame> {
        let padding = Self::take_pad_length(header.flags, &mut payload)?;
        let data = Self::strip_padding(padding, payload)?;

        Ok(Frame::Data(DataFrame {
            stream_id: header.stream_id,
            data,
            end_stream: header.flags.is_end_stream(),
            padding,
        }))
    }

    fn decode_headers(header: &FrameHeader, mut payload: Bytes) -> Result<Frame> {
        let padding = Self::take_pad_length(header.flags, &mut payload)?;

        let priority = if header.flags.is_priority() {
            if payload.len() < 5 {
                return Err(Error::FrameSize(
                    "HEADERS priority block requires 5 bytes".to_string(),
                ));
            }
            let raw = payload.get_u32();
            let weight = payload.get_u8();
            Some(PrioritySpec {
                stream_dependency: raw & MAX_STREAM_ID,
                exclusive: raw & 0x8000_0000 != 0,
                weight,
            })
        } else {
            None
        };

        let header_block = Self::strip_padding(padding, payload)?;

        Ok(Frame::Headers(HeadersFrame {
            stream_id: header.stream_id,
            header_block,
            end_stream: header.flags.is_end_stream(),
            end_headers: header.flags.is_end_headers(),
            priority,
            padding,
        }))
    }

    fn decode_priority(header: &FrameHeader, mut payload: Bytes) -> Result<Frame> {
        if payload.len() != 5 {
            return Err(Error::FrameSize(format!(
                "PRIORITY body must be 5 bytes, got {}",
                payload.len()
            )));
        }
        let raw = payload.get_u32();
        let weight = payload.get_u8();

        Ok(Frame::Priority(PriorityFrame {
            stream_id: header.stream_id,
            priority: PrioritySpec {
                stream_dependency: raw & MAX_STREAM_ID,
                exclusive: raw & 0x8000_0000 != 0,
                weight,
            },
        }))
    }

    fn decode_rst_stream(header: &FrameHeader, mut payload: Bytes) -> Result<Frame> {
        if payload.len() != 4 {
            return Err(Error::FrameSize(format!(
                "RST_STREAM body must be 4 bytes, got {}",
                payload.len()
            )));
        }

        Ok(Frame::RstStream(RstStreamFrame {
            stream_id: header.stream_id,
            error_code: ErrorCode::from_u32(payload.get_u32()),
        }))
    }

    fn decode_settings(header: &FrameHeader, mut payload: Bytes) -> Result<Frame> {
        if header.flags.is_ack() {
            if !payload.is_empty() {
                return Err(Error::FrameSize(format!(
                    "SETTINGS ACK must have empty body, got {} bytes",
                    payload.len()
                )));
            }
            return Ok(Frame::Settings(SettingsFrame {
                stream_id: header.stream_id,
                ack: true,
                settings: Vec::new(),
            }));
        }

        if payload.len() % 6 != 0 {
            return Err(Error::FrameSize(format!(
                "SETTINGS body length {} is not a multiple of 6",
                payload.len()
            )));
        }

        let mut settings = Vec::with_capacity(payload.len() / 6);
        while payload.has_remaining() {
            let id = SettingId::from_u16(payload.get_u16());
            let value = payload.get_u32();
            settings.push((id, value));
        }

        Ok(Frame::Settings(SettingsFrame {
            stream_id: header.stream_id,
            ack: false,
            settings,
        }))
    }

    fn decode_push_promise(header: &FrameHeader, mut payload: Bytes) -> Result<Frame> {
        let padding = Self::take_pad_length(header.flags, &mut payload)?;
        if payload.len() < 4 {
            return Err(Error::FrameSize(
                "PUSH_PROMISE requires a 4-byte promised stream ID".to_string(),
            ));
        }
        let promised_stream_id = payload.get_u32() & MAX_STREAM_ID;
        let header_block = Self::strip_padding(padding, payload)?;

        Ok(Frame::PushPromise(PushPromiseFrame {
            stream_id: header.stream_id,
            promised_stream_id,
            header_block,
            end_headers: header.flags.is_end_headers(),
            padding,
        }))
    }

    fn decode_ping(header: &FrameHeader, payload: Bytes) -> Result<Frame> {
        if payload.len() != 8 {
            return Err(Error::FrameSize(format!(
                "PING body must be 8 bytes, got {}",
                payload.len()
            )));
        }
        let mut data = [0u8; 8];
        data.copy_from_slice(&payload);

        Ok(Frame::Ping(PingFrame {
            stream_id: header.stream_id,
            ack: header.flags.is_ack(),
            data,
        }))
    }

    fn decode_goaway(header: &FrameHeader, mut payload: Bytes) -> Result<Frame> {
        if payload.len() < 8 {
            return Err(Error::FrameSize(format!(
                "GOAWAY body must be at least 8 bytes, got {}",
                payload.len()
            )));
        }
        let last_stream_id = payload.get_u32() & MAX_STREAM_ID;
        let error_code = ErrorCode::from_u32(payload.get_u32());

        Ok(Frame::Goaway(GoawayFrame {
            stream_id: header.stream_id,
            last_stream_id,
            error_code,
            debug_data: payload,
        }))
    }

    fn decode_window_update(header: &FrameHeader, mut payload: Bytes) -> Result<Frame> {
        if payload.len() != 4 {
            return Err(Error::FrameSize(format!(
                "WINDOW_UPDATE body must be 4 bytes, got {}",
                payload.len()
            )));
        }
        let size_increment = payload.get_u32() & MAX_STREAM_ID;
        // RFC 7540 Section 6.9: a zero increment is a protocol violation.
        // Treated as a hard failure here; an inspector cannot resync anyway.
        if size_increment == 0 {
            return Err(Error::InvalidField(
                "WINDOW_UPDATE increment must be nonzero".to_string(),
            ));
        }

        Ok(Frame::WindowUpdate(WindowUpdateFrame {
            stream_id: header.stream_id,
            size_increment,
        }))
    }

    // Body encoders

    fn encode_data(frame: &DataFrame) -> Result<Bytes> {
        let mut flags = FrameFlags::empty();
        if frame.end_stream {
            flags.set(FrameFlags::END_STREAM);
        }

        let mut payload_len = frame.data.len();
        let pad = if let Some(pad_len) = frame.padding {
            flags.set(FrameFlags::PADDED);
            payload_len += 1 + pad_len as usize;
            pad_len
        } else {
            0
        };

        let header = Self::encode_header(FrameType::Data.as_u8(), flags, frame.stream_id, payload_len)?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + payload_len);
        buf.put_slice(&header);
        if frame.padding.is_some() {
            buf.put_u8(pad);
        }
        buf.put_slice(&frame.data);
        if pad > 0 {
            buf.put_bytes(0, pad as usize);
        }

        Ok(buf.freeze())
    }

    fn encode_headers(frame: &HeadersFrame) -> Result<Bytes> {
        let mut flags = FrameFlags::empty();
        if frame.end_stream {
            flags.set(FrameFlags::END_STREAM);
        }
        if frame.end_headers {
            flags.set(FrameFlags::END_HEADERS);
        }

        let mut payload_len = frame.header_block.len();
        if frame.priority.is_some() {
            flags.set(FrameFlags::PRIORITY);
            payload_len += 5;
        }
        let pad = if let Some(pad_len) = frame.padding {
            flags.set(FrameFlags::PADDED);
            payload_len += 1 + pad_len as usize;
            pad_len
        } else {
            0
        };

        let header =
            Self::encode_header(FrameType::Headers.as_u8(), flags, frame.stream_id, payload_len)?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + payload_len);
        buf.put_slice(&header);
        if frame.padding.is_some() {
            buf.put_u8(pad);
        }
        if let Some(priority) = &frame.priority {
            let mut dep = priority.stream_dependency & MAX_STREAM_ID;
            if priority.exclusive {
                dep |= 0x8000_0000;
            }
            buf.put_u32(dep);
            buf.put_u8(priority.weight);
        }
        buf.put_slice(&frame.header_block);
        if pad > 0 {
            buf.put_bytes(0, pad as usize);
        }

        Ok(buf.freeze())
    }

    fn encode_priority(frame: &PriorityFrame) -> Result<Bytes> {
        let header =
            Self::encode_header(FrameType::Priority.as_u8(), FrameFlags::empty(), frame.stream_id, 5)?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + 5);
        buf.put_slice(&header);

        let mut dep = frame.priority.stream_dependency & MAX_STREAM_ID;
        if frame.priority.exclusive {
            dep |= 0x8000_0000;
        }
        buf.put_u32(dep);
        buf.put_u8(frame.priority.weight);

        Ok(buf.freeze())
    }

    fn encode_rst_stream(frame: &RstStreamFrame) -> Result<Bytes> {
        let header =
            Self::encode_header(FrameType::RstStream.as_u8(), FrameFlags::empty(), frame.stream_id, 4)?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + 4);
        buf.put_slice(&header);
        buf.put_u32(frame.error_code.as_u32());

        Ok(buf.freeze())
    }

    fn encode_settings(frame: &SettingsFrame) -> Result<Bytes> {
        let flags = if frame.ack {
            FrameFlags::from_u8(FrameFlags::ACK)
        } else {
            FrameFlags::empty()
        };

        if frame.ack && !frame.settings.is_empty() {
            return Err(Error::FrameSize(
                "SETTINGS ACK must carry no entries".to_string(),
            ));
        }

        let payload_len = frame.settings.len() * 6;
        let header =
            Self::encode_header(FrameType::Settings.as_u8(), flags, frame.stream_id, payload_len)?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + payload_len);
        buf.put_slice(&header);
        for (id, value) in &frame.settings {
            buf.put_u16(id.as_u16());
            buf.put_u32(*value);
        }

        Ok(buf.freeze())
    }

    fn encode_push_promise(frame: &PushPromiseFrame) -> Result<Bytes> {
        let mut flags = FrameFlags::empty();
        if frame.end_headers {
            flags.set(FrameFlags::END_HEADERS);
        }

        let mut payload_len = 4 + frame.header_block.len();
        let pad = if let Some(pad_len) = frame.padding {
            flags.set(FrameFlags::PADDED);
            payload_len += 1 + pad_len as usize;
            pad_len
        } else {
            0
        };

        if frame.promised_stream_id > MAX_STREAM_ID {
            return Err(Error::InvalidField(format!(
                "promised stream ID {} exceeds 2^31-1",
                frame.promised_stream_id
            )));
        }

        let header =
            Self::encode_header(FrameType::PushPromise.as_u8(), flags, frame.stream_id, payload_len)?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + payload_len);
        buf.put_slice(&header);
        if frame.padding.is_some() {
            buf.put_u8(pad);
        }
        buf.put_u32(frame.promised_stream_id);
        buf.put_slice(&frame.header_block);
        if pad > 0 {
            buf.put_bytes(0, pad as usize);
        }

        Ok(buf.freeze())
    }

    fn encode_ping(frame: &PingFrame) -> Result<Bytes> {
        let flags = if frame.ack {
            FrameFlags::from_u8(FrameFlags::ACK)
        } else {
            FrameFlags::empty()
        };

        let header = Self::encode_header(FrameType::Ping.as_u8(), flags, frame.stream_id, 8)?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + 8);
        buf.put_slice(&header);
        buf.put_slice(&frame.data);

        Ok(buf.freeze())
    }

    fn encode_goaway(frame: &GoawayFrame) -> Result<Bytes> {
        let payload_len = 8 + frame.debug_data.len();
        let header =
            Self::encode_header(FrameType::Goaway.as_u8(), FrameFlags::empty(), frame.stream_id, payload_len)?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + payload_len);
        buf.put_slice(&header);
        buf.put_u32(frame.last_stream_id & MAX_STREAM_ID);
        buf.put_u32(frame.error_code.as_u32());
        buf.put_slice(&frame.debug_data);

        Ok(buf.freeze())
    }

    fn encode_window_update(frame: &WindowUpdateFrame) -> Result<Bytes> {
        if frame.size_increment == 0 {
            return Err(Error::InvalidField(
                "WINDOW_UPDATE increment must be nonzero".to_string(),
            ));
        }
        if frame.size_increment > MAX_STREAM_ID {
            return Err(Error::InvalidField(format!(
                "WINDOW_UPDATE increment {} exceeds 2^31-1",
                frame.size_increment
            )));
        }

        let header =
            Self::encode_header(FrameType::WindowUpdate.as_u8(), FrameFlags::empty(), frame.stream_id, 4)?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + 4);
        buf.put_slice(&header);
        buf.put_u32(frame.size_increment);

        Ok(buf.freeze())
    }

    fn encode_continuation(frame: &ContinuationFrame) -> Result<Bytes> {
        let mut flags = FrameFlags::empty();
        if frame.end_headers {
            flags.set(FrameFlags::END_HEADERS);
        }

        let header = Self::encode_header(
            FrameType::Continuation.as_u8(),
            flags,
            frame.stream_id,
            frame.header_block.len(),
        )?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + frame.header_block.len());
        buf.put_slice(&header);
        buf.put_slice(&frame.header_block);

        Ok(buf.freeze())
    }

    fn encode_unknown(frame: &UnknownFrame) -> Result<Bytes> {
        let header =
            Self::encode_header(frame.kind, frame.flags, frame.stream_id, frame.payload.len())?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + frame.payload.len());
        buf.put_slice(&header);
        buf.put_slice(&frame.payload);

        Ok(buf.freeze())
    }
}
