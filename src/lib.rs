//! h2trace - HTTP/2 wire-protocol inspection client
//!
//! This crate connects to an HTTP/2 endpoint over TLS (ALPN-negotiated),
//! performs the connection preface handshake, issues a single request and
//! decodes every frame received until the connection closes.
//!
//! # Architecture
//!
//! The core is the frame-level protocol engine:
//!
//! - `codec` parses/serializes the 9-byte frame header and per-type bodies
//! - `frames` models every frame type as a tagged variant, with an explicit
//!   fallback for unrecognized type codes
//! - `session` drives the preface send and the blocking frame read loop over
//!   any transport implementing `SessionOps`
//!
//! Header compression is delegated to the `hpack` crate behind the `headers`
//! wrapper; the engine only ever sees opaque header block fragments. TLS and
//! ALPN negotiation live in `tls` and hand the session an already-negotiated
//! byte stream.

pub mod codec;
pub mod error;
pub mod frames;
pub mod headers;
pub mod session;
pub mod settings;
pub mod tls;
pub mod trace;
pub mod transport;

pub use codec::FrameCodec;
pub use error::{Error, ErrorCode, Result};
pub use frames::{Frame, FrameFlags, FrameHeader, FrameType};
pub use headers::HeaderCodec;
pub use session::H2Session;
pub use settings::SettingId;
pub use transport::SessionOps;

/// HTTP/2 connection preface that must be sent by clients
///
/// From RFC 7540 Section 3.5:
/// "PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n"
pub const CONNECTION_PREFACE: &[u8] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

/// HTTP/2 frame header size (9 bytes)
pub const FRAME_HEADER_SIZE: usize = 9;

/// Maximum frame payload size (2^24 - 1)
pub const MAX_FRAME_SIZE: usize = 0x00FF_FFFF;

/// Maximum stream ID value (2^31 - 1)
pub const MAX_STREAM_ID: u32 = 0x7FFF_FFFF;

/// Stream ID 0 (connection-level)
pub const CONNECTION_STREAM_ID: u32 = 0;
