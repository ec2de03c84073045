//! Error types for the frame engine
//!
//! This module defines the error taxonomy surfaced by the codec and session,
//! plus the wire-level error codes from RFC 7540 Section 7.

use std::fmt;

/// Frame engine errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS error from the transport layer
    #[error("TLS error: {0}")]
    Tls(#[from] crate::tls::TlsError),

    /// Transport reached EOF mid-read; fatal to the session
    #[error("Connection closed")]
    ConnectionClosed,

    /// Declared body length is inconsistent with the frame type's shape
    #[error("Frame size error: {0}")]
    FrameSize(String),

    /// A numeric field violates a structural constraint
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// Caller misuse or protocol-level violation
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// HPACK encode/decode failure
    #[error("Compression error: {0}")]
    Compression(String),

    /// ALPN negotiation failed
    #[error("ALPN negotiation failed: expected h2, got {0:?}")]
    AlpnFailed(Option<Vec<u8>>),

    /// Timeout waiting for the transport
    #[error("Timeout")]
    Timeout,
}

/// Result type for frame engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP/2 error codes as defined in RFC 7540 Section 7
///
/// Unallocated code points are preserved as `Unknown` so that frames
/// carrying future codes round-trip instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Graceful shutdown
    NoError,
    /// Protocol error detected
    ProtocolError,
    /// Implementation fault
    InternalError,
    /// Flow-control limits exceeded
    FlowControlError,
    /// Settings not acknowledged
    SettingsTimeout,
    /// Frame received for closed stream
    StreamClosed,
    /// Frame size incorrect
    FrameSizeError,
    /// Stream not processed
    RefusedStream,
    /// Stream cancelled
    Cancel,
    /// Compression state not updated
    CompressionError,
    /// TCP connection error for CONNECT method
    ConnectError,
    /// Processing capacity exceeded
    EnhanceYourCalm,
    /// Negotiated TLS parameters not acceptable
    InadequateSecurity,
    /// Use HTTP/1.1 for the request
    Http11Required,
    /// Unallocated code point, raw value preserved
    Unknown(u32),
}

impl ErrorCode {
    /// Convert error code to u32
    pub fn as_u32(self) -> u32 {
        match self {
            ErrorCode::NoError => 0x0,
            ErrorCode::ProtocolError => 0x1,
            ErrorCode::InternalError => 0x2,
            ErrorCode::FlowControlError => 0x3,
            ErrorCode::SettingsTimeout => 0x4,
            ErrorCode::StreamClosed => 0x5,
            ErrorCode::FrameSizeError => 0x6,
            ErrorCode::RefusedStream => 0x7,
            ErrorCode::Cancel => 0x8,
            ErrorCode::CompressionError => 0x9,
            ErrorCode::ConnectError => 0xa,
            ErrorCode::EnhanceYourCalm => 0xb,
            ErrorCode::InadequateSecurity => 0xc,
            ErrorCode::Http11Required => 0xd,
            ErrorCode::Unknown(code) => code,
        }
    }

    /// Create error code from u32 (total: never fails)
    pub fn from_u32(code: u32) -> Self {
        match code {
            0x0 => ErrorCode::NoError,
            0x1 => ErrorCode::ProtocolError,
            0x2 => ErrorCode::InternalError,
            0x3 => ErrorCode::FlowControlError,
            0x4 => ErrorCode::SettingsTimeout,
            0x5 => ErrorCode::StreamClosed,
            0x6 => ErrorCode::FrameSizeError,
            0x7 => ErrorCode::RefusedStream,
            0x8 => ErrorCode::Cancel,
            0x9 => ErrorCode::CompressionError,
            0xa => ErrorCode::ConnectError,
            0xb => ErrorCode::EnhanceYourCalm,
            0xc => ErrorCode::InadequateSecurity,
            0xd => ErrorCode::Http11Required,
            other => ErrorCode::Unknown(other),
        }
    }

    /// Get error name
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::NoError => "NO_ERROR",
            ErrorCode::ProtocolError => "PROTOCOL_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::FlowControlError => "FLOW_CONTROL_ERROR",
            ErrorCode::SettingsTimeout => "SETTINGS_TIMEOUT",
            ErrorCode::StreamClosed => "STREAM_CLOSED",
            ErrorCode::FrameSizeError => "FRAME_SIZE_ERROR",
            ErrorCode::RefusedStream => "REFUSED_STREAM",
            ErrorCode::Cancel => "CANCEL",
            ErrorCode::CompressionError => "COMPRESSION_ERROR",
            ErrorCode::ConnectError => "CONNECT_ERROR",
            ErrorCode::EnhanceYourCalm => "ENHANCE_YOUR_CALM",
            ErrorCode::InadequateSecurity => "INADEQUATE_SECURITY",
            ErrorCode::Http11Required => "HTTP_1_1_REQUIRED",
            ErrorCode::Unknown(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:x})", self.name(), self.as_u32())
    }
}
