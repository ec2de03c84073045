//! HTTP/2 settings identifiers
//!
//! SETTINGS frames carry a sequence of (identifier, value) entries as
//! defined in RFC 7540 Section 6.5.2. Identifiers outside the registered
//! range are preserved rather than dropped, per the protocol's
//! extensibility rule.

use std::fmt;

/// HTTP/2 settings identifiers (RFC 7540 Section 6.5.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingId {
    /// SETTINGS_HEADER_TABLE_SIZE (0x1)
    /// Maximum size of the header compression table
    HeaderTableSize,

    /// SETTINGS_ENABLE_PUSH (0x2)
    /// Used to disable server push
    EnablePush,

    /// SETTINGS_MAX_CONCURRENT_STREAMS (0x3)
    /// Maximum number of concurrent streams
    MaxConcurrentStreams,

    /// SETTINGS_INITIAL_WINDOW_SIZE (0x4)
    /// Sender's initial window size for stream-level flow control
    InitialWindowSize,

    /// SETTINGS_MAX_FRAME_SIZE (0x5)
    /// Size of the largest frame payload the sender accepts
    MaxFrameSize,

    /// SETTINGS_MAX_HEADER_LIST_SIZE (0x6)
    /// Advisory maximum size of a header list
    MaxHeaderListSize,

    /// Unregistered identifier, raw value preserved
    Unknown(u16),
}

impl SettingId {
    /// Convert to u16
    pub fn as_u16(self) -> u16 {
        match self {
            SettingId::HeaderTableSize => 0x1,
            SettingId::EnablePush => 0x2,
            SettingId::MaxConcurrentStreams => 0x3,
            SettingId::InitialWindowSize => 0x4,
            SettingId::MaxFrameSize => 0x5,
            SettingId::MaxHeaderListSize => 0x6,
            SettingId::Unknown(id) => id,
        }
    }

    /// Create from u16 (total: never fails)
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x1 => SettingId::HeaderTableSize,
            0x2 => SettingId::EnablePush,
            0x3 => SettingId::MaxConcurrentStreams,
            0x4 => SettingId::InitialWindowSize,
            0x5 => SettingId::MaxFrameSize,
            0x6 => SettingId::MaxHeaderListSize,
            other => SettingId::Unknown(other),
        }
    }

    /// Get identifier name
    pub fn name(&self) -> &'static str {
        match self {
            SettingId::HeaderTableSize => "HEADER_TABLE_SIZE",
            SettingId::EnablePush => "ENABLE_PUSH",
            SettingId::MaxConcurrentStreams => "MAX_CONCURRENT_STREAMS",
            SettingId::InitialWindowSize => "INITIAL_WINDOW_SIZE",
            SettingId::MaxFrameSize => "MAX_FRAME_SIZE",
            SettingId::MaxHeaderListSize => "MAX_HEADER_LIST_SIZE",
            SettingId::Unknown(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:x})", self.name(), self.as_u16())
    }
}
