//! HPACK header codec wrapper
//!
//! The frame engine treats header blocks as opaque bytes; this wrapper is
//! the external codec the caller uses to produce and interpret them.
//! Compression state (dynamic table, Huffman coding) lives entirely inside
//! the `hpack` crate.

use crate::error::{Error, Result};
use hpack::{Decoder as HpackDecoder, Encoder as HpackEncoder};

/// Stateful HPACK encoder/decoder pair for one connection
///
/// HPACK is stateful in both directions, so a single codec instance must be
/// used for all header blocks on a connection, in order.
pub struct HeaderCodec {
    encoder: HpackEncoder<'static>,
    decoder: HpackDecoder<'static>,
}

impl HeaderCodec {
    /// Create a codec with empty dynamic tables
    pub fn new() -> Self {
        HeaderCodec {
            encoder: HpackEncoder::new(),
            decoder: HpackDecoder::new(),
        }
    }

    /// Encode a header list into a header block fragment
    pub fn encode(&mut self, headers: &[(&[u8], &[u8])]) -> Result<Vec<u8>> {
        let mut block = Vec::new();
        self.encoder
            .encode_into(headers.iter().copied(), &mut block)
            .map_err(|e| Error::Compression(format!("HPACK encode error: {}", e)))?;
        Ok(block)
    }

    /// Decode a header block fragment into a header list
    pub fn decode(&mut self, block: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.decoder
            .decode(block)
            .map_err(|e| Error::Compression(format!("HPACK decode error: {:?}", e)))
    }
}

impl Default for HeaderCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let mut codec = HeaderCodec::new();
        let headers: Vec<(&[u8], &[u8])> = vec![
            (b":method", b"GET"),
            (b":scheme", b"https"),
            (b":authority", b"example.com"),
            (b":path", b"/"),
        ];

        let block = codec.encode(&headers).unwrap();
        assert!(!block.is_empty());

        let decoded = codec.decode(&block).unwrap();
        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded[0], (b":method".to_vec(), b"GET".to_vec()));
        assert_eq!(decoded[3], (b":path".to_vec(), b"/".to_vec()));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let mut codec = HeaderCodec::new();
        // 0x3f prefix starts a table size update with a dangling varint
        assert!(codec.decode(&[0x3f]).is_err());
    }
}
