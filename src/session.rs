//! HTTP/2 connection session
//!
//! An `H2Session` owns an already-negotiated transport exclusively and
//! drives the preface send and the blocking frame read loop. It keeps no
//! protocol state beyond the preface-sent flag: this client inspects frames,
//! it does not track stream lifecycles.
//!
//! HTTP/2 framing is not self-resynchronizing, so the session never skips a
//! malformed frame; every codec error ends the session.

use crate::codec::FrameCodec;
use crate::error::{Error, Result};
use crate::frames::Frame;
use crate::transport::{PollEvents, SessionOps};
use crate::{CONNECTION_PREFACE, FRAME_HEADER_SIZE};
use std::time::Duration;

/// HTTP/2 connection session over an arbitrary transport
pub struct H2Session<S: SessionOps> {
    transport: S,
    timeout: Option<Duration>,
    preface_sent: bool,
}

impl<S: SessionOps> H2Session<S> {
    /// Wrap an already-negotiated, reliable, ordered byte stream
    pub fn new(transport: S) -> Self {
        H2Session {
            transport,
            timeout: None,
            preface_sent: false,
        }
    }

    /// Set the per-operation timeout (None blocks indefinitely)
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Send the 24-byte connection preface
    ///
    /// Must be called exactly once, before any frame. A second call fails
    /// with `Error::Protocol`.
    pub fn send_preface(&mut self) -> Result<()> {
        if self.preface_sent {
            return Err(Error::Protocol(
                "connection preface already sent".to_string(),
            ));
        }
        self.write_all(CONNECTION_PREFACE)?;
        self.preface_sent = true;
        Ok(())
    }

    /// Serialize and send a frame
    ///
    /// Header and body are encoded into one buffer and written through a
    /// single write loop, so a concurrent writer on the same transport can
    /// never interleave between them.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        let encoded = FrameCodec::encode(frame)?;
        self.write_all(&encoded)
    }

    /// Read and decode exactly one frame
    ///
    /// Blocks until a full frame is available. EOF mid-read surfaces as
    /// `ConnectionClosed`.
    pub fn read_frame(&mut self) -> Result<Frame> {
        let mut header_bytes = [0u8; FRAME_HEADER_SIZE];
        self.read_exact(&mut header_bytes)?;

        let header = FrameCodec::decode_header(&header_bytes);

        let mut payload = vec![0u8; header.length];
        if header.length > 0 {
            self.read_exact(&mut payload)?;
        }

        FrameCodec::decode_body(&header, payload.into())
    }

    /// Lazy sequence of decoded frames
    ///
    /// Single-pass: the iterator ends when the peer closes the connection.
    /// Any other error is yielded once and terminates the sequence.
    pub fn frames(&mut self) -> Frames<'_, S> {
        Frames {
            session: self,
            done: false,
        }
    }

    /// Close the underlying transport
    pub fn close(&mut self) -> Result<()> {
        self.transport.close()
    }

    /// Get a reference to the transport
    pub fn get_ref(&self) -> &S {
        &self.transport
    }

    /// Get a mutable reference to the transport
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.transport
    }

    /// Fill `buf` completely, looping over partial reads
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            if !self.transport.poll(PollEvents::Read, self.timeout)? {
                return Err(Error::Timeout);
            }
            let n = self.transport.read(&mut buf[filled..])?;
            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
            filled += n;
        }
        Ok(())
    }

    /// Write `buf` completely, looping over partial writes
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < buf.len() {
            if !self.transport.poll(PollEvents::Write, self.timeout)? {
                return Err(Error::Timeout);
            }
            let n = self.transport.write(&buf[written..])?;
            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
            written += n;
        }
        self.transport.flush()
    }
}

/// Iterator over incoming frames, terminating on connection close
pub struct Frames<'a, S: SessionOps> {
    session: &'a mut H2Session<S>,
    done: bool,
}

impl<S: SessionOps> Iterator for Frames<'_, S> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.session.read_frame() {
            Ok(frame) => Some(Ok(frame)),
            Err(Error::ConnectionClosed) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::SettingsFrame;
    use std::io::{Cursor, Read};

    /// In-memory transport: scripted input, captured output
    struct MockTransport {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
        /// Cap on bytes returned per read, to exercise partial reads
        read_chunk: usize,
    }

    impl MockTransport {
        fn new(input: Vec<u8>) -> Self {
            MockTransport {
                input: Cursor::new(input),
                output: Vec::new(),
                read_chunk: usize::MAX,
            }
        }
    }

    impl SessionOps for MockTransport {
        fn poll(&self, _events: PollEvents, _timeout: Option<Duration>) -> Result<bool> {
            Ok(true)
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            let limit = self.read_chunk.min(buf.len());
            Ok(self.input.read(&mut buf[..limit])?)
        }

        fn write(&mut self, buf: &[u8]) -> Result<usize> {
            self.output.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_send_preface_once() {
        let mut session = H2Session::new(MockTransport::new(Vec::new()));
        session.send_preface().unwrap();
        assert_eq!(session.get_ref().output, CONNECTION_PREFACE);

        let err = session.send_preface();
        assert!(matches!(err, Err(Error::Protocol(_))));
    }

    #[test]
    fn test_read_frame_accumulates_partial_reads() {
        let encoded = FrameCodec::encode(&Frame::Settings(SettingsFrame::ack())).unwrap();
        let mut transport = MockTransport::new(encoded.to_vec());
        transport.read_chunk = 1; // one byte at a time

        let mut session = H2Session::new(transport);
        match session.read_frame().unwrap() {
            Frame::Settings(f) => assert!(f.ack),
            other => panic!("expected SETTINGS ACK, got {:?}", other),
        }
    }

    #[test]
    fn test_read_frame_eof_is_connection_closed() {
        // 5 bytes: not even a full header
        let mut session = H2Session::new(MockTransport::new(vec![0u8; 5]));
        assert!(matches!(
            session.read_frame(),
            Err(Error::ConnectionClosed)
        ));
    }

    #[test]
    fn test_frames_iterator_ends_on_close() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&FrameCodec::encode(&Frame::Settings(SettingsFrame::new(
            Vec::new(),
        )))
        .unwrap());
        bytes.extend_from_slice(
            &FrameCodec::encode(&Frame::Settings(SettingsFrame::ack())).unwrap(),
        );

        let mut session = H2Session::new(MockTransport::new(bytes));
        let frames: Vec<_> = session.frames().collect();
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.is_ok()));
    }
}
