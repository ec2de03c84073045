//! h2trace - trace the HTTP/2 frames exchanged with a server
//!
//! Connects over TLS with ALPN, performs the connection preface, sends one
//! GET request and prints every frame until the server closes the
//! connection.

use bytes::Bytes;
use h2trace::frames::{Frame, HeadersFrame, PingFrame, SettingsFrame};
use h2trace::tls::TlsConfig;
use h2trace::{trace, transport, Error, H2Session, HeaderCodec, Result, CONNECTION_PREFACE};
use std::process::ExitCode;
use std::time::Duration;

const HTTPS_PORT: u16 = 443;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

fn main() -> ExitCode {
    let hostname = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            eprintln!("usage: h2trace <hostname>");
            return ExitCode::FAILURE;
        }
    };

    match run(&hostname) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("h2trace: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(hostname: &str) -> Result<()> {
    // TCP + TLS with ALPN; the frame engine gets a negotiated byte stream
    let tcp = transport::connect_host(hostname, HTTPS_PORT, Some(CONNECT_TIMEOUT))?;
    let config = TlsConfig::client()
        .alpn(&["h2"])?
        .servername(hostname)
        .build()?;
    let tls = config.connect(tcp)?;

    match tls.selected_alpn_protocol() {
        Some(b"h2") => {}
        other => return Err(Error::AlpnFailed(other.map(|p| p.to_vec()))),
    }

    let mut session = H2Session::new(tls);
    let mut hpack = HeaderCodec::new();

    // Connection preface plus our (empty) SETTINGS
    session.send_preface()?;
    trace::sent_bytes(CONNECTION_PREFACE);

    let settings = Frame::Settings(SettingsFrame::new(Vec::new()));
    trace::sent(&settings);
    session.send_frame(&settings)?;

    // Single GET on a client-initiated stream
    let block = hpack.encode(&[
        (b":method", b"GET"),
        (b":scheme", b"https"),
        (b":authority", hostname.as_bytes()),
        (b":path", b"/"),
    ])?;
    let request = Frame::Headers(HeadersFrame::new(1, Bytes::from(block), true, true));
    trace::sent(&request);
    session.send_frame(&request)?;

    // Decode and print everything the server sends
    loop {
        let frame = match session.read_frame() {
            Ok(frame) => frame,
            Err(Error::ConnectionClosed) => {
                println!("connection closed by peer");
                break;
            }
            Err(e) => {
                // Framing cannot resync after a codec error; drop the
                // connection and report
                let _ = session.close();
                return Err(e);
            }
        };

        trace::received(&frame);

        match &frame {
            Frame::Headers(h) => {
                let headers = hpack.decode(&h.header_block)?;
                trace::header_list(&headers);
            }
            Frame::Ping(p) if !p.ack => {
                let pong = Frame::Ping(PingFrame::ack(p.data));
                trace::sent(&pong);
                session.send_frame(&pong)?;
            }
            _ => {}
        }
    }

    session.close()?;
    Ok(())
}
