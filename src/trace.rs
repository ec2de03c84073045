//! Trace output formatting
//!
//! Renders sent and received traffic as one summary line per frame
//! (prefixed with a direction arrow) plus indented detail lines for the
//! bodies worth expanding. This is pure presentation over the decoded
//! `Frame` model; nothing here touches the wire.

use crate::frames::Frame;

/// Longest DATA preview printed before truncating
const DATA_PREVIEW_LEN: usize = 70;

/// Print an outbound raw byte sequence (the connection preface)
pub fn sent_bytes(bytes: &[u8]) {
    println!(">  {}", bytes.escape_ascii());
}

/// Print an outbound frame
pub fn sent(frame: &Frame) {
    println!(">  {}", summary(frame));
}

/// Print an inbound frame with its detail lines
pub fn received(frame: &Frame) {
    println!("<  {}", summary(frame));
    for line in details(frame) {
        println!("    {}", line);
    }
}

/// Print a decoded header list under a HEADERS frame
pub fn header_list(headers: &[(Vec<u8>, Vec<u8>)]) {
    for (name, value) in headers {
        println!("    {}: {}", name.escape_ascii(), value.escape_ascii());
    }
}

/// One-line frame summary: type, stream, flags of interest, body length
pub fn summary(frame: &Frame) -> String {
    let mut line = format!("{} stream_id:{}", frame.name(), frame.stream_id());

    match frame {
        Frame::Data(f) => {
            line.push_str(&format!(" len:{}", f.data.len()));
            if f.end_stream {
                line.push_str(" END_STREAM");
            }
        }
        Frame::Headers(f) => {
            line.push_str(&format!(" len:{}", f.header_block.len()));
            if f.end_headers {
                line.push_str(" END_HEADERS");
            }
            if f.end_stream {
                line.push_str(" END_STREAM");
            }
        }
        Frame::Settings(f) => {
            if f.ack {
                line.push_str(" ACK");
            } else {
                line.push_str(&format!(" entries:{}", f.settings.len()));
            }
        }
        Frame::Ping(f) => {
            if f.ack {
                line.push_str(" ACK");
            }
        }
        Frame::PushPromise(f) => {
            line.push_str(&format!(" promised_stream_id:{}", f.promised_stream_id));
        }
        Frame::WindowUpdate(f) => {
            line.push_str(&format!(" increment:{}", f.size_increment));
        }
        Frame::Continuation(f) => {
            line.push_str(&format!(" len:{}", f.header_block.len()));
            if f.end_headers {
                line.push_str(" END_HEADERS");
            }
        }
        Frame::Unknown(f) => {
            line.push_str(&format!(
                " type:0x{:x} flags:0x{:x} len:{}",
                f.kind,
                f.flags.as_u8(),
                f.payload.len()
            ));
        }
        _ => {}
    }

    line
}

/// Indented detail lines for frame bodies worth expanding
fn details(frame: &Frame) -> Vec<String> {
    match frame {
        Frame::Data(f) => {
            if f.data.is_empty() {
                return Vec::new();
            }
            let line = if f.data.len() <= DATA_PREVIEW_LEN {
                format!("{}", f.data.escape_ascii())
            } else {
                format!("{}...", f.data[..DATA_PREVIEW_LEN].escape_ascii())
            };
            vec![line]
        }
        Frame::Settings(f) if !f.ack => f
            .settings
            .iter()
            .map(|(id, value)| format!("{}: {}", id, value))
            .collect(),
        Frame::RstStream(f) => vec![format!("error_code:{}", f.error_code)],
        Frame::Goaway(f) => {
            let mut lines = vec![format!(
                "error_code:{} last_stream_id:{}",
                f.error_code, f.last_stream_id
            )];
            if !f.debug_data.is_empty() {
                lines.push(format!("debug:{}", f.debug_data.escape_ascii()));
            }
            lines
        }
        Frame::Priority(f) => vec![format!(
            "dependency:{} exclusive:{} priority:{}",
            f.priority.stream_dependency,
            f.priority.exclusive,
            f.priority.weight as u16 + 1
        )],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::frames::{DataFrame, GoawayFrame, SettingsFrame};
    use crate::settings::SettingId;
    use bytes::Bytes;

    #[test]
    fn test_summary_settings() {
        let frame = Frame::Settings(SettingsFrame::new(vec![(SettingId::MaxFrameSize, 16384)]));
        assert_eq!(summary(&frame), "SETTINGS stream_id:0 entries:1");

        let ack = Frame::Settings(SettingsFrame::ack());
        assert_eq!(summary(&ack), "SETTINGS stream_id:0 ACK");
    }

    #[test]
    fn test_summary_data_end_stream() {
        let frame = Frame::Data(DataFrame::new(1, Bytes::from("hello"), true));
        assert_eq!(summary(&frame), "DATA stream_id:1 len:5 END_STREAM");
    }

    #[test]
    fn test_data_preview_truncated() {
        let frame = Frame::Data(DataFrame::new(1, Bytes::from(vec![b'a'; 100]), false));
        let lines = details(&frame);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("..."));
    }

    #[test]
    fn test_goaway_details() {
        let frame = Frame::Goaway(GoawayFrame::new(5, ErrorCode::NoError, Bytes::new()));
        let lines = details(&frame);
        assert_eq!(lines, vec!["error_code:NO_ERROR (0x0) last_stream_id:5"]);
    }
}
