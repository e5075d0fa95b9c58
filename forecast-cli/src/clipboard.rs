use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::io::{self, Write};

/// OSC 52 "set clipboard" escape carrying `text`.
pub fn osc52(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

/// Ask the terminal to put `text` on the system clipboard.
///
/// Terminals without OSC 52 support silently ignore the sequence.
pub fn copy(text: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(osc52(text).as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_base64_payload() {
        assert_eq!(osc52("hi"), "\x1b]52;c;aGk=\x07");
        assert_eq!(osc52(""), "\x1b]52;c;\x07");
    }

    #[test]
    fn payload_has_no_raw_newlines() {
        let seq = osc52("{\n  \"temp\": 13\n}");
        assert!(!seq.contains('\n'));
    }
}
