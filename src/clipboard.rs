//! Copy text to the system clipboard through the terminal (OSC 52).
//!
//! The terminal emulator decodes the payload and sets the clipboard, which
//! also works over SSH. Terminals that don't support OSC 52 ignore it.
//!
//! The escape goes to the controlling terminal, never stdout, so redirected
//! or piped output stays clean.

use crate::pipeline::encode::encode;
use std::fs::OpenOptions;
use std::io::{self, Write};

/// Write `ESC ] 52 ; c ; <base64(text)> BEL` to `out` and flush.
pub fn copy_osc52<W: Write>(text: &str, out: &mut W) -> io::Result<()> {
    write!(out, "\x1b]52;c;{}\x07", encode(text.as_bytes()))?;
    out.flush()
}

/// Handle on the controlling terminal: `/dev/tty`, else stderr.
pub fn terminal_writer() -> Box<dyn Write> {
    match OpenOptions::new().write(true).open("/dev/tty") {
        Ok(tty) => Box::new(tty),
        Err(_) => Box::new(io::stderr()),
    }
}

/// [`copy_osc52`] to the controlling terminal.
pub fn copy_to_terminal(text: &str) -> io::Result<()> {
    let mut out = terminal_writer();
    copy_osc52(text, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_osc52_sequence() {
        let mut buf = Vec::new();
        copy_osc52("Hello", &mut buf).unwrap();
        assert_eq!(buf, b"\x1b]52;c;SGVsbG8=\x07");
    }

    #[test]
    fn empty_text() {
        let mut buf = Vec::new();
        copy_osc52("", &mut buf).unwrap();
        assert_eq!(buf, b"\x1b]52;c;\x07");
    }

    #[test]
    fn terminal_writer_is_always_available() {
        // Falls back to stderr when there is no controlling terminal (CI).
        let mut out = terminal_writer();
        assert!(out.flush().is_ok());
    }
}
