//! Byte buffer → standard Base64 text.
//!
//! RFC 4648 base alphabet (`+` and `/`), `=` padding, no line wrapping. This
//! is what a `data:` URL expects and what a Markdown renderer will accept on
//! a single definition line.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Encode `bytes` as standard padded Base64. Empty input yields `""`.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_sequence() {
        assert_eq!(encode(&[0x01, 0x02, 0x03, 0x04]), "AQIDBA==");
    }

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn uses_standard_alphabet_without_wrapping() {
        // 0xfb 0xff → "+/8=" exercises both non-alphanumeric characters.
        assert_eq!(encode(&[0xfb, 0xff]), "+/8=");

        let long = vec![0u8; 300];
        let b64 = encode(&long);
        assert!(!b64.contains('\n'));
        assert_eq!(b64.len(), 400);
    }

    #[test]
    fn decodes_back() {
        let data = b"Hello";
        let decoded = STANDARD.decode(encode(data)).expect("valid base64");
        assert_eq!(decoded, data);
    }
}
