//! Error types for the b64md library.
//!
//! The encoder core ([`crate::pipeline::encode`], [`crate::pipeline::mime`],
//! [`crate::pipeline::markdown`]) is total: every input has a defined output,
//! so none of those functions return `Result`. Failures come from the shell
//! around it (loading input, writing output) and are reported through
//! [`B64MdError`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the b64md library.
#[derive(Debug, Error)]
pub enum B64MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The path exists but is a directory or other non-regular file.
    #[error("'{path}' is not a regular file")]
    NotAFile { path: PathBuf },

    /// Reading the file failed after it was opened.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input string is empty or otherwise unusable.
    #[error("Invalid input '{input}': expected a file path, an HTTP/HTTPS URL, or '-' for stdin")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// Input is larger than `max_input_bytes`.
    #[error("Input '{input}' exceeds the {limit}-byte limit\nRaise it with --max-bytes.")]
    InputTooLarge { input: String, limit: u64 },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = B64MdError::FileNotFound {
            path: PathBuf::from("/tmp/missing.png"),
        };
        assert!(e.to_string().contains("/tmp/missing.png"));
    }

    #[test]
    fn input_too_large_display() {
        let e = B64MdError::InputTooLarge {
            input: "big.tiff".into(),
            limit: 1024,
        };
        let msg = e.to_string();
        assert!(msg.contains("big.tiff"), "got: {msg}");
        assert!(msg.contains("1024-byte"), "got: {msg}");
    }

    #[test]
    fn download_timeout_display() {
        let e = B64MdError::DownloadTimeout {
            url: "https://example.com/a.png".into(),
            secs: 30,
        };
        assert!(e.to_string().contains("30s"));
        assert!(e.to_string().contains("example.com"));
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = B64MdError::OutputWriteFailed {
            path: PathBuf::from("out.md"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("disk full"));
    }
}
