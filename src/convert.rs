//! Entry points: load an input, encode it, and hand back an [`EncodeOutput`].
//!
//! The pure work happens in [`crate::pipeline`]; this module only wires
//! input resolution, type detection and the config overrides together.
//! Encoding runs on the blocking pool so a multi-megabyte image doesn't stall
//! a Tokio worker.

use crate::config::EncodeConfig;
use crate::error::B64MdError;
use crate::output::{EncodeOutput, SourceInfo};
use crate::pipeline::markdown::{self, reference_label};
use crate::pipeline::uti::StaticTypeRegistry;
use crate::pipeline::{encode, input, mime};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Encode a local file, URL, or stdin (`-`).
///
/// # Errors
/// Only input loading fails: missing or unreadable files, failed downloads,
/// inputs over `max_input_bytes`. Encoding itself cannot fail.
pub async fn encode_input(
    input_str: impl AsRef<str>,
    config: &EncodeConfig,
) -> Result<EncodeOutput, B64MdError> {
    let start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Encoding: {}", input_str);

    let loaded = input::resolve_input(input_str, config).await?;
    let filename = config
        .filename
        .clone()
        .unwrap_or_else(|| loaded.filename.clone());
    let type_indicator = match config.type_indicator {
        Some(ref id) => id.clone(),
        None => input::detect_type_indicator(
            StaticTypeRegistry::shared(),
            &filename,
            &loaded.bytes,
            loaded.content_type.as_deref(),
            loaded.default_type_indicator(),
        ),
    };

    let config = config.clone();
    let output = tokio::task::spawn_blocking(move || {
        build_output(&loaded.bytes, filename, type_indicator, &config)
    })
    .await
    .map_err(|e| B64MdError::Internal(format!("Encode task panicked: {}", e)))?;

    info!(
        "Encoded {} bytes as {} in {}ms",
        output.source.byte_len,
        output.source.mime_type,
        start.elapsed().as_millis()
    );
    Ok(output)
}

/// Encode bytes already in memory. No I/O.
///
/// The type indicator comes from `config.type_indicator`, else the filename
/// extension, else magic bytes, else `public.data`.
pub fn encode_bytes(bytes: &[u8], filename: &str, config: &EncodeConfig) -> EncodeOutput {
    let filename = config
        .filename
        .clone()
        .unwrap_or_else(|| filename.to_string());
    let type_indicator = config.type_indicator.clone().unwrap_or_else(|| {
        input::detect_type_indicator(
            StaticTypeRegistry::shared(),
            &filename,
            bytes,
            None,
            "public.data",
        )
    });
    build_output(bytes, filename, type_indicator, config)
}

/// Encode and write the selected text to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn encode_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &EncodeConfig,
) -> Result<EncodeOutput, B64MdError> {
    let output = encode_input(input_str, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| B64MdError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);
    tokio::fs::write(&tmp_path, output.text())
        .await
        .map_err(|e| B64MdError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        // Don't leave the temp file next to an output we never produced.
        if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
            warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
        }
        return Err(B64MdError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }

    debug!("Wrote {} bytes to {}", output.text().len(), path.display());
    Ok(output)
}

/// Synchronous wrapper around [`encode_input`].
///
/// Creates a temporary tokio runtime internally.
pub fn encode_sync(
    input_str: impl AsRef<str>,
    config: &EncodeConfig,
) -> Result<EncodeOutput, B64MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| B64MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(encode_input(input_str, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn build_output(
    bytes: &[u8],
    filename: String,
    type_indicator: String,
    config: &EncodeConfig,
) -> EncodeOutput {
    let timestamp = config.timestamp_or_now();
    let mime_type = mime::resolve_mime_type(&type_indicator, &filename);
    let base64_text = encode::encode(bytes);
    debug!(
        "'{}' ({}) → {} → {} chars base64",
        filename,
        type_indicator,
        mime_type,
        base64_text.len()
    );

    let result = markdown::build(base64_text, &filename, &mime_type, timestamp);
    EncodeOutput {
        result,
        source: SourceInfo {
            reference: reference_label(&filename, timestamp),
            filename,
            type_indicator,
            mime_type,
            byte_len: bytes.len(),
        },
        format: config.output_format,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use time::OffsetDateTime;

    fn pinned(format: OutputFormat) -> EncodeConfig {
        EncodeConfig::builder()
            .output_format(format)
            .timestamp(OffsetDateTime::UNIX_EPOCH)
            .build()
            .unwrap()
    }

    #[test]
    fn encode_bytes_matches_make_markdown() {
        let out = encode_bytes(b"Hello", "hello.txt", &pinned(OutputFormat::Markdown));
        let expected = markdown::make_markdown(
            b"Hello",
            "hello.txt",
            "public.plain-text",
            OffsetDateTime::UNIX_EPOCH,
        );
        assert_eq!(out.result, expected);
        assert_eq!(out.text(), expected.markdown());
        assert_eq!(out.source.type_indicator, "public.plain-text");
        assert_eq!(out.source.reference, "hello-700101-000000");
        assert_eq!(out.source.byte_len, 5);
    }

    #[test]
    fn base64_format_selects_base64_text() {
        let out = encode_bytes(&[1, 2, 3, 4], "example.png", &pinned(OutputFormat::Base64));
        assert_eq!(out.text(), "AQIDBA==");
        assert_eq!(out.source.mime_type, "image/png");
    }

    #[test]
    fn overrides_win_over_detection() {
        let config = EncodeConfig::builder()
            .filename("renamed.gif")
            .type_indicator("public.jpeg")
            .timestamp(OffsetDateTime::UNIX_EPOCH)
            .build()
            .unwrap();
        let out = encode_bytes(&[0], "original.png", &config);
        assert_eq!(out.source.filename, "renamed.gif");
        assert_eq!(out.source.mime_type, "image/jpeg");
        assert!(out.result.markdown().starts_with("![renamed.gif][renamed-700101-000000]"));
    }

    #[test]
    fn unknown_bytes_are_octet_stream() {
        let out = encode_bytes(b"\x00\x01", "blob", &pinned(OutputFormat::Markdown));
        assert_eq!(out.source.type_indicator, "public.data");
        assert_eq!(out.source.mime_type, "application/octet-stream");
    }

    #[test]
    fn json_shape() {
        let out = encode_bytes(&[1, 2, 3, 4], "example.png", &pinned(OutputFormat::Markdown));
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["format"], "markdown");
        assert_eq!(v["result"]["base64_text"], "AQIDBA==");
        assert_eq!(v["source"]["mime_type"], "image/png");
    }
}
