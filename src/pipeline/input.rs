//! Input resolution: load bytes from a local file, a URL, or stdin.
//!
//! Alongside the bytes we keep what the encoder needs to describe them: a
//! display filename and, for downloads, the server's `Content-Type`. The type
//! indicator is derived afterwards by [`detect_type_indicator`], so a caller's
//! filename override also steers extension-based detection.
//!
//! Every source is read whole and capped at `max_input_bytes`.

use crate::config::EncodeConfig;
use crate::error::B64MdError;
use crate::pipeline::markdown::extension;
use crate::pipeline::uti::TypeRegistry;
use image::ImageFormat;
use percent_encoding::percent_decode_str;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Input argument meaning "read stdin".
pub const STDIN_INPUT: &str = "-";

/// Display filename for stdin payloads.
pub const STDIN_FILENAME: &str = "pasted-image";

/// Display filename when a URL has no usable last path segment.
pub const DOWNLOAD_FILENAME: &str = "downloaded-image";

/// Where the bytes came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    Url(String),
    Local(PathBuf),
}

/// Bytes plus what we know about them before type detection.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub source: InputSource,
    pub bytes: Vec<u8>,
    pub filename: String,
    /// `Content-Type` response header for URL inputs.
    pub content_type: Option<String>,
}

impl LoadedInput {
    /// Identifier used when nothing else identifies the payload.
    ///
    /// Raw stdin data is treated as an image; files and downloads as opaque data.
    pub fn default_type_indicator(&self) -> &'static str {
        match self.source {
            InputSource::Stdin => "public.image",
            _ => "public.data",
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Load the input named by `input`.
pub async fn resolve_input(input: &str, config: &EncodeConfig) -> Result<LoadedInput, B64MdError> {
    let limit = config.max_input_bytes;
    if input.is_empty() {
        return Err(B64MdError::InvalidInput {
            input: input.to_string(),
        });
    }
    if input == STDIN_INPUT {
        read_stdin(limit).await
    } else if is_url(input) {
        download_url(input, config.download_timeout_secs, limit).await
    } else {
        read_local(input, limit).await
    }
}

/// Pick a type indicator for a payload.
///
/// Order: `Content-Type` through the registry, filename extension through the
/// registry, magic-byte sniffing, then `default_identifier`.
pub fn detect_type_indicator(
    registry: &dyn TypeRegistry,
    filename: &str,
    bytes: &[u8],
    content_type: Option<&str>,
    default_identifier: &str,
) -> String {
    if let Some(id) = content_type.and_then(|ct| registry.identifier_for_mime_type(ct)) {
        debug!("Type from Content-Type {:?}: {}", content_type, id);
        return id.to_string();
    }
    if let Some(id) = extension(filename).and_then(|ext| registry.identifier_for_extension(&ext)) {
        debug!("Type from extension of '{}': {}", filename, id);
        return id.to_string();
    }
    if let Some(id) = sniff_type_indicator(bytes) {
        debug!("Type from magic bytes: {}", id);
        return id.to_string();
    }
    default_identifier.to_string()
}

/// Identify common image formats from their leading bytes.
pub fn sniff_type_indicator(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    let id = match format {
        ImageFormat::Png => "public.png",
        ImageFormat::Jpeg => "public.jpeg",
        ImageFormat::Gif => "com.compuserve.gif",
        ImageFormat::Tiff => "public.tiff",
        ImageFormat::WebP => "org.webmproject.webp",
        ImageFormat::Bmp => "com.microsoft.bmp",
        ImageFormat::Ico => "com.microsoft.ico",
        ImageFormat::Avif => "public.avif",
        _ => "public.image",
    };
    Some(id)
}

/// Last non-empty path segment of a URL, percent-decoded, or [`DOWNLOAD_FILENAME`].
pub fn filename_from_url(url: &str) -> String {
    let last = reqwest::Url::parse(url).ok().and_then(|parsed| {
        let segment = parsed.path_segments()?.next_back()?.to_string();
        Some(segment)
    });

    last.map(|s| percent_decode_str(&s).decode_utf8_lossy().into_owned())
        .filter(|s| !s.is_empty() && !s.contains('/'))
        .unwrap_or_else(|| DOWNLOAD_FILENAME.to_string())
}

async fn read_stdin(limit: u64) -> Result<LoadedInput, B64MdError> {
    let bytes = read_capped(tokio::io::stdin(), limit, STDIN_INPUT)
        .await
        .map_err(|e| match e {
            CappedReadError::TooLarge => B64MdError::InputTooLarge {
                input: STDIN_INPUT.to_string(),
                limit,
            },
            CappedReadError::Io(source) => B64MdError::ReadFailed {
                path: PathBuf::from("<stdin>"),
                source,
            },
        })?;

    debug!("Read {} bytes from stdin", bytes.len());
    Ok(LoadedInput {
        source: InputSource::Stdin,
        bytes,
        filename: STDIN_FILENAME.to_string(),
        content_type: None,
    })
}

#[derive(Debug)]
enum CappedReadError {
    TooLarge,
    Io(std::io::Error),
}

/// Read `reader` to the end, holding at most `limit + 1` bytes.
async fn read_capped<R>(reader: R, limit: u64, label: &str) -> Result<Vec<u8>, CappedReadError>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .await
        .map_err(CappedReadError::Io)?;
    if bytes.len() as u64 > limit {
        debug!("'{}' exceeded {} bytes", label, limit);
        return Err(CappedReadError::TooLarge);
    }
    Ok(bytes)
}

/// Read a local file, validating that it is a readable regular file.
async fn read_local(path_str: &str, limit: u64) -> Result<LoadedInput, B64MdError> {
    let path = PathBuf::from(path_str);

    let meta = tokio::fs::metadata(&path)
        .await
        .map_err(|e| io_error(&path, e))?;
    if !meta.is_file() {
        return Err(B64MdError::NotAFile { path });
    }
    if meta.len() > limit {
        return Err(B64MdError::InputTooLarge {
            input: path_str.to_string(),
            limit,
        });
    }

    let bytes = tokio::fs::read(&path).await.map_err(|e| io_error(&path, e))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path_str.to_string());

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(LoadedInput {
        source: InputSource::Local(path),
        bytes,
        filename,
        content_type: None,
    })
}

fn io_error(path: &Path, e: std::io::Error) -> B64MdError {
    let path = path.to_path_buf();
    match e.kind() {
        ErrorKind::NotFound => B64MdError::FileNotFound { path },
        ErrorKind::PermissionDenied => B64MdError::PermissionDenied { path },
        _ => B64MdError::ReadFailed { path, source: e },
    }
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64, limit: u64) -> Result<LoadedInput, B64MdError> {
    info!("Downloading image from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| B64MdError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let mut response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            B64MdError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            B64MdError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(B64MdError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    if response.content_length().is_some_and(|len| len > limit) {
        return Err(B64MdError::InputTooLarge {
            input: url.to_string(),
            limit,
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    // Chunked responses carry no Content-Length; stop once the running total
    // passes the limit instead of buffering the whole body.
    let mut bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| B64MdError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
    {
        if (bytes.len() + chunk.len()) as u64 > limit {
            return Err(B64MdError::InputTooLarge {
                input: url.to_string(),
                limit,
            });
        }
        bytes.extend_from_slice(&chunk);
    }

    info!("Downloaded {} bytes", bytes.len());

    Ok(LoadedInput {
        source: InputSource::Url(url.to_string()),
        bytes,
        filename: filename_from_url(url),
        content_type,
    })
}
