//! Configuration for the encoding shell.
//!
//! The pure core takes everything it needs as arguments. [`EncodeConfig`]
//! covers what sits around it: which output is selected, input overrides, a
//! pinned timestamp for reproducible output, and limits on input loading.

use crate::error::B64MdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Default cap on input size (50 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Configuration for an encode run.
///
/// # Example
/// ```rust
/// use b64md::{EncodeConfig, OutputFormat};
///
/// let config = EncodeConfig::builder()
///     .output_format(OutputFormat::Markdown)
///     .filename("diagram.png")
///     .build()
///     .unwrap();
/// assert_eq!(config.output_format, OutputFormat::Markdown);
/// ```
#[derive(Clone)]
pub struct EncodeConfig {
    /// Which field of the result is displayed, written or copied. Default: Base64.
    pub output_format: OutputFormat,

    /// Display filename override. Used for the Markdown label and the
    /// extension fallback. If None, derived from the input.
    pub filename: Option<String>,

    /// Type indicator override (e.g. `public.png`). If None, detected from
    /// the input.
    pub type_indicator: Option<String>,

    /// Timestamp for the Markdown reference. If None, the current time.
    pub timestamp: Option<OffsetDateTime>,

    /// Download timeout for URL inputs in seconds. Default: 30.
    pub download_timeout_secs: u64,

    /// Inputs larger than this are rejected. Default: 50 MiB.
    pub max_input_bytes: u64,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            filename: None,
            type_indicator: None,
            timestamp: None,
            download_timeout_secs: 30,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl fmt::Debug for EncodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeConfig")
            .field("output_format", &self.output_format)
            .field("filename", &self.filename)
            .field("type_indicator", &self.type_indicator)
            .field("timestamp", &self.timestamp.map(|t| t.unix_timestamp()))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("max_input_bytes", &self.max_input_bytes)
            .finish()
    }
}

impl EncodeConfig {
    /// Create a new builder for `EncodeConfig`.
    pub fn builder() -> EncodeConfigBuilder {
        EncodeConfigBuilder {
            config: Self::default(),
        }
    }

    /// The pinned timestamp, or now.
    pub fn timestamp_or_now(&self) -> OffsetDateTime {
        self.timestamp.unwrap_or_else(OffsetDateTime::now_utc)
    }
}

/// Builder for [`EncodeConfig`].
#[derive(Debug)]
pub struct EncodeConfigBuilder {
    config: EncodeConfig,
}

impl EncodeConfigBuilder {
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.config.filename = Some(name.into());
        self
    }

    pub fn type_indicator(mut self, identifier: impl Into<String>) -> Self {
        self.config.type_indicator = Some(identifier.into());
        self
    }

    pub fn timestamp(mut self, ts: OffsetDateTime) -> Self {
        self.config.timestamp = Some(ts);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn max_input_bytes(mut self, n: u64) -> Self {
        self.config.max_input_bytes = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<EncodeConfig, B64MdError> {
        let c = &self.config;
        if c.download_timeout_secs == 0 {
            return Err(B64MdError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_input_bytes == 0 {
            return Err(B64MdError::InvalidConfig(
                "Maximum input size must be ≥ 1 byte".into(),
            ));
        }
        if c.filename.as_deref().is_some_and(str::is_empty) {
            return Err(B64MdError::InvalidConfig(
                "Filename override must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which representation the shell presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Bare Base64 text. (default)
    #[default]
    Base64,
    /// Reference-style Markdown image with a data URL.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Base64 => f.write_str("base64"),
            OutputFormat::Markdown => f.write_str("markdown"),
        }
    }
}
