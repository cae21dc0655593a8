//! Output types returned by the encoding entry points.

use crate::config::OutputFormat;
use crate::pipeline::markdown::EncodedResult;
use serde::Serialize;

/// What was encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    /// Display filename used for the label and extension fallback.
    pub filename: String,
    /// Type indicator the MIME type was resolved from.
    pub type_indicator: String,
    /// Resolved MIME type embedded in the data URL.
    pub mime_type: String,
    /// Size of the raw input in bytes.
    pub byte_len: usize,
    /// Markdown reference label, e.g. `photo-251221-102030`.
    pub reference: String,
}

/// Result of one encode run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeOutput {
    pub result: EncodedResult,
    pub source: SourceInfo,
    pub format: OutputFormat,
}

impl EncodeOutput {
    /// The text selected by `format`.
    pub fn text(&self) -> &str {
        match self.format {
            OutputFormat::Base64 => self.result.base64_text(),
            OutputFormat::Markdown => self.result.markdown(),
        }
    }
}
