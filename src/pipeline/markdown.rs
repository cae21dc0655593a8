//! Reference-style Markdown with an embedded `data:` URL.
//!
//! ```text
//! ![photo.png][photo-251221-102030]
//!
//! [photo-251221-102030]: data:image/png;base64,iVBORw0KGgo…
//! ```
//!
//! The reference label is the filename without its extension plus a
//! `yyMMdd-HHmmss` UTC timestamp, so two encodings of the same file taken at
//! different times can live in one document without colliding. The timestamp
//! is always a parameter; nothing here reads the clock.

use crate::pipeline::encode::encode;
use crate::pipeline::mime::resolve_mime_type_with;
use crate::pipeline::uti::{StaticTypeRegistry, TypeRegistry};
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

/// Base64 text and the Markdown that embeds it.
///
/// Only constructed here, so `markdown` always carries `base64_text`
/// verbatim inside its data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedResult {
    base64_text: String,
    markdown: String,
}

impl EncodedResult {
    pub fn base64_text(&self) -> &str {
        &self.base64_text
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// `(base64_text, markdown)`
    pub fn into_parts(self) -> (String, String) {
        (self.base64_text, self.markdown)
    }
}

/// Encode `bytes` and build the Markdown reference against the built-in registry.
pub fn make_markdown(
    bytes: &[u8],
    filename: &str,
    type_indicator: &str,
    timestamp: OffsetDateTime,
) -> EncodedResult {
    make_markdown_with(StaticTypeRegistry::shared(), bytes, filename, type_indicator, timestamp)
}

/// Like [`make_markdown`] but for text that is already Base64.
pub fn make_markdown_from_base64(
    base64_text: impl Into<String>,
    filename: &str,
    type_indicator: &str,
    timestamp: OffsetDateTime,
) -> EncodedResult {
    make_markdown_from_base64_with(
        StaticTypeRegistry::shared(),
        base64_text,
        filename,
        type_indicator,
        timestamp,
    )
}

pub fn make_markdown_with(
    registry: &dyn TypeRegistry,
    bytes: &[u8],
    filename: &str,
    type_indicator: &str,
    timestamp: OffsetDateTime,
) -> EncodedResult {
    make_markdown_from_base64_with(registry, encode(bytes), filename, type_indicator, timestamp)
}

pub fn make_markdown_from_base64_with(
    registry: &dyn TypeRegistry,
    base64_text: impl Into<String>,
    filename: &str,
    type_indicator: &str,
    timestamp: OffsetDateTime,
) -> EncodedResult {
    let mime = resolve_mime_type_with(registry, type_indicator, filename);
    build(base64_text.into(), filename, &mime, timestamp)
}

/// Assemble the result once the MIME type is known.
pub(crate) fn build(
    base64_text: String,
    filename: &str,
    mime: &str,
    timestamp: OffsetDateTime,
) -> EncodedResult {
    let reference = reference_label(filename, timestamp);
    let markdown = format!(
        "![{filename}][{reference}]\n\n[{reference}]: {}",
        data_url(mime, &base64_text)
    );
    EncodedResult {
        base64_text,
        markdown,
    }
}

/// `data:<mime>;base64,<text>`
pub fn data_url(mime: &str, base64_text: &str) -> String {
    format!("data:{mime};base64,{base64_text}")
}

/// `<filename without extension>-<yyMMdd-HHmmss>`
pub fn reference_label(filename: &str, timestamp: OffsetDateTime) -> String {
    format!("{}-{}", strip_extension(filename), format_timestamp(timestamp))
}

/// Render `yyMMdd-HHmmss` in UTC with ASCII digits, independent of locale.
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    let utc = timestamp.to_offset(UtcOffset::UTC);
    format!(
        "{:02}{:02}{:02}-{:02}{:02}{:02}",
        utc.year().rem_euclid(100),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second()
    )
}

/// Filename with its last extension removed.
///
/// Dotfiles (`.profile`) and names without a dot are returned unchanged.
pub fn strip_extension(filename: &str) -> &str {
    match split_extension(filename) {
        Some((stem, _)) => stem,
        None => filename,
    }
}

/// Lower-cased text after the last `.` of the final path component.
pub fn extension(filename: &str) -> Option<String> {
    split_extension(filename)
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}

fn split_extension(filename: &str) -> Option<(&str, &str)> {
    let name_start = filename.rfind('/').map_or(0, |i| i + 1);
    let name = &filename[name_start..];
    match name.rfind('.') {
        Some(0) | None => None,
        Some(dot) => Some((&filename[..name_start + dot], &name[dot + 1..])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn hello_at_epoch() {
        let result = make_markdown(
            &[0x48, 0x65, 0x6c, 0x6c, 0x6f],
            "hello.txt",
            "public.plain-text",
            OffsetDateTime::UNIX_EPOCH,
        );
        assert_eq!(result.base64_text(), "SGVsbG8=");
        assert_eq!(
            result.markdown(),
            "![hello.txt][hello-700101-000000]\n\n[hello-700101-000000]: data:text/plain;base64,SGVsbG8="
        );
    }

    #[test]
    fn png_with_fixed_date() {
        let result = make_markdown(
            &[1, 2, 3, 4],
            "example.png",
            "public.png",
            datetime!(2025-12-21 10:20:30 UTC),
        );
        assert_eq!(result.base64_text(), "AQIDBA==");
        assert!(result
            .markdown()
            .contains("![example.png][example-251221-102030]"));
        assert!(result
            .markdown()
            .contains("[example-251221-102030]: data:image/png;base64,AQIDBA=="));
    }

    #[test]
    fn from_base64_matches_from_bytes() {
        let ts = datetime!(2024-02-29 23:59:59 UTC);
        let a = make_markdown(b"Hello", "hello.txt", "public.plain-text", ts);
        let b = make_markdown_from_base64("SGVsbG8=", "hello.txt", "public.plain-text", ts);
        assert_eq!(a, b);
    }

    #[test]
    fn identical_inputs_identical_output() {
        let ts = datetime!(2025-01-02 03:04:05 UTC);
        let a = make_markdown(&[9, 8, 7], "x.gif", "com.compuserve.gif", ts);
        let b = make_markdown(&[9, 8, 7], "x.gif", "com.compuserve.gif", ts);
        assert_eq!(a.markdown().as_bytes(), b.markdown().as_bytes());
        assert_eq!(a.base64_text(), b.base64_text());
    }

    #[test]
    fn markdown_embeds_base64_text() {
        let result = make_markdown(
            &[0xde, 0xad, 0xbe, 0xef],
            "blob",
            "unknown.type",
            OffsetDateTime::UNIX_EPOCH,
        );
        let (b64, md) = result.into_parts();
        assert!(md.ends_with(&format!("data:application/octet-stream;base64,{b64}")));
    }

    #[test]
    fn timestamp_is_rendered_in_utc() {
        let local = datetime!(2025-12-21 23:30:00 -05:00);
        assert_eq!(format_timestamp(local), "251222-043000");
    }

    #[test]
    fn timestamp_fields_are_zero_padded() {
        assert_eq!(format_timestamp(OffsetDateTime::UNIX_EPOCH), "700101-000000");
        assert_eq!(
            format_timestamp(datetime!(2003-04-05 06:07:08 UTC)),
            "030405-060708"
        );
    }

    #[test]
    fn strip_extension_cases() {
        assert_eq!(strip_extension("hello.txt"), "hello");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".profile"), ".profile");
        assert_eq!(strip_extension("dir.d/file"), "dir.d/file");
        assert_eq!(strip_extension(""), "");
    }

    #[test]
    fn extension_cases() {
        assert_eq!(extension("Photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension("noext"), None);
        assert_eq!(extension("trailing."), None);
        assert_eq!(extension(".profile"), None);
    }

    #[test]
    fn extensionless_filename_reference() {
        let result = make_markdown(b"", "pasted-image", "public.image", OffsetDateTime::UNIX_EPOCH);
        assert_eq!(result.base64_text(), "");
        assert_eq!(
            result.markdown(),
            "![pasted-image][pasted-image-700101-000000]\n\n[pasted-image-700101-000000]: data:image/*;base64,"
        );
    }
}
