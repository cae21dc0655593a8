//! # b64md
//!
//! Encode an image (or any file) as Base64, optionally wrapped in a
//! reference-style Markdown image whose definition embeds a `data:` URL:
//!
//! ```text
//! ![example.png][example-251221-102030]
//!
//! [example-251221-102030]: data:image/png;base64,AQIDBA==
//! ```
//!
//! Pasting that into a Markdown document gives a self-contained image with
//! no external file to ship alongside it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input
//!  │
//!  ├─ 1. Input     local file, HTTP(S) URL, or stdin
//!  ├─ 2. Detect    type indicator from Content-Type / extension / magic bytes
//!  ├─ 3. Encode    bytes → standard Base64
//!  ├─ 4. MIME      type indicator → MIME, extension table fallback
//!  └─ 5. Markdown  timestamped reference label + data URL
//! ```
//!
//! Steps 3–5 are pure functions and can be called directly:
//!
//! ```rust
//! use b64md::{encode, make_markdown, resolve_mime_type};
//! use time::OffsetDateTime;
//!
//! assert_eq!(encode(&[1, 2, 3, 4]), "AQIDBA==");
//! assert_eq!(resolve_mime_type("public.heic", "image.heic"), "image/heic");
//!
//! let result = make_markdown(b"Hello", "hello.txt", "public.plain-text", OffsetDateTime::UNIX_EPOCH);
//! assert_eq!(
//!     result.markdown(),
//!     "![hello.txt][hello-700101-000000]\n\n[hello-700101-000000]: data:text/plain;base64,SGVsbG8="
//! );
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use b64md::{encode_input, EncodeConfig, OutputFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EncodeConfig::builder()
//!         .output_format(OutputFormat::Markdown)
//!         .build()?;
//!     let output = encode_input("diagram.png", &config).await?;
//!     println!("{}", output.text());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `b64md` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod clipboard;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{EncodeConfig, EncodeConfigBuilder, OutputFormat};
pub use convert::{encode_bytes, encode_input, encode_sync, encode_to_file};
pub use error::B64MdError;
pub use output::{EncodeOutput, SourceInfo};
pub use pipeline::encode::encode;
pub use pipeline::markdown::{
    format_timestamp, make_markdown, make_markdown_from_base64, EncodedResult,
};
pub use pipeline::mime::{resolve_mime_type, resolve_mime_type_with};
pub use pipeline::uti::{StaticTypeRegistry, TypeRegistry};
