//! Pipeline stages for image-to-Base64/Markdown encoding.
//!
//! Each submodule implements exactly one step. The last four are pure and
//! synchronous; only [`input`] does I/O.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ uti ──▶ encode ──▶ mime ──▶ markdown
//! (path/URL/  (type    (base64)  (MIME     (data URL +
//!  stdin)     indicator)          type)     reference)
//! ```
//!
//! 1. [`input`]    — load the bytes and a display filename, then detect the
//!    type indicator
//! 2. [`uti`]      — the type registry consulted by detection and MIME
//!    resolution
//! 3. [`encode`]   — standard padded Base64
//! 4. [`mime`]     — type indicator → MIME type, falling back to the extension
//! 5. [`markdown`] — timestamped reference label and the final Markdown text

pub mod encode;
pub mod input;
pub mod markdown;
pub mod mime;
pub mod uti;
