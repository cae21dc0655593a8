//! Type registry: uniform type identifiers, their MIME types and hierarchy.
//!
//! A type indicator such as `public.heic` carries more information than a
//! file extension: it knows that HEIC *is an* image even when the extension
//! table doesn't. [`TypeRegistry`] is the seam behind
//! which that knowledge lives, so MIME resolution can run against the
//! built-in [`StaticTypeRegistry`] or against any table a caller injects.
//!
//! ## Conformance
//!
//! Each declaration lists its direct parents. `conforms_to` is reflexive and
//! transitive: `public.png` conforms to `public.png`, `public.image`,
//! `public.data` and `public.item`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lookup table of type identifiers.
///
/// Implementations must be read-only after construction; the encoder may be
/// called from any thread.
pub trait TypeRegistry: Send + Sync {
    /// Whether `identifier` is declared in this registry.
    fn is_registered(&self, identifier: &str) -> bool;

    /// The preferred MIME type of a registered identifier, if it has one.
    ///
    /// Abstract types (`public.image`, `public.data`) have none.
    fn preferred_mime_type(&self, identifier: &str) -> Option<&str>;

    /// Whether `identifier` is `parent` or (transitively) declared under it.
    /// Unregistered identifiers conform to nothing.
    fn conforms_to(&self, identifier: &str, parent: &str) -> bool;

    /// Identifier declared for a filename extension (case-insensitive, no dot).
    fn identifier_for_extension(&self, extension: &str) -> Option<&str>;

    /// Identifier whose preferred MIME type is `mime` (parameters ignored).
    fn identifier_for_mime_type(&self, mime: &str) -> Option<&str>;
}

/// One entry of the built-in declaration table.
#[derive(Debug, Clone, Copy)]
pub struct TypeDeclaration {
    pub identifier: &'static str,
    pub preferred_mime_type: Option<&'static str>,
    pub parents: &'static [&'static str],
    pub extensions: &'static [&'static str],
}

const fn decl(
    identifier: &'static str,
    preferred_mime_type: Option<&'static str>,
    parents: &'static [&'static str],
    extensions: &'static [&'static str],
) -> TypeDeclaration {
    TypeDeclaration {
        identifier,
        preferred_mime_type,
        parents,
        extensions,
    }
}

/// System identifiers known to the built-in registry.
pub const DECLARATIONS: &[TypeDeclaration] = &[
    // ── Roots ─────────────────────────────────────────────────────────────
    decl("public.item", None, &[], &[]),
    decl("public.content", None, &[], &[]),
    decl("public.data", None, &["public.item"], &[]),
    decl("public.composite-content", None, &["public.content"], &[]),
    // ── Text ──────────────────────────────────────────────────────────────
    decl("public.text", None, &["public.data", "public.content"], &[]),
    decl(
        "public.plain-text",
        Some("text/plain"),
        &["public.text"],
        &["txt", "text"],
    ),
    decl(
        "public.utf8-plain-text",
        Some("text/plain"),
        &["public.plain-text"],
        &[],
    ),
    decl(
        "net.daringfireball.markdown",
        Some("text/markdown"),
        &["public.plain-text"],
        &["md", "markdown"],
    ),
    decl("public.html", Some("text/html"), &["public.text"], &["html", "htm"]),
    decl("public.json", Some("application/json"), &["public.text"], &["json"]),
    // ── Images ────────────────────────────────────────────────────────────
    decl("public.image", None, &["public.data", "public.content"], &[]),
    decl("public.png", Some("image/png"), &["public.image"], &["png"]),
    decl(
        "public.jpeg",
        Some("image/jpeg"),
        &["public.image"],
        &["jpg", "jpeg", "jpe"],
    ),
    decl("com.compuserve.gif", Some("image/gif"), &["public.image"], &["gif"]),
    decl("public.tiff", Some("image/tiff"), &["public.image"], &["tiff", "tif"]),
    decl("public.heif-standard", None, &["public.image"], &[]),
    decl("public.heic", Some("image/heic"), &["public.heif-standard"], &["heic"]),
    decl("public.heif", Some("image/heif"), &["public.heif-standard"], &["heif"]),
    decl("public.avif", Some("image/avif"), &["public.image"], &["avif"]),
    decl("org.webmproject.webp", Some("image/webp"), &["public.image"], &["webp"]),
    decl("com.microsoft.bmp", Some("image/bmp"), &["public.image"], &["bmp"]),
    decl(
        "com.microsoft.ico",
        Some("image/vnd.microsoft.icon"),
        &["public.image"],
        &["ico"],
    ),
    decl("com.apple.icns", Some("image/icns"), &["public.image"], &["icns"]),
    decl(
        "public.svg-image",
        Some("image/svg+xml"),
        &["public.image"],
        &["svg"],
    ),
    decl("public.camera-raw-image", None, &["public.image"], &[]),
    decl(
        "com.adobe.raw-image",
        Some("image/x-adobe-dng"),
        &["public.camera-raw-image"],
        &["dng"],
    ),
    // ── Documents ─────────────────────────────────────────────────────────
    decl(
        "com.adobe.pdf",
        Some("application/pdf"),
        &["public.data", "public.composite-content"],
        &["pdf"],
    ),
];

/// Guard against a malformed table declaring a parent cycle.
const MAX_CONFORMANCE_DEPTH: usize = 16;

/// Registry backed by a static declaration table.
pub struct StaticTypeRegistry {
    by_identifier: HashMap<&'static str, &'static TypeDeclaration>,
    by_extension: HashMap<&'static str, &'static str>,
    by_mime: HashMap<&'static str, &'static str>,
}

static SHARED: Lazy<StaticTypeRegistry> = Lazy::new(|| StaticTypeRegistry::new(DECLARATIONS));

impl StaticTypeRegistry {
    /// Index a declaration table. The first declaration wins for duplicate
    /// extensions and MIME types.
    pub fn new(declarations: &'static [TypeDeclaration]) -> Self {
        let mut by_identifier = HashMap::with_capacity(declarations.len());
        let mut by_extension = HashMap::new();
        let mut by_mime = HashMap::new();

        for d in declarations {
            by_identifier.insert(d.identifier, d);
            for ext in d.extensions {
                by_extension.entry(*ext).or_insert(d.identifier);
            }
            if let Some(mime) = d.preferred_mime_type {
                by_mime.entry(mime).or_insert(d.identifier);
            }
        }

        Self {
            by_identifier,
            by_extension,
            by_mime,
        }
    }

    /// The process-wide registry built from [`DECLARATIONS`].
    pub fn shared() -> &'static StaticTypeRegistry {
        &SHARED
    }

    fn conforms_within(&self, identifier: &str, parent: &str, depth: usize) -> bool {
        if identifier == parent {
            return true;
        }
        if depth >= MAX_CONFORMANCE_DEPTH {
            return false;
        }
        match self.by_identifier.get(identifier) {
            Some(d) => d
                .parents
                .iter()
                .any(|p| self.conforms_within(p, parent, depth + 1)),
            None => false,
        }
    }
}

impl TypeRegistry for StaticTypeRegistry {
    fn is_registered(&self, identifier: &str) -> bool {
        self.by_identifier.contains_key(identifier)
    }

    fn preferred_mime_type(&self, identifier: &str) -> Option<&str> {
        self.by_identifier
            .get(identifier)
            .and_then(|d| d.preferred_mime_type)
    }

    fn conforms_to(&self, identifier: &str, parent: &str) -> bool {
        self.is_registered(identifier) && self.conforms_within(identifier, parent, 0)
    }

    fn identifier_for_extension(&self, extension: &str) -> Option<&str> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        self.by_extension.get(ext.as_str()).copied()
    }

    fn identifier_for_mime_type(&self, mime: &str) -> Option<&str> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        self.by_mime.get(essence.as_str()).copied()
    }
}

impl std::fmt::Debug for StaticTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTypeRegistry")
            .field("identifiers", &self.by_identifier.len())
            .field("extensions", &self.by_extension.len())
            .finish()
    }
}
