//! MIME resolution: type indicator first, filename extension second.
//!
//! Resolution order:
//!
//! 1. the registry's preferred MIME type for the indicator;
//! 2. the first of [`IMAGE_CATEGORIES`] the indicator conforms to, in order
//!    (PNG, JPEG, GIF, TIFF, generic image);
//! 3. the fixed [`extension_mime_type`] table, keyed on the fallback filename;
//! 4. [`OCTET_STREAM`].
//!
//! Steps 1 and 2 only apply to indicators the registry knows. An unregistered
//! indicator goes straight to the extension table.

use crate::pipeline::markdown::extension;
use crate::pipeline::uti::{StaticTypeRegistry, TypeRegistry};

/// Returned when nothing else matches.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Image categories checked during conformance resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    Png,
    Jpeg,
    Gif,
    Tiff,
    Image,
}

/// Fixed check order. Generic image must stay last.
pub const IMAGE_CATEGORIES: [ImageCategory; 5] = [
    ImageCategory::Png,
    ImageCategory::Jpeg,
    ImageCategory::Gif,
    ImageCategory::Tiff,
    ImageCategory::Image,
];

impl ImageCategory {
    /// Registry identifier the category is tested against.
    pub fn identifier(self) -> &'static str {
        match self {
            ImageCategory::Png => "public.png",
            ImageCategory::Jpeg => "public.jpeg",
            ImageCategory::Gif => "com.compuserve.gif",
            ImageCategory::Tiff => "public.tiff",
            ImageCategory::Image => "public.image",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageCategory::Png => "image/png",
            ImageCategory::Jpeg => "image/jpeg",
            ImageCategory::Gif => "image/gif",
            ImageCategory::Tiff => "image/tiff",
            ImageCategory::Image => "image/*",
        }
    }
}

/// MIME type for a lower-cased extension from the fixed fallback table.
pub fn extension_mime_type(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "tiff" | "tif" => Some("image/tiff"),
        "heic" => Some("image/heic"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

/// Resolve a MIME type against the built-in registry.
pub fn resolve_mime_type(type_indicator: &str, fallback_filename: &str) -> String {
    resolve_mime_type_with(StaticTypeRegistry::shared(), type_indicator, fallback_filename)
}

/// Resolve a MIME type against an injected registry.
pub fn resolve_mime_type_with(
    registry: &dyn TypeRegistry,
    type_indicator: &str,
    fallback_filename: &str,
) -> String {
    if registry.is_registered(type_indicator) {
        if let Some(preferred) = registry.preferred_mime_type(type_indicator) {
            return preferred.to_string();
        }
        if let Some(category) = IMAGE_CATEGORIES
            .iter()
            .find(|c| registry.conforms_to(type_indicator, c.identifier()))
        {
            return category.mime_type().to_string();
        }
    }

    extension(fallback_filename)
        .and_then(|ext| extension_mime_type(&ext))
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heic_indicator() {
        assert_eq!(resolve_mime_type("public.heic", "image.heic"), "image/heic");
    }

    #[test]
    fn common_image_indicators() {
        assert_eq!(resolve_mime_type("public.png", ""), "image/png");
        assert_eq!(resolve_mime_type("public.jpeg", ""), "image/jpeg");
        assert_eq!(resolve_mime_type("com.compuserve.gif", ""), "image/gif");
        assert_eq!(resolve_mime_type("public.tiff", ""), "image/tiff");
        assert_eq!(resolve_mime_type("public.image", ""), "image/*");
    }

    #[test]
    fn abstract_image_subtype_resolves_to_generic_image() {
        assert_eq!(resolve_mime_type("public.camera-raw-image", "x.png"), "image/*");
    }

    #[test]
    fn fallback_by_extension() {
        assert_eq!(resolve_mime_type("unknown.type", "photo.avif"), "image/avif");
        assert_eq!(resolve_mime_type("public.data", "photo.avif"), "image/avif");
        assert_eq!(resolve_mime_type("public.data", "photo.jpg"), "image/jpeg");
        assert_eq!(resolve_mime_type("unknown.type", "scan.TIF"), "image/tiff");
    }

    #[test]
    fn octet_stream_when_nothing_matches() {
        assert_eq!(
            resolve_mime_type("unknown.type", "noext"),
            "application/octet-stream"
        );
        assert_eq!(resolve_mime_type("", ""), "application/octet-stream");
        // Extension table is deliberately narrow.
        assert_eq!(
            resolve_mime_type("unknown.type", "photo.webp"),
            "application/octet-stream"
        );
    }

    #[test]
    fn registry_knows_types_the_extension_table_does_not() {
        assert_eq!(resolve_mime_type("org.webmproject.webp", ""), "image/webp");
        assert_eq!(resolve_mime_type("public.plain-text", ""), "text/plain");
    }

    /// Registry where one identifier conforms to every category.
    struct Ambiguous;

    impl TypeRegistry for Ambiguous {
        fn is_registered(&self, identifier: &str) -> bool {
            identifier == "test.ambiguous" || identifier == "test.gif-or-tiff"
        }
        fn preferred_mime_type(&self, _identifier: &str) -> Option<&str> {
            None
        }
        fn conforms_to(&self, identifier: &str, parent: &str) -> bool {
            match identifier {
                "test.ambiguous" => true,
                "test.gif-or-tiff" => parent == "public.tiff" || parent == "com.compuserve.gif",
                _ => false,
            }
        }
        fn identifier_for_extension(&self, _extension: &str) -> Option<&str> {
            None
        }
        fn identifier_for_mime_type(&self, _mime: &str) -> Option<&str> {
            None
        }
    }

    #[test]
    fn categories_checked_in_fixed_order() {
        assert_eq!(
            resolve_mime_type_with(&Ambiguous, "test.ambiguous", ""),
            "image/png"
        );
        assert_eq!(
            resolve_mime_type_with(&Ambiguous, "test.gif-or-tiff", ""),
            "image/gif"
        );
    }

    #[test]
    fn unregistered_indicator_skips_categories() {
        // Ambiguous::conforms_to would say yes, but the indicator is unknown.
        assert_eq!(
            resolve_mime_type_with(&Ambiguous, "public.png", "a.gif"),
            "image/gif"
        );
    }

    #[test]
    fn category_order_is_png_jpeg_gif_tiff_image() {
        let ids: Vec<_> = IMAGE_CATEGORIES.iter().map(|c| c.identifier()).collect();
        assert_eq!(
            ids,
            [
                "public.png",
                "public.jpeg",
                "com.compuserve.gif",
                "public.tiff",
                "public.image"
            ]
        );
    }
}
