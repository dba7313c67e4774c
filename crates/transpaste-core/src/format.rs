//! Image format detection.
//!
//! Two detection paths exist. The primary one matches the declared MIME type
//! of a transfer item. The secondary one matches the file-name suffix and is
//! only used for the HEIF family, whose declared type is missing or wrong in
//! practice. The suffix path does not generalize to other formats.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MIME type every conversion produces.
pub const CANONICAL_MIME: &str = "image/png";

/// File extension every conversion produces, without the dot.
pub const CANONICAL_EXTENSION: &str = "png";

/// A convertible source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    WebP,
    Bmp,
    Svg,
    Avif,
    /// HEIF/HEIC. Experimental, detected by file-name suffix only.
    Heif,
}

impl ImageFormat {
    /// Formats recognized through their declared MIME type.
    pub const DECLARED: [ImageFormat; 4] = [
        ImageFormat::WebP,
        ImageFormat::Bmp,
        ImageFormat::Svg,
        ImageFormat::Avif,
    ];

    /// Declared MIME type of this format.
    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Svg => "image/svg+xml",
            ImageFormat::Avif => "image/avif",
            ImageFormat::Heif => "image/heif",
        }
    }

    /// Whether this format is only reachable via the suffix heuristic.
    pub fn is_experimental(self) -> bool {
        matches!(self, ImageFormat::Heif)
    }

    /// Match a declared MIME type against the supported set.
    ///
    /// Parameters such as `;charset=utf-8` are ignored, and the comparison is
    /// case-insensitive. HEIF is never matched here.
    pub fn from_declared_type(declared: &str) -> Option<Self> {
        let essence = declared.split(';').next().unwrap_or_default().trim();
        Self::DECLARED
            .into_iter()
            .find(|format| format.mime().eq_ignore_ascii_case(essence))
    }

    /// Match a file name against the suffix-detected formats.
    pub fn from_file_suffix(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        if ext.eq_ignore_ascii_case("heif") || ext.eq_ignore_ascii_case("heic") {
            Some(ImageFormat::Heif)
        } else {
            None
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::WebP => "webp",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Svg => "svg",
            ImageFormat::Avif => "avif",
            ImageFormat::Heif => "heif",
        };
        f.write_str(name)
    }
}

/// Declared types the host already accepts natively.
const NATIVE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif"];

/// Result of classifying a single declared type / file name pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detected {
    /// The host accepts this payload as-is.
    Native,
    /// The payload can be converted to the canonical format.
    Convertible(ImageFormat),
    /// Neither accepted nor convertible.
    Unsupported,
}

/// Detect the format of a payload from its declared type and file name.
///
/// The declared type wins. The suffix path is consulted only when
/// `suffix_detection` is enabled and the declared type matched nothing.
pub fn detect(declared: &str, file_name: &str, suffix_detection: bool) -> Detected {
    if let Some(format) = ImageFormat::from_declared_type(declared) {
        return Detected::Convertible(format);
    }
    if suffix_detection {
        if let Some(format) = ImageFormat::from_file_suffix(file_name) {
            return Detected::Convertible(format);
        }
    }
    let essence = declared.split(';').next().unwrap_or_default().trim();
    if NATIVE_TYPES.iter().any(|t| t.eq_ignore_ascii_case(essence)) {
        Detected::Native
    } else {
        Detected::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_types_match_supported_set() {
        assert_eq!(ImageFormat::from_declared_type("image/webp"), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_declared_type("image/bmp"), Some(ImageFormat::Bmp));
        assert_eq!(ImageFormat::from_declared_type("image/svg+xml"), Some(ImageFormat::Svg));
        assert_eq!(ImageFormat::from_declared_type("image/avif"), Some(ImageFormat::Avif));
        assert_eq!(ImageFormat::from_declared_type("IMAGE/WEBP"), Some(ImageFormat::WebP));
        assert_eq!(
            ImageFormat::from_declared_type("image/svg+xml; charset=utf-8"),
            Some(ImageFormat::Svg)
        );
    }

    #[test]
    fn heif_is_never_declared() {
        assert_eq!(ImageFormat::from_declared_type("image/heif"), None);
        assert_eq!(ImageFormat::from_declared_type("image/heic"), None);
    }

    #[test]
    fn suffix_detection_only_knows_heif() {
        assert_eq!(ImageFormat::from_file_suffix("IMG_0001.HEIC"), Some(ImageFormat::Heif));
        assert_eq!(ImageFormat::from_file_suffix("scan.heif"), Some(ImageFormat::Heif));
        assert_eq!(ImageFormat::from_file_suffix("photo.webp"), None);
        assert_eq!(ImageFormat::from_file_suffix("heic"), None);
    }

    #[test]
    fn detect_prefers_declared_type() {
        assert_eq!(
            detect("image/bmp", "weird.heic", true),
            Detected::Convertible(ImageFormat::Bmp)
        );
        assert_eq!(
            detect("", "IMG_0001.heic", true),
            Detected::Convertible(ImageFormat::Heif)
        );
        assert_eq!(detect("", "IMG_0001.heic", false), Detected::Unsupported);
    }

    #[test]
    fn native_types_pass_through() {
        assert_eq!(detect("image/png", "a.png", true), Detected::Native);
        assert_eq!(detect("image/jpeg", "a.jpg", true), Detected::Native);
        assert_eq!(detect("image/gif", "a.gif", true), Detected::Native);
        assert_eq!(detect("application/pdf", "a.pdf", true), Detected::Unsupported);
    }
}
