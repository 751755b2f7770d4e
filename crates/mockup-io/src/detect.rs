//! Format detection.
//!
//! Detects image formats from magic bytes, file extensions and MIME types.

use std::path::Path;

/// Image formats the loaders understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// Anything else.
    Unknown,
}

impl Format {
    /// Detects format from raw bytes (magic number check).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        // PNG: 0x89 'P' 'N' 'G' CR LF SUB LF
        if bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
            return Format::Png;
        }
        // JPEG: SOI followed by a marker
        if bytes.len() >= 3 && bytes[0..3] == [0xFF, 0xD8, 0xFF] {
            return Format::Jpeg;
        }
        Format::Unknown
    }

    /// Detects format from file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => Format::Png,
            Some("jpg") | Some("jpeg") | Some("jpe") | Some("jfif") => Format::Jpeg,
            _ => Format::Unknown,
        }
    }

    /// Detects format from a MIME type such as `image/png`.
    ///
    /// Parameters after `;` are ignored.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/png" => Format::Png,
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Format::Jpeg,
            _ => Format::Unknown,
        }
    }

    /// Magic bytes first, then the name hint's extension.
    pub fn sniff(bytes: &[u8], name_hint: Option<&str>) -> Self {
        match Self::from_bytes(bytes) {
            Format::Unknown => name_hint.map(Self::from_extension).unwrap_or(Format::Unknown),
            found => found,
        }
    }

    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpg",
            Format::Unknown => "",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Png => "image/png",
            Format::Jpeg => "image/jpeg",
            Format::Unknown => "application/octet-stream",
        }
    }

    /// Returns true if this format supports an alpha channel.
    pub fn supports_alpha(&self) -> bool {
        matches!(self, Format::Png)
    }
}

/// True for any `image/*` MIME type, the only kind accepted for upload.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}
