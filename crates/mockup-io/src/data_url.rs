//! `data:` URL parsing and construction.
//!
//! Only base64 payloads of `image/*` MIME types are accepted:
//!
//! ```text
//! data:image/png;base64,iVBORw0KGgo...
//! ```

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use crate::detect::{is_image_mime, Format};
use crate::{IoError, IoResult};

/// A parsed data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// MIME type, lowercased, without parameters
    pub mime: String,
    /// Decoded payload
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// Format implied by the MIME type.
    pub fn format(&self) -> Format {
        Format::from_mime(&self.mime)
    }
}

/// Parses a `data:<mime>[;params];base64,<payload>` URL.
///
/// # Errors
///
/// - [`IoError::InvalidDataUrl`] for a missing prefix, comma, base64 marker
///   or a payload that is not valid base64
/// - [`IoError::UnsupportedFormat`] when the MIME type is not `image/*`
pub fn parse(url: &str) -> IoResult<DataUrl> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| IoError::InvalidDataUrl("missing 'data:' prefix".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| IoError::InvalidDataUrl("missing ',' separator".into()))?;

    let mut parts = header.split(';');
    let mime = parts.next().unwrap_or("").trim().to_ascii_lowercase();
    let is_base64 = parts.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    if !is_image_mime(&mime) {
        return Err(IoError::UnsupportedFormat(format!(
            "data URL is '{}', expected image/*",
            if mime.is_empty() { "text/plain" } else { &mime }
        )));
    }
    if !is_base64 {
        return Err(IoError::InvalidDataUrl("only base64 payloads are supported".into()));
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64_STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| IoError::InvalidDataUrl(e.to_string()))?;
    Ok(DataUrl { mime, bytes })
}

/// Builds a base64 data URL for `bytes` of the given format.
pub fn encode(format: Format, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        format.mime_type(),
        BASE64_STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_png_url() {
        let url = encode(Format::Png, &[1, 2, 3, 4]);
        assert!(url.starts_with("data:image/png;base64,"));
        let parsed = parse(&url).unwrap();
        assert_eq!(parsed.mime, "image/png");
        assert_eq!(parsed.bytes, vec![1, 2, 3, 4]);
        assert_eq!(parsed.format(), Format::Png);
    }

    #[test]
    fn test_parse_tolerates_params_and_whitespace() {
        let parsed = parse("data:Image/JPEG;name=a.jpg;base64,AQID\nBA==").unwrap();
        assert_eq!(parsed.mime, "image/jpeg");
        assert_eq!(parsed.bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_rejects_non_image() {
        assert!(matches!(
            parse("data:text/plain;base64,aGk="),
            Err(IoError::UnsupportedFormat(_))
        ));
        assert!(matches!(parse("data:,hello"), Err(IoError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(parse("image/png;base64,AA=="), Err(IoError::InvalidDataUrl(_))));
        assert!(matches!(parse("data:image/png;base64"), Err(IoError::InvalidDataUrl(_))));
        assert!(matches!(parse("data:image/png,raw"), Err(IoError::InvalidDataUrl(_))));
        assert!(matches!(parse("data:image/png;base64,@@@"), Err(IoError::InvalidDataUrl(_))));
    }
}
