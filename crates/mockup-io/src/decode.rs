//! Turning [`ImageSource`]s into surfaces.

use std::path::Path;
use std::sync::Arc;

use mockup_core::{ImageSource, Surface};
use tracing::debug;

use crate::detect::Format;
use crate::{data_url, jpeg, png, IoError, IoResult};

/// Decodes encoded image bytes, detecting the format from magic bytes and
/// falling back to the name hint's extension.
pub fn decode_bytes(bytes: &[u8], name_hint: Option<&str>) -> IoResult<Surface> {
    match Format::sniff(bytes, name_hint) {
        Format::Png => png::decode(bytes),
        Format::Jpeg => jpeg::decode(bytes),
        Format::Unknown => Err(IoError::UnsupportedFormat(
            name_hint.unwrap_or("<memory>").to_string(),
        )),
    }
}

/// Reads and decodes an image file.
pub fn read_file<P: AsRef<Path>>(path: P) -> IoResult<Surface> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    decode_bytes(&bytes, path.to_str())
}

/// Decodes any source. Relative file paths are joined onto `base_dir`.
pub fn decode_source(source: &ImageSource, base_dir: Option<&Path>) -> IoResult<Arc<Surface>> {
    let surface = match source {
        ImageSource::Decoded(surface) => return Ok(Arc::clone(surface)),
        ImageSource::File(path) => {
            let resolved = match base_dir {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path.clone(),
            };
            debug!(path = %resolved.display(), "decoding file");
            read_file(&resolved)?
        }
        ImageSource::Memory { name, bytes } => {
            debug!(name = %name, len = bytes.len(), "decoding bytes");
            decode_bytes(bytes, Some(name.as_str()))?
        }
        ImageSource::DataUrl(url) => {
            let parsed = data_url::parse(url)?;
            debug!(mime = %parsed.mime, len = parsed.bytes.len(), "decoding data URL");
            let hint = format!("inline.{}", parsed.format().extension());
            decode_bytes(&parsed.bytes, Some(hint.as_str()))?
        }
    };
    Ok(Arc::new(surface))
}
