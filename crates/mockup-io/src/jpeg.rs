//! JPEG format support.
//!
//! Decoding goes through `jpeg-decoder`, encoding through `jpeg-encoder`.
//! JPEG has no alpha: decoded pixels are opaque, and translucent surfaces
//! are flattened onto white before encoding.

use std::io::{BufReader, Read};
use std::path::Path;

use mockup_core::Surface;
use tracing::trace;

use crate::{IoError, IoResult};

/// Default encoder quality (1-100).
pub const DEFAULT_QUALITY: u8 = 90;

/// Decodes JPEG bytes.
pub fn decode(bytes: &[u8]) -> IoResult<Surface> {
    read_from(bytes)
}

/// Reads a JPEG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Surface> {
    let file = std::fs::File::open(path.as_ref())?;
    read_from(BufReader::new(file))
}

fn read_from<R: Read>(reader: R) -> IoResult<Surface> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;
    trace!(width = info.width, height = info.height, format = ?info.pixel_format, "jpeg decoded");

    let rgba: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        // Big-endian samples; keep the high byte.
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l16| [l16[0], l16[0], l16[0], 255])
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let k = 1.0 - cmyk[3] as f32 / 255.0;
                let channel = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0).round() as u8;
                [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2]), 255]
            })
            .collect(),
    };

    Ok(Surface::from_rgba(info.width as u32, info.height as u32, rgba)?)
}

/// Encodes a surface as JPEG at `quality` (1-100).
///
/// # Errors
///
/// [`IoError::EncodeError`] when a dimension exceeds 65535 pixels.
pub fn encode(surface: &Surface, quality: u8) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    let (width, height) = surface.dimensions();
    let too_big = |d: u32| d > u16::MAX as u32;
    if too_big(width) || too_big(height) {
        return Err(IoError::EncodeError(format!(
            "{width}x{height} exceeds JPEG's 65535 pixel limit"
        )));
    }

    let rgb = flatten_on_white(surface);
    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, quality.clamp(1, 100));
    encoder
        .encode(&rgb, width as u16, height as u16, ColorType::Rgb)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;
    Ok(buffer)
}

/// Writes a surface to a JPEG file.
pub fn write<P: AsRef<Path>>(path: P, surface: &Surface, quality: u8) -> IoResult<()> {
    let data = encode(surface, quality)?;
    std::fs::write(path.as_ref(), data)?;
    Ok(())
}

/// Composites straight-alpha RGBA over white, dropping alpha.
fn flatten_on_white(surface: &Surface) -> Vec<u8> {
    surface
        .as_bytes()
        .chunks_exact(4)
        .flat_map(|px| {
            let a = px[3] as u32;
            let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
            [blend(px[0]), blend(px[1]), blend(px[2])]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_dimensions() {
        let mut s = Surface::filled(24, 16, [200, 100, 50, 255]).unwrap();
        s.set_pixel(3, 3, [0, 0, 0, 255]);
        let bytes = encode(&s, DEFAULT_QUALITY).unwrap();
        assert_eq!(crate::Format::from_bytes(&bytes), crate::Format::Jpeg);

        let back = decode(&bytes).unwrap();
        assert_eq!(back.dimensions(), (24, 16));
        assert!(back.is_opaque());
        let px = back.pixel(20, 12);
        assert!((px[0] as i32 - 200).abs() < 8);
    }

    #[test]
    fn test_flatten_on_white() {
        let mut s = Surface::new(2, 1).unwrap();
        s.set_pixel(1, 0, [0, 0, 0, 255]);
        assert_eq!(flatten_on_white(&s), vec![255, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(decode(&[0xFF, 0xD8, 0xFF, 0x00]), Err(IoError::DecodeError(_))));
    }
}
