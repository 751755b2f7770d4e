//! PNG format support.
//!
//! Everything decodes to RGBA8: palette and low-bit images are expanded,
//! 16-bit channels are stripped to 8, grey is replicated into RGB.
//! Encoding always writes 8-bit RGBA with an sRGB chunk.

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

use mockup_core::Surface;

use crate::{IoError, IoResult};

/// Decodes PNG bytes.
pub fn decode(bytes: &[u8]) -> IoResult<Surface> {
    read_from(Cursor::new(bytes))
}

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Surface> {
    let file = File::open(path.as_ref())?;
    read_from(BufReader::new(file))
}

fn read_from<R: std::io::BufRead + std::io::Seek>(reader: R) -> IoResult<Surface> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(IoError::DecodeError(format!(
            "unexpected bit depth after expansion: {:?}",
            info.bit_depth
        )));
    }

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        png::ColorType::Indexed => {
            return Err(IoError::DecodeError("palette was not expanded".into()));
        }
    };

    Ok(Surface::from_rgba(info.width, info.height, rgba)?)
}

/// Encodes a surface as PNG bytes.
pub fn encode(surface: &Surface) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    write_to(&mut out, surface)?;
    Ok(out)
}

/// Writes a surface to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, surface: &Surface) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    write_to(BufWriter::new(file), surface)
}

fn write_to<W: Write>(writer: W, surface: &Surface) -> IoResult<()> {
    let mut encoder = png::Encoder::new(writer, surface.width(), surface.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(surface.as_bytes())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}
