//! # mockup-io
//!
//! Getting pixels in and out of the mockup compositor.
//!
//! - **Decoding** - PNG and JPEG files, in-memory bytes and `data:` URLs,
//!   all normalised to RGBA8 [`Surface`]s
//! - **Loaders** - [`ImageLoader`] abstracts decoding for the compositor;
//!   [`CachingLoader`] keeps large backgrounds decoded between renders
//! - **Export** - PNG/JPEG encoding with a quality setting, delivered to a
//!   [`DownloadSink`](export::DownloadSink)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mockup_io::{read, write};
//!
//! let image = read("screenshot.jpg")?;
//! write("copy.png", &image)?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Notes |
//! |--------|------|-------|-------|
//! | PNG | Yes | Yes | 1-16 bit, palette, grey, alpha |
//! | JPEG | Yes | Yes | RGB, grey, CMYK; quality 1-100 |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod detect;
mod decode;

pub mod data_url;
pub mod export;
pub mod jpeg;
pub mod loader;
pub mod png;

pub use decode::{decode_bytes, decode_source, read_file};
pub use detect::{is_image_mime, Format};
pub use error::{IoError, IoResult};
pub use export::{DirectorySink, DownloadSink, ExportFormat, ExportOptions, FileSink};
pub use loader::{CacheStats, CachingLoader, DecodingLoader, ImageLoader};

use std::path::Path;

use mockup_core::Surface;

/// Reads an image from a file, auto-detecting the format.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The format is not supported
/// - The file is corrupted
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Surface> {
    read_file(path)
}

/// Writes a surface, choosing the encoder from the file extension.
///
/// JPEG files use [`jpeg::DEFAULT_QUALITY`].
pub fn write<P: AsRef<Path>>(path: P, surface: &Surface) -> IoResult<()> {
    let path = path.as_ref();
    match Format::from_extension(path) {
        Format::Png => png::write(path, surface),
        Format::Jpeg => jpeg::write(path, surface, jpeg::DEFAULT_QUALITY),
        Format::Unknown => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let surface = Surface::filled(5, 4, [9, 8, 7, 255]).unwrap();

        let png_path = dir.path().join("a.png");
        write(&png_path, &surface).unwrap();
        assert_eq!(read(&png_path).unwrap(), surface);

        let jpg_path = dir.path().join("a.jpeg");
        write(&jpg_path, &surface).unwrap();
        assert_eq!(read(&jpg_path).unwrap().dimensions(), (5, 4));

        assert!(matches!(
            write(dir.path().join("a.bmp"), &surface),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
