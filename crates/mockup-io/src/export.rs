//! Exporting rendered mockups.
//!
//! An export encodes the full-resolution preview surface and hands the
//! bytes to a [`DownloadSink`]. File names follow `<mockup>-mockup.<ext>`.
//!
//! ```rust,no_run
//! use mockup_core::Surface;
//! use mockup_io::export::{export, DirectorySink, ExportOptions};
//!
//! let surface = Surface::filled(800, 448, [255, 255, 255, 255]).unwrap();
//! let sink = DirectorySink::new("out");
//! let report = export(&surface, "mockup5", &ExportOptions::default(), &sink).unwrap();
//! println!("{} ({} bytes)", report.path.display(), report.size);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use mockup_core::params::snap_quality;
use mockup_core::{Surface, DEFAULT_EXPORT_QUALITY};
use tracing::{debug, info};

use crate::{jpeg, png, IoError, IoResult};

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Lossless PNG (quality is ignored)
    #[default]
    Png,
    /// Lossy JPEG
    Jpeg,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(IoError::UnsupportedFormat(format!("export format '{other}'"))),
        }
    }
}

/// Encoder settings for an export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// Output encoding
    pub format: ExportFormat,
    quality: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: DEFAULT_EXPORT_QUALITY,
        }
    }
}

impl ExportOptions {
    /// Options with `quality` clamped to 0.70-1.00 and snapped to 0.05.
    pub fn new(format: ExportFormat, quality: f64) -> Self {
        Self {
            format,
            quality: snap_quality(quality),
        }
    }

    /// Quality in 0.70-1.00.
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Quality on the encoder's 1-100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// `<mockup>-mockup.<ext>`
pub fn export_file_name(mockup_name: &str, format: ExportFormat) -> String {
    format!("{mockup_name}-mockup.{}", format.extension())
}

/// Encodes `surface` according to `options`.
pub fn encode(surface: &Surface, options: &ExportOptions) -> IoResult<Vec<u8>> {
    match options.format {
        ExportFormat::Png => {
            debug!(quality = options.quality(), "png export is lossless, quality unused");
            png::encode(surface)
        }
        ExportFormat::Jpeg => jpeg::encode(surface, options.jpeg_quality()),
    }
}

/// Destination for exported bytes.
pub trait DownloadSink {
    /// Stores `bytes` under (or in place of) `file_name`, returning where
    /// they ended up.
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> IoResult<PathBuf>;
}

/// Writes into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> IoResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Writes to one chosen path, e.g. from a save dialog. The suggested file
/// name is ignored.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DownloadSink for FileSink {
    fn deliver(&self, _file_name: &str, bytes: &[u8]) -> IoResult<PathBuf> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, bytes)?;
        Ok(self.path.clone())
    }
}

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    /// Where the file was written
    pub path: PathBuf,
    /// Encoded size in bytes
    pub size: usize,
    /// Encoding used
    pub format: ExportFormat,
    /// Quality the export was requested at
    pub quality: f64,
}

/// Encodes `surface` and delivers it as `<mockup_name>-mockup.<ext>`.
pub fn export<S: DownloadSink + ?Sized>(
    surface: &Surface,
    mockup_name: &str,
    options: &ExportOptions,
    sink: &S,
) -> IoResult<ExportReport> {
    let bytes = encode(surface, options)?;
    let file_name = export_file_name(mockup_name, options.format);
    let path = sink.deliver(&file_name, &bytes)?;
    info!(
        path = %path.display(),
        format = %options.format,
        quality = options.quality(),
        size = bytes.len(),
        width = surface.width(),
        height = surface.height(),
        "exported mockup"
    );
    Ok(ExportReport {
        path,
        size: bytes.len(),
        format: options.format,
        quality: options.quality(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(export_file_name("mockup5", ExportFormat::Png), "mockup5-mockup.png");
        assert_eq!(export_file_name("mockup7", ExportFormat::Jpeg), "mockup7-mockup.jpg");
    }

    #[test]
    fn test_options_snap_quality() {
        let o = ExportOptions::new(ExportFormat::Jpeg, 0.72);
        assert_eq!(o.quality(), 0.7);
        assert_eq!(o.jpeg_quality(), 70);
        assert_eq!(ExportOptions::new(ExportFormat::Jpeg, 2.0).jpeg_quality(), 100);
        assert_eq!(ExportOptions::default().jpeg_quality(), 90);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert_eq!("jpg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert!("webp".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_file_sink_ignores_suggested_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("chosen.png");
        let sink = FileSink::new(&target);
        let path = sink.deliver("mockup5-mockup.png", b"abc").unwrap();
        assert_eq!(path, target);
        assert_eq!(std::fs::read(&target).unwrap(), b"abc");
    }
}
