//! Integration tests for exporting rendered surfaces.

use mockup_core::Surface;
use mockup_io::export::{export, export_file_name, ExportReport};
use mockup_io::{read, DirectorySink, ExportFormat, ExportOptions, Format};

/// Opaque surface with gradients plus pseudo-random noise so JPEG has
/// something to throw away at lower quality.
fn textured(width: u32, height: u32) -> Surface {
    let mut s = Surface::new(width, height).unwrap();
    let mut seed: u32 = 0x1234_5678;
    for y in 0..height {
        for x in 0..width {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (seed >> 24) as u8;
            s.set_pixel(
                x,
                y,
                [
                    (x * 255 / width) as u8 ^ (noise >> 2),
                    (y * 255 / height) as u8,
                    noise,
                    255,
                ],
            );
        }
    }
    s
}

fn export_at(dir: &std::path::Path, format: ExportFormat, quality: f64) -> ExportReport {
    let surface = textured(160, 120);
    let sub = dir.join(format!("{format}-{quality}"));
    export(
        &surface,
        "mockup5",
        &ExportOptions::new(format, quality),
        &DirectorySink::new(&sub),
    )
    .unwrap()
}

#[test]
fn png_export_quality_does_not_change_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let low = export_at(dir.path(), ExportFormat::Png, 0.70);
    let high = export_at(dir.path(), ExportFormat::Png, 1.00);

    assert_eq!(low.path.file_name().unwrap(), "mockup5-mockup.png");
    let a = read(&low.path).unwrap();
    let b = read(&high.path).unwrap();
    assert_eq!(a.dimensions(), (160, 120));
    assert_eq!(a, b);
    assert_eq!(a, textured(160, 120));
}

#[test]
fn jpeg_export_shrinks_with_quality() {
    let dir = tempfile::tempdir().unwrap();
    let low = export_at(dir.path(), ExportFormat::Jpeg, 0.70);
    let mid = export_at(dir.path(), ExportFormat::Jpeg, 0.85);
    let high = export_at(dir.path(), ExportFormat::Jpeg, 1.00);

    assert_eq!(high.path.file_name().unwrap(), "mockup5-mockup.jpg");
    assert!(low.size <= mid.size, "{} > {}", low.size, mid.size);
    assert!(mid.size <= high.size, "{} > {}", mid.size, high.size);

    for report in [&low, &high] {
        let bytes = std::fs::read(&report.path).unwrap();
        assert_eq!(Format::from_bytes(&bytes), Format::Jpeg);
        assert_eq!(read(&report.path).unwrap().dimensions(), (160, 120));
    }
}

#[test]
fn directory_sink_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("a").join("b");
    let surface = Surface::filled(4, 4, [255, 255, 255, 255]).unwrap();
    let report = export(
        &surface,
        "mockup7",
        &ExportOptions::default(),
        &DirectorySink::new(&target),
    )
    .unwrap();
    assert_eq!(
        report.path,
        target.join(export_file_name("mockup7", ExportFormat::Png))
    );
    assert_eq!(report.size as u64, std::fs::metadata(&report.path).unwrap().len());
}
