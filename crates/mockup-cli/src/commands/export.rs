//! Export command.

use anyhow::{Context, Result};
use mockup_core::Registry;
use mockup_io::export::export;
use mockup_io::{DirectorySink, ExportFormat, ExportOptions};
use mockup_ops::RenderTarget;
use std::path::Path;

use crate::ExportArgs;

/// Renders the preview and exports it as `<name>-mockup.<ext>`.
pub fn run(args: ExportArgs, registry: &Registry, assets: &Path) -> Result<()> {
    let mockup = registry.require(&args.mockup)?;
    let image = super::user_image(args.input.as_deref())?;
    let scale = super::scale_factor(args.scale);
    let format: ExportFormat = args.format.parse()?;
    let options = ExportOptions::new(format, args.quality);

    let surface = super::compositor(assets)
        .render(&RenderTarget::preview(args.ratio), mockup, image.as_ref(), scale)
        .with_context(|| format!("Failed to render {}", mockup.name))?;

    let report = export(&surface, &mockup.name, &options, &DirectorySink::new(&args.output))
        .with_context(|| format!("Failed to export to {}", args.output.display()))?;

    println!("{} ({})", report.path.display(), super::format_size(report.size as u64));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockup_core::Surface;

    const REGISTRY: &str = "mockups:\n  - name: tab\n    background: tab.png\n    canvas_size: { width: 400, height: 200 }\n    frame: { x: 150, y: 40, width: 100, height: 120, rotation: -6 }\n";

    fn export_at(dir: &Path, scale: f64, out: &str) -> Vec<u8> {
        let registry = Registry::from_yaml_str(REGISTRY).unwrap();
        let args = ExportArgs {
            mockup: "tab".into(),
            input: Some(dir.join("shot.png")),
            scale,
            quality: 0.9,
            format: "png".into(),
            ratio: 1.0,
            output: dir.join(out),
        };
        run(args, &registry, dir).unwrap();
        std::fs::read(dir.join(out).join("tab-mockup.png")).unwrap()
    }

    #[test]
    fn out_of_range_scale_renders_like_the_bound() {
        let dir = tempfile::tempdir().unwrap();
        let mut background = Surface::filled(40, 20, [90, 90, 90, 255]).unwrap();
        for y in 4..16 {
            for x in 15..25 {
                background.set_pixel(x, y, [0, 0, 0, 0]);
            }
        }
        mockup_io::write(dir.path().join("tab.png"), &background).unwrap();
        let mut shot = Surface::filled(8, 4, [200, 10, 10, 255]).unwrap();
        shot.set_pixel(0, 0, [10, 200, 10, 255]);
        mockup_io::write(dir.path().join("shot.png"), &shot).unwrap();

        assert_eq!(export_at(dir.path(), 5.0, "big"), export_at(dir.path(), 1.5, "max"));
        assert_eq!(export_at(dir.path(), 0.1, "small"), export_at(dir.path(), 0.8, "min"));
        assert_ne!(export_at(dir.path(), 1.5, "max2"), export_at(dir.path(), 0.8, "min2"));
    }
}
