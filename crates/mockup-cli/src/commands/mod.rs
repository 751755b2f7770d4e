//! CLI command implementations

pub mod export;
pub mod list;
pub mod render;
pub mod thumbnails;
#[cfg(feature = "viewer")]
pub mod view;

use anyhow::{Context, Result};
use mockup_core::params::clamp_scale;
use mockup_core::{ImageSource, Registry, Surface};
use mockup_io::DecodingLoader;
use mockup_ops::Compositor;
use std::path::Path;
use tracing::warn;

/// Loads the registry from YAML, or the built-in mockups.
pub fn load_registry(path: Option<&Path>) -> Result<Registry> {
    match path {
        Some(p) => Registry::from_file(p)
            .with_context(|| format!("Failed to load registry: {}", p.display())),
        None => Ok(Registry::builtin()),
    }
}

/// Compositor resolving backgrounds against `assets`.
pub fn compositor(assets: &Path) -> Compositor<DecodingLoader> {
    Compositor::new(DecodingLoader::with_base_dir(assets))
}

/// Turns a `--input` argument into an image source. `data:` URLs are
/// passed through; paths are made absolute so they do not resolve against
/// the asset directory.
pub fn user_image(input: Option<&Path>) -> Result<Option<ImageSource>> {
    let Some(input) = input else {
        return Ok(None);
    };
    if let Some(url) = input.to_str().filter(|s| s.starts_with("data:")) {
        return Ok(Some(ImageSource::data_url(url)));
    }
    let path = std::path::absolute(input)
        .with_context(|| format!("Invalid input path: {}", input.display()))?;
    Ok(Some(ImageSource::file(path)))
}

/// Clamps a `--scale` argument into the slider range.
pub fn scale_factor(requested: f64) -> f64 {
    let scale = clamp_scale(requested);
    if scale != requested {
        warn!(requested, scale, "scale factor out of range, clamped");
    }
    scale
}

/// Save image to path
pub fn save_image(path: &Path, image: &Surface) -> Result<()> {
    mockup_io::write(path, image)
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_urls_pass_through() {
        let src = user_image(Some(Path::new("data:image/png;base64,AAAA"))).unwrap().unwrap();
        assert!(matches!(src, ImageSource::DataUrl(_)));
    }

    #[test]
    fn paths_become_absolute() {
        let src = user_image(Some(Path::new("shots/a.png"))).unwrap().unwrap();
        let ImageSource::File(path) = src else {
            panic!("expected file source");
        };
        assert!(path.is_absolute());
        assert!(path.ends_with("shots/a.png"));
        assert!(user_image(None).unwrap().is_none());
    }

    #[test]
    fn scale_is_clamped_to_slider_range() {
        assert_eq!(scale_factor(5.0), 1.5);
        assert_eq!(scale_factor(0.1), 0.8);
        assert_eq!(scale_factor(1.3), 1.3);
        assert_eq!(scale_factor(f64::NAN), 1.3);
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn registry_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mockups.yaml");
        std::fs::write(
            &path,
            "mockups:\n  - name: phone\n    background: phone.png\n    canvas_size: { width: 2000, height: 1000 }\n    frame: { x: 800, y: 100, width: 400, height: 800 }\n",
        )
        .unwrap();
        let registry = load_registry(Some(&path)).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["phone"]);
        assert!(load_registry(Some(&dir.path().join("missing.yaml"))).is_err());
        assert_eq!(load_registry(None).unwrap().len(), 3);
    }
}
