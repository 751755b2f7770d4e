//! Viewer UI state.
//!
//! Nothing is persisted: every session starts on the first (or requested)
//! mockup with default parameters.

use std::path::Path;

use mockup_core::{Registry, RenderParameters, SourceKey};
use mockup_io::export::export_file_name;
use mockup_io::{is_image_mime, ExportFormat, ExportOptions, Format};

/// Runtime viewer state.
#[derive(Debug, Clone)]
pub struct ViewerState {
    /// Selected mockup, user image, scale factor and export quality.
    pub params: RenderParameters,
    /// Dimensions of the decoded user image.
    pub user_dims: Option<(u32, u32)>,
    /// Device pixels per logical point the preview is rendered for.
    pub pixel_ratio: f64,
    /// Last error, shown until the next successful render.
    pub error: Option<String>,
    /// Last export result.
    pub status: Option<String>,
}

impl ViewerState {
    /// Starts on `initial` when the registry has it, otherwise on the first
    /// mockup.
    pub fn new(registry: &Registry, initial: Option<&str>) -> Self {
        let selected = initial
            .and_then(|name| registry.get(name))
            .unwrap_or_else(|| registry.first());
        Self {
            params: RenderParameters::new(selected.name.clone()),
            user_dims: None,
            pixel_ratio: 1.0,
            error: None,
            status: None,
        }
    }

    /// Selects a mockup; returns `true` if the selection changed.
    pub fn select(&mut self, name: &str) -> bool {
        if self.params.selected_mockup == name {
            return false;
        }
        self.params.selected_mockup = name.to_string();
        true
    }

    /// Cache key of the current user image.
    pub fn user_key(&self) -> Option<SourceKey> {
        self.params.user_image.as_ref().map(|s| s.key())
    }

    /// Suggested download name for the selected mockup.
    pub fn download_name(&self) -> String {
        export_file_name(&self.params.selected_mockup, ExportFormat::Png)
    }

    /// Export settings for a chosen save path: JPEG for `.jpg`/`.jpeg`,
    /// PNG otherwise, at the slider quality.
    pub fn export_options_for(&self, path: &Path) -> ExportOptions {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or_default();
        ExportOptions::new(format, self.params.export_quality())
    }
}

/// True if a dropped file may be used as the user image.
///
/// The MIME type decides when the platform reports one; otherwise the
/// extension must be a supported image format.
pub fn accepts_drop(mime: &str, path: Option<&Path>) -> bool {
    if !mime.is_empty() {
        return is_image_mime(mime);
    }
    path.is_some_and(|p| Format::from_extension(p) != Format::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockup_core::ImageSource;

    #[test]
    fn initial_selection() {
        let registry = Registry::builtin();
        assert_eq!(ViewerState::new(&registry, None).params.selected_mockup, "mockup5");
        assert_eq!(ViewerState::new(&registry, Some("mockup7")).params.selected_mockup, "mockup7");
        assert_eq!(ViewerState::new(&registry, Some("nope")).params.selected_mockup, "mockup5");
    }

    #[test]
    fn select_reports_change() {
        let mut state = ViewerState::new(&Registry::builtin(), None);
        assert!(!state.select("mockup5"));
        assert!(state.select("mockup6"));
        assert_eq!(state.download_name(), "mockup6-mockup.png");
    }

    #[test]
    fn export_format_follows_extension() {
        let mut state = ViewerState::new(&Registry::builtin(), None);
        state.params.set_export_quality(0.75);
        let jpg = state.export_options_for(Path::new("out/shot.JPG"));
        assert_eq!(jpg.format, ExportFormat::Jpeg);
        assert_eq!(jpg.jpeg_quality(), 75);
        assert_eq!(state.export_options_for(Path::new("shot")).format, ExportFormat::Png);
        assert_eq!(state.export_options_for(Path::new("shot.webp")).format, ExportFormat::Png);
    }

    #[test]
    fn user_key_tracks_image() {
        let mut state = ViewerState::new(&Registry::builtin(), None);
        assert!(state.user_key().is_none());
        let shot = ImageSource::file("shot.png");
        state.params.user_image = Some(shot.clone());
        assert_eq!(state.user_key(), Some(shot.key()));
    }

    #[test]
    fn drops_must_be_images() {
        assert!(accepts_drop("image/png", None));
        assert!(accepts_drop("image/heic", None));
        assert!(!accepts_drop("text/plain", Some(Path::new("shot.png"))));
        assert!(accepts_drop("", Some(Path::new("shot.jpeg"))));
        assert!(!accepts_drop("", Some(Path::new("notes.txt"))));
        assert!(!accepts_drop("", None));
    }
}
