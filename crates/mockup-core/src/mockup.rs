//! Mockup definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::geometry::{Frame, Size};

/// One device-frame mockup: background artwork plus the frame where the
/// user's image shows through.
///
/// Paths are relative to the asset directory the loader is configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockupDefinition {
    /// Stable identifier, used for lookup and export file names
    pub name: String,
    /// Label shown in the style picker
    #[serde(default)]
    pub display_name: String,
    /// Background artwork
    pub background: PathBuf,
    /// Optional shadow/gloss layer drawn over everything else
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<PathBuf>,
    /// Native pixel size of the background artwork
    pub canvas_size: Size,
    /// Frame rectangle in native pixel space
    pub frame: Frame,
}

impl MockupDefinition {
    /// Creates a definition without an overlay.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        background: impl Into<PathBuf>,
        canvas_size: Size,
        frame: Frame,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            background: background.into(),
            overlay: None,
            canvas_size,
            frame,
        }
    }

    /// Adds an overlay layer.
    pub fn with_overlay(mut self, overlay: impl Into<PathBuf>) -> Self {
        self.overlay = Some(overlay.into());
        self
    }

    /// Display name, falling back to `name` when none was authored.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    /// Checks the definition is renderable.
    ///
    /// The frame may extend past the canvas; only non-finite or
    /// non-positive values are rejected.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_mockup("", "empty name"));
        }
        if !self.canvas_size.is_valid() {
            return Err(CoreError::invalid_mockup(
                &self.name,
                format!(
                    "canvas size {}x{} must be finite and positive",
                    self.canvas_size.width, self.canvas_size.height
                ),
            ));
        }
        if !self.frame.is_valid() {
            return Err(CoreError::invalid_mockup(
                &self.name,
                format!("frame {:?} must be finite with positive size", self.frame),
            ));
        }
        if self.background.as_os_str().is_empty() {
            return Err(CoreError::invalid_mockup(&self.name, "empty background path"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> MockupDefinition {
        MockupDefinition::new(
            "phone",
            "Phone",
            "phone.png",
            Size::new(2000.0, 1000.0),
            Frame::new(800.0, 100.0, 400.0, 800.0, 0.0),
        )
    }

    #[test]
    fn test_validate_ok() {
        assert!(phone().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_frame() {
        let mut m = phone();
        m.frame.width = 0.0;
        assert!(matches!(m.validate(), Err(CoreError::InvalidMockup { .. })));

        let mut m = phone();
        m.frame.rotation = f64::INFINITY;
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_label_fallback() {
        let mut m = phone();
        assert_eq!(m.label(), "Phone");
        m.display_name.clear();
        assert_eq!(m.label(), "phone");
    }
}
