//! User-adjustable render state.
//!
//! [`RenderParameters`] is the single value the viewer and CLI mutate. The
//! setters clamp into the allowed ranges so an out-of-range slider or flag
//! can never reach the compositor.

use crate::source::ImageSource;

/// Lower bound of the user scale factor.
pub const SCALE_MIN: f64 = 0.8;
/// Upper bound of the user scale factor.
pub const SCALE_MAX: f64 = 1.5;
/// Initial scale factor.
pub const DEFAULT_SCALE_FACTOR: f64 = 1.3;

/// Lowest export quality.
pub const QUALITY_MIN: f64 = 0.70;
/// Highest export quality.
pub const QUALITY_MAX: f64 = 1.00;
/// Quality slider step.
pub const QUALITY_STEP: f64 = 0.05;
/// Initial export quality.
pub const DEFAULT_EXPORT_QUALITY: f64 = 0.9;

/// Everything a render or export needs besides the mockup artwork.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParameters {
    /// Name of the selected mockup
    pub selected_mockup: String,
    /// The user's screenshot, if one is loaded
    pub user_image: Option<ImageSource>,
    scale_factor: f64,
    export_quality: f64,
}

impl RenderParameters {
    /// Defaults with `selected_mockup` preselected.
    pub fn new(selected_mockup: impl Into<String>) -> Self {
        Self {
            selected_mockup: selected_mockup.into(),
            user_image: None,
            scale_factor: DEFAULT_SCALE_FACTOR,
            export_quality: DEFAULT_EXPORT_QUALITY,
        }
    }

    /// Current scale factor, always within `[SCALE_MIN, SCALE_MAX]`.
    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Current export quality, always a multiple of the step within range.
    #[inline]
    pub fn export_quality(&self) -> f64 {
        self.export_quality
    }

    /// Sets the scale factor, clamped. Returns `true` if the value changed.
    pub fn set_scale_factor(&mut self, value: f64) -> bool {
        let v = clamp_scale(value);
        let changed = v != self.scale_factor;
        self.scale_factor = v;
        changed
    }

    /// Sets the export quality, clamped and snapped to the step.
    /// Returns `true` if the value changed.
    pub fn set_export_quality(&mut self, value: f64) -> bool {
        let v = snap_quality(value);
        let changed = v != self.export_quality;
        self.export_quality = v;
        changed
    }

    /// Builder form of [`set_scale_factor`](Self::set_scale_factor).
    pub fn with_scale_factor(mut self, value: f64) -> Self {
        self.set_scale_factor(value);
        self
    }

    /// Builder form of [`set_export_quality`](Self::set_export_quality).
    pub fn with_export_quality(mut self, value: f64) -> Self {
        self.set_export_quality(value);
        self
    }

    /// Builder that sets the user image.
    pub fn with_user_image(mut self, source: ImageSource) -> Self {
        self.user_image = Some(source);
        self
    }
}

/// Clamps into `[SCALE_MIN, SCALE_MAX]`. NaN maps to the default.
pub fn clamp_scale(value: f64) -> f64 {
    if value.is_nan() {
        return DEFAULT_SCALE_FACTOR;
    }
    value.clamp(SCALE_MIN, SCALE_MAX)
}

/// Clamps into `[QUALITY_MIN, QUALITY_MAX]` and snaps to the nearest step.
/// NaN maps to the default.
pub fn snap_quality(value: f64) -> f64 {
    if value.is_nan() {
        return DEFAULT_EXPORT_QUALITY;
    }
    let clamped = value.clamp(QUALITY_MIN, QUALITY_MAX);
    let steps = ((clamped - QUALITY_MIN) / QUALITY_STEP).round();
    // Round through hundredths so 0.7 + 4 * 0.05 is exactly 0.9.
    let snapped = ((QUALITY_MIN + steps * QUALITY_STEP) * 100.0).round() / 100.0;
    snapped.clamp(QUALITY_MIN, QUALITY_MAX)
}
