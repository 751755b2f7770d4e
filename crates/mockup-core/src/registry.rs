//! The ordered, read-only list of mockups.
//!
//! # Example
//!
//! ```rust
//! use mockup_core::Registry;
//!
//! let registry = Registry::builtin();
//! assert_eq!(registry.names().collect::<Vec<_>>(), ["mockup5", "mockup6", "mockup7"]);
//! assert_eq!(registry.get("mockup6").unwrap().frame.rotation, -6.0);
//! ```
//!
//! Custom sets load from YAML:
//!
//! ```yaml
//! mockups:
//!   - name: phone
//!     display_name: Phone
//!     background: phone.png
//!     canvas_size: { width: 2000, height: 1000 }
//!     frame: { x: 800, y: 100, width: 400, height: 800, rotation: 0 }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::geometry::{Frame, Size};
use crate::mockup::MockupDefinition;

/// Immutable, ordered set of mockup definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    mockups: Vec<MockupDefinition>,
}

#[derive(Serialize, Deserialize)]
struct RegistryFile {
    mockups: Vec<MockupDefinition>,
}

impl Registry {
    /// The three authored device mockups.
    pub fn builtin() -> Self {
        let mockups = vec![
            MockupDefinition::new(
                "mockup5",
                "Style 5",
                "mockup5_background.png",
                Size::new(5824.0, 3264.0),
                Frame::new(1980.0, 443.5, 1863.0, 2377.0, 0.0),
            ),
            MockupDefinition::new(
                "mockup6",
                "Style 6",
                "mockup6_background.png",
                Size::new(5734.0, 3823.0),
                Frame::new(575.0, 583.86, 2251.88, 2870.36, -6.0),
            ),
            MockupDefinition::new(
                "mockup7",
                "Style 7",
                "mockup7_background.png",
                Size::new(7008.0, 4627.0),
                Frame::new(2641.78, 612.0, 2485.49, 3298.12, 6.0),
            ),
        ];
        Self { mockups }
    }

    /// Builds a registry from definitions, validating each one.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidMockup`] for an empty list, a duplicate name or
    /// any definition failing [`MockupDefinition::validate`].
    pub fn new(mockups: Vec<MockupDefinition>) -> CoreResult<Self> {
        if mockups.is_empty() {
            return Err(CoreError::invalid_mockup("", "registry has no mockups"));
        }
        let mut seen = HashSet::new();
        for m in &mockups {
            m.validate()?;
            if !seen.insert(m.name.as_str()) {
                return Err(CoreError::invalid_mockup(&m.name, "duplicate name"));
            }
        }
        Ok(Self { mockups })
    }

    /// Parses a registry from YAML with a top-level `mockups:` list.
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let file: RegistryFile = serde_yaml::from_str(yaml)?;
        debug!(count = file.mockups.len(), "parsed registry yaml");
        Self::new(file.mockups)
    }

    /// Reads and parses a registry YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let registry = Self::from_yaml_str(&text)?;
        info!(path = %path.display(), count = registry.len(), "loaded mockup registry");
        Ok(registry)
    }

    /// Serialises back to the YAML shape accepted by [`from_yaml_str`](Self::from_yaml_str).
    pub fn to_yaml_string(&self) -> CoreResult<String> {
        Ok(serde_yaml::to_string(&RegistryFile {
            mockups: self.mockups.clone(),
        })?)
    }

    /// Looks a mockup up by name.
    pub fn get(&self, name: &str) -> Option<&MockupDefinition> {
        self.mockups.iter().find(|m| m.name == name)
    }

    /// Like [`get`](Self::get) but returns [`CoreError::UnknownMockup`].
    pub fn require(&self, name: &str) -> CoreResult<&MockupDefinition> {
        self.get(name)
            .ok_or_else(|| CoreError::UnknownMockup(name.to_string()))
    }

    /// Position of a mockup in registry order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.mockups.iter().position(|m| m.name == name)
    }

    /// Mockups in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, MockupDefinition> {
        self.mockups.iter()
    }

    /// Mockup names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mockups.iter().map(|m| m.name.as_str())
    }

    /// The default selection.
    pub fn first(&self) -> &MockupDefinition {
        // Non-empty is enforced by every constructor.
        &self.mockups[0]
    }

    /// Number of mockups.
    pub fn len(&self) -> usize {
        self.mockups.len()
    }

    /// Always false for a constructed registry; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.mockups.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a MockupDefinition;
    type IntoIter = std::slice::Iter<'a, MockupDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE_YAML: &str = r#"
mockups:
  - name: phone
    display_name: Phone
    background: phone.png
    overlay: phone_shadow.png
    canvas_size: { width: 2000, height: 1000 }
    frame: { x: 800, y: 100, width: 400, height: 800, rotation: 0 }
  - name: tablet
    background: tablet.png
    canvas_size: { width: 3000, height: 2000 }
    frame: { x: 500, y: 200, width: 1200, height: 1600 }
"#;

    #[test]
    fn test_builtin_is_valid() {
        let r = Registry::builtin();
        assert_eq!(r.len(), 3);
        assert!(Registry::new(r.iter().cloned().collect()).is_ok());
        assert_eq!(r.first().name, "mockup5");
        assert_eq!(r.get("mockup7").unwrap().label(), "Style 7");
        assert_eq!(r.index_of("mockup6"), Some(1));
    }

    #[test]
    fn test_from_yaml() {
        let r = Registry::from_yaml_str(PHONE_YAML).unwrap();
        assert_eq!(r.names().collect::<Vec<_>>(), ["phone", "tablet"]);
        let phone = r.get("phone").unwrap();
        assert_eq!(phone.overlay.as_deref(), Some(Path::new("phone_shadow.png")));
        let tablet = r.get("tablet").unwrap();
        assert_eq!(tablet.frame.rotation, 0.0);
        assert_eq!(tablet.label(), "tablet");
    }

    #[test]
    fn test_yaml_roundtrip_preserves_builtin() {
        let r = Registry::builtin();
        let text = r.to_yaml_string().unwrap();
        assert_eq!(Registry::from_yaml_str(&text).unwrap(), r);
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let m = Registry::builtin().first().clone();
        assert!(matches!(
            Registry::new(vec![m.clone(), m]),
            Err(CoreError::InvalidMockup { .. })
        ));
        assert!(Registry::new(Vec::new()).is_err());
        assert!(matches!(
            Registry::from_yaml_str("mockups: ["),
            Err(CoreError::Yaml(_))
        ));
    }

    #[test]
    fn test_require_unknown() {
        let r = Registry::builtin();
        assert!(matches!(r.require("nope"), Err(CoreError::UnknownMockup(n)) if n == "nope"));
    }
}
