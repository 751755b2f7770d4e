//! Integration tests for loading mockup registries from disk.

use std::io::Write;

use mockup_core::{CoreError, Registry};

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn registry_loads_from_file() {
    let file = write_temp(
        "mockups:\n  - name: laptop\n    display_name: Laptop\n    background: laptop.png\n    canvas_size: { width: 4000, height: 2500 }\n    frame: { x: 600, y: 300, width: 2800, height: 1750, rotation: 0 }\n",
    );

    let registry = Registry::from_file(file.path()).unwrap();
    assert_eq!(registry.len(), 1);
    let laptop = registry.first();
    assert_eq!(laptop.name, "laptop");
    assert_eq!(laptop.canvas_size.width, 4000.0);
    assert_eq!(laptop.frame.height, 1750.0);
}

#[test]
fn registry_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Registry::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));
}

#[test]
fn registry_rejects_negative_canvas() {
    let file = write_temp(
        "mockups:\n  - name: bad\n    background: bad.png\n    canvas_size: { width: -1, height: 100 }\n    frame: { x: 0, y: 0, width: 10, height: 10 }\n",
    );
    let err = Registry::from_file(file.path()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidMockup { ref name, .. } if name == "bad"));
}

#[test]
fn builtin_roundtrips_through_file() {
    let builtin = Registry::builtin();
    let file = write_temp(&builtin.to_yaml_string().unwrap());
    assert_eq!(Registry::from_file(file.path()).unwrap(), builtin);
}
