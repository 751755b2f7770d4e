//! List command.

use anyhow::Result;
use mockup_core::Registry;

/// Prints every mockup with its canvas and frame.
pub fn run(registry: &Registry) -> Result<()> {
    println!(
        "{:<12} {:<16} {:>11}  {:<36} {:>8}",
        "NAME", "DISPLAY", "CANVAS", "FRAME (x, y, w x h)", "ROTATION"
    );
    for m in registry {
        let canvas = format!("{}x{}", m.canvas_size.width, m.canvas_size.height);
        let frame = format!(
            "{}, {}, {} x {}",
            m.frame.x, m.frame.y, m.frame.width, m.frame.height
        );
        println!(
            "{:<12} {:<16} {:>11}  {:<36} {:>7}°",
            m.name,
            m.label(),
            canvas,
            frame,
            m.frame.rotation
        );
    }
    Ok(())
}
