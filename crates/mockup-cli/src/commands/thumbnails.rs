//! Thumbnails command.

use anyhow::{bail, Context, Result};
use mockup_core::Registry;
use std::path::Path;

use crate::ThumbnailsArgs;

/// Writes `<name>-thumb.png` for every mockup that renders.
pub fn run(args: ThumbnailsArgs, registry: &Registry, assets: &Path) -> Result<()> {
    let image = super::user_image(args.input.as_deref())?;
    let thumbs = super::compositor(assets).render_thumbnails(registry, image.as_ref());
    if thumbs.is_empty() {
        bail!("No thumbnail could be rendered (check --assets)");
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    for (name, surface) in &thumbs {
        let path = args.output.join(format!("{name}-thumb.png"));
        super::save_image(&path, surface)?;
        println!("{}", path.display());
    }
    if thumbs.len() < registry.len() {
        println!("{} of {} mockups skipped", registry.len() - thumbs.len(), registry.len());
    }
    Ok(())
}
