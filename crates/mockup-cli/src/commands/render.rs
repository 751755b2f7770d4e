//! Render command.

use anyhow::{Context, Result};
use mockup_core::Registry;
use mockup_ops::RenderTarget;
use std::path::Path;
use tracing::debug;

use crate::RenderArgs;

/// Renders one mockup and saves it.
pub fn run(args: RenderArgs, registry: &Registry, assets: &Path) -> Result<()> {
    let mockup = registry.require(&args.mockup)?;
    let image = super::user_image(args.input.as_deref())?;
    let scale = super::scale_factor(args.scale);

    let mut target = if args.thumbnail {
        RenderTarget::thumbnail()
    } else {
        RenderTarget::preview(args.ratio)
    };
    if let Some(width) = args.width {
        target = target.with_width(width);
    }
    debug!(?target, scale, "rendering");

    let surface = super::compositor(assets)
        .render(&target, mockup, image.as_ref(), scale)
        .with_context(|| format!("Failed to render {}", mockup.name))?;
    super::save_image(&args.output, &surface)?;

    println!("{} ({}x{})", args.output.display(), surface.width(), surface.height());
    Ok(())
}
