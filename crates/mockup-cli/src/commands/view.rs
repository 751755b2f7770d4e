//! View command - interactive mockup composer.

use anyhow::Result;
use mockup_core::Registry;
use std::path::PathBuf;

use crate::ViewArgs;

/// Run the view command.
pub fn run(args: ViewArgs, registry: Registry, assets: PathBuf) -> Result<()> {
    let config = mockup_view::ViewerConfig {
        registry,
        assets,
        mockup: args.mockup,
        image: super::user_image(args.input.as_deref())?,
    };

    let exit_code = mockup_view::run(config);

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
