//! # mockup-view
//!
//! Interactive device mockup composer.
//!
//! Features:
//! - Style picker with a live thumbnail per mockup
//! - Preview at 800 logical pixels, rendered at the display's pixel ratio
//! - Scale slider (re-renders) and export quality slider (does not)
//! - Upload, drag & drop (images only), remove, download
//!
//! Rendering runs on a worker thread. Every re-render trigger carries a
//! new generation and the UI only accepts results of the newest one, so a
//! slow render can never replace the result of a later trigger.
//!
//! # Quick Start
//!
//! ```ignore
//! use mockup_view::{run, ViewerConfig};
//!
//! let exit_code = run(ViewerConfig::default());
//! ```
//!
//! # Keyboard Shortcuts
//!
//! | Key | Action |
//! |-----|--------|
//! | `O` | Open image |
//! | `Del` | Remove image |
//! | `Ctrl+S` | Download |
//! | `Esc` | Exit |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod app;
mod handler;
mod messages;
mod state;

pub use app::{ViewerApp, ViewerConfig};
pub use state::{accepts_drop, ViewerState};

use tracing::{debug, error};

/// Run the viewer.
///
/// Creates an eframe window and enters the event loop. Returns the exit
/// code when the window closes: 0 for success, 1 for error.
pub fn run(config: ViewerConfig) -> i32 {
    let title = "Mockup";
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    debug!(mockups = config.registry.len(), assets = %config.assets.display(), "creating window");
    let result = eframe::run_native(
        title,
        native_options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, config)))),
    );

    match result {
        Ok(()) => {
            debug!("viewer exited normally");
            0
        }
        Err(e) => {
            error!(error = %e, "viewer error");
            1
        }
    }
}
