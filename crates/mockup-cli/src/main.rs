//! mockup - Device mockup compositor CLI
//!
//! Renders screenshots into device mockups, writes style thumbnails and
//! exports finished mockups. `mockup view` opens the interactive composer.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mockup")]
#[command(author, version, about = "Device mockup compositor")]
#[command(long_about = "
Places a screenshot inside the screen area of a device photo.

Examples:
  mockup list                                   # Show available mockups
  mockup render mockup5 -i shot.png -o out.png  # 800px preview
  mockup render mockup6 -i shot.png -r 2 -o out@2x.png
  mockup thumbnails -i shot.png -o thumbs/      # One thumbnail per mockup
  mockup export mockup7 -i shot.png -f jpeg -q 0.8 -o exports/
  mockup view -i shot.png                       # Interactive composer
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory mockup backgrounds are resolved against
    #[arg(long, global = true, default_value = "assets")]
    assets: PathBuf,

    /// Mockup registry YAML (default: built-in mockups)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// List available mockups
    #[command(visible_alias = "ls")]
    List,

    /// Render a mockup to an image file
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// Render one thumbnail per mockup
    #[command(visible_alias = "t")]
    Thumbnails(ThumbnailsArgs),

    /// Render and export as <mockup>-mockup.png/.jpg
    #[command(visible_alias = "e")]
    Export(ExportArgs),

    /// Open the interactive composer
    #[cfg(feature = "viewer")]
    #[command(visible_alias = "v")]
    View(ViewArgs),
}

/// Arguments for the `render` command.
#[derive(Args)]
struct RenderArgs {
    /// Mockup name
    mockup: String,

    /// User image (file path or data: URL)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Scale factor (0.8-1.5)
    #[arg(short, long, default_value = "1.3")]
    scale: f64,

    /// Logical width (default: 800 for previews, 120 for thumbnails)
    #[arg(short, long)]
    width: Option<f64>,

    /// Device pixel ratio
    #[arg(short = 'r', long, default_value = "1.0")]
    ratio: f64,

    /// Use the thumbnail fit (fixed rotation padding, scale ignored)
    #[arg(long)]
    thumbnail: bool,

    /// Output image (.png or .jpg)
    #[arg(short, long)]
    output: PathBuf,
}

/// Arguments for the `thumbnails` command.
#[derive(Args)]
struct ThumbnailsArgs {
    /// User image (file path or data: URL)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,
}

/// Arguments for the `export` command.
#[derive(Args)]
struct ExportArgs {
    /// Mockup name
    mockup: String,

    /// User image (file path or data: URL)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Scale factor (0.8-1.5)
    #[arg(short, long, default_value = "1.3")]
    scale: f64,

    /// Export quality (0.70-1.00, step 0.05; JPEG only)
    #[arg(short, long, default_value = "0.9")]
    quality: f64,

    /// Format: png, jpeg
    #[arg(short, long, default_value = "png")]
    format: String,

    /// Device pixel ratio
    #[arg(short = 'r', long, default_value = "1.0")]
    ratio: f64,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

/// Arguments for the `view` command.
#[cfg(feature = "viewer")]
#[derive(Args)]
struct ViewArgs {
    /// User image to start with
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Mockup to start on
    #[arg(short, long)]
    mockup: Option<String>,
}

/// Installs the tracing subscriber. The returned guard flushes the log
/// file on drop.
fn init_logging(verbose: u8, log: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install logger")?;
    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log.as_ref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let registry = commands::load_registry(cli.registry.as_deref())?;

    match cli.command {
        Commands::List => commands::list::run(&registry),
        Commands::Render(args) => commands::render::run(args, &registry, &cli.assets),
        Commands::Thumbnails(args) => commands::thumbnails::run(args, &registry, &cli.assets),
        Commands::Export(args) => commands::export::run(args, &registry, &cli.assets),
        #[cfg(feature = "viewer")]
        Commands::View(args) => commands::view::run(args, registry, cli.assets),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mockup", "render", "mockup6", "-i", "shot.png", "-o", "out.png", "-vv", "--assets", "art",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.assets, PathBuf::from("art"));
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.mockup, "mockup6");
        assert_eq!(args.scale, 1.3);
        assert_eq!(args.ratio, 1.0);
        assert!(args.width.is_none());
        assert!(!args.thumbnail);
    }

    #[test]
    fn export_defaults() {
        let cli = Cli::try_parse_from(["mockup", "export", "mockup5"]).unwrap();
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.quality, 0.9);
        assert_eq!(args.format, "png");
        assert_eq!(args.output, PathBuf::from("."));
    }

    #[test]
    fn render_requires_output() {
        assert!(Cli::try_parse_from(["mockup", "render", "mockup5"]).is_err());
    }
}
