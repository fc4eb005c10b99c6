//! # Panel Wall CLI
//!
//! Command-line host for the panel layout engine.
//!
//! ## Usage
//!
//! ```bash
//! panelwall compose --photo wall.jpg --session layout.json --textures textures/ --out wall.png
//! panelwall preview --photo wall.jpg --session layout.json --out preview.svg
//! panelwall compose --photo wall.jpg --session layout.json --fill tile --tile-cm 20 --depth --out wall.png
//! panelwall detect-wall --photo wall.jpg --out detected.png
//! panelwall share encode --session layout.json
//! panelwall share decode --code eyJ3YWxs... --out layout.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ComposeConfig` - Resolved inputs for a compose or preview run
//! - [`run`] - Dispatches a parsed command

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use panel_core::{Depth, FillMode, Session, SessionCodec, WallWidth};
use panel_renderer::image::image_dimensions;
use panel_renderer::{
    detect_wall, encode_png, ExportCompositor, ExportConfig, ImageFormat, PreviewSurface,
    TextureCatalog, WallBounds,
};

/// Default texture period for `--fill tile`, in centimeters.
pub const DEFAULT_TILE_CM: f64 = 30.0;

/// Command-line arguments for panelwall.
#[derive(Debug, Clone, Parser)]
#[command(name = "panelwall")]
#[command(about = "Place decorative panels over a wall photo at real-world scale")]
#[command(version)]
pub struct CliArgs {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Composite the layout onto the full-resolution photo and write a PNG.
    Compose(RenderArgs),
    /// Write an 800-unit preview, as SVG or PNG depending on the extension.
    Preview(RenderArgs),
    /// Outline the probable wall area in red.
    DetectWall {
        /// Wall photo (JPEG or PNG).
        #[arg(long)]
        photo: PathBuf,
        /// Output PNG.
        #[arg(long)]
        out: PathBuf,
    },
    /// Convert between session JSON and share codes.
    Share {
        /// Direction of the conversion.
        #[command(subcommand)]
        action: ShareCommand,
    },
}

/// Share-code conversions.
#[derive(Debug, Clone, Subcommand)]
pub enum ShareCommand {
    /// Print the share code for a session file.
    Encode {
        /// Session JSON file.
        #[arg(long)]
        session: PathBuf,
    },
    /// Turn a share code back into session JSON.
    Decode {
        /// The share code.
        #[arg(long)]
        code: String,
        /// Output file; prints to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// How textures cover panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FillArg {
    /// Stretch the texture over the panel.
    Stretch,
    /// Repeat the texture at `--tile-cm`.
    Tile,
}

/// Inputs shared by `compose` and `preview`.
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Wall photo (JPEG or PNG).
    #[arg(long)]
    pub photo: PathBuf,

    /// Session JSON file.
    #[arg(long)]
    pub session: PathBuf,

    /// Directory of material textures; file stem is the material name.
    #[arg(long, env = "PANELWALL_TEXTURES", default_value = "textures")]
    pub textures: PathBuf,

    /// Override the session's wall width, in centimeters.
    #[arg(long, env = "PANELWALL_WALL_WIDTH")]
    pub wall_width: Option<f64>,

    /// Texture fill mode.
    #[arg(long, value_enum, default_value_t = FillArg::Stretch)]
    pub fill: FillArg,

    /// Texture period for `--fill tile`, in centimeters.
    #[arg(long, default_value_t = DEFAULT_TILE_CM)]
    pub tile_cm: f64,

    /// Draw panels with shaded sides and a highlight.
    #[arg(long)]
    pub depth: bool,

    /// Output file.
    #[arg(long)]
    pub out: PathBuf,
}

/// Resolved inputs for a compose or preview run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeConfig {
    /// Wall photo path.
    pub photo: PathBuf,
    /// Session JSON path.
    pub session: PathBuf,
    /// Texture directory.
    pub textures: PathBuf,
    /// Wall width override in centimeters.
    pub wall_width: Option<f64>,
    /// Texture fill.
    pub fill: FillMode,
    /// Depth effects, if enabled.
    pub depth: Option<Depth>,
    /// Output path.
    pub out: PathBuf,
}

impl ComposeConfig {
    fn export_config(&self) -> ExportConfig {
        ExportConfig {
            fill: self.fill,
            depth: self.depth,
            ..ExportConfig::default()
        }
    }
}

impl TryFrom<RenderArgs> for ComposeConfig {
    type Error = anyhow::Error;

    fn try_from(args: RenderArgs) -> Result<Self> {
        let fill = match args.fill {
            FillArg::Stretch => FillMode::Stretch,
            FillArg::Tile => {
                anyhow::ensure!(
                    args.tile_cm.is_finite() && args.tile_cm > 0.0,
                    "--tile-cm must be a positive number of centimeters, got {}",
                    args.tile_cm
                );
                FillMode::Tile {
                    period_cm: args.tile_cm,
                }
            }
        };
        Ok(Self {
            photo: args.photo,
            session: args.session,
            textures: args.textures,
            wall_width: args.wall_width,
            fill,
            depth: args.depth.then(Depth::default),
            out: args.out,
        })
    }
}

/// Run a parsed command.
///
/// # Errors
///
/// Returns an error if any input cannot be read or parsed, or an output
/// cannot be written.
pub fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Compose(render) => {
            let skipped = compose(&ComposeConfig::try_from(render)?)?;
            if skipped > 0 {
                tracing::warn!("{skipped} panels had no usable texture and were left out");
            }
        }
        Command::Preview(render) => preview(&ComposeConfig::try_from(render)?)?,
        Command::DetectWall { photo, out } => match detect(&photo, &out)? {
            Some(b) => tracing::info!(
                "Wall area at ({}, {}) {}x{}, written to {}",
                b.x,
                b.y,
                b.width,
                b.height,
                out.display()
            ),
            None => tracing::warn!("No edges found in {}", photo.display()),
        },
        Command::Share { action } => match action {
            ShareCommand::Encode { session } => println!("{}", share_encode(&session)?),
            ShareCommand::Decode { code, out } => {
                let json = share_decode(&code)?;
                match out {
                    Some(path) => write_file(&path, json.as_bytes())?,
                    None => println!("{json}"),
                }
            }
        },
    }
    Ok(())
}

/// Load every JPEG/PNG in `dir` into a catalog keyed by file stem.
///
/// A missing directory yields an empty catalog; files with other
/// extensions are ignored.
///
/// # Errors
///
/// Returns an error if the directory or a texture file cannot be read.
pub fn load_catalog_dir(dir: &Path) -> Result<TextureCatalog> {
    let mut catalog = TextureCatalog::new();
    if !dir.is_dir() {
        tracing::warn!("Texture directory {} not found", dir.display());
        return Ok(catalog);
    }

    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ImageFormat::from_extension(ext) != ImageFormat::Unknown);
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !path.is_file() || !is_image {
            continue;
        }
        let bytes = read_file(&path)?;
        tracing::debug!("Texture '{stem}' from {}", path.display());
        catalog.insert(stem, bytes);
    }

    tracing::info!("Loaded {} textures from {}", catalog.len(), dir.display());
    Ok(catalog)
}

/// Read a session file, applying an optional wall width override.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid session, or
/// the override is not a positive width.
pub fn load_session(path: &Path, wall_width: Option<f64>) -> Result<Session> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session {}", path.display()))?;
    let mut session = Session::new(WallWidth::default());
    session
        .load_json(&json)
        .with_context(|| format!("Invalid session {}", path.display()))?;
    if let Some(cm) = wall_width {
        session.set_wall_width(cm)?;
    }
    Ok(session)
}

/// Write the full-resolution composite. Returns the number of skipped panels.
///
/// # Errors
///
/// Returns an error if an input is unreadable or invalid or the output
/// cannot be written.
pub fn compose(config: &ComposeConfig) -> Result<usize> {
    let mut session = load_session(&config.session, config.wall_width)?;
    let catalog = load_catalog_dir(&config.textures)?;
    let photo = read_file(&config.photo)?;

    let mut compositor = ExportCompositor::new(config.export_config());
    let output = compositor
        .compose_session(&photo, &mut session, None, &catalog)
        .with_context(|| format!("Failed to compose {}", config.photo.display()))?;
    write_file(&config.out, &output.to_png()?)?;
    Ok(output.skipped.len())
}

/// Write a preview: SVG when `out` ends in `.svg`, PNG otherwise.
///
/// # Errors
///
/// Returns an error if an input is unreadable or invalid or the output
/// cannot be written.
pub fn preview(config: &ComposeConfig) -> Result<()> {
    let session = load_session(&config.session, config.wall_width)?;
    let catalog = load_catalog_dir(&config.textures)?;
    let photo = read_file(&config.photo)?;

    let is_svg = config
        .out
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let (width, height) = image_dimensions(&photo)
            .with_context(|| format!("Unreadable photo {}", config.photo.display()))?;
        let surface = PreviewSurface::build(session.layout(), session.transform(width));
        let svg = surface.to_svg(&catalog, &photo, height, config.fill, config.depth);
        write_file(&config.out, svg.as_bytes())
    } else {
        let mut compositor = ExportCompositor::new(config.export_config());
        let output = compositor.compose_preview(
            &photo,
            session.wall_width(),
            session.layout(),
            &catalog,
        )?;
        write_file(&config.out, &output.to_png()?)
    }
}

/// Detect the wall area and write the outlined photo when one is found.
///
/// # Errors
///
/// Returns an error if the photo is unreadable or the output cannot be
/// written.
pub fn detect(photo: &Path, out: &Path) -> Result<Option<WallBounds>> {
    let bytes = read_file(photo)?;
    let Some(detection) = detect_wall(&bytes)? else {
        return Ok(None);
    };
    write_file(out, &encode_png(&detection.outlined)?)?;
    Ok(Some(detection.bounds))
}

/// Share code for a session file.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub fn share_encode(session: &Path) -> Result<String> {
    let session = load_session(session, None)?;
    Ok(SessionCodec::to_share_code(
        session.wall_width(),
        session.layout(),
    )?)
}

/// Pretty session JSON for a share code.
///
/// # Errors
///
/// Returns an error if the code is not a valid session.
pub fn share_decode(code: &str) -> Result<String> {
    let (wall_width, layout) =
        SessionCodec::from_share_code(code).context("Invalid share code")?;
    Ok(SessionCodec::to_json_pretty(wall_width, &layout)?)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_compose_args_to_config() {
        let args = CliArgs::parse_from([
            "panelwall",
            "compose",
            "--photo",
            "wall.jpg",
            "--session",
            "layout.json",
            "--textures",
            "tex",
            "--wall-width",
            "320",
            "--fill",
            "tile",
            "--tile-cm",
            "12.5",
            "--out",
            "out.png",
        ]);
        let Command::Compose(render) = args.command else {
            panic!("expected compose");
        };
        let config = ComposeConfig::try_from(render).expect("valid args");
        assert_eq!(config.photo, PathBuf::from("wall.jpg"));
        assert_eq!(config.textures, PathBuf::from("tex"));
        assert_eq!(config.wall_width, Some(320.0));
        assert_eq!(config.fill, FillMode::Tile { period_cm: 12.5 });
        assert_eq!(config.depth, None);
    }

    fn render_args(extra: &[&str]) -> RenderArgs {
        let mut argv = vec![
            "panelwall", "compose", "--photo", "wall.jpg", "--session", "layout.json", "--out",
            "out.png",
        ];
        argv.extend_from_slice(extra);
        let Command::Compose(render) = CliArgs::parse_from(argv).command else {
            panic!("expected compose");
        };
        render
    }

    #[test]
    fn test_tile_period_must_be_positive_and_finite() {
        for bad in ["--tile-cm=0", "--tile-cm=-4", "--tile-cm=NaN", "--tile-cm=inf"] {
            let args = render_args(&["--fill", "tile", bad]);
            assert!(ComposeConfig::try_from(args).is_err(), "{bad}");
        }
        // The period only matters when tiling.
        let stretch = render_args(&["--tile-cm=0"]);
        assert!(ComposeConfig::try_from(stretch).is_ok());
    }

    #[test]
    fn test_depth_flag() {
        let config = ComposeConfig::try_from(render_args(&["--depth"])).expect("valid args");
        assert_eq!(config.depth, Some(Depth::default()));
        assert_eq!(config.export_config().depth, Some(Depth::default()));
    }

    #[test]
    fn test_share_decode_subcommand() {
        let args = CliArgs::parse_from(["panelwall", "share", "decode", "--code", "abc"]);
        assert!(matches!(
            args.command,
            Command::Share {
                action: ShareCommand::Decode { ref code, out: None }
            } if code == "abc"
        ));
    }
}
