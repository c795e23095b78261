//! # Meshgrad CLI
//!
//! Command-line host for the mesh gradient engine. It stands in for an
//! interactive shell: every command reads or writes a scene document and
//! drives the same core and renderer an editor would.
//!
//! ## Usage
//!
//! ```bash
//! meshgrad example scene.json
//! meshgrad validate scene.json
//! meshgrad --quality 4 render scene.json -o gradient.png
//! MESHGRAD_FORMAT=jpeg meshgrad render scene.json
//! meshgrad preview frames/ --frames 60
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `RenderJob` - A fully resolved render request (format, output, export settings)
//! - `commands` - The work behind each subcommand

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod commands;

use std::path::{Path, PathBuf};

use clap::{value_parser, Args, Parser, Subcommand};
use meshgrad_core::RenderQuality;
use meshgrad_renderer::export::{timestamped_file_name, ExportConfig, ExportFormat};

/// Command-line arguments for meshgrad.
#[derive(Debug, Clone, Parser)]
#[command(name = "meshgrad")]
#[command(about = "Mesh gradient scene tool")]
#[command(version)]
pub struct CliArgs {
    /// Render quality multiplier (1-4); overrides the document's own
    #[arg(long, global = true, env = "MESHGRAD_QUALITY", value_parser = value_parser!(u8).range(1..=4))]
    pub quality: Option<u8>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    /// The quality override, if one was given.
    #[must_use]
    pub fn render_quality(&self) -> Option<RenderQuality> {
        self.quality.and_then(RenderQuality::new)
    }
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write the three-point example scene as JSON
    Example {
        /// Output path
        output: PathBuf,
        /// Canvas width in scene pixels
        #[arg(long, default_value = "800")]
        width: u32,
        /// Canvas height in scene pixels
        #[arg(long, default_value = "500")]
        height: u32,
    },

    /// Check that a scene document is well formed
    Validate {
        /// Scene document to check
        input: PathBuf,
    },

    /// Rasterize a scene document to PNG or JPEG
    Render(RenderArgs),

    /// Render frames of the floating hero preview
    Preview(PreviewArgs),
}

/// Arguments for `render`.
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Scene document to render
    pub input: PathBuf,

    /// Output path (default: mesh-gradient-<ms>.<ext> in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: png, jpeg or json (default: from the output extension, else png)
    #[arg(long, env = "MESHGRAD_FORMAT")]
    pub format: Option<ExportFormat>,

    /// Skip per-point blur
    #[arg(long)]
    pub no_blur: bool,

    /// JPEG quality (1-100)
    #[arg(long, default_value = "90", value_parser = value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,
}

/// Arguments for `preview`.
#[derive(Debug, Clone, Args)]
pub struct PreviewArgs {
    /// Directory to write `frame-NNNN.png` files into
    pub out_dir: PathBuf,

    /// Number of frames to render
    #[arg(long, default_value = "30")]
    pub frames: u32,

    /// Milliseconds between frames
    #[arg(long, default_value = "16.0")]
    pub interval_ms: f64,
}

/// A fully resolved render request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    /// Scene document to read.
    pub input: PathBuf,
    /// File to write.
    pub output: PathBuf,
    /// Encoding.
    pub format: ExportFormat,
    /// Export settings.
    pub export: ExportConfig,
}

impl RenderJob {
    /// Resolve CLI arguments into a job.
    ///
    /// The format comes from `--format`, then the output extension, then PNG.
    #[must_use]
    pub fn new(args: RenderArgs, quality: Option<RenderQuality>) -> Self {
        let format = args
            .format
            .or_else(|| args.output.as_deref().and_then(format_from_path))
            .unwrap_or(ExportFormat::Png);
        let output = args
            .output
            .unwrap_or_else(|| PathBuf::from(timestamped_file_name(format)));
        Self {
            input: args.input,
            output,
            format,
            export: ExportConfig {
                jpeg_quality: args.jpeg_quality,
                blur: !args.no_blur,
                quality,
            },
        }
    }
}

fn format_from_path(path: &Path) -> Option<ExportFormat> {
    path.extension()?.to_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).expect("valid arguments")
    }

    fn render_job(args: &[&str]) -> RenderJob {
        let cli = parse(args);
        let quality = cli.render_quality();
        match cli.command {
            Command::Render(render) => RenderJob::new(render, quality),
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn test_format_from_extension() {
        let job = render_job(&["meshgrad", "render", "in.json", "-o", "out.jpg"]);
        assert_eq!(job.format, ExportFormat::Jpeg);
        assert_eq!(job.export.jpeg_quality, 90);
        assert!(job.export.blur);
    }

    #[test]
    fn test_explicit_format_wins() {
        let job = render_job(&[
            "meshgrad", "render", "in.json", "-o", "out.jpg", "--format", "png",
        ]);
        assert_eq!(job.format, ExportFormat::Png);
    }

    #[test]
    fn test_default_output_name() {
        let job = render_job(&["meshgrad", "--quality", "3", "render", "in.json", "--no-blur"]);
        let name = job.output.to_string_lossy().into_owned();
        assert!(name.starts_with("mesh-gradient-") && name.ends_with(".png"));
        assert_eq!(job.export.quality, RenderQuality::new(3));
        assert!(!job.export.blur);
    }

    #[test]
    fn test_quality_out_of_range_rejected() {
        assert!(CliArgs::try_parse_from(["meshgrad", "--quality", "5", "validate", "x"]).is_err());
    }
}
