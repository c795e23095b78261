//! # Meshgrad
//!
//! Command-line entry point.

use clap::Parser;
use meshgrad_cli::{commands, CliArgs, Command, RenderJob};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,meshgrad_core=debug,meshgrad_renderer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // Use JSON format when asked (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let quality = args.render_quality();

    match args.command {
        Command::Example {
            output,
            width,
            height,
        } => {
            let scene = commands::write_example(&output, width, height, quality)?;
            println!(
                "{}: {}x{} example with {} points",
                output.display(),
                scene.width,
                scene.height,
                scene.point_count()
            );
        }
        Command::Validate { input } => {
            let scene = commands::load_scene(&input, quality)?;
            println!(
                "{}: ok ({}x{}, {} points, quality {})",
                input.display(),
                scene.width,
                scene.height,
                scene.point_count(),
                scene.render_quality
            );
        }
        Command::Render(render_args) => {
            let job = RenderJob::new(render_args, quality);
            let bytes = commands::render(&job)?;
            println!("{} ({} bytes)", job.output.display(), bytes);
        }
        Command::Preview(preview) => {
            let frames = commands::preview(
                &preview.out_dir,
                preview.frames,
                preview.interval_ms,
                quality,
            )?;
            println!("{}: {} frames", preview.out_dir.display(), frames.len());
        }
    }
    Ok(())
}
