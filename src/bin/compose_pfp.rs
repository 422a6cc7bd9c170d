//! Headless version of the desktop pipeline: one image in, one PNG out.

use clap::Parser;
use salt_shaker_pfp::compositor::{Compositor, Layers};
use salt_shaker_pfp::config::DEFAULT_OVERLAY_PATH;
use salt_shaker_pfp::exporter::{encode_png, DOWNLOAD_FILE_NAME};
use salt_shaker_pfp::image_source::{decode_file, ImageSource};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "compose-pfp", about = "Frame an image under the PFP overlay")]
struct Args {
    /// Image to place under the overlay
    input: PathBuf,

    /// Where to write the PNG
    #[arg(short, long, default_value = DOWNLOAD_FILE_NAME)]
    output: PathBuf,

    /// Overlay drawn on top; skipped with a warning if missing
    #[arg(long, default_value = DEFAULT_OVERLAY_PATH)]
    overlay: PathBuf,

    /// Render at preview size instead of export size
    #[arg(long)]
    preview: bool,
}

fn run(args: Args) -> salt_shaker_pfp::Result<()> {
    let source = ImageSource::Path(args.input);
    source.validate()?;
    let user = source.decode()?;

    let overlay = match decode_file(&args.overlay) {
        Ok(image) => Some(Arc::new(image)),
        Err(e) => {
            log::warn!("Overlay image not found, continuing without overlay: {}", e);
            None
        }
    };

    let compositor = if args.preview {
        Compositor::preview()
    } else {
        Compositor::export()
    };
    let layers = Layers {
        user: Some(Arc::new(user)),
        overlay,
    };
    let canvas = compositor.render(&layers);

    std::fs::write(&args.output, encode_png(&canvas)?)?;
    log::info!(
        "Wrote {}x{} composite to {}",
        canvas.width(),
        canvas.height(),
        args.output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
