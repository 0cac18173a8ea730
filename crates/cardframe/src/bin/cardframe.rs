use cardframe::{CardRectifier, CardScanError, FrameAnalyzer, GuideParams, RectifyParams};
use clap::{Parser, Subcommand};
use image::ImageReader;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardframe", about = "Card framing guidance and rectification")]
struct Cli {
    /// Log level: off, error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score one frame against the guide and print the verdict as JSON.
    Guide {
        /// Input image (decoded to grayscale).
        input: PathBuf,
        /// Viewport width the user sees.
        #[arg(long, default_value_t = 720)]
        viewport_width: u32,
        /// Viewport height the user sees.
        #[arg(long, default_value_t = 1280)]
        viewport_height: u32,
    },
    /// Rectify a captured photo into a fixed-size card image.
    Rectify {
        /// Input image.
        input: PathBuf,
        /// Output path for the rectified image.
        output: PathBuf,
        /// Output width (quad path; the circle fallback emits a
        /// width x width square).
        #[arg(long, default_value_t = 720)]
        width: u32,
        /// Output height (quad path).
        #[arg(long, default_value_t = 1024)]
        height: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    cardframe::core::init_with_level(cli.log_level)?;

    match cli.command {
        Command::Guide {
            input,
            viewport_width,
            viewport_height,
        } => {
            let frame = ImageReader::open(input)?.decode()?.to_luma8();
            let analyzer = FrameAnalyzer::new(GuideParams::default());
            let verdict = analyzer.analyze(&frame, viewport_width, viewport_height)?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
            if let Some(hint) = verdict.hint {
                eprintln!("{hint}");
            }
        }
        Command::Rectify {
            input,
            output,
            width,
            height,
        } => {
            let capture = ImageReader::open(input)?.decode()?.to_rgba8();
            let rectifier = CardRectifier::new(RectifyParams {
                out_width: width,
                out_height: height,
                ..RectifyParams::default()
            });
            match rectifier.rectify(&capture) {
                Ok(card) => {
                    card.save(&output)?;
                    println!("wrote {}x{} image to {}", card.width(), card.height(), output.display());
                }
                Err(CardScanError::ShapeNotFound) => {
                    eprintln!("no card-like shape found; keep the session open and retake");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(())
}
