//! High-level facade for the `cardframe-*` workspace.
//!
//! Two operations make up the public surface:
//! - [`FrameAnalyzer::analyze`] scores one live preview frame against the
//!   expected on-screen card size and returns a [`GuideResult`] verdict.
//!   Called per frame (15-30 Hz); the caller should run it on a worker
//!   thread with a keep-only-latest frame policy.
//! - [`CardRectifier::rectify`] turns one full-resolution capture into a
//!   fixed-size perspective-corrected image. Called once per capture.
//!
//! Both are pure functions of their inputs: no state is held between calls
//! and no reference to a caller buffer outlives the call. The only session
//! state, the consecutive-good-frame streak, lives in the caller-side
//! [`CaptureSession`].
//!
//! ## Quickstart
//!
//! ```no_run
//! use cardframe::{CardRectifier, FrameAnalyzer};
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let preview = ImageReader::open("preview.png")?.decode()?.to_luma8();
//! let analyzer = FrameAnalyzer::default();
//! let verdict = analyzer.analyze(&preview, 720, 1280)?;
//! println!("good framing: {}", verdict.is_good);
//!
//! let capture = ImageReader::open("capture.png")?.decode()?.to_rgba8();
//! let rectifier = CardRectifier::default();
//! let card = rectifier.rectify(&capture)?;
//! card.save("card.png")?;
//! # Ok(())
//! # }
//! ```

pub use cardframe_core as core;
pub use cardframe_detect as detect;

mod convert;
mod error;
mod guide;
mod rectify;
mod session;

pub use cardframe_core::{Circle, DetectedShape, Quad, ShapeKind};
pub use cardframe_detect::{DetectParams, HoughCircleParams};

pub use convert::{gray_view, rgba_from_core, rgba_view};
pub use error::CardScanError;
pub use guide::{FrameAnalyzer, GuideHint, GuideParams, GuideResult};
pub use rectify::{CardRectifier, RectifyParams};
pub use session::{CaptureSession, SessionState};
