use crate::{CardScanError, DetectParams, DetectedShape, HoughCircleParams, ShapeKind};
use cardframe_detect::{find_best_quad, strongest_circle};
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Configuration for per-frame framing guidance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuideParams {
    /// Fraction of the viewport left as guide margin on every side.
    pub margin_frac: f32,
    /// Relative tolerance around the expected size: a dimension is accepted
    /// within `expected * (1 ± size_tolerance)`.
    pub size_tolerance: f32,
    /// Contour/quadrilateral pipeline settings.
    pub detect: DetectParams,
    /// Circle fallback settings.
    pub hough: HoughCircleParams,
}

impl Default for GuideParams {
    fn default() -> Self {
        Self {
            margin_frac: 0.08,
            size_tolerance: 0.15,
            detect: DetectParams::default(),
            hough: HoughCircleParams::default(),
        }
    }
}

/// Structured guidance reason code.
///
/// `Display` renders the on-screen text; callers that localize keep the
/// code and ignore the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuideHint {
    /// Card covers too little of the guide frame.
    MoveCloser,
    /// Card spills over the guide frame.
    MoveBack,
    /// No shape detected at all; likely motion blur.
    HoldSteady,
}

impl fmt::Display for GuideHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GuideHint::MoveCloser => {
                "card is too small; move closer until it fills at least 85% of the guide"
            }
            GuideHint::MoveBack => "card extends past the guide; move back a little",
            GuideHint::HoldSteady => "blur detected; hold the device steady",
        };
        f.write_str(text)
    }
}

/// Verdict for a single preview frame. Produced fresh per call, immutable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideResult {
    pub is_good: bool,
    pub shape: ShapeKind,
    pub hint: Option<GuideHint>,
}

impl GuideResult {
    fn good(shape: ShapeKind) -> Self {
        Self {
            is_good: true,
            shape,
            hint: None,
        }
    }

    fn bad(shape: ShapeKind, hint: GuideHint) -> Self {
        Self {
            is_good: false,
            shape,
            hint: Some(hint),
        }
    }
}

/// Per-frame analyzer: detects the best card-like shape in a preview frame
/// and scores it against the expected on-screen size.
///
/// Stateless; one instance can serve any number of frames and threads.
#[derive(Clone, Debug, Default)]
pub struct FrameAnalyzer {
    params: GuideParams,
}

impl FrameAnalyzer {
    pub fn new(params: GuideParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &GuideParams {
        &self.params
    }

    /// Analyze one preview frame.
    ///
    /// `viewport_w`/`viewport_h` are the dimensions of the view the user
    /// sees; the expected card size is derived from them, not from the
    /// frame buffer. Detection failure is a negative verdict, not an error.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn analyze(
        &self,
        frame: &image::GrayImage,
        viewport_w: u32,
        viewport_h: u32,
    ) -> Result<GuideResult, CardScanError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(CardScanError::InvalidDimensions {
                width: frame.width(),
                height: frame.height(),
            });
        }
        if viewport_w == 0 || viewport_h == 0 {
            return Err(CardScanError::InvalidViewport {
                width: viewport_w,
                height: viewport_h,
            });
        }

        let margin = self.params.margin_frac;
        let tol = self.params.size_tolerance;

        // Quadrilateral first; circle only when no quad qualifies.
        let shape = find_best_quad(frame, &self.params.detect)
            .map(DetectedShape::Quad)
            .or_else(|| strongest_circle(frame, &self.params.hough).map(DetectedShape::Circle));

        let verdict = match shape {
            Some(DetectedShape::Quad(quad)) => {
                let expected_short = viewport_w.min(viewport_h) as f32 * (1.0 - 2.0 * margin);
                let expected_long = viewport_w.max(viewport_h) as f32 * (1.0 - 2.0 * margin);
                let short = quad.short_edge();
                let long = quad.long_edge();

                if within(short, expected_short, tol) && within(long, expected_long, tol) {
                    GuideResult::good(ShapeKind::Rectangle)
                } else if short < expected_short {
                    GuideResult::bad(ShapeKind::Rectangle, GuideHint::MoveCloser)
                } else {
                    GuideResult::bad(ShapeKind::Rectangle, GuideHint::MoveBack)
                }
            }
            Some(DetectedShape::Circle(circle)) => {
                let expected_r = viewport_w.min(viewport_h) as f32 * (0.5 - margin);
                if within(circle.radius, expected_r, tol) {
                    GuideResult::good(ShapeKind::Circle)
                } else if circle.radius < expected_r {
                    GuideResult::bad(ShapeKind::Circle, GuideHint::MoveCloser)
                } else {
                    GuideResult::bad(ShapeKind::Circle, GuideHint::MoveBack)
                }
            }
            None => GuideResult::bad(ShapeKind::None, GuideHint::HoldSteady),
        };

        Ok(verdict)
    }
}

#[inline]
fn within(value: f32, target: f32, tol: f32) -> bool {
    value >= target * (1.0 - tol) && value <= target * (1.0 + tol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_window_is_inclusive() {
        assert!(within(85.0, 100.0, 0.15));
        assert!(within(115.0, 100.0, 0.15));
        assert!(!within(84.9, 100.0, 0.15));
        assert!(!within(115.1, 100.0, 0.15));
    }

    #[test]
    fn zero_viewport_is_rejected() {
        let frame = image::GrayImage::new(32, 32);
        let analyzer = FrameAnalyzer::default();
        assert!(matches!(
            analyzer.analyze(&frame, 0, 720),
            Err(CardScanError::InvalidViewport { .. })
        ));
    }

    #[test]
    fn empty_frame_is_rejected() {
        let frame = image::GrayImage::new(0, 0);
        let analyzer = FrameAnalyzer::default();
        assert!(matches!(
            analyzer.analyze(&frame, 720, 1280),
            Err(CardScanError::InvalidDimensions { .. })
        ));
    }
}
