use crate::{rgba_from_core, rgba_view, CardScanError, DetectParams, DetectedShape, HoughCircleParams};
use cardframe_core::{crop_resize_rgba, homography_from_4pt, warp_perspective_rgba};
use cardframe_detect::{find_best_quad, largest_circle};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Configuration for one-shot capture rectification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RectifyParams {
    /// Output size for the quadrilateral path. The circle fallback emits a
    /// square `out_width x out_width` instead; see [`CardRectifier`].
    pub out_width: u32,
    pub out_height: u32,
    /// Minimum edge length (pixels) for a quad candidate on the
    /// full-resolution capture.
    pub min_edge_px: f32,
    /// Contour/quadrilateral pipeline settings. `min_edge_px` above is
    /// copied into the pipeline at call time.
    pub detect: DetectParams,
    /// Circle fallback settings.
    pub hough: HoughCircleParams,
}

impl Default for RectifyParams {
    fn default() -> Self {
        Self {
            out_width: 720,
            out_height: 1024,
            min_edge_px: 200.0,
            detect: DetectParams::default(),
            hough: HoughCircleParams::default(),
        }
    }
}

/// One-shot rectifier for a captured card photo.
///
/// The quadrilateral path warps the detected card into
/// `out_width x out_height`. The circle fallback crops the bounding square
/// and resizes to `out_width x out_width` — a different aspect ratio than
/// the quad path. That asymmetry is inherited from the system this
/// reimplements and is kept deliberately rather than silently normalized.
#[derive(Clone, Debug, Default)]
pub struct CardRectifier {
    params: RectifyParams,
}

impl CardRectifier {
    pub fn new(params: RectifyParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &RectifyParams {
        &self.params
    }

    /// Rectify one captured image into a fixed-size output.
    ///
    /// A single deterministic attempt: no internal retries. Returns
    /// [`CardScanError::ShapeNotFound`] when neither a qualifying
    /// quadrilateral nor a circle is present; the caller decides whether to
    /// keep the camera session alive and try another capture.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width(), height = image.height()))
    )]
    pub fn rectify(&self, image: &image::RgbaImage) -> Result<image::RgbaImage, CardScanError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(CardScanError::InvalidDimensions {
                width: image.width(),
                height: image.height(),
            });
        }

        let gray = image::imageops::grayscale(image);
        let detect = DetectParams {
            min_edge_px: Some(self.params.min_edge_px),
            ..self.params.detect.clone()
        };

        // Quadrilateral first; fall back to the largest circle.
        let shape = find_best_quad(&gray, &detect)
            .map(DetectedShape::Quad)
            .or_else(|| largest_circle(&gray, &self.params.hough).map(DetectedShape::Circle));

        match shape {
            Some(DetectedShape::Quad(quad)) => {
                let out_w = self.params.out_width as usize;
                let out_h = self.params.out_height as usize;
                let dst = [
                    Point2::new(0.0_f32, 0.0),
                    Point2::new(out_w as f32 - 1.0, 0.0),
                    Point2::new(out_w as f32 - 1.0, out_h as f32 - 1.0),
                    Point2::new(0.0_f32, out_h as f32 - 1.0),
                ];
                // Inverse mapping: output pixel -> source pixel.
                let h = homography_from_4pt(&dst, &quad.corners)
                    .ok_or(CardScanError::ShapeNotFound)?;
                debug!(
                    "rectify: quad path, corners {:?}, output {}x{}",
                    quad.corners, out_w, out_h
                );
                let out = warp_perspective_rgba(&rgba_view(image), h, out_w, out_h);
                Ok(rgba_from_core(out))
            }
            Some(DetectedShape::Circle(circle)) => {
                let out_w = self.params.out_width as usize;
                let (cx, cy, r) = (circle.center.x, circle.center.y, circle.radius);
                let x0 = (cx - r).max(0.0) as usize;
                let y0 = (cy - r).max(0.0) as usize;
                let x1 = ((cx + r) as usize).min(image.width() as usize);
                let y1 = ((cy + r) as usize).min(image.height() as usize);
                debug!(
                    "rectify: circle path, center ({cx:.1},{cy:.1}) r {r:.1}, crop [{x0},{y0}]..[{x1},{y1}]"
                );
                let out = crop_resize_rgba(&rgba_view(image), x0, y0, x1, y1, out_w, out_w);
                Ok(rgba_from_core(out))
            }
            None => Err(CardScanError::ShapeNotFound),
        }
    }
}
