use serde::{Deserialize, Serialize};

/// Configuration for the contour/quadrilateral pipeline.
///
/// All thresholds are named here rather than inlined in the algorithm so
/// they can be tuned and tested independently.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectParams {
    /// Gaussian blur sigma applied before edge detection.
    ///
    /// 1.1 is the sigma a 5x5 kernel implies when derived from its window
    /// size, which keeps the smoothing equivalent to the usual fixed-window
    /// preprocessing step.
    pub gaussian_sigma: f32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Douglas-Peucker tolerance as a fraction of the contour arc length.
    pub approx_eps_rel: f64,
    /// Discard quad candidates whose shortest edge is below this floor
    /// (pixels). `None` disables the filter; the preview path runs without
    /// it, the capture path uses 200 px to reject small spurious quads that
    /// only show up at full resolution.
    pub min_edge_px: Option<f32>,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            gaussian_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 150.0,
            approx_eps_rel: 0.02,
            min_edge_px: None,
        }
    }
}

/// Configuration for the gradient-voting Hough circle transform.
///
/// Defaults mirror the classic `HOUGH_GRADIENT` parameterization:
/// accumulator at image resolution, minimum center distance of rows/8,
/// Canny high threshold 100 (low = high/2), accumulator threshold 30.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HoughCircleParams {
    /// Median filter radius applied before gradient computation
    /// (2 = a 5x5 window).
    pub median_radius: u32,
    /// Minimum distance between accepted circle centers, as a fraction of
    /// the image height.
    pub min_dist_frac: f32,
    /// Canny high threshold for the edge map feeding the accumulator; the
    /// low threshold is half of this.
    pub canny_high: f32,
    /// Gaussian sigma for smoothing the accumulator before peak extraction.
    /// Raw bilinear votes split across neighbouring cells; smoothing turns
    /// a center into one coherent peak.
    pub accum_sigma: f32,
    /// Accepted peaks must reach this fraction of the strongest smoothed
    /// peak in the frame.
    pub min_vote_frac: f32,
    /// Minimum number of edge points at the modal radius for a peak to
    /// become a circle.
    pub accumulator_threshold: f32,
    /// Fraction of the full circumference `2*pi*r` that must support the
    /// modal radius. Straight edges produce vote caustics whose near-modal
    /// support stays far below this, so they never read as circles.
    pub min_arc_frac: f32,
    /// Radius search bounds in pixels. 0 means auto: a 20 px floor and half
    /// the short image side as the ceiling.
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for HoughCircleParams {
    fn default() -> Self {
        Self {
            median_radius: 2,
            min_dist_frac: 1.0 / 8.0,
            canny_high: 100.0,
            accum_sigma: 2.0,
            min_vote_frac: 0.25,
            accumulator_threshold: 30.0,
            min_arc_frac: 0.5,
            min_radius: 0.0,
            max_radius: 0.0,
        }
    }
}

impl HoughCircleParams {
    /// Resolve the auto radius bounds for a given image size.
    pub(crate) fn radius_bounds(&self, width: u32, height: u32) -> (f32, f32) {
        let short_side = width.min(height) as f32;
        let r_min = if self.min_radius > 0.0 {
            self.min_radius
        } else {
            20.0
        };
        let r_max = if self.max_radius > 0.0 {
            self.max_radius
        } else {
            short_side / 2.0
        };
        (r_min, r_max.max(r_min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_radius_bounds_track_image_size() {
        let p = HoughCircleParams::default();
        assert_eq!(p.radius_bounds(640, 480), (20.0, 240.0));

        let fixed = HoughCircleParams {
            min_radius: 50.0,
            max_radius: 80.0,
            ..HoughCircleParams::default()
        };
        assert_eq!(fixed.radius_bounds(640, 480), (50.0, 80.0));
    }
}
