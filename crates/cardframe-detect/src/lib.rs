//! Quadrilateral and circle detection for card framing.
//!
//! Two pipelines over an 8-bit grayscale buffer:
//! - [`find_best_quad`]: Gaussian blur, Canny edges, external contours,
//!   Douglas-Peucker simplification, largest 4-vertex polygon by area.
//! - [`find_circles`]: median blur plus a gradient-voting Hough circle
//!   transform (`imageproc` has no circle Hough, so the accumulator lives
//!   here).
//!
//! Both are pure functions of their inputs: no internal state, no retained
//! buffer references, identical input yields identical output. "Nothing
//! found" is `None`/empty, never an error.

mod hough;
mod params;
mod quad;

pub use hough::{find_circles, largest_circle, strongest_circle};
pub use params::{DetectParams, HoughCircleParams};
pub use quad::find_best_quad;
