//! Gradient-voting Hough circle transform.
//!
//! For each Canny edge pixel, votes are cast along the gradient direction
//! (both signs) at distances in `[r_min, r_max]`; circle centers show up as
//! accumulator peaks because boundary gradients point radially. Radii are
//! recovered afterwards from the modal edge-to-center distance, so the
//! accumulator stays two-dimensional.

use crate::HoughCircleParams;
use cardframe_core::Circle;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::edges::canny;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use log::debug;
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Deposit a weighted vote into the accumulator using bilinear interpolation.
#[inline]
fn bilinear_add(accum: &mut [f32], w: u32, h: u32, x: f32, y: f32, weight: f32) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    if x0 + 1 >= w || y0 + 1 >= h {
        return;
    }
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let stride = w as usize;
    let base = y0 as usize * stride + x0 as usize;
    accum[base] += weight * (1.0 - fx) * (1.0 - fy);
    accum[base + 1] += weight * fx * (1.0 - fy);
    accum[base + stride] += weight * (1.0 - fx) * fy;
    accum[base + stride + 1] += weight * fx * fy;
}

/// Detect circles in a grayscale image, strongest (most votes) first.
///
/// The input is median-filtered, Canny-thresholded at
/// `canny_high / 2 .. canny_high`, and each edge pixel votes along its Sobel
/// gradient direction across the radius range. The accumulator is Gaussian
/// smoothed (`accum_sigma`), then cells above `min_vote_frac` of the
/// strongest smoothed peak are kept, suppressing neighbours closer than
/// `min_dist_frac * height`. Each surviving center gets the modal distance
/// of supporting edge pixels as its radius; the modal distance must be
/// backed by `accumulator_threshold` edge points and by `min_arc_frac` of
/// the circumference at that radius, which drops straight-edge caustics.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(gray, params), fields(width = gray.width(), height = gray.height()))
)]
pub fn find_circles(gray: &GrayImage, params: &HoughCircleParams) -> Vec<Circle> {
    let (w, h) = gray.dimensions();
    if w < 8 || h < 8 {
        return Vec::new();
    }

    let filtered = median_filter(gray, params.median_radius, params.median_radius);
    let edges = canny(&filtered, params.canny_high / 2.0, params.canny_high);
    let gx = horizontal_sobel(&filtered);
    let gy = vertical_sobel(&filtered);

    let (r_min, r_max) = params.radius_bounds(w, h);

    // Collect edge pixels with a usable gradient direction.
    let mut edge_pts: Vec<(u32, u32, f32, f32)> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if edges.get_pixel(x, y)[0] == 0 {
                continue;
            }
            let dx = gx.get_pixel(x, y)[0] as f32;
            let dy = gy.get_pixel(x, y)[0] as f32;
            let mag = (dx * dx + dy * dy).sqrt();
            if mag < 1e-3 {
                continue;
            }
            edge_pts.push((x, y, dx / mag, dy / mag));
        }
    }
    if edge_pts.is_empty() {
        return Vec::new();
    }

    // Center voting.
    let mut accum = vec![0.0f32; (w * h) as usize];
    for &(x, y, dx, dy) in &edge_pts {
        for sign in [-1.0f32, 1.0] {
            let mut r = r_min;
            while r <= r_max {
                let cx = x as f32 + sign * dx * r;
                let cy = y as f32 + sign * dy * r;
                bilinear_add(&mut accum, w, h, cx, cy, 1.0);
                r += 1.0;
            }
        }
    }

    // Smooth the accumulator so a center reads as one coherent peak rather
    // than a cluster of bilinear-split cells.
    let accum_img = ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(w, h, accum)
        .expect("accumulator dimensions match");
    let smoothed = gaussian_blur_f32(&accum_img, params.accum_sigma);
    let votes_map = smoothed.as_raw();
    let max_votes = votes_map.iter().copied().fold(0.0f32, f32::max);
    if max_votes < 1e-6 {
        return Vec::new();
    }
    let vote_floor = params.min_vote_frac * max_votes;

    // Peak extraction with minimum center distance.
    let min_dist = (params.min_dist_frac * h as f32).max(1.0);
    let mut peaks: Vec<(f32, f32, f32)> = Vec::new(); // (cx, cy, votes)
    let mut indexed: Vec<(usize, f32)> = votes_map
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, v)| v >= vote_floor)
        .collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    // Keep at most a handful of candidate centers.
    const MAX_PEAKS: usize = 16;
    for (idx, votes) in indexed {
        let cx = (idx % w as usize) as f32;
        let cy = (idx / w as usize) as f32;
        let too_close = peaks
            .iter()
            .any(|&(px, py, _)| (px - cx).hypot(py - cy) < min_dist);
        if !too_close {
            peaks.push((cx, cy, votes));
            if peaks.len() >= MAX_PEAKS {
                break;
            }
        }
    }

    // Radius estimation: modal edge-to-center distance in 1 px bins. The
    // window around the modal bin must hold both an absolute minimum of
    // edge points and a real share of the circumference at that radius.
    let mut circles = Vec::with_capacity(peaks.len());
    for &(cx, cy, votes) in &peaks {
        let bins = (r_max - r_min).ceil() as usize + 1;
        let mut hist = vec![0u32; bins];
        for &(x, y, _, _) in &edge_pts {
            let d = (x as f32 - cx).hypot(y as f32 - cy);
            if d < r_min || d > r_max {
                continue;
            }
            hist[(d - r_min) as usize] += 1;
        }
        let Some((bin, _)) = hist.iter().enumerate().max_by_key(|&(_, c)| *c) else {
            continue;
        };
        let radius = r_min + bin as f32 + 0.5;
        // A fixed center error spreads the ring over more bins at larger
        // radii, so the window grows with the radius.
        let half = 1 + (radius / 100.0) as usize;
        let lo = bin.saturating_sub(half);
        let hi = (bin + half).min(bins - 1);
        let support: u32 = hist[lo..=hi].iter().sum();
        let needed = (params.min_arc_frac * 2.0 * std::f32::consts::PI * radius)
            .max(params.accumulator_threshold);
        if (support as f32) < needed {
            continue;
        }
        circles.push((
            Circle {
                center: Point2::new(cx, cy),
                radius,
            },
            votes,
        ));
    }

    circles.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    debug!(
        "hough: {} edge pixels, {} peaks, {} circles",
        edge_pts.len(),
        peaks.len(),
        circles.len()
    );

    circles.into_iter().map(|(c, _)| c).collect()
}

/// First (strongest) circle, the preview-guidance choice.
pub fn strongest_circle(gray: &GrayImage, params: &HoughCircleParams) -> Option<Circle> {
    find_circles(gray, params).into_iter().next()
}

/// Circle with the largest radius among all detections, the capture-path
/// choice.
pub fn largest_circle(gray: &GrayImage, params: &HoughCircleParams) -> Option<Circle> {
    find_circles(gray, params)
        .into_iter()
        .max_by(|a, b| {
            a.radius
                .partial_cmp(&b.radius)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
    use imageproc::rect::Rect;

    fn circle_image(w: u32, h: u32, cx: i32, cy: i32, r: i32) -> GrayImage {
        let mut img = GrayImage::from_pixel(w, h, Luma([20u8]));
        draw_filled_circle_mut(&mut img, (cx, cy), r, Luma([235u8]));
        img
    }

    #[test]
    fn finds_a_centered_disc() {
        let img = circle_image(400, 400, 200, 200, 120);
        let c = strongest_circle(&img, &HoughCircleParams::default()).expect("circle");
        assert!((c.center.x - 200.0).abs() < 6.0, "cx = {}", c.center.x);
        assert!((c.center.y - 200.0).abs() < 6.0, "cy = {}", c.center.y);
        assert!((c.radius - 120.0).abs() < 8.0, "r = {}", c.radius);
    }

    #[test]
    fn largest_circle_prefers_radius_over_votes() {
        let mut img = GrayImage::from_pixel(600, 400, Luma([20u8]));
        draw_filled_circle_mut(&mut img, (120, 200), 60, Luma([235u8]));
        draw_filled_circle_mut(&mut img, (420, 200), 140, Luma([235u8]));

        let c = largest_circle(&img, &HoughCircleParams::default()).expect("circle");
        assert!((c.center.x - 420.0).abs() < 10.0, "cx = {}", c.center.x);
        assert!((c.radius - 140.0).abs() < 10.0, "r = {}", c.radius);
    }

    #[test]
    fn a_single_disc_yields_no_spurious_larger_circle() {
        let img = circle_image(400, 400, 200, 200, 120);

        let circles = find_circles(&img, &HoughCircleParams::default());
        assert!(!circles.is_empty());
        for c in &circles {
            assert!(c.radius < 150.0, "spurious detection {c:?}");
        }

        // With one disc, the largest-radius pick agrees with the strongest.
        let largest = largest_circle(&img, &HoughCircleParams::default()).expect("circle");
        assert!((largest.center.x - 200.0).abs() < 6.0, "cx = {}", largest.center.x);
        assert!((largest.radius - 120.0).abs() < 8.0, "r = {}", largest.radius);
    }

    #[test]
    fn blank_image_yields_no_circles() {
        let img = GrayImage::from_pixel(200, 200, Luma([64u8]));
        assert!(find_circles(&img, &HoughCircleParams::default()).is_empty());
    }

    #[test]
    fn straight_edges_do_not_read_as_circles() {
        // A wide thin rectangle: parallel edges pile votes into caustics,
        // but no center has circumference-level radius support.
        let mut img = GrayImage::from_pixel(640, 480, Luma([20u8]));
        draw_filled_rect_mut(&mut img, Rect::at(40, 150).of_size(560, 180), Luma([235u8]));
        assert!(find_circles(&img, &HoughCircleParams::default()).is_empty());
    }
}
