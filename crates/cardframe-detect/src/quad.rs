use crate::DetectParams;
use cardframe_core::{polygon_area, Quad};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use log::debug;
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Find the best card-like quadrilateral in a grayscale image.
///
/// Pipeline: Gaussian blur, Canny edges, external contours, Douglas-Peucker
/// simplification at `approx_eps_rel` of the arc length. Contours that
/// simplify to exactly 4 vertices are candidates; the one with the largest
/// enclosed area wins. Ties resolve to the first candidate in contour scan
/// order (strict `>` comparison), which keeps selection deterministic.
///
/// With `min_edge_px` set, candidates whose shortest edge falls below the
/// floor are skipped regardless of area.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(gray, params), fields(width = gray.width(), height = gray.height()))
)]
pub fn find_best_quad(gray: &GrayImage, params: &DetectParams) -> Option<Quad> {
    let blurred = gaussian_blur_f32(gray, params.gaussian_sigma);
    let edges = canny(&blurred, params.canny_low, params.canny_high);
    let contours = find_contours::<i32>(&edges);

    let mut best: Option<(Quad, f32)> = None;
    let mut candidates = 0usize;

    for contour in &contours {
        if contour.border_type != BorderType::Outer || contour.points.len() < 4 {
            continue;
        }

        let peri = arc_length(&contour.points, true);
        let approx = approximate_polygon_dp(&contour.points, params.approx_eps_rel * peri, true);
        if approx.len() != 4 {
            continue;
        }

        let pts: Vec<Point2<f32>> = approx
            .iter()
            .map(|p| Point2::new(p.x as f32, p.y as f32))
            .collect();

        if let Some(floor) = params.min_edge_px {
            if min_edge(&pts) < floor {
                continue;
            }
        }

        candidates += 1;
        let area = polygon_area(&pts);
        // Strict comparison: the first candidate in scan order wins ties,
        // and zero-area degenerates never qualify.
        let best_area = best.as_ref().map_or(0.0, |(_, a)| *a);
        if area > best_area {
            let corners = [pts[0], pts[1], pts[2], pts[3]];
            best = Some((Quad::from_unordered(corners), area));
        }
    }

    debug!(
        "quad search: {} contours, {} candidates, best area {:?}",
        contours.len(),
        candidates,
        best.as_ref().map(|(_, a)| *a)
    );

    best.map(|(quad, _)| quad)
}

/// Shortest edge of a 4-vertex polygon in its given cyclic order.
fn min_edge(pts: &[Point2<f32>]) -> f32 {
    let mut shortest = f32::INFINITY;
    for i in 0..pts.len() {
        let j = (i + 1) % pts.len();
        shortest = shortest.min((pts[i] - pts[j]).norm());
    }
    shortest
}
