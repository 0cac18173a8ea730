use nalgebra::Point2;

/// Order four unordered points into the canonical (top-left, top-right,
/// bottom-right, bottom-left) tuple.
///
/// Sort by y then x: the two smallest-y points form the top pair, ordered
/// left to right; the remaining two form the bottom pair, ordered right to
/// left. The result does not depend on the traversal direction of the
/// upstream contour or on any input permutation.
pub fn order_corners(points: [Point2<f32>; 4]) -> [Point2<f32>; 4] {
    let mut sorted = points;
    sorted.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let (top_left, top_right) = if sorted[0].x <= sorted[1].x {
        (sorted[0], sorted[1])
    } else {
        (sorted[1], sorted[0])
    };
    let (bottom_right, bottom_left) = if sorted[2].x >= sorted[3].x {
        (sorted[2], sorted[3])
    } else {
        (sorted[3], sorted[2])
    };

    [top_left, top_right, bottom_right, bottom_left]
}
