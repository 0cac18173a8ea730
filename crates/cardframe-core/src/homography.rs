use crate::{sample_bilinear_rgba, RgbaImage, RgbaImageView};
use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        Point2::new((v[0] / w) as f32, (v[1] / w) as f32)
    }
}

fn hartley_normalization(cx: f64, cy: f64, mean_dist: f64) -> Matrix3<f64> {
    let s = if mean_dist > 1e-12 {
        (2.0_f64).sqrt() / mean_dist
    } else {
        1.0
    };

    Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn normalize_points4(pts: &[Point2<f32>; 4]) -> ([Point2<f64>; 4], Matrix3<f64>) {
    let n = 4.0_f64;
    let mut cx = 0.0_f64;
    let mut cy = 0.0_f64;
    for p in pts {
        cx += p.x as f64;
        cy += p.y as f64;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0_f64;
    for p in pts {
        let dx = p.x as f64 - cx;
        let dy = p.y as f64 - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n;

    let t = hartley_normalization(cx, cy, mean_dist);

    let mut out = [Point2::new(0.0_f64, 0.0_f64); 4];
    for (i, p) in pts.iter().enumerate() {
        let v = t * Vector3::new(p.x as f64, p.y as f64, 1.0);
        out[i] = Point2::new(v[0], v[1]);
    }

    (out, t)
}

fn normalize_homography(h: Matrix3<f64>) -> Option<Matrix3<f64>> {
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        return None;
    }
    Some(h / s)
}

fn denormalize_homography(
    hn: Matrix3<f64>,
    t_src: Matrix3<f64>,
    t_dst: Matrix3<f64>,
) -> Option<Matrix3<f64>> {
    let t_dst_inv = t_dst.try_inverse()?;
    Some(t_dst_inv * hn * t_src)
}

/// Compute H such that: dst ~ H * src (projective), using 4 point
/// correspondences.
///
/// Corner order must be consistent between `src` and `dst`. Returns `None`
/// for degenerate configurations (collinear points).
pub fn homography_from_4pt(src: &[Point2<f32>; 4], dst: &[Point2<f32>; 4]) -> Option<Homography> {
    // Unknowns: [h11 h12 h13 h21 h22 h23 h31 h32], with h33 = 1
    // For each correspondence (x,y)->(u,v):
    // h11 x + h12 y + h13 - u h31 x - u h32 y = u
    // h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let (src_n, t_src) = normalize_points4(src);
    let (dst_n, t_dst) = normalize_points4(dst);

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let x = src_n[k].x;
        let y = src_n[k].y;
        let u = dst_n[k].x;
        let v = dst_n[k].y;

        // row 2k
        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        // row 2k+1
        let r1 = 2 * k + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = a.lu().solve(&b)?;

    let hn = Matrix3::<f64>::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    let h_den = denormalize_homography(hn, t_src, t_dst)?;
    let h_den = normalize_homography(h_den)?;

    Some(Homography::new(h_den))
}

/// Warp into a rectified image: for each output pixel, map to the source via
/// `h_src_from_out` and sample bilinearly.
pub fn warp_perspective_rgba(
    src: &RgbaImageView<'_>,
    h_src_from_out: Homography,
    out_w: usize,
    out_h: usize,
) -> RgbaImage {
    let mut out = vec![0u8; out_w * out_h * 4];

    for y in 0..out_h {
        for x in 0..out_w {
            let p = h_src_from_out.apply(Point2::new(x as f32, y as f32));
            let px = sample_bilinear_rgba(src, p.x, p.y);
            let i = (y * out_w + x) * 4;
            out[i..i + 4].copy_from_slice(&px);
        }
    }

    RgbaImage {
        width: out_w,
        height: out_h,
        data: out,
    }
}

/// Crop the axis-aligned region `[x0, y0] .. [x1, y1)` (already clamped by
/// the caller to image bounds) and resize it bilinearly to `out_w x out_h`.
pub fn crop_resize_rgba(
    src: &RgbaImageView<'_>,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    out_w: usize,
    out_h: usize,
) -> RgbaImage {
    let crop_w = x1.saturating_sub(x0).max(1);
    let crop_h = y1.saturating_sub(y0).max(1);
    let sx = crop_w as f32 / out_w as f32;
    let sy = crop_h as f32 / out_h as f32;

    let mut out = vec![0u8; out_w * out_h * 4];
    for y in 0..out_h {
        for x in 0..out_w {
            let src_x = x0 as f32 + (x as f32 + 0.5) * sx - 0.5;
            let src_y = y0 as f32 + (y as f32 + 0.5) * sy - 0.5;
            let px = sample_bilinear_rgba(src, src_x, src_y);
            let i = (y * out_w + x) * 4;
            out[i..i + 4].copy_from_slice(&px);
        }
    }

    RgbaImage {
        width: out_w,
        height: out_h,
        data: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point2<f32>, b: Point2<f32>, tol: f32) {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        assert!(
            dx < tol && dy < tol,
            "expected ({:.6},{:.6}) ~ ({:.6},{:.6}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn four_point_mapping_hits_all_correspondences() {
        let src = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(719.0_f32, 0.0),
            Point2::new(719.0_f32, 1023.0),
            Point2::new(0.0_f32, 1023.0),
        ];
        // A mildly perspective-distorted card.
        let dst = [
            Point2::new(102.0_f32, 85.0),
            Point2::new(630.0_f32, 120.0),
            Point2::new(600.0_f32, 980.0),
            Point2::new(80.0_f32, 940.0),
        ];

        let h = homography_from_4pt(&src, &dst).expect("solvable");
        for (s, d) in src.iter().zip(dst.iter()) {
            assert_close(h.apply(*s), *d, 1e-2);
        }
    }

    #[test]
    fn four_point_recovers_a_known_projective_map() {
        let ground_truth = Homography::new(Matrix3::new(
            0.8, 0.05, 120.0, //
            -0.02, 1.1, 80.0, //
            0.0009, -0.0004, 1.0,
        ));

        let src = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(180.0_f32, 0.0),
            Point2::new(180.0_f32, 130.0),
            Point2::new(0.0_f32, 130.0),
        ];
        let dst = src.map(|p| ground_truth.apply(p));

        let recovered = homography_from_4pt(&src, &dst).expect("recoverable");

        for p in [
            Point2::new(0.0_f32, 0.0),
            Point2::new(60.0, 40.0),
            Point2::new(150.0, 120.0),
        ] {
            assert_close(recovered.apply(p), ground_truth.apply(p), 1e-3);
        }
    }

    #[test]
    fn identity_warp_copies_pixels() {
        let mut data = Vec::with_capacity(4 * 4 * 4);
        for v in 0..16u8 {
            data.extend_from_slice(&[v * 16, v, 255 - v, 255]);
        }
        let view = RgbaImageView {
            width: 4,
            height: 4,
            data: &data,
        };
        let identity = Homography::new(Matrix3::identity());
        let out = warp_perspective_rgba(&view, identity, 4, 4);
        assert_eq!(out.data, data);
    }

    #[test]
    fn crop_resize_preserves_solid_regions() {
        // 4x4 solid red image.
        let mut data = Vec::with_capacity(4 * 4 * 4);
        for _ in 0..16 {
            data.extend_from_slice(&[200, 10, 10, 255]);
        }
        let view = RgbaImageView {
            width: 4,
            height: 4,
            data: &data,
        };
        let out = crop_resize_rgba(&view, 1, 1, 3, 3, 8, 8);
        assert_eq!(out.width, 8);
        assert_eq!(out.height, 8);
        let center = (4 * 8 + 4) * 4;
        assert_eq!(&out.data[center..center + 4], &[200, 10, 10, 255]);
    }
}
