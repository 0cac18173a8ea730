use cardframe::{CardRectifier, CardScanError, RectifyParams};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};
use imageproc::point::Point;

const BG: Rgba<u8> = Rgba([30, 30, 30, 255]);
const CARD: Rgba<u8> = Rgba([235, 235, 235, 255]);

fn canvas(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, BG)
}

fn draw_quad(img: &mut RgbaImage, corners: [(i32, i32); 4], color: Rgba<u8>) {
    let poly: Vec<Point<i32>> = corners.iter().map(|&(x, y)| Point::new(x, y)).collect();
    draw_polygon_mut(img, &poly, color);
}

/// A perspective-distorted card warps into the default 720x1024 output and
/// the output corners sample the card, not the background.
#[test]
fn tilted_card_rectifies_to_fixed_size() {
    let mut img = canvas(1200, 1600);
    draw_quad(
        &mut img,
        [(200, 150), (1000, 250), (950, 1400), (150, 1300)],
        CARD,
    );

    let out = CardRectifier::default().rectify(&img).expect("rectify");
    assert_eq!(out.dimensions(), (720, 1024));

    // Sample just inside each output corner; all four must land on the card.
    for (x, y) in [(10u32, 10u32), (709, 10), (709, 1013), (10, 1013)] {
        let px = out.get_pixel(x, y);
        assert!(
            px[0] > 180 && px[1] > 180 && px[2] > 180,
            "corner ({x},{y}) sampled {px:?}"
        );
    }
}

/// A round object takes the crop-and-resize fallback: square output.
#[test]
fn round_object_produces_a_square_output() {
    let mut img = canvas(1000, 1000);
    draw_filled_circle_mut(&mut img, (500, 500), 350, CARD);

    let out = CardRectifier::default().rectify(&img).expect("rectify");
    assert_eq!(out.dimensions(), (720, 720));

    let center = out.get_pixel(360, 360);
    assert!(center[0] > 180, "center sampled {center:?}");
}

/// The minimum-edge floor rejects a thin quad even when it has the largest
/// area, so a smaller but valid candidate wins.
#[test]
fn thin_quad_loses_to_a_valid_candidate() {
    let mut img = canvas(1600, 1200);
    // High area, shortest edge 180 px < 200 px floor.
    draw_quad(
        &mut img,
        [(50, 30), (1550, 30), (1550, 210), (50, 210)],
        Rgba([200, 200, 40, 255]),
    );
    // Smaller area, every edge above the floor.
    draw_quad(
        &mut img,
        [(300, 400), (700, 400), (700, 1000), (300, 1000)],
        Rgba([40, 200, 200, 255]),
    );

    let out = CardRectifier::default().rectify(&img).expect("rectify");
    assert_eq!(out.dimensions(), (720, 1024));

    let center = out.get_pixel(360, 512);
    assert!(
        center[0] < 100 && center[1] > 150 && center[2] > 150,
        "expected the valid candidate's fill, sampled {center:?}"
    );
}

/// With only the thin quad present, nothing qualifies.
#[test]
fn no_qualifying_shape_is_an_error() {
    let mut img = canvas(1600, 1200);
    draw_quad(
        &mut img,
        [(50, 30), (1550, 30), (1550, 210), (50, 210)],
        CARD,
    );

    let err = CardRectifier::default().rectify(&img).unwrap_err();
    assert!(matches!(err, CardScanError::ShapeNotFound));
}

/// Custom output sizes flow through the quad path.
#[test]
fn custom_output_size_is_respected() {
    let mut img = canvas(1200, 1600);
    draw_quad(
        &mut img,
        [(200, 150), (1000, 250), (950, 1400), (150, 1300)],
        CARD,
    );

    let rectifier = CardRectifier::new(RectifyParams {
        out_width: 360,
        out_height: 512,
        ..RectifyParams::default()
    });
    let out = rectifier.rectify(&img).expect("rectify");
    assert_eq!(out.dimensions(), (360, 512));
}

/// Identical input yields identical output buffers.
#[test]
fn rectification_is_pure() {
    let mut img = canvas(1200, 1600);
    draw_quad(
        &mut img,
        [(200, 150), (1000, 250), (950, 1400), (150, 1300)],
        CARD,
    );

    let rectifier = CardRectifier::default();
    let a = rectifier.rectify(&img).expect("rectify");
    let b = rectifier.rectify(&img).expect("rectify");
    assert_eq!(a.as_raw(), b.as_raw());
}

/// An empty buffer is a caller bug, not a detection failure.
#[test]
fn empty_capture_is_rejected() {
    let img = RgbaImage::new(0, 0);
    let err = CardRectifier::default().rectify(&img).unwrap_err();
    assert!(matches!(err, CardScanError::InvalidDimensions { .. }));
}
