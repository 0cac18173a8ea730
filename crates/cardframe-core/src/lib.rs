//! Core types and utilities for card detection and rectification.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete image decoding crate or detection pipeline; the
//! pixel types here are plain borrowed/owned buffers that the facade crate
//! adapts from whatever the caller holds.

mod corners;
mod homography;
mod image;
mod logger;
mod shape;

pub use corners::order_corners;
pub use homography::{crop_resize_rgba, homography_from_4pt, warp_perspective_rgba, Homography};
pub use image::{
    sample_bilinear, sample_bilinear_rgba, sample_bilinear_u8, GrayImageView, RgbaImage,
    RgbaImageView,
};
pub use shape::{polygon_area, Circle, DetectedShape, Quad, ShapeKind};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
