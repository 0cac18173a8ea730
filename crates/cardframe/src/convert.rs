//! Conversions between `image` crate buffers and the lightweight
//! `cardframe-core` view types.

use crate::core;

/// Borrow an `image::GrayImage` as the core gray view.
pub fn gray_view(img: &image::GrayImage) -> core::GrayImageView<'_> {
    core::GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Borrow an `image::RgbaImage` as the core RGBA view.
pub fn rgba_view(img: &image::RgbaImage) -> core::RgbaImageView<'_> {
    core::RgbaImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Move a core RGBA buffer into an `image::RgbaImage`.
pub fn rgba_from_core(img: core::RgbaImage) -> image::RgbaImage {
    // Core buffers are always width*height*4 by construction.
    image::RgbaImage::from_raw(img.width as u32, img.height as u32, img.data)
        .expect("core RGBA buffer length matches its dimensions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_pixels() {
        let src = image::RgbaImage::from_pixel(3, 2, image::Rgba([7, 8, 9, 255]));
        let view = rgba_view(&src);
        let owned = core::RgbaImage {
            width: view.width,
            height: view.height,
            data: view.data.to_vec(),
        };
        let back = rgba_from_core(owned);
        assert_eq!(back, src);
    }

    #[test]
    fn gray_view_samples_the_underlying_buffer() {
        let mut src = image::GrayImage::new(4, 3);
        src.put_pixel(2, 1, image::Luma([200]));
        let view = gray_view(&src);
        assert_eq!(view.width, 4);
        assert_eq!(view.height, 3);
        assert_eq!(core::sample_bilinear_u8(&view, 2.0, 1.0), 200);
    }
}
