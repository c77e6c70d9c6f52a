use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, imageops::FilterType};

use super::error::OcrError;

/// Longest side of the canonical OCR input. Larger screenshots are scaled
/// down preserving aspect ratio; smaller ones are never upscaled.
pub const MAX_DIMENSION: u32 = 2000;

/// Normalize an arbitrary screenshot into the canonical form the OCR engine
/// reads best: capped size, grayscale, stretched contrast, sharpened text,
/// PNG-encoded.
pub fn preprocess_image(bytes: &[u8]) -> Result<Vec<u8>, OcrError> {
    let decoded = image::load_from_memory(bytes)?;

    let resized = if decoded.width() > MAX_DIMENSION || decoded.height() > MAX_DIMENSION {
        decoded.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        decoded
    };

    let gray = stretch_contrast(resized.grayscale().into_luma8());
    let sharpened = DynamicImage::ImageLuma8(gray).unsharpen(1.0, 2);

    let mut out = Vec::new();
    sharpened.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

/// Linear histogram stretch to the full 0..255 range. A flat image (single
/// luminance value) passes through unchanged.
fn stretch_contrast(mut img: GrayImage) -> GrayImage {
    let mut lo = u8::MAX;
    let mut hi = u8::MIN;
    for pixel in img.pixels() {
        lo = lo.min(pixel[0]);
        hi = hi.max(pixel[0]);
    }

    if hi > lo && (lo > 0 || hi < u8::MAX) {
        let range = (hi - lo) as f32;
        for pixel in img.pixels_mut() {
            pixel[0] = (((pixel[0] - lo) as f32 / range) * 255.0).round() as u8;
        }
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x % 2 == 0 { Rgb([40, 40, 40]) } else { Rgb([180, 180, 180]) }
        });
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn emits_grayscale_png() {
        let out = preprocess_image(&png_bytes(60, 40)).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.color().channel_count(), 1);
    }

    #[test]
    fn caps_oversized_images_preserving_aspect() {
        let out = preprocess_image(&png_bytes(4000, 1000)).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.width(), MAX_DIMENSION);
        assert_eq!(decoded.height(), 500);
    }

    #[test]
    fn never_upscales_small_images() {
        let out = preprocess_image(&png_bytes(300, 200)).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (300, 200));
    }

    #[test]
    fn stretches_contrast_to_full_range() {
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([100 + (x as u8) * 10]));
        let stretched = stretch_contrast(img);
        let values: Vec<u8> = stretched.pixels().map(|p| p[0]).collect();
        assert_eq!(values[0], 0);
        assert_eq!(values[3], 255);
    }

    #[test]
    fn flat_image_passes_through() {
        let img = GrayImage::from_pixel(3, 3, Luma([77]));
        let stretched = stretch_contrast(img);
        assert!(stretched.pixels().all(|p| p[0] == 77));
    }

    #[test]
    fn rejects_undecodable_bytes() {
        assert!(preprocess_image(b"not an image").is_err());
    }
}
