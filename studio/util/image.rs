/// Turns an uploaded picture into network input.
///
/// The picture is decoded (PNG/JPEG/BMP/GIF), resized to 28×28, converted to
/// grayscale and normalized to [0, 1]. MNIST digits are light strokes on a
/// dark background, so mostly-light pictures are inverted.

use image::imageops::FilterType;

pub const DIGIT_SIDE: u32 = 28;

pub fn image_bytes_to_digit_input(bytes: &[u8]) -> Result<Vec<f64>, String> {
    let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let resized = img.resize_exact(DIGIT_SIDE, DIGIT_SIDE, FilterType::Lanczos3);
    let gray = resized.to_luma8();
    let mut pixels: Vec<f64> = gray.pixels().map(|p| p.0[0] as f64 / 255.0).collect();

    let mean = pixels.iter().sum::<f64>() / pixels.len() as f64;
    if mean > 0.5 {
        for p in pixels.iter_mut() {
            *p = 1.0 - *p;
        }
    }
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
    use std::io::Cursor;

    fn png(img: GrayImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img).write_to(&mut out, ImageOutputFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn resizes_to_784_values_in_range() {
        let img = GrayImage::from_fn(56, 40, |x, _| Luma([if x < 28 { 0 } else { 120 }]));
        let input = image_bytes_to_digit_input(&png(img)).unwrap();
        assert_eq!(input.len(), 784);
        assert!(input.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn light_background_is_inverted() {
        let white = GrayImage::from_pixel(28, 28, Luma([255]));
        let input = image_bytes_to_digit_input(&png(white)).unwrap();
        assert!(input.iter().all(|v| *v < 0.01));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(image_bytes_to_digit_input(b"not an image").is_err());
    }
}
