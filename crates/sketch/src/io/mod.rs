use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GrayImage, RgbImage};
use tracing::debug;

use crate::error::{Result, SketchError};

/// Decode an image file and normalize it to the working size
pub fn load_image<P: AsRef<Path>>(path: P, working_size: (u32, u32)) -> Result<RgbImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), len = bytes.len(), "Read image file");
    load_image_from_bytes(&bytes, working_size)
}

/// Decode an in-memory image and normalize it to the working size
///
/// The format is guessed from the content, not the file name.
pub fn load_image_from_bytes(bytes: &[u8], working_size: (u32, u32)) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes)?;
    debug!(width = image.width(), height = image.height(), "Decoded image");
    normalize(image, working_size)
}

/// Resize to exactly `working_size` and drop alpha
pub fn normalize(image: DynamicImage, working_size: (u32, u32)) -> Result<RgbImage> {
    let (width, height) = working_size;
    if image.width() == 0 || image.height() == 0 {
        return Err(SketchError::InvalidImage(format!(
            "source has zero extent ({}x{})",
            image.width(),
            image.height()
        )));
    }
    if width == 0 || height == 0 {
        return Err(SketchError::InvalidImage(format!(
            "working size has zero extent ({width}x{height})"
        )));
    }

    let resized = if (image.width(), image.height()) == (width, height) {
        image
    } else {
        image.resize_exact(width, height, FilterType::Triangle)
    };
    Ok(resized.to_rgb8())
}

/// Edge mask as a displayable RGB image
pub fn mask_to_rgb(mask: &GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(mask.clone()).to_rgb8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Luma, Rgb, Rgba, RgbaImage};

    #[test]
    fn test_load_resizes_to_working_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        RgbImage::from_pixel(40, 20, Rgb([200, 10, 10])).save(&path).unwrap();

        let loaded = load_image(&path, (70, 70)).unwrap();
        assert_eq!(loaded.dimensions(), (70, 70));
        assert_eq!(*loaded.get_pixel(35, 35), Rgb([200, 10, 10]));
    }

    #[test]
    fn test_alpha_is_dropped() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 40])));
        assert_eq!(rgba.dimensions(), (4, 4));
        let rgb = normalize(rgba, (4, 4)).unwrap();
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([1, 2, 3]));
    }

    #[test]
    fn test_undecodable_bytes_fail() {
        let result = load_image_from_bytes(b"definitely not an image", (10, 10));
        assert!(matches!(result, Err(SketchError::ImageLoad(_))));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_image(dir.path().join("absent.png"), (10, 10));
        assert!(matches!(result, Err(SketchError::Io(_))));
    }

    #[test]
    fn test_garbage_file_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not really a png").unwrap();
        assert!(matches!(load_image(&path, (10, 10)), Err(SketchError::ImageLoad(_))));
    }

    #[test]
    fn test_zero_working_size_is_invalid() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(3, 3));
        assert!(matches!(normalize(image, (0, 5)), Err(SketchError::InvalidImage(_))));
    }

    #[test]
    fn test_mask_preview_is_gray() {
        let mut mask = GrayImage::new(3, 1);
        mask.put_pixel(1, 0, Luma([255]));
        let preview = mask_to_rgb(&mask);
        assert_eq!(*preview.get_pixel(1, 0), Rgb([255, 255, 255]));
        assert_eq!(*preview.get_pixel(0, 0), Rgb([0, 0, 0]));
    }
}
