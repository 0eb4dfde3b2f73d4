use image::GrayImage;
use imageproc::contrast::{ThresholdType, threshold, threshold_mut};

/// Mean pixel intensity (0.0 for an empty image)
pub fn mean_intensity(gray: &GrayImage) -> f64 {
    let count = gray.width() as u64 * gray.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    sum as f64 / count as f64
}

/// Binary threshold in place: values above `level` become 255, the rest 0
pub fn threshold_in_place(gray: &mut GrayImage, level: u8) {
    threshold_mut(gray, level, ThresholdType::Binary);
}

/// Foreground mask of dark pixels: 255 where `value <= level`, else 0
///
/// `level` follows [`imageproc::contrast::otsu_level`]: pixels at or below it
/// are ink. Contour tracing treats non-zero pixels as foreground, so printed
/// ink becomes the traced region.
pub fn dark_mask(gray: &GrayImage, level: u8) -> GrayImage {
    threshold(gray, level, ThresholdType::BinaryInverted)
}
