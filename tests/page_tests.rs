//! Book spread cropping on a synthetic photo

use glyph_crop::page::{BookSpread, SpreadLayout};
use glyph_crop::tools::render_marker;
use glyph_crop::{Detector, PageError, Rotation};
use image::{DynamicImage, Rgb, RgbImage, imageops};

/// Source pixels per inch in the synthetic photo
const PX_PER_INCH: f32 = 40.0;
const PAGE_WIDTH: f32 = 3.0;
const PAGE_HEIGHT: f32 = 4.0;
const LEFT_ORIGIN: (f32, f32) = (40.0, 40.0);
const RIGHT_ORIGIN: (f32, f32) = (240.0, 40.0);

fn to_source(origin: (f32, f32), x: f32, y: f32) -> (i64, i64) {
    (
        (origin.0 + x * PX_PER_INCH) as i64,
        (origin.1 + y * PX_PER_INCH) as i64,
    )
}

/// Two pages with glyphs 0-3 and 4-7 on their marker rectangles
fn spread_photo(with_right_page: bool) -> RgbImage {
    let mut photo = RgbImage::from_pixel(440, 280, Rgb([245, 245, 240]));
    let corners = [
        (0.0, 0.0),
        (PAGE_WIDTH, 0.0),
        (PAGE_WIDTH, PAGE_HEIGHT),
        (0.0, PAGE_HEIGHT),
    ];

    let mut pages = vec![(0u8, LEFT_ORIGIN)];
    if with_right_page {
        pages.push((4, RIGHT_ORIGIN));
    }
    for (first, origin) in pages {
        for (offset, &(x, y)) in corners.iter().enumerate() {
            let glyph = render_marker(first + offset as u8, Rotation::Deg0, 6, 0).unwrap();
            let glyph = DynamicImage::ImageLuma8(glyph).to_rgb8();
            let (sx, sy) = to_source(origin, x, y);
            imageops::overlay(&mut photo, &glyph, sx, sy);
        }
    }

    // Red patch centered at (1.5, 2.0) inches on the left page
    let (px, py) = to_source(LEFT_ORIGIN, 1.5, 2.0);
    for y in py - 6..py + 6 {
        for x in px - 6..px + 6 {
            photo.put_pixel(x as u32, y as u32, Rgb([230, 20, 20]));
        }
    }
    photo
}

#[test]
fn test_crop_both_pages() {
    let photo = spread_photo(true);
    let gray = imageops::grayscale(&photo);
    let markers = Detector::default().detect(&gray).unwrap();
    let ids: Vec<u8> = markers.iter().map(|m| m.id).collect();
    assert_eq!(ids, (0..8).collect::<Vec<u8>>());

    let layout = SpreadLayout::book(PAGE_WIDTH, PAGE_HEIGHT, 50.0);
    let spread = BookSpread::new(&photo, &markers);
    let (left, right) = spread.spread_images(&layout);
    let left = left.unwrap();
    let right = right.unwrap();

    assert_eq!(left.dimensions(), layout.left.output_size().unwrap());
    assert_eq!(right.dimensions(), layout.right.output_size().unwrap());
    // 2.8 x 3.45 inches at 50 dpi, rounded
    assert_eq!(left.dimensions(), (140, 173));

    // (1.5, 2.0) in -> ((1.5 - 0.5) * 50, (2.0 - 0.25) * 50)
    let patch = left.get_pixel(50, 87).0;
    assert!(patch[0] > 180 && patch[1] < 80 && patch[2] < 80, "{patch:?}");

    // Paper elsewhere on the page
    let paper = left.get_pixel(60, 120).0;
    assert!(paper.iter().all(|&c| c > 200), "{paper:?}");
}

#[test]
fn test_missing_right_page() {
    let photo = spread_photo(false);
    let gray = imageops::grayscale(&photo);
    let markers = Detector::default().detect(&gray).unwrap();

    let layout = SpreadLayout::book(PAGE_WIDTH, PAGE_HEIGHT, 50.0);
    let spread = BookSpread::new(&photo, &markers);
    let (left, right) = spread.spread_images(&layout);
    assert!(left.is_ok());
    assert!(matches!(right, Err(PageError::MissingMarker(4))));
}
