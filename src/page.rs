//! Page rectification from detected markers
//!
//! A [`PageLayout`] says where four markers sit on the physical page (in
//! inches) and which part of the page to keep. The anchor corner of each
//! detected marker is mapped onto its layout position and the photo is
//! warped into an upright page image at the layout resolution.

use crate::error::PageError;
use crate::models::{DetectedMarker, Point};
use crate::utils::geometry::projection;
use crate::utils::raster::try_alloc;
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, warp_into};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Default output resolution in dots per inch
pub const DEFAULT_DPI: f32 = 600.0;

/// Physical placement of markers and crop box for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Marker ID to anchor position in inches
    pub markers: BTreeMap<u8, Point>,
    /// Left edge of the crop in inches
    pub page_left: f32,
    /// Top edge of the crop in inches
    pub page_top: f32,
    /// Right edge of the crop in inches
    pub page_right: f32,
    /// Bottom edge of the crop in inches
    pub page_bottom: f32,
    /// Output resolution
    pub dpi: f32,
}

impl PageLayout {
    /// Check marker count and crop box
    pub fn validate(&self) -> Result<(), PageError> {
        if self.markers.len() != 4 {
            return Err(PageError::MarkerCount(self.markers.len()));
        }
        let values = [
            self.page_left,
            self.page_top,
            self.page_right,
            self.page_bottom,
            self.dpi,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PageError::InvalidLayout("non-finite value".into()));
        }
        if self.dpi <= 0.0 {
            return Err(PageError::InvalidLayout(format!("dpi {} must be positive", self.dpi)));
        }
        if self.page_right <= self.page_left || self.page_bottom <= self.page_top {
            return Err(PageError::InvalidLayout(format!(
                "empty crop box ({}, {}) - ({}, {})",
                self.page_left, self.page_top, self.page_right, self.page_bottom
            )));
        }
        if self.markers.values().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(PageError::InvalidLayout("non-finite marker position".into()));
        }
        Ok(())
    }

    /// Output image size in pixels
    pub fn output_size(&self) -> Result<(u32, u32), PageError> {
        self.validate()?;
        let width = ((self.page_right - self.page_left) * self.dpi).round();
        let height = ((self.page_bottom - self.page_top) * self.dpi).round();
        if width < 1.0 || height < 1.0 || width > u32::MAX as f32 || height > u32::MAX as f32 {
            return Err(PageError::InvalidLayout(format!(
                "output size {width}x{height} out of range"
            )));
        }
        Ok((width as u32, height as u32))
    }

    /// Position of a page point (inches) in the output image
    pub fn to_pixels(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.page_left) * self.dpi,
            (p.y - self.page_top) * self.dpi,
        )
    }
}

/// Layouts for the two pages of an open book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadLayout {
    /// Left page, markers 0-3
    pub left: PageLayout,
    /// Right page, markers 4-7
    pub right: PageLayout,
}

impl SpreadLayout {
    /// Standard book holder layout
    ///
    /// Markers sit on the corners of a `page_width` x `page_height` inch
    /// rectangle, numbered clockwise from the top-left: 0-3 on the left
    /// page, 4-7 on the right. The crop boxes skip the binding and trim the
    /// outer edges.
    pub fn book(page_width: f32, page_height: f32, dpi: f32) -> Self {
        let corners = |first: u8| {
            BTreeMap::from([
                (first, Point::new(0.0, 0.0)),
                (first + 1, Point::new(page_width, 0.0)),
                (first + 2, Point::new(page_width, page_height)),
                (first + 3, Point::new(0.0, page_height)),
            ])
        };

        Self {
            left: PageLayout {
                markers: corners(0),
                page_left: 0.50,
                page_top: 0.25,
                page_right: page_width + 0.30,
                page_bottom: page_height - 0.30,
                dpi,
            },
            right: PageLayout {
                markers: corners(4),
                page_left: -0.30,
                page_top: 0.25,
                page_right: page_width - 0.50,
                page_bottom: page_height - 0.30,
                dpi,
            },
        }
    }
}

/// Photo of a book spread with its detected markers
#[derive(Debug, Clone)]
pub struct BookSpread<'a> {
    image: &'a RgbImage,
    markers: HashMap<u8, DetectedMarker>,
}

impl<'a> BookSpread<'a> {
    /// Index detected markers by ID
    ///
    /// When an ID was detected more than once, the detection with the
    /// largest area is kept.
    pub fn new(image: &'a RgbImage, detected: &[DetectedMarker]) -> Self {
        let mut markers: HashMap<u8, DetectedMarker> = HashMap::new();
        for marker in detected {
            match markers.entry(marker.id) {
                Entry::Occupied(mut slot) => {
                    warn!(
                        id = marker.id,
                        area = marker.area,
                        previous_area = slot.get().area,
                        "marker detected more than once, keeping the larger"
                    );
                    if marker.area > slot.get().area {
                        slot.insert(*marker);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(*marker);
                }
            }
        }
        Self { image, markers }
    }

    /// Source photo
    pub fn image(&self) -> &RgbImage {
        self.image
    }

    /// Marker with the given ID, if detected
    pub fn marker(&self, id: u8) -> Option<&DetectedMarker> {
        self.markers.get(&id)
    }

    /// Number of distinct marker IDs found
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Build the rectified image of one page
    pub fn page_image(&self, layout: &PageLayout) -> Result<RgbImage, PageError> {
        let (width, height) = layout.output_size()?;

        let mut src = [Point::default(); 4];
        let mut dst = [Point::default(); 4];
        for (i, (&id, &position)) in layout.markers.iter().enumerate() {
            let marker = self.marker(id).ok_or(PageError::MissingMarker(id))?;
            src[i] = marker.anchor();
            dst[i] = layout.to_pixels(position);
        }

        let transform = projection(&src, &dst).ok_or(PageError::DegenerateHomography)?;

        let mut page = try_alloc::<Rgb<u8>>(width, height)?;
        warp_into(
            self.image,
            &transform,
            Interpolation::Bilinear,
            Rgb([0, 0, 0]),
            &mut page,
        );

        debug!(width, height, dpi = layout.dpi, "page rectified");
        Ok(page)
    }

    /// Build both pages of a spread
    pub fn spread_images(
        &self,
        layout: &SpreadLayout,
    ) -> (Result<RgbImage, PageError>, Result<RgbImage, PageError>) {
        (self.page_image(&layout.left), self.page_image(&layout.right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rotation;

    fn marker(id: u8, anchor: Point, area: f32) -> DetectedMarker {
        DetectedMarker {
            id,
            rotation: Rotation::Deg0,
            corners: [
                anchor,
                anchor.translate(0.0, 10.0),
                anchor.translate(10.0, 10.0),
                anchor.translate(10.0, 0.0),
            ],
            area,
        }
    }

    fn unit_layout(dpi: f32) -> PageLayout {
        PageLayout {
            markers: BTreeMap::from([
                (0, Point::new(0.0, 0.0)),
                (1, Point::new(1.0, 0.0)),
                (2, Point::new(1.0, 1.0)),
                (3, Point::new(0.0, 1.0)),
            ]),
            page_left: 0.0,
            page_top: 0.0,
            page_right: 1.0,
            page_bottom: 1.0,
            dpi,
        }
    }

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]))
    }

    #[test]
    fn test_book_layout() {
        let spread = SpreadLayout::book(6.0, 9.5, DEFAULT_DPI);
        assert_eq!(spread.left.markers[&1], Point::new(6.0, 0.0));
        assert_eq!(spread.right.markers[&6], Point::new(6.0, 9.5));
        assert_eq!(spread.left.output_size().unwrap(), (3480, 5370));
        assert_eq!(spread.right.output_size().unwrap(), (3480, 5370));
        assert_eq!(spread.left.to_pixels(Point::new(0.5, 0.25)), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_layout_validation() {
        let mut layout = unit_layout(100.0);
        layout.markers.remove(&3);
        assert!(matches!(layout.validate(), Err(PageError::MarkerCount(3))));

        let mut layout = unit_layout(0.0);
        assert!(matches!(layout.validate(), Err(PageError::InvalidLayout(_))));
        layout.dpi = 100.0;
        layout.page_right = -1.0;
        assert!(matches!(layout.output_size(), Err(PageError::InvalidLayout(_))));
    }

    #[test]
    fn test_page_image_translation() {
        let src = gradient(220, 220);
        let detected = [
            marker(0, Point::new(50.0, 50.0), 100.0),
            marker(1, Point::new(150.0, 50.0), 100.0),
            marker(2, Point::new(150.0, 150.0), 100.0),
            marker(3, Point::new(50.0, 150.0), 100.0),
        ];
        let spread = BookSpread::new(&src, &detected);
        let page = spread.page_image(&unit_layout(100.0)).unwrap();

        assert_eq!(page.dimensions(), (100, 100));
        for &(x, y) in &[(0u32, 0u32), (10, 20), (75, 40), (98, 98)] {
            let got = page.get_pixel(x, y).0;
            let want = src.get_pixel(x + 50, y + 50).0;
            for c in 0..3 {
                assert!((got[c] as i32 - want[c] as i32).abs() <= 1, "({x},{y}) {got:?} vs {want:?}");
            }
        }
    }

    #[test]
    fn test_missing_marker() {
        let src = gradient(64, 64);
        let detected = [
            marker(0, Point::new(5.0, 5.0), 100.0),
            marker(1, Point::new(50.0, 5.0), 100.0),
            marker(3, Point::new(5.0, 50.0), 100.0),
        ];
        let spread = BookSpread::new(&src, &detected);
        let result = spread.page_image(&unit_layout(30.0));
        assert!(matches!(result, Err(PageError::MissingMarker(2))));
    }

    #[test]
    fn test_duplicate_ids_keep_largest() {
        let src = gradient(16, 16);
        let detected = [
            marker(4, Point::new(1.0, 1.0), 400.0),
            marker(4, Point::new(9.0, 9.0), 900.0),
            marker(4, Point::new(5.0, 5.0), 500.0),
        ];
        let spread = BookSpread::new(&src, &detected);
        assert_eq!(spread.marker_count(), 1);
        assert_eq!(spread.marker(4).unwrap().anchor(), Point::new(9.0, 9.0));
    }

    #[test]
    fn test_collinear_markers_are_degenerate() {
        let src = gradient(64, 64);
        let detected = [
            marker(0, Point::new(0.0, 0.0), 100.0),
            marker(1, Point::new(10.0, 10.0), 100.0),
            marker(2, Point::new(20.0, 20.0), 100.0),
            marker(3, Point::new(30.0, 30.0), 100.0),
        ];
        let spread = BookSpread::new(&src, &detected);
        let result = spread.page_image(&unit_layout(20.0));
        assert!(matches!(result, Err(PageError::DegenerateHomography)));
    }

    #[test]
    fn test_layout_json() {
        let layout = SpreadLayout::book(6.0, 9.5, 300.0);
        let json = serde_json::to_string(&layout).unwrap();
        let parsed: SpreadLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, layout);
    }
}
