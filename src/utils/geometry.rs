//! Geometry utilities: projective fits and polygon measurements

use crate::models::Point;
use imageproc::geometric_transformations::Projection;

/// Projective transform taking `src[i]` to `dst[i]`
///
/// Returns `None` when either quad has three collinear corners or the fitted
/// matrix cannot be inverted.
pub fn projection(src: &[Point; 4], dst: &[Point; 4]) -> Option<Projection> {
    if has_collinear_triple(src) || has_collinear_triple(dst) {
        return None;
    }
    Projection::from_control_points(src.map(|p| (p.x, p.y)), dst.map(|p| (p.x, p.y)))
}

fn has_collinear_triple(quad: &[Point; 4]) -> bool {
    (0..4).any(|skip| {
        let [a, b, c] = [1, 2, 3].map(|k| quad[(skip + k) % 4]);
        let (ux, uy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
        let (vx, vy) = ((c.x - a.x) as f64, (c.y - a.y) as f64);
        (ux * vy - uy * vx).abs() < 1e-6
    })
}

/// Signed shoelace area (negative for TL -> BL -> BR -> TR winding, y down)
pub fn signed_area(poly: &[Point]) -> f64 {
    let len = poly.len();
    if len < 3 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    let mut j = len - 1;
    for i in 0..len {
        sum += poly[j].x as f64 * poly[i].y as f64 - poly[i].x as f64 * poly[j].y as f64;
        j = i;
    }
    sum * 0.5
}

/// Unsigned polygon area
pub fn polygon_area(poly: &[Point]) -> f64 {
    signed_area(poly).abs()
}

/// Tests if the polygon is convex (all turns in the same direction)
///
/// Collinear runs are tolerated; a polygon with fewer than 3 vertices is not
/// convex.
pub fn is_convex(poly: &[Point]) -> bool {
    let len = poly.len();
    if len < 3 {
        return false;
    }

    let mut orientation = 0u8;
    for i in 0..len {
        let prev = poly[(i + len - 1) % len];
        let cur = poly[i];
        let next = poly[(i + 1) % len];

        let dx0 = (cur.x - prev.x) as f64;
        let dy0 = (cur.y - prev.y) as f64;
        let dx = (next.x - cur.x) as f64;
        let dy = (next.y - cur.y) as f64;

        let cross = dx0 * dy - dy0 * dx;
        if cross > 0.0 {
            orientation |= 1;
        } else if cross < 0.0 {
            orientation |= 2;
        }

        if orientation == 3 {
            return false;
        }
    }

    orientation != 0
}
