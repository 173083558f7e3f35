//! Shape descriptors of point sequences: planar moments, polygon area and
//! bounding rectangles.
//!
//! The functions take the points of a closed polygon in order, as returned by
//! [`find_contours`](crate::contours::find_contours); the last point connects
//! back to the first one.

use crate::contours::Point;

/// Spatial moments up to first order of a polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    /// Zeroth order moment, i.e. the enclosed area.
    pub m00: f64,
    /// First order moment along x.
    pub m10: f64,
    /// First order moment along y.
    pub m01: f64,
}

impl Moments {
    /// The center of mass `(m10 / m00, m01 / m00)`, or `None` for a zero area polygon.
    pub fn centroid(&self) -> Option<Point<f64>> {
        if self.m00 == 0.0 {
            return None;
        }
        Some(Point::new(self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Compute the moments of the polygon enclosed by `points` using Green's theorem.
///
/// The result does not depend on the orientation of the polygon.
///
/// # Example
///
/// ```
/// use pcv_imgproc::contours::Point;
/// use pcv_imgproc::shape::moments;
///
/// let square = [Point::new(0, 0), Point::new(4, 0), Point::new(4, 4), Point::new(0, 4)];
/// let m = moments(&square);
///
/// assert_eq!(m.m00, 16.0);
/// assert_eq!(m.centroid(), Some(Point::new(2.0, 2.0)));
/// ```
pub fn moments<T: Copy + Into<f64>>(points: &[Point<T>]) -> Moments {
    let (mut a00, mut a10, mut a01) = (0.0f64, 0.0f64, 0.0f64);

    if let Some(last) = points.last() {
        let (mut xp, mut yp): (f64, f64) = (last.x.into(), last.y.into());
        for p in points {
            let (x, y): (f64, f64) = (p.x.into(), p.y.into());
            let cross = xp * y - x * yp;
            a00 += cross;
            a10 += cross * (xp + x);
            a01 += cross * (yp + y);
            (xp, yp) = (x, y);
        }
    }

    let sign = if a00 < 0.0 { -1.0 } else { 1.0 };

    Moments {
        m00: sign * a00 / 2.0,
        m10: sign * a10 / 6.0,
        m01: sign * a01 / 6.0,
    }
}

/// The unsigned area of the polygon enclosed by `points` (shoelace formula).
pub fn contour_area<T: Copy + Into<f64>>(points: &[Point<T>]) -> f64 {
    let Some(last) = points.last() else {
        return 0.0;
    };

    let (mut xp, mut yp): (f64, f64) = (last.x.into(), last.y.into());
    let mut area = 0.0;
    for p in points {
        let (x, y): (f64, f64) = (p.x.into(), p.y.into());
        area += xp * y - x * yp;
        (xp, yp) = (x, y);
    }

    area.abs() / 2.0
}

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Number of columns covered.
    pub width: i32,
    /// Number of rows covered.
    pub height: i32,
}

impl Rect {
    /// Number of pixels covered by the rectangle.
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Whether the rectangle covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// The smallest axis-aligned rectangle containing every pixel in `points`.
///
/// Both bounds are inclusive, so a single point yields a 1x1 rectangle. An empty
/// input yields an empty rectangle.
pub fn bounding_rect(points: &[Point<i32>]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::default();
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Rect {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    }
}

fn cross(o: Point<i32>, a: Point<i32>, b: Point<i32>) -> i64 {
    (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
}

/// The convex hull of a point set (monotone chain).
///
/// The hull vertices are returned without collinear points, with positive
/// orientation in the `x`/`y` frame.
pub fn convex_hull(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut pts = points.to_vec();
    pts.sort_unstable_by_key(|p| (p.x, p.y));
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<Point<i32>> = Vec::with_capacity(2 * pts.len());

    // lower hull
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }

    // upper hull
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0
        {
            hull.pop();
        }
        hull.push(p);
    }

    // the last point is the first one again
    hull.pop();
    hull
}

/// A rectangle of any orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotatedRect {
    /// Center of the rectangle.
    pub center: Point<f64>,
    /// Side length along the direction given by `angle`.
    pub width: f64,
    /// Side length perpendicular to `angle`.
    pub height: f64,
    /// Rotation of the width side from the x axis, in degrees within `[0, 90)`.
    pub angle: f64,
}

impl RotatedRect {
    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The four corners of the rectangle, in order around its perimeter.
    pub fn points(&self) -> [Point<f64>; 4] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let (ux, uy) = (cos * self.width / 2.0, sin * self.width / 2.0);
        let (vx, vy) = (-sin * self.height / 2.0, cos * self.height / 2.0);
        let (cx, cy) = (self.center.x, self.center.y);

        [
            Point::new(cx - ux - vx, cy - uy - vy),
            Point::new(cx + ux - vx, cy + uy - vy),
            Point::new(cx + ux + vx, cy + uy + vy),
            Point::new(cx - ux + vx, cy - uy + vy),
        ]
    }
}

/// The rotated rectangle of minimum area enclosing `points`.
///
/// One side of the optimal rectangle lies on an edge of the convex hull, so every
/// hull edge is tried as a candidate orientation.
///
/// # Example
///
/// ```
/// use pcv_imgproc::contours::Point;
/// use pcv_imgproc::shape::min_area_rect;
///
/// let diamond = [Point::new(2, 0), Point::new(4, 2), Point::new(2, 4), Point::new(0, 2)];
/// let rect = min_area_rect(&diamond);
///
/// assert!((rect.area() - 8.0).abs() < 1e-9);
/// assert!((rect.angle - 45.0).abs() < 1e-9);
/// ```
pub fn min_area_rect(points: &[Point<i32>]) -> RotatedRect {
    let hull = convex_hull(points);

    let to_f64 = |p: &Point<i32>| Point::new(p.x as f64, p.y as f64);

    match hull.as_slice() {
        [] => return RotatedRect::default(),
        [p] => {
            return RotatedRect {
                center: to_f64(p),
                ..Default::default()
            }
        }
        _ => {}
    }

    let hull: Vec<Point<f64>> = hull.iter().map(to_f64).collect();

    let mut best: Option<(f64, RotatedRect)> = None;
    for (i, a) in hull.iter().enumerate() {
        let b = hull[(i + 1) % hull.len()];
        let (ex, ey) = (b.x - a.x, b.y - a.y);
        let len = (ex * ex + ey * ey).sqrt();
        let (ux, uy) = (ex / len, ey / len);
        let (vx, vy) = (-uy, ux);

        let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &hull {
            let pu = p.x * ux + p.y * uy;
            let pv = p.x * vx + p.y * vy;
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }

        let (width, height) = (max_u - min_u, max_v - min_v);
        let area = width * height;
        if best.as_ref().map_or(true, |(best_area, _)| area < *best_area) {
            let (cu, cv) = ((min_u + max_u) / 2.0, (min_v + max_v) / 2.0);
            let rect = RotatedRect {
                center: Point::new(cu * ux + cv * vx, cu * uy + cv * vy),
                width,
                height,
                angle: uy.atan2(ux).to_degrees(),
            };
            best = Some((area, rect));
        }
    }

    let Some((_, mut rect)) = best else {
        return RotatedRect::default();
    };

    // a quarter turn swaps the sides, bring the angle into [0, 90)
    while rect.angle < 0.0 {
        rect.angle += 90.0;
        std::mem::swap(&mut rect.width, &mut rect.height);
    }
    while rect.angle >= 90.0 {
        rect.angle -= 90.0;
        std::mem::swap(&mut rect.width, &mut rect.height);
    }

    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point<i32>> {
        vec![
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(4, 4),
            Point::new(0, 4),
        ]
    }

    #[test]
    fn test_moments_orientation_independent() {
        let mut pts = square();
        let m = moments(&pts);
        pts.reverse();
        assert_eq!(m, moments(&pts));
        assert_eq!(m.m00, 16.0);
        assert_eq!(m.m10, 32.0);
        assert_eq!(m.m01, 32.0);
    }

    #[test]
    fn test_moments_degenerate() {
        let line = [Point::new(0, 0), Point::new(3, 0), Point::new(6, 0)];
        assert_eq!(moments(&line).m00, 0.0);
        assert_eq!(moments(&line).centroid(), None);
        assert_eq!(moments::<i32>(&[]).centroid(), None);
    }

    #[test]
    fn test_contour_area() {
        assert_eq!(contour_area(&square()), 16.0);

        let triangle = [Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(0.0, 2.0)];
        assert_eq!(contour_area(&triangle), 3.0);

        assert_eq!(contour_area::<i32>(&[]), 0.0);
        assert_eq!(contour_area(&[Point::new(1, 1)]), 0.0);
    }

    #[test]
    fn test_bounding_rect() {
        let rect = bounding_rect(&square());
        assert_eq!(
            rect,
            Rect {
                x: 0,
                y: 0,
                width: 5,
                height: 5
            }
        );
        assert_eq!(rect.area(), 25);

        let single = bounding_rect(&[Point::new(3, 7)]);
        assert_eq!((single.x, single.y, single.width, single.height), (3, 7, 1, 1));

        assert!(bounding_rect(&[]).is_empty());
    }

    #[test]
    fn test_convex_hull() {
        let mut pts = square();
        pts.push(Point::new(2, 2));
        pts.push(Point::new(2, 0));
        pts.push(Point::new(0, 0));

        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        for corner in square() {
            assert!(hull.contains(&corner));
        }
        assert!(!hull.contains(&Point::new(2, 2)));
        assert!(!hull.contains(&Point::new(2, 0)));
    }

    #[test]
    fn test_min_area_rect_axis_aligned() {
        let pts = [
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(4, 2),
            Point::new(0, 2),
            Point::new(2, 1),
        ];
        let rect = min_area_rect(&pts);
        assert_relative_eq!(rect.area(), 8.0, epsilon = 1e-9);
        assert_relative_eq!(rect.center.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(rect.center.y, 1.0, epsilon = 1e-9);
        assert!(rect.angle >= 0.0 && rect.angle < 90.0);

        assert_relative_eq!(contour_area(&rect.points()), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_min_area_rect_rotated() {
        let diamond = [
            Point::new(2, 0),
            Point::new(4, 2),
            Point::new(2, 4),
            Point::new(0, 2),
        ];
        let rect = min_area_rect(&diamond);
        assert_relative_eq!(rect.angle, 45.0, epsilon = 1e-9);
        assert_relative_eq!(rect.width, 8.0f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(rect.height, 8.0f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(rect.center.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(rect.center.y, 2.0, epsilon = 1e-9);

        // the corners are the diamond vertices
        for corner in rect.points() {
            assert!(diamond.iter().any(|p| {
                (p.x as f64 - corner.x).abs() < 1e-9 && (p.y as f64 - corner.y).abs() < 1e-9
            }));
        }
    }

    #[test]
    fn test_min_area_rect_degenerate() {
        let rect = min_area_rect(&[Point::new(5, 6)]);
        assert_eq!(rect.center, Point::new(5.0, 6.0));
        assert_eq!(rect.area(), 0.0);

        let segment = min_area_rect(&[Point::new(0, 0), Point::new(3, 4)]);
        assert_relative_eq!(segment.width.max(segment.height), 5.0, epsilon = 1e-9);
        assert_relative_eq!(segment.area(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(segment.center.x, 1.5, epsilon = 1e-9);
        assert_relative_eq!(segment.center.y, 2.0, epsilon = 1e-9);

        assert_eq!(min_area_rect(&[]), RotatedRect::default());
    }
}
