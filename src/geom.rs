//! Planar geometry primitives for placement regions.
//!
//! Points are in background pixel coordinates with `y` growing downward.
//! A `Quad` stores its corners in TL, TR, BR, BL winding order, matching
//! the corner order declared in template manifests.

use crate::util::{MockwarpError, MockwarpResult};

/// Area below which a quadrilateral is considered degenerate, in px².
const MIN_QUAD_AREA: f32 = 1.0;

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn dist(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding-box area in pixels.
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

/// A quadrilateral destination region, corners in TL, TR, BR, BL order.
///
/// The quad is not required to be axis-aligned; a tilted picture frame is
/// represented by four arbitrary (but simple, positive-area) corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub tl: Point,
    pub tr: Point,
    pub br: Point,
    pub bl: Point,
}

impl Quad {
    pub fn new(tl: Point, tr: Point, br: Point, bl: Point) -> Self {
        Self { tl, tr, br, bl }
    }

    /// Builds a quad from four `[x, y]` pairs in TL, TR, BR, BL order.
    pub fn from_corners(corners: [[f32; 2]; 4]) -> Self {
        Self {
            tl: Point::new(corners[0][0], corners[0][1]),
            tr: Point::new(corners[1][0], corners[1][1]),
            br: Point::new(corners[2][0], corners[2][1]),
            bl: Point::new(corners[3][0], corners[3][1]),
        }
    }

    /// Builds an axis-aligned quad covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        let x0 = rect.x as f32;
        let y0 = rect.y as f32;
        let x1 = (rect.x + rect.width) as f32;
        let y1 = (rect.y + rect.height) as f32;
        Self {
            tl: Point::new(x0, y0),
            tr: Point::new(x1, y0),
            br: Point::new(x1, y1),
            bl: Point::new(x0, y1),
        }
    }

    /// Corners in winding order TL, TR, BR, BL.
    pub fn points(&self) -> [Point; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    /// Length of the top edge, used as the source canvas width.
    pub fn top_width(&self) -> f32 {
        self.tl.dist(self.tr)
    }

    /// Length of the left edge, used as the source canvas height.
    pub fn left_height(&self) -> f32 {
        self.tl.dist(self.bl)
    }

    /// Absolute polygon area via the shoelace formula.
    pub fn area(&self) -> f32 {
        let p = self.points();
        let mut sum = 0.0f32;
        for i in 0..4 {
            let a = p[i];
            let b = p[(i + 1) % 4];
            sum += a.x * b.y - b.x * a.y;
        }
        (sum * 0.5).abs()
    }

    /// Validates that the quad is simple with positive area.
    ///
    /// Rejects non-finite coordinates, near-zero area (which covers
    /// collinear and coincident corners), and self-intersecting windings
    /// such as a "bowtie" corner order.
    pub fn validate(&self) -> MockwarpResult<()> {
        for p in self.points() {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(MockwarpError::InvalidGeometry {
                    reason: "corner coordinates must be finite",
                });
            }
        }
        if self.area() < MIN_QUAD_AREA {
            return Err(MockwarpError::InvalidGeometry {
                reason: "corners are collinear or enclose no area",
            });
        }
        // Opposite edges of a simple quad never properly intersect.
        let p = self.points();
        let edges = [
            (p[0], p[1]),
            (p[1], p[2]),
            (p[2], p[3]),
            (p[3], p[0]),
        ];
        if segments_intersect(edges[0], edges[2]) || segments_intersect(edges[1], edges[3]) {
            return Err(MockwarpError::InvalidGeometry {
                reason: "corners describe a self-intersecting quad",
            });
        }
        Ok(())
    }
}

fn orient(a: Point, b: Point, c: Point) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper intersection test for two open segments.
fn segments_intersect(s1: (Point, Point), s2: (Point, Point)) -> bool {
    let (a, b) = s1;
    let (c, d) = s2;
    let d1 = orient(c, d, a);
    let d2 = orient(c, d, b);
    let d3 = orient(a, b, c);
    let d4 = orient(a, b, d);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

#[cfg(test)]
mod tests {
    use super::{Point, Quad, Rect};
    use crate::util::MockwarpError;

    fn unit_quad() -> Quad {
        Quad::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 80.0),
            Point::new(0.0, 80.0),
        )
    }

    #[test]
    fn axis_aligned_quad_is_valid() {
        assert!(unit_quad().validate().is_ok());
        assert!((unit_quad().area() - 8000.0).abs() < 1e-3);
    }

    #[test]
    fn tilted_quad_is_valid() {
        let quad = Quad::new(
            Point::new(10.0, 5.0),
            Point::new(110.0, 12.0),
            Point::new(104.0, 92.0),
            Point::new(4.0, 85.0),
        );
        assert!(quad.validate().is_ok());
    }

    #[test]
    fn collinear_corners_are_rejected() {
        let quad = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(30.0, 30.0),
        );
        assert_eq!(
            quad.validate().err().unwrap(),
            MockwarpError::InvalidGeometry {
                reason: "corners are collinear or enclose no area",
            }
        );
    }

    #[test]
    fn bowtie_winding_is_rejected() {
        let quad = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 80.0),
            Point::new(100.0, 0.0),
            Point::new(0.0, 80.0),
        );
        assert_eq!(
            quad.validate().err().unwrap(),
            MockwarpError::InvalidGeometry {
                reason: "corners describe a self-intersecting quad",
            }
        );
    }

    #[test]
    fn quad_from_rect_round_trips_bounds() {
        let quad = Quad::from_rect(Rect::new(4, 8, 60, 40));
        assert_eq!(quad.tl, Point::new(4.0, 8.0));
        assert_eq!(quad.br, Point::new(64.0, 48.0));
        assert!((quad.top_width() - 60.0).abs() < 1e-6);
        assert!((quad.left_height() - 40.0).abs() < 1e-6);
    }
}
