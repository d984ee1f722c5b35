//! Heart outline in design coordinates and the transform that places it.

use std::f64::consts::TAU;
use std::sync::OnceLock;

/// Width of the box the outline is designed in.
pub const DESIGN_WIDTH: f64 = 367.0;
/// Height of the box the outline is designed in.
pub const DESIGN_HEIGHT: f64 = 352.0;
/// Outline stroke width in design units.
pub const STROKE_WIDTH: f64 = 10.0;

const OUTLINE_SEGMENTS: usize = 96;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Closed heart outline, clockwise from the top notch, inset by half a stroke.
pub fn heart_outline() -> &'static [Point] {
    static OUTLINE: OnceLock<Vec<Point>> = OnceLock::new();
    OUTLINE.get_or_init(build_outline)
}

/// Interior point every outline vertex can be joined to without leaving the shape.
pub fn heart_center() -> Point {
    static CENTER: OnceLock<Point> = OnceLock::new();
    *CENTER.get_or_init(|| {
        let (min, max) = curve_bounds();
        to_design(curve_point_center(), min, max)
    })
}

fn curve_point(t: f64) -> Point {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    Point::new(x, y)
}

fn curve_point_center() -> Point {
    Point::new(0.0, -2.0)
}

fn curve_samples() -> impl Iterator<Item = Point> {
    (0..OUTLINE_SEGMENTS).map(|i| curve_point(TAU * i as f64 / OUTLINE_SEGMENTS as f64))
}

fn curve_bounds() -> (Point, Point) {
    curve_samples().fold(
        (Point::new(f64::MAX, f64::MAX), Point::new(f64::MIN, f64::MIN)),
        |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    )
}

/// Map a curve point into the design box; the curve's y axis points up.
fn to_design(p: Point, min: Point, max: Point) -> Point {
    let inset = STROKE_WIDTH / 2.0;
    let x = inset + (p.x - min.x) / (max.x - min.x) * (DESIGN_WIDTH - STROKE_WIDTH);
    let y = inset + (max.y - p.y) / (max.y - min.y) * (DESIGN_HEIGHT - STROKE_WIDTH);
    Point::new(x, y)
}

fn build_outline() -> Vec<Point> {
    let (min, max) = curve_bounds();
    curve_samples().map(|p| to_design(p, min, max)).collect()
}

/// Rotation about the design center, then scale to the heart size, then
/// translation to the heart position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeartTransform {
    cos: f64,
    sin: f64,
    scale_x: f64,
    scale_y: f64,
    left: f64,
    top: f64,
}

impl HeartTransform {
    pub fn new(left: f64, top: f64, width: f64, height: f64, angle_degrees: f64) -> Self {
        let radians = angle_degrees.to_radians();
        Self {
            cos: radians.cos(),
            sin: radians.sin(),
            scale_x: width / DESIGN_WIDTH,
            scale_y: height / DESIGN_HEIGHT,
            left,
            top,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        let cx = DESIGN_WIDTH / 2.0;
        let cy = DESIGN_HEIGHT / 2.0;
        let dx = p.x - cx;
        let dy = p.y - cy;
        let rx = cx + dx * self.cos - dy * self.sin;
        let ry = cy + dx * self.sin + dy * self.cos;
        Point::new(self.left + rx * self.scale_x, self.top + ry * self.scale_y)
    }

    /// Average scale, used for stroke widths.
    pub fn stroke_scale(&self) -> f64 {
        (self.scale_x + self.scale_y) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn outline_fills_design_box() {
        let outline = heart_outline();
        assert_eq!(outline.len(), OUTLINE_SEGMENTS);
        let inset = STROKE_WIDTH / 2.0;
        for p in outline {
            assert!(p.x >= inset - 1e-9 && p.x <= DESIGN_WIDTH - inset + 1e-9);
            assert!(p.y >= inset - 1e-9 && p.y <= DESIGN_HEIGHT - inset + 1e-9);
        }
        // Notch at the top center, tip at the bottom center.
        assert!((outline[0].x - DESIGN_WIDTH / 2.0).abs() < 1e-6);
        let tip = outline[OUTLINE_SEGMENTS / 2];
        assert!((tip.x - DESIGN_WIDTH / 2.0).abs() < 1e-6);
        assert!(tip.y > outline[0].y);
    }

    #[test]
    fn center_is_inside_the_heart() {
        let c = heart_center();
        assert!((c.x - DESIGN_WIDTH / 2.0).abs() < 1e-6);
        assert!(c.y > heart_outline()[0].y);
        assert!(c.y < heart_outline()[OUTLINE_SEGMENTS / 2].y);
    }

    #[test]
    fn identity_transform_translates_only() {
        let t = HeartTransform::new(10.0, 20.0, DESIGN_WIDTH, DESIGN_HEIGHT, 0.0);
        assert!(close(t.apply(Point::new(0.0, 0.0)), Point::new(10.0, 20.0)));
        assert!((t.stroke_scale() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_pivots_on_design_center() {
        let center = Point::new(DESIGN_WIDTH / 2.0, DESIGN_HEIGHT / 2.0);
        let t = HeartTransform::new(0.0, 0.0, DESIGN_WIDTH, DESIGN_HEIGHT, 90.0);
        assert!(close(t.apply(center), center));

        // Clockwise on a y-down surface: a point right of center moves below it.
        let right = Point::new(center.x + 10.0, center.y);
        let moved = t.apply(right);
        assert!((moved.x - center.x).abs() < 1e-9);
        assert!((moved.y - (center.y + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn scale_maps_design_box_to_heart_size() {
        let t = HeartTransform::new(5.0, 5.0, DESIGN_WIDTH / 2.0, DESIGN_HEIGHT / 4.0, 0.0);
        let corner = t.apply(Point::new(DESIGN_WIDTH, DESIGN_HEIGHT));
        assert!(close(corner, Point::new(5.0 + DESIGN_WIDTH / 2.0, 5.0 + DESIGN_HEIGHT / 4.0)));
    }
}
