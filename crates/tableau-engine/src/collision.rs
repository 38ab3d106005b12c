//! Geometric hit-testing between instances, points and canvas paint items.
//!
//! Shapes are built on demand from current instance state and borrow the
//! image they sample; nothing here is cached between queries.

use crate::coords::{Point, Rect, Vec2};
use crate::image::Image;

/// An image placed in scene space, optionally hit-tested per pixel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteShape<'a> {
    pub image: &'a Image,
    /// Scene-space placement of the (scaled) source region.
    pub rect: Rect,
    /// Image-space pixel drawn at `rect`'s top-left corner.
    pub source: Point,
    /// Drawing scale. Negative components mirror the image on that axis.
    pub scale: Vec2,
    /// `false` treats the whole `rect` as solid.
    pub use_mask: bool,
}

impl SpriteShape<'_> {
    /// Samples the mask under scene pixel `p`, which must lie inside `rect`.
    fn sample(&self, p: Point) -> bool {
        let sx = self.scale.x.abs().max(f32::EPSILON);
        let sy = self.scale.y.abs().max(f32::EPSILON);

        let mut lx = ((p.x - self.rect.x) as f32 / sx).floor() as i32;
        let mut ly = ((p.y - self.rect.y) as f32 / sy).floor() as i32;

        let src_w = (self.rect.w as f32 / sx).round() as i32;
        let src_h = (self.rect.h as f32 / sy).round() as i32;
        if self.scale.x < 0.0 {
            lx = src_w - 1 - lx;
        }
        if self.scale.y < 0.0 {
            ly = src_h - 1 - ly;
        }

        self.image.is_opaque(self.source.x + lx, self.source.y + ly)
    }
}

/// Collision shape variants.
///
/// `Box` covers both a fixed axis-aligned box and an instance's full bounding
/// box; the two differ only in where the rectangle came from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape<'a> {
    Point(Point),
    Box(Rect),
    Sprite(SpriteShape<'a>),
}

impl Shape<'_> {
    /// Bounding rectangle in scene space. A point covers one pixel.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Point(p) => Rect::pixel(*p),
            Shape::Box(r) => *r,
            Shape::Sprite(s) => s.rect,
        }
    }

    #[inline]
    fn has_mask(&self) -> bool {
        matches!(self, Shape::Sprite(s) if s.use_mask)
    }

    #[inline]
    fn solid_at(&self, p: Point) -> bool {
        match self {
            Shape::Sprite(s) if s.use_mask => s.sample(p),
            _ => true,
        }
    }
}

/// Tests two shapes for overlap.
///
/// Bounding rectangles must intersect. When either side carries a pixel mask
/// the overlapping area is scanned and the test succeeds on the first pixel
/// that is solid in both shapes.
pub fn collide(a: &Shape<'_>, b: &Shape<'_>) -> bool {
    let Some(area) = a.bounds().intersect(b.bounds()) else {
        return false;
    };

    if !a.has_mask() && !b.has_mask() {
        return true;
    }

    for y in area.y..area.y + area.h {
        for x in area.x..area.x + area.w {
            let p = Point::new(x, y);
            if a.solid_at(p) && b.solid_at(p) {
                return true;
            }
        }
    }
    false
}

/// Axis-aligned bounds of a `w`×`h` box anchored at `anchor` (box-local),
/// scaled, rotated by `angle` degrees counter-clockwise and placed so the
/// anchor lands on `origin`.
pub(crate) fn transformed_bounds(origin: Point, anchor: Point, w: i32, h: i32, scale: Vec2, angle: f64) -> Rect {
    let (sin, cos) = angle.to_radians().sin_cos();
    let corners = [(0, 0), (w, 0), (0, h), (w, h)];

    let mut min = (f64::MAX, f64::MAX);
    let mut max = (f64::MIN, f64::MIN);
    for (cx, cy) in corners {
        let lx = (cx - anchor.x) as f64 * scale.x as f64;
        let ly = (cy - anchor.y) as f64 * scale.y as f64;
        let rx = lx * cos + ly * sin;
        let ry = -lx * sin + ly * cos;
        let (rx, ry) = (snap(rx), snap(ry));
        min = (min.0.min(rx), min.1.min(ry));
        max = (max.0.max(rx), max.1.max(ry));
    }

    Rect::from_corners(
        origin.x + min.0.floor() as i32,
        origin.y + min.1.floor() as i32,
        origin.x + max.0.ceil() as i32,
        origin.y + max.1.ceil() as i32,
    )
}

/// Removes trigonometric noise so exact quarter turns stay integral.
#[inline]
fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-9 { r } else { v }
}
