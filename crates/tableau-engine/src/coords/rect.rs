use super::Point;

/// Axis-aligned integer rectangle in scene pixels (top-left origin).
///
/// Containment and overlap are half-open: a rectangle covers `[x, x + w)` by
/// `[y, y + h)`. A single pixel is a 1×1 rectangle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a rectangle from its top-left (inclusive) and bottom-right
    /// (exclusive) corners.
    #[inline]
    pub const fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// The 1×1 rectangle covering `p`.
    #[inline]
    pub const fn pixel(p: Point) -> Self {
        Self::new(p.x, p.y, 1, 1)
    }

    #[inline]
    pub const fn min(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn max(self) -> Point {
        Point::new(self.x + self.w, self.y + self.h)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    #[inline]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut r = self;
        if r.w < 0 {
            r.x += r.w;
            r.w = -r.w;
        }
        if r.h < 0 {
            r.y += r.h;
            r.h = -r.h;
        }
        r
    }

    #[inline]
    pub fn contains(self, p: Point) -> bool {
        let r = self.normalized();
        p.x >= r.x && p.y >= r.y && p.x < r.x + r.w && p.y < r.y + r.h
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.x.max(b.x);
        let y0 = a.y.max(b.y);
        let x1 = (a.x + a.w).min(b.x + b.w);
        let y1 = (a.y + a.h).min(b.y + b.h);

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Rect::from_corners(x0, y0, x1, y1))
        }
    }

    #[inline]
    pub fn overlaps(self, other: Rect) -> bool {
        self.intersect(other).is_some()
    }
}
