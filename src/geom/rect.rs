use super::{Expanse, Padding, Point};

/// A rectangle in screen space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top-left corner
    pub tl: Point,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        tl: Point { x: 0, y: 0 },
        w: 0,
        h: 0,
    };

    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect {
            tl: Point { x, y },
            w,
            h,
        }
    }

    pub fn left(&self) -> i32 {
        self.tl.x
    }

    pub fn top(&self) -> i32 {
        self.tl.y
    }

    /// One past the rightmost column, so `left() + w`.
    pub fn right(&self) -> i32 {
        self.tl.x + self.w
    }

    /// One past the bottom row, so `top() + h`.
    pub fn bottom(&self) -> i32 {
        self.tl.y + self.h
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.tl.x + self.w / 2,
            y: self.tl.y + self.h / 2,
        }
    }

    pub fn expanse(&self) -> Expanse {
        Expanse {
            w: self.w,
            h: self.h,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Does this rectangle contain the point?
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// Does this rectangle completely enclose the other? An empty rectangle
    /// is contained anywhere.
    pub fn contains_rect(&self, other: Rect) -> bool {
        if other.is_empty() {
            return true;
        }
        other.tl.x >= self.tl.x
            && other.tl.y >= self.tl.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The intersection of two rectangles. Disjoint rectangles intersect to
    /// an empty rectangle.
    pub fn intersect(&self, other: Rect) -> Rect {
        let x = self.tl.x.max(other.tl.x);
        let y = self.tl.y.max(other.tl.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        Rect::new(x, y, (r - x).max(0), (b - y).max(0))
    }

    /// The rectangle inset by a padding value, clamped so width and height
    /// never go negative.
    pub fn inner(&self, p: Padding) -> Rect {
        Rect::new(
            self.tl.x + p.left,
            self.tl.y + p.top,
            (self.w - p.horizontal()).max(0),
            (self.h - p.vertical()).max(0),
        )
    }

    /// The same rectangle translated by an offset.
    pub fn shift(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.tl.x + dx, self.tl.y + dy, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains() {
        let r = Rect::new(10, 10, 10, 10);
        assert!(r.contains_point(Point::new(10, 10)));
        assert!(r.contains_point(Point::new(19, 19)));
        assert!(!r.contains_point(Point::new(9, 10)));
        assert!(!r.contains_point(Point::new(20, 20)));

        assert!(r.contains_rect(Rect::new(10, 10, 1, 1)));
        assert!(r.contains_rect(r));
        assert!(!r.contains_rect(Rect::new(15, 15, 10, 1)));
        assert!(r.contains_rect(Rect::ZERO));
    }

    #[test]
    fn intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(Rect::new(5, 5, 10, 10)), Rect::new(5, 5, 5, 5));
        assert!(a.intersect(Rect::new(20, 20, 5, 5)).is_empty());
        assert_eq!(a.intersect(a), a);
    }

    #[test]
    fn inner() {
        let r = Rect::new(0, 0, 10, 10);
        assert_eq!(r.inner(Padding::uniform(2)), Rect::new(2, 2, 6, 6));
        // Underflow clamps rather than going negative.
        assert_eq!(r.inner(Padding::uniform(8)).w, 0);
    }
}
