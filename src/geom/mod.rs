mod point;
mod rect;

pub use point::Point;
pub use rect::Rect;

/// A direction on the screen. Also used by containers that measure an offset
/// from a particular edge, like the splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Is this a horizontal direction?
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// A width and height pair - a size without a location.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Expanse {
    pub w: i32,
    pub h: i32,
}

impl Expanse {
    pub const ZERO: Expanse = Expanse { w: 0, h: 0 };

    pub fn new(w: i32, h: i32) -> Self {
        Expanse { w, h }
    }

    /// A rect of this size with its top-left corner at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.w, self.h)
    }

    /// The component-wise maximum of two expanses.
    pub fn max(&self, other: Expanse) -> Expanse {
        Expanse {
            w: self.w.max(other.w),
            h: self.h.max(other.h),
        }
    }
}

/// A four-sided inset applied between a widget's assigned rectangle and its
/// content.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Padding {
    pub const ZERO: Padding = Padding {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Padding {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same inset on all four sides.
    pub fn uniform(v: i32) -> Self {
        Padding::new(v, v, v, v)
    }

    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}
