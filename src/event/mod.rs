//! Input event types, and the per-frame snapshot the screen normalizes into
//! discrete events.

pub mod key;

pub use key::{Key, KeyTranslator, RawKey, ascii_translator};

use crate::geom::{Direction, Point};

/// One wheel detent on most platforms. Containers quantize raw deltas into
/// steps of this size.
pub const WHEEL_STEP: i32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

impl PointerButton {
    pub(crate) const ALL: [PointerButton; 3] =
        [PointerButton::Left, PointerButton::Middle, PointerButton::Right];

    fn index(self) -> usize {
        match self {
            PointerButton::Left => 0,
            PointerButton::Middle => 1,
            PointerButton::Right => 2,
        }
    }
}

/// A gamepad event, already reduced to the navigation model the engine
/// understands: directional moves plus a confirm press/release pair and a
/// cancel action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadEvent {
    Move(Direction),
    ConfirmDown,
    ConfirmUp,
    Cancel,
}

/// A per-frame snapshot of the input source's state. The screen diffs
/// consecutive snapshots to produce exactly one event per physical input
/// occurrence; the engine never polls hardware itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub pointer: Point,
    /// Per-button held state, indexed per [`PointerButton`]; prefer
    /// [`is_down`](Self::is_down)/[`set_down`](Self::set_down).
    pub buttons: [bool; 3],
    /// Wheel delta accumulated since the previous snapshot, in platform
    /// units (±[`WHEEL_STEP`] per detent).
    pub wheel: i32,
    /// Raw keys that went down this frame.
    pub keys: Vec<RawKey>,
    pub pad_direction: Option<Direction>,
    pub pad_confirm: bool,
}

impl InputSnapshot {
    pub fn is_down(&self, b: PointerButton) -> bool {
        self.buttons[b.index()]
    }

    pub fn set_down(&mut self, b: PointerButton, down: bool) {
        self.buttons[b.index()] = down;
    }
}
