//! Test utilities: deterministic text metrics plus an instrumented widget
//! tree that logs every hook invocation to a thread-local event list.

mod ttree;

pub use ttree::{TLeaf, TSplit, get_state, log_event, reset_state};

use crate::render::FontId;
use crate::style::TextMetrics;

/// Deterministic text metrics: every character is 8 pixels wide, every line
/// 16 high, regardless of font.
#[derive(Debug, Default)]
pub struct FixedMetrics {}

impl TextMetrics for FixedMetrics {
    fn text_width(&self, _font: FontId, text: &str) -> i32 {
        text.chars().count() as i32 * 8
    }

    fn line_height(&self, _font: FontId) -> i32 {
        16
    }
}
