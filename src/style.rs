//! The shared visual style: texture and font handles the stock widgets draw
//! with, plus the text measurement interface layout depends on.

use crate::render::{FontId, TextureId, Tint};

/// Text measurement, injected by the embedding. Layout needs text sizes but
/// the engine never rasterizes text itself.
pub trait TextMetrics {
    /// The width of a single line of text, in pixels.
    fn text_width(&self, font: FontId, text: &str) -> i32;

    /// The line height of a font, in pixels.
    fn line_height(&self, font: FontId) -> i32;
}

/// Texture and font handles for the stock widgets. Embeddings load their own
/// assets and fill this in; the defaults just hand out distinct ids.
#[derive(Debug, Clone)]
pub struct Style {
    pub medium_font: FontId,
    pub default_text_color: Tint,

    pub frame_corner_size: i32,
    pub button_frame: TextureId,
    pub button_frame_down: TextureId,
    pub button_frame_hover: TextureId,
    pub button_frame_pressed: TextureId,
    pub button_frame_focus: TextureId,

    pub checkbox_frame: TextureId,
    pub checkbox_frame_hover: TextureId,
    pub checkbox_checked: TextureId,
    pub checkbox_unchecked: TextureId,
    pub checkbox_inconsistent: TextureId,
    pub checkbox_frame_corner_size: i32,

    pub grid_frame: TextureId,
    pub grid_box_frame: TextureId,
    pub grid_box_frame_selected: TextureId,
    pub grid_box_frame_hover: TextureId,
    pub grid_box_frame_focus: TextureId,
    pub grid_box_frame_corner_size: i32,

    pub tree_branch: TextureId,
    pub tree_branch_last: TextureId,
    pub tree_branch_open: TextureId,
    pub tree_branch_closed: TextureId,
    pub tree_branch_open_empty: TextureId,

    pub drop_down_arrow: TextureId,
    pub drop_down_arrow_width: i32,

    pub edit_box_frame: TextureId,
    pub edit_box_frame_hover: TextureId,
    pub edit_box_frame_focus: TextureId,
    pub edit_box_corner_size: i32,
    pub caret: TextureId,

    pub panel_frame: TextureId,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            medium_font: FontId(0),
            default_text_color: Tint::WHITE,

            frame_corner_size: 30,
            button_frame: TextureId(0),
            button_frame_down: TextureId(1),
            button_frame_hover: TextureId(2),
            button_frame_pressed: TextureId(3),
            button_frame_focus: TextureId(4),

            checkbox_frame: TextureId(5),
            checkbox_frame_hover: TextureId(6),
            checkbox_checked: TextureId(7),
            checkbox_unchecked: TextureId(8),
            checkbox_inconsistent: TextureId(9),
            checkbox_frame_corner_size: 15,

            grid_frame: TextureId(10),
            grid_box_frame: TextureId(11),
            grid_box_frame_selected: TextureId(12),
            grid_box_frame_hover: TextureId(13),
            grid_box_frame_focus: TextureId(14),
            grid_box_frame_corner_size: 15,

            tree_branch: TextureId(15),
            tree_branch_last: TextureId(16),
            tree_branch_open: TextureId(17),
            tree_branch_closed: TextureId(18),
            tree_branch_open_empty: TextureId(19),

            drop_down_arrow: TextureId(20),
            drop_down_arrow_width: 50,

            edit_box_frame: TextureId(21),
            edit_box_frame_hover: TextureId(22),
            edit_box_frame_focus: TextureId(23),
            edit_box_corner_size: 15,
            caret: TextureId(24),

            panel_frame: TextureId(25),
        }
    }
}
