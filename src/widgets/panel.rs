use std::any::Any;

use crate::{
    error::Result,
    render::Render,
    style::Style,
    tree::{Tree, WidgetId},
    widget::{Widget, WidgetName, draw_widget},
};

/// A framed container. Children are laid out into the padded interior, each
/// getting the full rectangle.
pub struct Panel {
    style: Style,
    /// Draw the background frame? Transparent panels are pure grouping.
    framed: bool,
}

impl Panel {
    pub fn new(style: Style) -> Self {
        Panel {
            style,
            framed: true,
        }
    }

    pub fn transparent(style: Style) -> Self {
        Panel {
            style,
            framed: false,
        }
    }
}

impl Widget for Panel {
    fn name(&self) -> WidgetName {
        WidgetName::convert("panel")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn draw(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        if self.framed {
            r.draw_box(
                self.style.panel_frame,
                tree.layout_rect(id),
                self.style.frame_corner_size,
                crate::render::Tint::WHITE,
            )?;
        }
        for c in tree.children(id) {
            draw_widget(tree, c, r)?;
        }
        Ok(())
    }
}
