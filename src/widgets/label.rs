use std::any::Any;

use crate::{
    error::Result,
    geom::{Expanse, Point},
    render::Render,
    style::Style,
    tree::{Tree, WidgetId},
    widget::{Ctx, Widget, WidgetName},
};

/// A single line of static text.
pub struct Label {
    style: Style,
    text: String,
    // Cached at measure time; draw has no access to metrics.
    text_width: i32,
    line_height: i32,
}

impl Label {
    pub fn new(style: Style, text: &str) -> Self {
        Label {
            style,
            text: text.into(),
            text_width: 0,
            line_height: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text of the label at `id` and schedule a relayout.
    pub fn set_text(tree: &mut Tree, id: WidgetId, text: &str) -> Result<()> {
        tree.widget_mut::<Label>(id)?.text = text.into();
        tree.request_layout();
        Ok(())
    }
}

impl Widget for Label {
    fn name(&self) -> WidgetName {
        WidgetName::convert("label")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn measure(&mut self, ctx: &mut Ctx, id: WidgetId) -> Expanse {
        self.text_width = ctx.metrics.text_width(self.style.medium_font, &self.text);
        self.line_height = ctx.metrics.line_height(self.style.medium_font);
        let p = ctx.tree.padding(id);
        Expanse::new(
            self.text_width + p.horizontal(),
            self.line_height + p.vertical(),
        )
    }

    fn draw(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        let inner = tree.layout_rect(id).inner(tree.padding(id));
        let pos = Point::new(inner.left(), inner.center().y - self.line_height / 2);
        r.draw_text(
            self.style.medium_font,
            &self.text,
            pos,
            self.style.default_text_color,
        )
    }
}
