use std::any::Any;

use crate::{
    error::Result,
    geom::{Expanse, Point, Rect},
    render::{Render, Tint},
    style::Style,
    tree::{Tree, WidgetId},
    widget::{Ctx, Widget, WidgetName},
};

/// Gap between the check box and its label.
const LABEL_GAP: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Checked,
    /// A mixed state, for boxes that summarize a group.
    Inconsistent,
}

/// A labelled check box. Not focusable; it toggles on click only.
pub struct CheckBox {
    style: Style,
    text: String,
    state: CheckState,
    on_change: Option<Box<dyn FnMut(CheckState)>>,

    hovered: bool,
    text_width: i32,
    line_height: i32,
}

impl CheckBox {
    pub fn new(style: Style, text: &str) -> Self {
        CheckBox {
            style,
            text: text.into(),
            state: CheckState::Unchecked,
            on_change: None,
            hovered: false,
            text_width: 0,
            line_height: 0,
        }
    }

    pub fn with_state(mut self, state: CheckState) -> Self {
        self.state = state;
        self
    }

    pub fn on_change(mut self, f: impl FnMut(CheckState) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn set_state(tree: &mut Tree, id: WidgetId, state: CheckState) -> Result<()> {
        tree.widget_mut::<CheckBox>(id)?.state = state;
        Ok(())
    }

    fn toggle(&mut self) {
        // An inconsistent box resolves to checked on the first click.
        self.state = match self.state {
            CheckState::Checked => CheckState::Unchecked,
            CheckState::Unchecked | CheckState::Inconsistent => CheckState::Checked,
        };
        let state = self.state;
        if let Some(f) = self.on_change.as_mut() {
            f(state);
        }
    }

    fn box_rect(&self, tree: &Tree, id: WidgetId) -> Rect {
        let inner = tree.layout_rect(id).inner(tree.padding(id));
        Rect::new(
            inner.left(),
            inner.center().y - self.line_height / 2,
            self.line_height,
            self.line_height,
        )
    }
}

impl Widget for CheckBox {
    fn name(&self) -> WidgetName {
        WidgetName::convert("check_box")
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
        // The box is square, sized to the line height.
        Expanse::new(
            self.line_height + LABEL_GAP + self.text_width + p.horizontal(),
            self.line_height + p.vertical(),
        )
    }

    fn on_mouse_enter(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.hovered = true;
    }

    fn on_mouse_out(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.hovered = false;
    }

    fn on_mouse_up(
        &mut self,
        ctx: &mut Ctx,
        id: WidgetId,
        p: Point,
        btn: crate::event::PointerButton,
    ) {
        if btn == crate::event::PointerButton::Left && ctx.tree.hit_box(id).contains_point(p) {
            self.toggle();
        }
    }

    fn draw(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        let bx = self.box_rect(tree, id);
        let frame = if self.hovered {
            self.style.checkbox_frame_hover
        } else {
            self.style.checkbox_frame
        };
        r.draw_box(frame, bx, self.style.checkbox_frame_corner_size, Tint::WHITE)?;
        let mark = match self.state {
            CheckState::Checked => self.style.checkbox_checked,
            CheckState::Unchecked => self.style.checkbox_unchecked,
            CheckState::Inconsistent => self.style.checkbox_inconsistent,
        };
        r.draw_texture(mark, bx.tl, Tint::WHITE)?;
        r.draw_text(
            self.style.medium_font,
            &self.text,
            Point::new(bx.right() + LABEL_GAP, bx.top()),
            self.style.default_text_color,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerButton;
    use crate::screen::Screen;
    use crate::tutils::FixedMetrics;

    #[test]
    fn click_toggles() -> Result<()> {
        let mut s = Screen::new(
            Box::new(CheckBox::new(Style::default(), "opt")),
            Expanse::new(200, 50),
            Box::new(FixedMetrics::default()),
        );
        let id = s.tree().root();
        let p = Point::new(10, 25);
        s.pointer_down(p, PointerButton::Left)?;
        // A check box isn't focusable, so no focus or press state.
        assert_eq!(s.focused(), None);
        s.pointer_up(p, PointerButton::Left)?;
        assert_eq!(s.tree().widget_ref::<CheckBox>(id)?.state(), CheckState::Checked);
        s.pointer_down(p, PointerButton::Left)?;
        s.pointer_up(p, PointerButton::Left)?;
        assert_eq!(s.tree().widget_ref::<CheckBox>(id)?.state(), CheckState::Unchecked);
        Ok(())
    }

    #[test]
    fn inconsistent_resolves_to_checked() -> Result<()> {
        let mut s = Screen::new(
            Box::new(CheckBox::new(Style::default(), "opt").with_state(CheckState::Inconsistent)),
            Expanse::new(200, 50),
            Box::new(FixedMetrics::default()),
        );
        let id = s.tree().root();
        let p = Point::new(10, 25);
        s.pointer_down(p, PointerButton::Left)?;
        s.pointer_up(p, PointerButton::Left)?;
        assert_eq!(s.tree().widget_ref::<CheckBox>(id)?.state(), CheckState::Checked);
        Ok(())
    }
}
