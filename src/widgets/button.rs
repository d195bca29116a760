use std::any::Any;

use crate::{
    anim::AnimatedValue,
    error::Result,
    event::Key,
    geom::{Expanse, Padding, Point},
    render::Render,
    style::Style,
    tree::{Tree, WidgetId},
    widget::{Ctx, Outcome, Widget, WidgetName},
};

/// A push button. Clicking it, or pressing confirm or Enter while it's
/// focused, fires the click handler.
pub struct Button {
    style: Style,
    text: String,
    on_click: Option<Box<dyn FnMut()>>,

    hovered: bool,
    is_pressed: bool,
    focused: bool,
    /// Press flash: runs 1 to 0 after each activation.
    press: AnimatedValue,

    text_width: i32,
    line_height: i32,
}

impl Button {
    pub fn new(style: Style, text: &str) -> Self {
        let mut press = AnimatedValue::smooth(1.0, 0.0, 0.2);
        press.set_time(press.duration());
        Button {
            style,
            text: text.into(),
            on_click: None,
            hovered: false,
            is_pressed: false,
            focused: false,
            press,
            text_width: 0,
            line_height: 0,
        }
    }

    pub fn on_click(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(tree: &mut Tree, id: WidgetId, text: &str) -> Result<()> {
        tree.widget_mut::<Button>(id)?.text = text.into();
        tree.request_layout();
        Ok(())
    }

    fn fire(&mut self) {
        if let Some(f) = self.on_click.as_mut() {
            f();
        }
    }

    fn frame_tex(&self) -> crate::render::TextureId {
        if self.is_pressed {
            self.style.button_frame_down
        } else if self.hovered {
            self.style.button_frame_hover
        } else {
            self.style.button_frame
        }
    }
}

impl Widget for Button {
    fn name(&self) -> WidgetName {
        WidgetName::convert("button")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn can_focus(&self) -> bool {
        true
    }

    fn default_padding(&self) -> Padding {
        Padding::new(20, 10, 20, 10)
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

    fn on_mouse_enter(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.hovered = true;
    }

    fn on_mouse_out(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.hovered = false;
    }

    fn on_activate_down(&mut self, ctx: &mut Ctx, id: WidgetId) {
        self.is_pressed = true;
        self.press.set_time(0.0);
        ctx.request_update(id);
    }

    fn on_activate_up(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.is_pressed = false;
        self.fire();
    }

    fn on_cancel(&mut self, _ctx: &mut Ctx, _id: WidgetId, pressed: bool) -> bool {
        if pressed {
            self.is_pressed = false;
            self.press.set_time(self.press.duration());
        }
        false
    }

    fn on_key(&mut self, ctx: &mut Ctx, id: WidgetId, k: Key) -> Outcome {
        match k {
            Key::Enter | Key::Char(' ') => {
                self.press.set_time(0.0);
                ctx.request_update(id);
                self.fire();
                Outcome::Handle
            }
            _ => Outcome::Ignore,
        }
    }

    fn on_focus(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.focused = true;
    }

    fn on_blur(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.focused = false;
        self.is_pressed = false;
        self.press.set_time(self.press.duration());
    }

    fn update(&mut self, _ctx: &mut Ctx, _id: WidgetId, dt: f32) -> bool {
        self.press.update(dt);
        !self.press.is_over()
    }

    fn draw(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        let rect = tree.layout_rect(id);
        r.draw_box(
            self.frame_tex(),
            rect,
            self.style.frame_corner_size,
            crate::render::Tint::WHITE,
        )?;
        if self.focused {
            r.draw_box(
                self.style.button_frame_focus,
                rect,
                self.style.frame_corner_size,
                crate::render::Tint::WHITE,
            )?;
        }
        let flash = self.press.current_value();
        if flash > 0.0 {
            r.draw_box(
                self.style.button_frame_pressed,
                rect,
                self.style.frame_corner_size,
                crate::render::Tint::WHITE.alpha(flash),
            )?;
        }
        let c = rect.center();
        r.draw_text(
            self.style.medium_font,
            &self.text,
            Point::new(c.x - self.text_width / 2, c.y - self.line_height / 2),
            self.style.default_text_color,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::event::PointerButton;
    use crate::screen::Screen;
    use crate::tutils::FixedMetrics;

    fn button_screen() -> (Screen, WidgetId, Rc<Cell<u32>>) {
        let clicks = Rc::new(Cell::new(0));
        let c2 = clicks.clone();
        let mut s = Screen::new(
            Box::new(crate::tutils::TSplit::new()),
            Expanse::new(200, 100),
            Box::new(FixedMetrics::default()),
        );
        let root = s.tree().root();
        let b = s
            .tree_mut()
            .attach(
                root,
                Box::new(Button::new(Style::default(), "OK").on_click(move || {
                    c2.set(c2.get() + 1);
                })),
            )
            .unwrap();
        (s, b, clicks)
    }

    #[test]
    fn click_fires_handler() -> Result<()> {
        let (mut s, b, clicks) = button_screen();
        let p = Point::new(100, 50);
        s.pointer_down(p, PointerButton::Left)?;
        assert_eq!(s.pressed(), Some(b));
        assert_eq!(clicks.get(), 0);
        s.pointer_up(p, PointerButton::Left)?;
        assert_eq!(clicks.get(), 1);
        Ok(())
    }

    #[test]
    fn release_outside_does_not_fire() -> Result<()> {
        let (mut s, _, clicks) = button_screen();
        s.pointer_down(Point::new(100, 50), PointerButton::Left)?;
        s.pointer_up(Point::new(100, 300), PointerButton::Left)?;
        assert_eq!(clicks.get(), 0);
        Ok(())
    }

    #[test]
    fn press_flash_runs_out() -> Result<()> {
        let (mut s, b, _) = button_screen();
        let p = Point::new(100, 50);
        s.pointer_down(p, PointerButton::Left)?;
        s.pointer_up(p, PointerButton::Left)?;
        // The flash animation keeps the button on the update list until the
        // timeline completes.
        s.update(0.1)?;
        assert!(!s.tree().widget_ref::<Button>(b)?.press.is_over());
        s.update(0.1)?;
        assert!(s.tree().widget_ref::<Button>(b)?.press.is_over());
        Ok(())
    }

    #[test]
    fn enter_fires_when_focused() -> Result<()> {
        let (mut s, b, clicks) = button_screen();
        s.focus(b)?;
        s.key(Key::Enter)?;
        assert_eq!(clicks.get(), 1);
        Ok(())
    }
}
