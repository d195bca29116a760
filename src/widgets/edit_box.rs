use std::any::Any;

use crate::{
    error::Result,
    event::Key,
    geom::{Expanse, Padding, Point, Rect},
    render::{Render, Tint},
    style::Style,
    tree::{Tree, WidgetId},
    widget::{Ctx, Outcome, Widget, WidgetName},
};

/// Caret blink period, in seconds. The caret is visible for the first half
/// of each period.
const BLINK_PERIOD: f32 = 0.6;

/// A single-line text entry field.
pub struct EditBox {
    style: Style,
    text: String,
    /// Caret position, in characters, always in `[0, len]`.
    caret: usize,
    /// Mask the content with bullets, for password entry.
    hide_content: bool,
    on_validate: Option<Box<dyn FnMut(&str)>>,

    focused: bool,
    hovered: bool,
    caret_timer: f32,

    line_height: i32,
    /// Pixel width of each display-text prefix, indexed by caret position.
    /// Rebuilt at measure time.
    prefix_widths: Vec<i32>,
}

impl EditBox {
    pub fn new(style: Style, text: &str) -> Self {
        EditBox {
            style,
            text: text.into(),
            caret: text.chars().count(),
            hide_content: false,
            on_validate: None,
            focused: false,
            hovered: false,
            caret_timer: 0.0,
            line_height: 0,
            prefix_widths: Vec::new(),
        }
    }

    pub fn hide_content(mut self) -> Self {
        self.hide_content = true;
        self
    }

    /// Handler fired when Enter is pressed.
    pub fn on_validate(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_validate = Some(Box::new(f));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Replace the content of the edit box at `id`. The caret clamps to the
    /// new length.
    pub fn set_text(tree: &mut Tree, id: WidgetId, text: &str) -> Result<()> {
        let eb = tree.widget_mut::<EditBox>(id)?;
        eb.text = text.into();
        eb.caret = eb.caret.min(eb.text.chars().count());
        tree.request_layout();
        Ok(())
    }

    fn display_text(&self) -> String {
        if self.hide_content {
            "\u{25cf}".repeat(self.text.chars().count())
        } else {
            self.text.clone()
        }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Byte offset of the caret's character index.
    fn byte_at(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn caret_visible(&self) -> bool {
        self.focused && self.caret_timer % BLINK_PERIOD < BLINK_PERIOD / 2.0
    }

    fn caret_x(&self) -> i32 {
        self.prefix_widths.get(self.caret).copied().unwrap_or(0)
    }
}

impl Widget for EditBox {
    fn name(&self) -> WidgetName {
        WidgetName::convert("edit_box")
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
        Padding::uniform(10)
    }

    fn measure(&mut self, ctx: &mut Ctx, id: WidgetId) -> Expanse {
        let display = self.display_text();
        let font = self.style.medium_font;
        self.line_height = ctx.metrics.line_height(font);
        let chars: Vec<char> = display.chars().collect();
        self.prefix_widths = (0..=chars.len())
            .map(|i| {
                let prefix: String = chars[..i].iter().collect();
                ctx.metrics.text_width(font, &prefix)
            })
            .collect();
        let p = ctx.tree.padding(id);
        let w = self.prefix_widths.last().copied().unwrap_or(0);
        Expanse::new(w + p.horizontal(), self.line_height + p.vertical())
    }

    fn on_mouse_enter(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.hovered = true;
    }

    fn on_mouse_out(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.hovered = false;
    }

    fn on_mouse_down(
        &mut self,
        ctx: &mut Ctx,
        id: WidgetId,
        p: Point,
        _btn: crate::event::PointerButton,
    ) {
        // Put the caret at the nearest character boundary to the click.
        let inner = ctx.tree.layout_rect(id).inner(ctx.tree.padding(id));
        let x = p.x - inner.left();
        self.caret = self
            .prefix_widths
            .iter()
            .enumerate()
            .min_by_key(|(_, w)| (**w - x).abs())
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.caret_timer = 0.0;
    }

    fn on_key(&mut self, ctx: &mut Ctx, _id: WidgetId, k: Key) -> Outcome {
        self.caret_timer = 0.0;
        match k {
            Key::Char(c) => {
                let at = self.byte_at(self.caret);
                self.text.insert(at, c);
                self.caret += 1;
                ctx.request_layout();
            }
            Key::Backspace => {
                if self.caret > 0 {
                    let at = self.byte_at(self.caret - 1);
                    self.text.remove(at);
                    self.caret -= 1;
                    ctx.request_layout();
                }
            }
            Key::Delete => {
                if self.caret < self.len() {
                    let at = self.byte_at(self.caret);
                    self.text.remove(at);
                    ctx.request_layout();
                }
            }
            Key::Left => self.caret = self.caret.saturating_sub(1),
            Key::Right => self.caret = (self.caret + 1).min(self.len()),
            Key::Home => self.caret = 0,
            Key::End => self.caret = self.len(),
            Key::Enter => {
                let text = self.text.clone();
                if let Some(f) = self.on_validate.as_mut() {
                    f(&text);
                }
            }
            _ => return Outcome::Ignore,
        }
        Outcome::Handle
    }

    fn on_focus(&mut self, ctx: &mut Ctx, id: WidgetId) {
        self.focused = true;
        self.caret_timer = 0.0;
        self.caret = self.caret.min(self.len());
        ctx.request_update(id);
    }

    fn on_blur(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.focused = false;
        self.caret_timer = 0.0;
    }

    fn update(&mut self, _ctx: &mut Ctx, _id: WidgetId, dt: f32) -> bool {
        if !self.focused {
            return false;
        }
        self.caret_timer += dt;
        true
    }

    fn draw(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        let rect = tree.layout_rect(id);
        let frame = if self.focused {
            self.style.edit_box_frame_focus
        } else if self.hovered {
            self.style.edit_box_frame_hover
        } else {
            self.style.edit_box_frame
        };
        r.draw_box(frame, rect, self.style.edit_box_corner_size, Tint::WHITE)?;
        let inner = rect.inner(tree.padding(id));
        let pos = Point::new(inner.left(), inner.center().y - self.line_height / 2);
        r.draw_text(
            self.style.medium_font,
            &self.display_text(),
            pos,
            self.style.default_text_color,
        )?;
        if self.caret_visible() {
            r.draw_box(
                self.style.caret,
                Rect::new(inner.left() + self.caret_x(), pos.y, 2, self.line_height),
                0,
                self.style.default_text_color,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerButton;
    use crate::screen::Screen;
    use crate::tutils::{FixedMetrics, TSplit};

    fn edit_screen(texts: &[&str]) -> (Screen, Vec<WidgetId>) {
        let mut s = Screen::new(
            Box::new(TSplit::new()),
            Expanse::new(400, 100),
            Box::new(FixedMetrics::default()),
        );
        let root = s.tree().root();
        let ids = texts
            .iter()
            .map(|t| {
                s.tree_mut()
                    .attach(root, Box::new(EditBox::new(Style::default(), t)))
                    .unwrap()
            })
            .collect();
        (s, ids)
    }

    #[test]
    fn typing_edits_at_caret() -> Result<()> {
        let (mut s, ids) = edit_screen(&["ab"]);
        s.focus(ids[0])?;
        s.key(Key::Left)?;
        s.key(Key::Char('x'))?;
        assert_eq!(s.tree().widget_ref::<EditBox>(ids[0])?.text(), "axb");
        s.key(Key::Backspace)?;
        assert_eq!(s.tree().widget_ref::<EditBox>(ids[0])?.text(), "ab");
        s.key(Key::Home)?;
        s.key(Key::Delete)?;
        assert_eq!(s.tree().widget_ref::<EditBox>(ids[0])?.text(), "b");
        Ok(())
    }

    #[test]
    fn caret_clamps() -> Result<()> {
        let (mut s, ids) = edit_screen(&["ab"]);
        s.focus(ids[0])?;
        for _ in 0..10 {
            s.key(Key::Right)?;
        }
        assert_eq!(s.tree().widget_ref::<EditBox>(ids[0])?.caret(), 2);
        for _ in 0..10 {
            s.key(Key::Left)?;
        }
        assert_eq!(s.tree().widget_ref::<EditBox>(ids[0])?.caret(), 0);
        Ok(())
    }

    #[test]
    fn set_text_clamps_caret() -> Result<()> {
        let (mut s, ids) = edit_screen(&["abcdef"]);
        s.focus(ids[0])?;
        s.key(Key::End)?;
        EditBox::set_text(s.tree_mut(), ids[0], "xy")?;
        assert_eq!(s.tree().widget_ref::<EditBox>(ids[0])?.caret(), 2);
        Ok(())
    }

    #[test]
    fn blink_timer_follows_focus() -> Result<()> {
        let (mut s, ids) = edit_screen(&["a", "b"]);
        s.focus(ids[0])?;
        s.update(0.4)?;
        assert!(s.tree().widget_ref::<EditBox>(ids[0])?.caret_timer > 0.0);
        // Moving focus resets the old field's timer and starts the new one
        // from zero.
        s.focus(ids[1])?;
        assert_eq!(s.tree().widget_ref::<EditBox>(ids[0])?.caret_timer, 0.0);
        assert_eq!(s.tree().widget_ref::<EditBox>(ids[1])?.caret_timer, 0.0);
        s.update(0.1)?;
        assert!(s.tree().widget_ref::<EditBox>(ids[1])?.caret_timer > 0.0);
        assert_eq!(s.tree().widget_ref::<EditBox>(ids[0])?.caret_timer, 0.0);
        Ok(())
    }

    #[test]
    fn click_places_caret() -> Result<()> {
        let (mut s, ids) = edit_screen(&["abcd"]);
        s.relayout()?;
        // Chars are 8px wide and the content starts after 10px padding; a
        // click at x=27 is nearest the boundary after the second char.
        s.pointer_down(Point::new(27, 50), PointerButton::Left)?;
        assert_eq!(s.tree().widget_ref::<EditBox>(ids[0])?.caret(), 2);
        Ok(())
    }

    #[test]
    fn enter_validates() -> Result<()> {
        use std::cell::RefCell;
        use std::rc::Rc;
        let seen = Rc::new(RefCell::new(String::new()));
        let s2 = seen.clone();
        let mut s = Screen::new(
            Box::new(TSplit::new()),
            Expanse::new(400, 100),
            Box::new(FixedMetrics::default()),
        );
        let root = s.tree().root();
        let id = s
            .tree_mut()
            .attach(
                root,
                Box::new(
                    EditBox::new(Style::default(), "hi").on_validate(move |t| {
                        *s2.borrow_mut() = t.into();
                    }),
                ),
            )
            .unwrap();
        s.focus(id)?;
        s.key(Key::Enter)?;
        assert_eq!(*seen.borrow(), "hi");
        Ok(())
    }
}
