use std::any::Any;

use crate::{
    anim::AnimatedValue,
    error::Result,
    event::{Key, WHEEL_STEP},
    geom::{Direction, Expanse, Padding, Point, Rect},
    render::{Render, Tint},
    style::Style,
    tree::{Tree, WidgetId},
    widget::{Ctx, Outcome, Widget, WidgetName},
};

/// Height of one row in the popup list.
const LINE_HEIGHT: i32 = 50;

/// Rows visible in the popup before it scrolls.
const MAX_LINES: usize = 3;

/// A closed selector that drops an overlay list when activated. While open
/// it claims every pointer hit, so clicks anywhere route to it and either
/// commit a row or dismiss the popup.
pub struct DropDown {
    style: Style,
    values: Vec<String>,
    selected: usize,
    on_select: Option<Box<dyn FnMut(usize)>>,

    open: bool,
    hovered_index: Option<usize>,
    scroll_offset: usize,
    /// Overlay rectangle, cached at layout time.
    popup: Rect,
    /// Set when a release gesture already resolved the popup, so the
    /// activation that follows must not toggle it again.
    suppress_toggle: bool,

    hovered: bool,
    focused: bool,
    is_pressed: bool,
    press: AnimatedValue,

    line_height: i32,
}

impl DropDown {
    pub fn new(style: Style, values: Vec<String>) -> Self {
        let mut press = AnimatedValue::smooth(1.0, 0.0, 0.2);
        press.set_time(press.duration());
        DropDown {
            style,
            values,
            selected: 0,
            on_select: None,
            open: false,
            hovered_index: None,
            scroll_offset: 0,
            popup: Rect::ZERO,
            suppress_toggle: false,
            hovered: false,
            focused: false,
            is_pressed: false,
            press,
            line_height: 0,
        }
    }

    pub fn on_select(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.values.get(self.selected).map(String::as_str)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn max_offset(&self) -> usize {
        self.values.len().saturating_sub(MAX_LINES)
    }

    fn visible_lines(&self) -> usize {
        self.values.len().min(MAX_LINES)
    }

    fn select(&mut self, index: usize) {
        if index >= self.values.len() {
            return;
        }
        self.selected = index;
        if let Some(f) = self.on_select.as_mut() {
            f(index);
        }
    }

    fn open_popup(&mut self) {
        self.open = true;
        self.hovered_index = Some(self.selected);
        self.scroll_to(self.selected);
    }

    fn close_popup(&mut self) {
        self.open = false;
        self.hovered_index = None;
    }

    /// Adjust the scroll offset so a row is visible.
    fn scroll_to(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if index >= self.scroll_offset + MAX_LINES {
            self.scroll_offset = index + 1 - MAX_LINES;
        }
    }

    fn row_area(&self, padding: Padding) -> Rect {
        self.popup.inner(padding)
    }

    /// The absolute row index under a point, if it's over a visible row.
    fn index_at(&self, padding: Padding, p: Point) -> Option<usize> {
        let area = self.row_area(padding);
        if !area.contains_point(p) {
            return None;
        }
        let row = ((p.y - area.top()) / LINE_HEIGHT) as usize;
        let idx = self.scroll_offset + row;
        (idx < self.values.len()).then_some(idx)
    }

    fn step(&mut self, steps: i32) {
        let len = self.values.len() as i32;
        if len == 0 {
            return;
        }
        let next = (self.selected as i32 + steps).clamp(0, len - 1) as usize;
        if next != self.selected {
            self.select(next);
        }
    }

    fn frame_tex(&self) -> crate::render::TextureId {
        if self.is_pressed || self.open {
            self.style.button_frame_down
        } else if self.hovered {
            self.style.button_frame_hover
        } else {
            self.style.button_frame
        }
    }
}

impl Widget for DropDown {
    fn name(&self) -> WidgetName {
        WidgetName::convert("drop_down")
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
        let font = self.style.medium_font;
        self.line_height = ctx.metrics.line_height(font);
        let widest = self
            .values
            .iter()
            .map(|v| ctx.metrics.text_width(font, v))
            .max()
            .unwrap_or(0);
        let p = ctx.tree.padding(id);
        Expanse::new(
            widest + self.style.drop_down_arrow_width + p.horizontal(),
            self.line_height + p.vertical(),
        )
    }

    fn layout(&mut self, ctx: &mut Ctx, id: WidgetId, rect: Rect) -> Result<()> {
        ctx.tree.set_layout_rect(id, rect);
        ctx.tree.set_hit_box(id, rect);
        let p = ctx.tree.padding(id);
        self.popup = Rect::new(
            rect.left(),
            rect.bottom(),
            rect.w,
            p.vertical() + self.visible_lines() as i32 * LINE_HEIGHT,
        );
        Ok(())
    }

    /// While open the drop-down claims every point, so no click can reach a
    /// widget underneath the popup.
    fn hit_test(&self, tree: &Tree, id: WidgetId, p: Point) -> Option<WidgetId> {
        if self.open {
            return Some(id);
        }
        tree.hit_box(id).contains_point(p).then_some(id)
    }

    fn on_mouse_enter(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.hovered = true;
    }

    fn on_mouse_out(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.hovered = false;
    }

    fn on_mouse_move(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point) {
        if self.open
            && let Some(idx) = self.index_at(ctx.tree.padding(id), p)
        {
            self.hovered_index = Some(idx);
        }
    }

    fn on_mouse_down(
        &mut self,
        ctx: &mut Ctx,
        id: WidgetId,
        p: Point,
        _btn: crate::event::PointerButton,
    ) {
        if self.open
            && !self.popup.contains_point(p)
            && !ctx.tree.hit_box(id).contains_point(p)
        {
            // A press outside both the box and the popup dismisses it; the
            // click goes nowhere else.
            self.close_popup();
        }
    }

    fn on_mouse_up(
        &mut self,
        ctx: &mut Ctx,
        id: WidgetId,
        p: Point,
        _btn: crate::event::PointerButton,
    ) {
        if !self.open {
            return;
        }
        if let Some(idx) = self.index_at(ctx.tree.padding(id), p) {
            self.select(idx);
            self.close_popup();
        } else if ctx.tree.hit_box(id).contains_point(p) {
            // Releasing on the box while open closes without selecting. The
            // activation that fires right after must not reopen it.
            self.close_popup();
            self.suppress_toggle = true;
        }
    }

    fn on_mouse_wheel(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point, delta: i32) {
        if self.open {
            let max = self.max_offset() as i32;
            let next = (self.scroll_offset as i32 - delta / WHEEL_STEP).clamp(0, max);
            let shift = next - self.scroll_offset as i32;
            self.scroll_offset = next as usize;
            // The list moved under a stationary cursor.
            if let Some(h) = self.hovered_index {
                let len = self.values.len() as i32;
                self.hovered_index = Some((h as i32 + shift).clamp(0, len - 1) as usize);
            }
        } else {
            self.step(-delta / WHEEL_STEP);
        }
    }

    fn on_key(&mut self, _ctx: &mut Ctx, _id: WidgetId, k: Key) -> Outcome {
        if self.open {
            match k {
                Key::Up | Key::Down => {
                    let len = self.values.len() as i32;
                    let cur = self.hovered_index.unwrap_or(self.selected) as i32;
                    let step = if k == Key::Up { -1 } else { 1 };
                    let next = (cur + step).clamp(0, (len - 1).max(0)) as usize;
                    self.hovered_index = Some(next);
                    self.scroll_to(next);
                    Outcome::Handle
                }
                Key::Enter => {
                    if let Some(h) = self.hovered_index {
                        self.select(h);
                    }
                    self.close_popup();
                    Outcome::Handle
                }
                Key::Escape => {
                    self.close_popup();
                    Outcome::Handle
                }
                _ => Outcome::Ignore,
            }
        } else {
            match k {
                Key::Up => {
                    self.step(-1);
                    Outcome::Handle
                }
                Key::Down => {
                    self.step(1);
                    Outcome::Handle
                }
                Key::Enter => {
                    self.open_popup();
                    Outcome::Handle
                }
                _ => Outcome::Ignore,
            }
        }
    }

    fn on_pad_move(&mut self, _ctx: &mut Ctx, _id: WidgetId, dir: Direction) -> Outcome {
        if !self.open || dir.is_horizontal() {
            return Outcome::Ignore;
        }
        let len = self.values.len() as i32;
        let cur = self.hovered_index.unwrap_or(self.selected) as i32;
        let step = if dir == Direction::Up { -1 } else { 1 };
        let next = (cur + step).clamp(0, (len - 1).max(0)) as usize;
        self.hovered_index = Some(next);
        self.scroll_to(next);
        Outcome::Handle
    }

    fn on_activate_down(&mut self, ctx: &mut Ctx, id: WidgetId) {
        self.is_pressed = true;
        self.press.set_time(0.0);
        ctx.request_update(id);
    }

    fn on_activate_up(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.is_pressed = false;
        if self.suppress_toggle {
            self.suppress_toggle = false;
            return;
        }
        if self.open {
            // Pad confirm commits the hovered row.
            if let Some(h) = self.hovered_index {
                self.select(h);
            }
            self.close_popup();
        } else {
            self.open_popup();
        }
    }

    fn on_cancel(&mut self, _ctx: &mut Ctx, _id: WidgetId, pressed: bool) -> bool {
        if pressed {
            self.is_pressed = false;
            self.press.set_time(self.press.duration());
        }
        if self.open {
            self.close_popup();
            return true;
        }
        false
    }

    fn on_focus(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.focused = true;
    }

    fn on_blur(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.focused = false;
        self.is_pressed = false;
        self.press.set_time(self.press.duration());
        self.close_popup();
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
            Tint::WHITE,
        )?;
        if self.focused {
            r.draw_box(
                self.style.button_frame_focus,
                rect,
                self.style.frame_corner_size,
                Tint::WHITE,
            )?;
        }
        let flash = self.press.current_value();
        if flash > 0.0 {
            r.draw_box(
                self.style.button_frame_pressed,
                rect,
                self.style.frame_corner_size,
                Tint::WHITE.alpha(flash),
            )?;
        }
        let inner = rect.inner(tree.padding(id));
        if let Some(v) = self.selected_value() {
            r.draw_text(
                self.style.medium_font,
                v,
                Point::new(inner.left(), inner.center().y - self.line_height / 2),
                self.style.default_text_color,
            )?;
        }
        r.draw_texture(
            self.style.drop_down_arrow,
            Point::new(
                rect.right() - self.style.drop_down_arrow_width,
                inner.center().y - self.line_height / 2,
            ),
            Tint::WHITE,
        )
    }

    /// The popup overlay, drawn in the focused post-pass so it composites
    /// above every other widget.
    fn draw_focused(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        let padding = tree.padding(id);
        r.draw_box(
            self.style.grid_frame,
            self.popup,
            self.style.frame_corner_size,
            Tint::WHITE,
        )?;
        let area = self.row_area(padding);
        r.with_scissor(area, |r| {
            let end = (self.scroll_offset + MAX_LINES).min(self.values.len());
            for i in self.scroll_offset..end {
                let row = Rect::new(
                    area.left(),
                    area.top() + (i - self.scroll_offset) as i32 * LINE_HEIGHT,
                    area.w,
                    LINE_HEIGHT,
                );
                if self.hovered_index == Some(i) {
                    r.draw_box(
                        self.style.grid_box_frame_hover,
                        row,
                        self.style.grid_box_frame_corner_size,
                        Tint::WHITE,
                    )?;
                }
                r.draw_text(
                    self.style.medium_font,
                    &self.values[i],
                    Point::new(row.left(), row.center().y - self.line_height / 2),
                    self.style.default_text_color,
                )?;
            }
            Ok(())
        })
    }
}
