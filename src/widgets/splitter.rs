use std::any::Any;

use crate::{
    error::Result,
    geom::{Direction, Expanse, Point, Rect},
    render::{Render, Tint},
    style::Style,
    tree::{Tree, WidgetId},
    widget::{Ctx, Widget, WidgetName, layout_widget},
};

/// Width of the draggable grip band, straddling the pane boundary.
const GRIP_SIZE: i32 = 10;

/// A two-pane container split along one axis, with a draggable grip between
/// the panes. The direction names the edge the first pane is anchored to;
/// `offset` is the first pane's extent from that edge.
pub struct Splitter {
    style: Style,
    direction: Direction,
    offset: i32,
    first_min: i32,
    second_min: i32,

    dragging: bool,
    drag_offset: i32,
    hovered: bool,
}

impl Splitter {
    pub fn new(style: Style, direction: Direction, offset: i32) -> Self {
        Splitter {
            style,
            direction,
            offset,
            first_min: 100,
            second_min: 100,
            dragging: false,
            drag_offset: 0,
            hovered: false,
        }
    }

    pub fn with_min_sizes(mut self, first: i32, second: i32) -> Self {
        self.first_min = first;
        self.second_min = second;
        self
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn set_offset(tree: &mut Tree, id: WidgetId, offset: i32) -> Result<()> {
        tree.widget_mut::<Splitter>(id)?.offset = offset;
        tree.request_layout();
        Ok(())
    }

    /// The pane extent along the split axis.
    fn extent(&self, rect: Rect) -> i32 {
        if self.direction.is_horizontal() {
            rect.w
        } else {
            rect.h
        }
    }

    /// The pointer coordinate along the split axis, measured from the
    /// anchored edge.
    fn primary(&self, rect: Rect, p: Point) -> i32 {
        match self.direction {
            Direction::Left => p.x - rect.left(),
            Direction::Right => rect.right() - p.x,
            Direction::Up => p.y - rect.top(),
            Direction::Down => rect.bottom() - p.y,
        }
    }

    /// The grip band, straddling the boundary at `offset`.
    fn grip(&self, rect: Rect) -> Rect {
        match self.direction {
            Direction::Left => Rect::new(
                rect.left() + self.offset - GRIP_SIZE / 2,
                rect.top(),
                GRIP_SIZE,
                rect.h,
            ),
            Direction::Right => Rect::new(
                rect.right() - self.offset - GRIP_SIZE / 2,
                rect.top(),
                GRIP_SIZE,
                rect.h,
            ),
            Direction::Up => Rect::new(
                rect.left(),
                rect.top() + self.offset - GRIP_SIZE / 2,
                rect.w,
                GRIP_SIZE,
            ),
            Direction::Down => Rect::new(
                rect.left(),
                rect.bottom() - self.offset - GRIP_SIZE / 2,
                rect.w,
                GRIP_SIZE,
            ),
        }
    }

    fn pane_rects(&self, rect: Rect) -> (Rect, Rect) {
        let o = self.offset;
        match self.direction {
            Direction::Left => (
                Rect::new(rect.left(), rect.top(), o, rect.h),
                Rect::new(rect.left() + o, rect.top(), rect.w - o, rect.h),
            ),
            Direction::Right => (
                Rect::new(rect.right() - o, rect.top(), o, rect.h),
                Rect::new(rect.left(), rect.top(), rect.w - o, rect.h),
            ),
            Direction::Up => (
                Rect::new(rect.left(), rect.top(), rect.w, o),
                Rect::new(rect.left(), rect.top() + o, rect.w, rect.h - o),
            ),
            Direction::Down => (
                Rect::new(rect.left(), rect.bottom() - o, rect.w, o),
                Rect::new(rect.left(), rect.top(), rect.w, rect.h - o),
            ),
        }
    }
}

impl Widget for Splitter {
    fn name(&self) -> WidgetName {
        WidgetName::convert("splitter")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn measure(&mut self, ctx: &mut Ctx, id: WidgetId) -> Expanse {
        let mut along = 0;
        let mut across = 0;
        for c in ctx.tree.children(id) {
            let sz = ctx.tree.content_size(c);
            if self.direction.is_horizontal() {
                along += sz.w;
                across = across.max(sz.h);
            } else {
                along += sz.h;
                across = across.max(sz.w);
            }
        }
        if self.direction.is_horizontal() {
            Expanse::new(along, across)
        } else {
            Expanse::new(across, along)
        }
    }

    fn layout(&mut self, ctx: &mut Ctx, id: WidgetId, rect: Rect) -> Result<()> {
        ctx.tree.set_layout_rect(id, rect);
        // Clamp the offset only when both minimums fit; in a degenerate
        // rectangle the offset is left alone.
        let extent = self.extent(rect);
        if extent > self.first_min + self.second_min {
            self.offset = self.offset.clamp(self.first_min, extent - self.second_min);
        }
        // The grip band is the splitter's own hit surface; the panes cover
        // the rest.
        ctx.tree.set_hit_box(id, self.grip(rect));
        let (first, second) = self.pane_rects(rect);
        let children = ctx.tree.children(id);
        if let Some(a) = children.first() {
            layout_widget(ctx, *a, first)?;
        }
        if let Some(b) = children.get(1) {
            layout_widget(ctx, *b, second)?;
        }
        Ok(())
    }

    /// The grip wins over the panes where they overlap.
    fn hit_test(&self, tree: &Tree, id: WidgetId, p: Point) -> Option<WidgetId> {
        if tree.hit_box(id).contains_point(p) {
            return Some(id);
        }
        for c in tree.children(id).into_iter().rev() {
            if let Some(hit) = crate::widget::hit_test_widget(tree, c, p) {
                return Some(hit);
            }
        }
        None
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
        btn: crate::event::PointerButton,
    ) {
        if btn != crate::event::PointerButton::Left {
            return;
        }
        let rect = ctx.tree.layout_rect(id);
        self.dragging = true;
        self.drag_offset = self.offset - self.primary(rect, p);
    }

    fn on_mouse_move(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point) {
        if self.dragging {
            let rect = ctx.tree.layout_rect(id);
            self.offset = self.primary(rect, p) + self.drag_offset;
            ctx.request_layout();
        }
    }

    fn on_mouse_up(
        &mut self,
        _ctx: &mut Ctx,
        _id: WidgetId,
        _p: Point,
        _btn: crate::event::PointerButton,
    ) {
        self.dragging = false;
    }

    fn draw(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        for c in tree.children(id) {
            crate::widget::draw_widget(tree, c, r)?;
        }
        let tex = if self.dragging || self.hovered {
            self.style.grid_box_frame_hover
        } else {
            self.style.grid_box_frame
        };
        r.draw_box(
            tex,
            tree.hit_box(id),
            self.style.grid_box_frame_corner_size,
            Tint::WHITE,
        )
    }
}
