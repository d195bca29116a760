use std::any::Any;
use std::cell::RefCell;

use crate::{
    error::Result,
    event::{Key, PointerButton},
    geom::{Direction, Expanse, Point, Rect},
    render::Render,
    tree::{Tree, WidgetId},
    widget::{Ctx, Outcome, Widget, WidgetName, layout_widget},
};

thread_local! {
    static STATE: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Clear the recorded event log.
pub fn reset_state() {
    STATE.with(|s| s.borrow_mut().clear());
}

/// The recorded event log, in dispatch order. Entries look like
/// `"name@event"`.
pub fn get_state() -> Vec<String> {
    STATE.with(|s| s.borrow().clone())
}

pub fn log_event(name: &str, evt: &str) {
    STATE.with(|s| s.borrow_mut().push(format!("{name}@{evt}")));
}

/// An instrumented leaf widget that logs every hook it receives.
pub struct TLeaf {
    name: String,
    focusable: bool,
    /// Behavior of `on_key` and `on_pad_move`.
    pub handle_input: bool,
    /// Behavior of `on_cancel`.
    pub claim_cancel: bool,
    size: Expanse,
    ticks: u32,
}

impl TLeaf {
    pub fn new(name: &str) -> Self {
        TLeaf {
            name: name.into(),
            focusable: false,
            handle_input: false,
            claim_cancel: false,
            size: Expanse::new(10, 10),
            ticks: 0,
        }
    }

    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    pub fn with_size(mut self, size: Expanse) -> Self {
        self.size = size;
        self
    }

    fn log(&self, evt: &str) {
        log_event(&self.name, evt);
    }
}

impl Widget for TLeaf {
    fn name(&self) -> WidgetName {
        WidgetName::convert(&self.name)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn can_focus(&self) -> bool {
        self.focusable
    }

    fn measure(&mut self, _ctx: &mut Ctx, _id: WidgetId) -> Expanse {
        self.size
    }

    fn on_mouse_enter(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.log("enter");
    }

    fn on_mouse_out(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.log("out");
    }

    fn on_mouse_move(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.log("move");
    }

    fn on_mouse_down(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point, _btn: PointerButton) {
        self.log("down");
    }

    fn on_mouse_up(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point, _btn: PointerButton) {
        self.log("up");
    }

    fn on_mouse_wheel(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point, delta: i32) {
        self.log(&format!("wheel:{delta}"));
    }

    fn on_key(&mut self, _ctx: &mut Ctx, _id: WidgetId, k: Key) -> Outcome {
        self.log(&format!("key:{k:?}"));
        if self.handle_input {
            Outcome::Handle
        } else {
            Outcome::Ignore
        }
    }

    fn on_pad_move(&mut self, _ctx: &mut Ctx, _id: WidgetId, dir: Direction) -> Outcome {
        self.log(&format!("pad:{dir:?}"));
        if self.handle_input {
            Outcome::Handle
        } else {
            Outcome::Ignore
        }
    }

    fn on_activate_down(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.log("activate_down");
    }

    fn on_activate_up(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.log("activate_up");
    }

    fn on_cancel(&mut self, _ctx: &mut Ctx, _id: WidgetId, _pressed: bool) -> bool {
        self.log("cancel");
        self.claim_cancel
    }

    fn on_focus(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.log("focus");
    }

    fn on_blur(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.log("blur");
    }

    fn on_descendant_added(&mut self, _tree: &mut Tree, _id: WidgetId, _descendant: WidgetId) {
        self.log("added");
    }

    fn on_descendant_removed(&mut self, _tree: &mut Tree, _id: WidgetId, _descendant: WidgetId) {
        self.log("removed");
    }

    fn update(&mut self, _ctx: &mut Ctx, _id: WidgetId, _dt: f32) -> bool {
        self.ticks += 1;
        self.log("tick");
        self.ticks < 2
    }

    fn draw(&self, _tree: &Tree, _id: WidgetId, _r: &mut Render) -> Result<()> {
        self.log("draw");
        Ok(())
    }
}

/// A container that splits its rectangle into equal horizontal bands, one
/// per child, in order.
pub struct TSplit {}

impl TSplit {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        TSplit {}
    }
}

impl Widget for TSplit {
    fn name(&self) -> WidgetName {
        WidgetName::convert("t_split")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn layout(&mut self, ctx: &mut Ctx, id: WidgetId, rect: Rect) -> Result<()> {
        ctx.tree.set_layout_rect(id, rect);
        ctx.tree.set_hit_box(id, rect);
        let children = ctx.tree.children(id);
        if children.is_empty() {
            return Ok(());
        }
        let n = children.len() as i32;
        let w = rect.w / n;
        for (i, c) in children.into_iter().enumerate() {
            let r = Rect::new(rect.tl.x + w * i as i32, rect.tl.y, w, rect.h);
            layout_widget(ctx, c, r)?;
        }
        Ok(())
    }
}
