//! The widget capability interface. Every concrete control implements
//! [`Widget`], overriding only the hooks it needs; layout and input dispatch
//! depend on nothing but this trait.

use std::any::Any;

use convert_case::{Case, Casing};

use crate::{
    error::{Error, Result},
    event::{Key, PointerButton},
    geom::{Direction, Expanse, Padding, Point, Rect},
    render::Render,
    style::TextMetrics,
    tree::{Tree, WidgetId},
};

/// Whether a hook consumed an event. Ignored events fall through to the
/// screen's default behavior (e.g. directional focus movement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handle,
    Ignore,
}

impl Outcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handle)
    }
}

pub fn valid_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// A widget kind name: lowercase ASCII alphanumerics plus underscores. Used
/// for debugging, logging and test assertions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetName {
    name: String,
}

impl WidgetName {
    /// Munge an arbitrary string into a valid widget name by snake-casing it
    /// and dropping invalid characters.
    pub fn convert(name: &str) -> Self {
        let name = name.to_case(Case::Snake);
        WidgetName {
            name: name.chars().filter(|c| valid_name_char(*c)).collect(),
        }
    }
}

impl std::fmt::Display for WidgetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl TryFrom<&str> for WidgetName {
    type Error = Error;
    fn try_from(name: &str) -> Result<Self> {
        if !name.chars().all(valid_name_char) {
            return Err(Error::Tree(format!("invalid widget name: {name}")));
        }
        Ok(WidgetName { name: name.into() })
    }
}

impl PartialEq<&str> for WidgetName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

/// The context passed to widget hooks: mutable access to the tree, the text
/// metrics collaborator, and a place to request layout/update work from the
/// screen.
pub struct Ctx<'a> {
    pub tree: &'a mut Tree,
    pub metrics: &'a dyn TextMetrics,
}

impl Ctx<'_> {
    /// Schedule a measurement + layout pass. Must be called after any
    /// mutation that can change a content size.
    pub fn request_layout(&mut self) {
        self.tree.request_layout();
    }

    /// Register a widget for per-frame update ticks, e.g. to drive an
    /// animation or blink a caret.
    pub fn request_update(&mut self, id: WidgetId) {
        self.tree.request_update(id);
    }
}

/// A node behavior in the widget tree. All hooks default to no-ops; the
/// engine state a widget doesn't own (geometry, tree links) lives in the
/// [`Tree`] and is addressed through the widget's id.
#[allow(unused_variables)]
pub trait Widget: Any {
    /// The kind name of this widget, for logs and tests.
    fn name(&self) -> WidgetName;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Can this widget take focus? The default implementation returns false.
    fn can_focus(&self) -> bool {
        false
    }

    /// Does this widget want double-click events?
    fn accepts_double_click(&self) -> bool {
        false
    }

    /// The padding a freshly attached widget starts with.
    fn default_padding(&self) -> Padding {
        Padding::ZERO
    }

    /// Compute this widget's minimum natural size. Runs bottom-up: children
    /// have already been measured, and their content sizes can be read from
    /// the tree. The result must be a function of the widget's own data and
    /// its children's content sizes, never of a previously assigned layout
    /// rectangle.
    fn measure(&mut self, ctx: &mut Ctx, id: WidgetId) -> Expanse {
        let mut sz = Expanse::ZERO;
        for c in ctx.tree.children(id) {
            sz = sz.max(ctx.tree.content_size(c));
        }
        let p = ctx.tree.padding(id);
        Expanse::new(sz.w + p.horizontal(), sz.h + p.vertical())
    }

    /// Distribute an assigned rectangle: record the layout rect, derive the
    /// hit box, and partition the rectangle among children. Pure geometry -
    /// must be idempotent and must not touch content sizes. The default
    /// implementation assigns the padded interior to every child.
    fn layout(&mut self, ctx: &mut Ctx, id: WidgetId, rect: Rect) -> Result<()> {
        ctx.tree.set_layout_rect(id, rect);
        ctx.tree.set_hit_box(id, rect);
        let inner = rect.inner(ctx.tree.padding(id));
        for c in ctx.tree.children(id) {
            layout_widget(ctx, c, inner)?;
        }
        Ok(())
    }

    /// Find the widget under a point. The default queries children in
    /// front-to-back order (reverse of draw order) and falls back to the own
    /// hit box. Overlay widgets override this to claim hits that would
    /// otherwise land on siblings beneath them.
    fn hit_test(&self, tree: &Tree, id: WidgetId, p: Point) -> Option<WidgetId> {
        for c in tree.children(id).into_iter().rev() {
            if let Some(hit) = hit_test_widget(tree, c, p) {
                return Some(hit);
            }
        }
        tree.hit_box(id).contains_point(p).then_some(id)
    }

    fn on_mouse_enter(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point) {}

    fn on_mouse_out(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point) {}

    fn on_mouse_move(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point) {}

    fn on_mouse_down(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point, btn: PointerButton) {}

    fn on_mouse_up(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point, btn: PointerButton) {}

    fn on_double_click(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point) {}

    /// Wheel input, in raw platform units (±[`crate::event::WHEEL_STEP`] per
    /// detent). Delivered to the widget under the pointer.
    fn on_mouse_wheel(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point, delta: i32) {}

    /// Key input. Only delivered to the focused widget. Returning
    /// [`Outcome::Ignore`] lets the screen apply default handling (Tab moves
    /// focus).
    fn on_key(&mut self, ctx: &mut Ctx, id: WidgetId, k: Key) -> Outcome {
        Outcome::Ignore
    }

    /// Gamepad directional input while focused. Returning
    /// [`Outcome::Ignore`] falls back to moving focus in that direction.
    fn on_pad_move(&mut self, ctx: &mut Ctx, id: WidgetId, dir: Direction) -> Outcome {
        Outcome::Ignore
    }

    /// The press phase of an activation cycle began (pointer-down inside the
    /// hit box, or gamepad confirm while focused).
    fn on_activate_down(&mut self, ctx: &mut Ctx, id: WidgetId) {}

    /// The activation committed: pointer released inside the hit box, or
    /// gamepad confirm released. This is where the widget's primary effect
    /// happens.
    fn on_activate_up(&mut self, ctx: &mut Ctx, id: WidgetId) {}

    /// An external event would discard an in-progress interaction.
    /// `pressed` is true when the widget is mid-press. Return true to claim
    /// the cancel (close/revert without losing focus); false to decline.
    fn on_cancel(&mut self, ctx: &mut Ctx, id: WidgetId, pressed: bool) -> bool {
        false
    }

    fn on_focus(&mut self, ctx: &mut Ctx, id: WidgetId) {}

    /// Focus left this widget. No further input will arrive, so any open or
    /// pressed sub-state must be reset here.
    fn on_blur(&mut self, ctx: &mut Ctx, id: WidgetId) {}

    /// A widget was attached somewhere in this widget's subtree. Used by
    /// containers that track aggregate counts.
    fn on_descendant_added(&mut self, tree: &mut Tree, id: WidgetId, descendant: WidgetId) {}

    fn on_descendant_removed(&mut self, tree: &mut Tree, id: WidgetId, descendant: WidgetId) {}

    /// Per-frame tick, only called while the widget is on the update list.
    /// Return true to stay registered for the next frame.
    fn update(&mut self, ctx: &mut Ctx, id: WidgetId, dt: f32) -> bool {
        false
    }

    /// Draw this widget. The default draws children in order, so later
    /// children composite on top of earlier ones.
    fn draw(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        for c in tree.children(id) {
            draw_widget(tree, c, r)?;
        }
        Ok(())
    }

    /// An extra draw pass for the focused widget, after the whole tree has
    /// drawn. Overlays (an open drop-down's popup) render here so they
    /// composite above everything.
    fn draw_focused(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        Ok(())
    }
}

/// Dispatch a closure to a widget's behavior with the tree accessible
/// through the context. Returns None for stale ids.
pub(crate) fn dispatch<R>(
    ctx: &mut Ctx,
    id: WidgetId,
    f: impl FnOnce(&mut dyn Widget, &mut Ctx) -> R,
) -> Option<R> {
    let mut w = ctx.tree.take_widget(id)?;
    let r = {
        let mut inner = Ctx {
            tree: &mut *ctx.tree,
            metrics: ctx.metrics,
        };
        f(w.as_mut(), &mut inner)
    };
    ctx.tree.put_widget(id, w);
    Some(r)
}

/// Run the bottom-up measurement pass over a subtree, storing each widget's
/// content size in the tree.
pub fn measure_widget(ctx: &mut Ctx, id: WidgetId) -> Expanse {
    for c in ctx.tree.children(id) {
        measure_widget(ctx, c);
    }
    let sz = dispatch(ctx, id, |w, ctx| w.measure(ctx, id)).unwrap_or(Expanse::ZERO);
    ctx.tree.set_content_size(id, sz);
    sz
}

/// Run the top-down rectangle-assignment pass over a subtree.
pub fn layout_widget(ctx: &mut Ctx, id: WidgetId, rect: Rect) -> Result<()> {
    dispatch(ctx, id, |w, ctx| w.layout(ctx, id, rect)).unwrap_or(Ok(()))
}

/// Hit-test a subtree.
pub fn hit_test_widget(tree: &Tree, id: WidgetId, p: Point) -> Option<WidgetId> {
    tree.widget(id)?.hit_test(tree, id, p)
}

/// Draw a subtree.
pub fn draw_widget(tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
    match tree.widget(id) {
        Some(w) => w.draw(tree, id, r),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() -> Result<()> {
        assert_eq!(WidgetName::try_from("foo").unwrap(), "foo");
        assert!(WidgetName::try_from("Foo").is_err());
        assert_eq!(WidgetName::convert("DropDownBox"), "drop_down_box");
        assert_eq!(WidgetName::convert("Tree View"), "tree_view");
        Ok(())
    }
}
