use std::any::Any;

use crate::{
    error::Result,
    event::{Key, WHEEL_STEP},
    geom::{Direction, Expanse, Padding, Point, Rect},
    render::{Render, TextureId, Tint},
    style::Style,
    tree::{Tree, WidgetId},
    widget::{Ctx, Outcome, Widget, WidgetName, draw_widget, layout_widget},
};

/// Rows scrolled per wheel detent.
const WHEEL_ROWS: i32 = 3;

/// Geometry shared by a tree view and its nodes.
#[derive(Debug, Clone, Copy)]
pub struct TreeViewCfg {
    /// Height of one row.
    pub node_height: i32,
    /// Vertical gap between rows.
    pub node_spacing: i32,
    /// Indent per nesting level.
    pub branch_width: i32,
}

impl Default for TreeViewCfg {
    fn default() -> Self {
        TreeViewCfg {
            node_height: 40,
            node_spacing: 0,
            branch_width: 25,
        }
    }
}

/// One row of a [`TreeView`]. Nodes nest arbitrarily; a collapsed node hides
/// its whole subtree and summarizes the hidden count in its label.
pub struct TreeNode {
    style: Style,
    cfg: TreeViewCfg,
    text: String,
    icon: Option<TextureId>,
    collapsed: bool,
    /// Present the node as a container even while it has no children.
    display_as_container: bool,
    /// Number of widgets in this node's subtree, kept current by the
    /// descendant notifications.
    contained_count: usize,

    text_width: i32,
    line_height: i32,
}

impl TreeNode {
    pub fn new(style: Style, cfg: TreeViewCfg, text: &str) -> Self {
        TreeNode {
            style,
            cfg,
            text: text.into(),
            icon: None,
            collapsed: false,
            display_as_container: false,
            contained_count: 0,
            text_width: 0,
            line_height: 0,
        }
    }

    pub fn with_icon(mut self, icon: TextureId) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn container(mut self) -> Self {
        self.display_as_container = true;
        self
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_collapsed(tree: &mut Tree, id: WidgetId, collapsed: bool) -> Result<()> {
        tree.widget_mut::<TreeNode>(id)?.collapsed = collapsed;
        tree.request_layout();
        Ok(())
    }

    fn is_container(&self, tree: &Tree, id: WidgetId) -> bool {
        self.display_as_container || !tree.children(id).is_empty()
    }

    fn label(&self) -> String {
        if self.collapsed && self.contained_count > 0 {
            format!("{} ({})", self.text, self.contained_count)
        } else {
            self.text.clone()
        }
    }

    /// The owning tree view, for selection and hover state.
    fn owner<'t>(&self, tree: &'t Tree, id: WidgetId) -> Option<(&'t TreeView, WidgetId)> {
        for anc in tree.ancestors(id) {
            if let Some(tv) = tree.widget(anc).and_then(|w| w.as_any().downcast_ref()) {
                return Some((tv, anc));
            }
        }
        None
    }
}

impl Widget for TreeNode {
    fn name(&self) -> WidgetName {
        WidgetName::convert("tree_node")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_descendant_added(&mut self, _tree: &mut Tree, _id: WidgetId, _descendant: WidgetId) {
        self.contained_count += 1;
    }

    fn on_descendant_removed(&mut self, _tree: &mut Tree, _id: WidgetId, _descendant: WidgetId) {
        self.contained_count = self.contained_count.saturating_sub(1);
    }

    fn measure(&mut self, ctx: &mut Ctx, id: WidgetId) -> Expanse {
        let font = self.style.medium_font;
        self.text_width = ctx.metrics.text_width(font, &self.label());
        self.line_height = ctx.metrics.line_height(font);
        let mut w = self.cfg.branch_width + self.text_width;
        let mut h = self.cfg.node_height;
        if !self.collapsed {
            for c in ctx.tree.children(id) {
                let sz = ctx.tree.content_size(c);
                h += self.cfg.node_spacing + sz.h;
                w = w.max(self.cfg.branch_width + sz.w);
            }
        }
        Expanse::new(w, h)
    }

    fn layout(&mut self, ctx: &mut Ctx, id: WidgetId, rect: Rect) -> Result<()> {
        ctx.tree.set_layout_rect(id, rect);
        // Only the label row is hittable; descendants own their own rows.
        ctx.tree
            .set_hit_box(id, Rect::new(rect.left(), rect.top(), rect.w, self.cfg.node_height));
        let mut y = rect.top() + self.cfg.node_height + self.cfg.node_spacing;
        for c in ctx.tree.children(id) {
            if self.collapsed {
                // A hidden subtree gets an empty rectangle, so nothing in it
                // can be hit.
                layout_widget(ctx, c, Rect::ZERO)?;
            } else {
                let h = ctx.tree.content_size(c).h;
                layout_widget(
                    ctx,
                    c,
                    Rect::new(rect.left() + self.cfg.branch_width, y, rect.w - self.cfg.branch_width, h),
                )?;
                y += h + self.cfg.node_spacing;
            }
        }
        Ok(())
    }

    fn draw(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        let row = tree.hit_box(id);
        if let Some((tv, _)) = self.owner(tree, id) {
            if tv.selected() == Some(id) {
                r.draw_box(
                    self.style.grid_box_frame_selected,
                    row,
                    self.style.grid_box_frame_corner_size,
                    Tint::WHITE,
                )?;
            } else if tv.hovered_node() == Some(id) {
                r.draw_box(
                    self.style.grid_box_frame_hover,
                    row,
                    self.style.grid_box_frame_corner_size,
                    Tint::WHITE,
                )?;
            }
        }
        let last = tree
            .parent(id)
            .map(|p| tree.children(p).last() == Some(&id))
            .unwrap_or(true);
        let branch = if last {
            self.style.tree_branch_last
        } else {
            self.style.tree_branch
        };
        r.draw_texture(branch, row.tl, Tint::WHITE)?;
        if self.is_container(tree, id) {
            let toggle = if self.collapsed {
                self.style.tree_branch_closed
            } else if tree.children(id).is_empty() {
                self.style.tree_branch_open_empty
            } else {
                self.style.tree_branch_open
            };
            r.draw_texture(toggle, row.tl, Tint::WHITE)?;
        }
        let mut x = row.left() + self.cfg.branch_width;
        if let Some(icon) = self.icon {
            r.draw_texture(icon, Point::new(x, row.top()), Tint::WHITE)?;
            x += self.cfg.node_height;
        }
        r.draw_text(
            self.style.medium_font,
            &self.label(),
            Point::new(x, row.center().y - self.line_height / 2),
            self.style.default_text_color,
        )?;
        if !self.collapsed {
            for c in tree.children(id) {
                draw_widget(tree, c, r)?;
            }
        }
        Ok(())
    }
}

/// A scrollable view over a subtree of [`TreeNode`]s. The view claims all
/// pointer hits in its rectangle and resolves rows itself, so nodes never
/// interact with the screen directly.
pub struct TreeView {
    style: Style,
    cfg: TreeViewCfg,
    on_activate: Option<Box<dyn FnMut(WidgetId)>>,

    selected: Option<WidgetId>,
    hovered_node: Option<WidgetId>,
    /// Row pressed on, armed until release resolves the click.
    armed: Option<WidgetId>,
    scroll_offset: i32,
    scroll_max: i32,
    focused: bool,
}

impl TreeView {
    pub fn new(style: Style, cfg: TreeViewCfg) -> Self {
        TreeView {
            style,
            cfg,
            on_activate: None,
            selected: None,
            hovered_node: None,
            armed: None,
            scroll_offset: 0,
            scroll_max: 0,
            focused: false,
        }
    }

    /// Handler fired when a row is double-clicked.
    pub fn on_activate(mut self, f: impl FnMut(WidgetId) + 'static) -> Self {
        self.on_activate = Some(Box::new(f));
        self
    }

    pub fn selected(&self) -> Option<WidgetId> {
        self.selected
    }

    pub fn hovered_node(&self) -> Option<WidgetId> {
        self.hovered_node
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    pub fn select(tree: &mut Tree, id: WidgetId, node: Option<WidgetId>) -> Result<()> {
        tree.widget_mut::<TreeView>(id)?.selected = node;
        Ok(())
    }

    fn row_step(&self) -> i32 {
        self.cfg.node_height + self.cfg.node_spacing
    }

    /// All nodes with a visible row, top to bottom, honoring collapse state.
    fn visible_nodes(&self, tree: &Tree, id: WidgetId) -> Vec<WidgetId> {
        fn walk(tree: &Tree, id: WidgetId, out: &mut Vec<WidgetId>) {
            for c in tree.children(id) {
                out.push(c);
                let collapsed = tree
                    .widget(c)
                    .and_then(|w| w.as_any().downcast_ref::<TreeNode>())
                    .is_some_and(|n| n.collapsed);
                if !collapsed {
                    walk(tree, c, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(tree, id, &mut out);
        out
    }

    /// The node whose row is under a point, if any.
    fn node_at(&self, tree: &Tree, id: WidgetId, p: Point) -> Option<WidgetId> {
        let inner = tree.layout_rect(id).inner(tree.padding(id));
        if !inner.contains_point(p) {
            return None;
        }
        let rel = p.y - inner.top() + self.scroll_offset;
        // Integer division truncates toward zero, so the guard has to be
        // explicit.
        if rel < 0 {
            return None;
        }
        let row = (rel / self.row_step()) as usize;
        self.visible_nodes(tree, id).get(row).copied()
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.clamp(0, self.scroll_max);
    }

    fn move_selection(&mut self, tree: &Tree, id: WidgetId, step: i32) {
        let visible = self.visible_nodes(tree, id);
        if visible.is_empty() {
            return;
        }
        let cur = self
            .selected
            .and_then(|s| visible.iter().position(|v| *v == s));
        let next = match cur {
            Some(i) => (i as i32 + step).clamp(0, visible.len() as i32 - 1) as usize,
            None => 0,
        };
        self.selected = Some(visible[next]);
        // Keep the selection in view.
        let top = next as i32 * self.row_step();
        if top < self.scroll_offset {
            self.scroll_offset = top;
        }
        let inner_h = tree.layout_rect(id).inner(tree.padding(id)).h;
        if top + self.cfg.node_height > self.scroll_offset + inner_h {
            self.scroll_offset = top + self.cfg.node_height - inner_h;
        }
        self.clamp_scroll();
    }
}

impl Widget for TreeView {
    fn name(&self) -> WidgetName {
        WidgetName::convert("tree_view")
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

    fn accepts_double_click(&self) -> bool {
        true
    }

    fn default_padding(&self) -> Padding {
        Padding::uniform(10)
    }

    fn measure(&mut self, ctx: &mut Ctx, id: WidgetId) -> Expanse {
        // The view is a scrolling viewport; it takes whatever rectangle its
        // parent assigns.
        let p = ctx.tree.padding(id);
        Expanse::new(p.horizontal(), p.vertical())
    }

    fn layout(&mut self, ctx: &mut Ctx, id: WidgetId, rect: Rect) -> Result<()> {
        ctx.tree.set_layout_rect(id, rect);
        ctx.tree.set_hit_box(id, rect);
        let inner = rect.inner(ctx.tree.padding(id));
        let children = ctx.tree.children(id);
        let total: i32 = children
            .iter()
            .map(|c| ctx.tree.content_size(*c).h + self.cfg.node_spacing)
            .sum();
        self.scroll_max = (total - inner.h).max(0);
        self.clamp_scroll();
        let mut y = inner.top() - self.scroll_offset;
        for c in children {
            let h = ctx.tree.content_size(c).h;
            layout_widget(ctx, c, Rect::new(inner.left(), y, inner.w, h))?;
            y += h + self.cfg.node_spacing;
        }
        Ok(())
    }

    /// The view resolves rows itself; nodes are never hit directly.
    fn hit_test(&self, tree: &Tree, id: WidgetId, p: Point) -> Option<WidgetId> {
        tree.hit_box(id).contains_point(p).then_some(id)
    }

    fn on_mouse_enter(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point) {
        self.hovered_node = self.node_at(ctx.tree, id, p);
    }

    fn on_mouse_move(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point) {
        self.hovered_node = self.node_at(ctx.tree, id, p);
    }

    fn on_mouse_out(&mut self, _ctx: &mut Ctx, _id: WidgetId, _p: Point) {
        self.hovered_node = None;
    }

    fn on_mouse_down(
        &mut self,
        ctx: &mut Ctx,
        id: WidgetId,
        p: Point,
        _btn: crate::event::PointerButton,
    ) {
        self.armed = self.node_at(ctx.tree, id, p);
    }

    fn on_mouse_up(
        &mut self,
        ctx: &mut Ctx,
        id: WidgetId,
        p: Point,
        btn: crate::event::PointerButton,
    ) {
        if btn != crate::event::PointerButton::Left {
            return;
        }
        let armed = self.armed.take();
        let Some(n) = self.node_at(ctx.tree, id, p) else {
            return;
        };
        if armed != Some(n) {
            return;
        }
        let container = ctx
            .tree
            .widget(n)
            .and_then(|w| w.as_any().downcast_ref::<TreeNode>())
            .is_some_and(|node| node.is_container(ctx.tree, n));
        if container {
            let collapsed = ctx
                .tree
                .widget_ref::<TreeNode>(n)
                .map(|node| node.collapsed)
                .unwrap_or(false);
            let _ = TreeNode::set_collapsed(ctx.tree, n, !collapsed);
        } else {
            self.selected = Some(n);
        }
    }

    fn on_double_click(&mut self, ctx: &mut Ctx, id: WidgetId, p: Point) {
        if let Some(n) = self.node_at(ctx.tree, id, p) {
            self.selected = Some(n);
            if let Some(f) = self.on_activate.as_mut() {
                f(n);
            }
        }
    }

    fn on_mouse_wheel(&mut self, ctx: &mut Ctx, _id: WidgetId, _p: Point, delta: i32) {
        self.scroll_offset -= delta / WHEEL_STEP * WHEEL_ROWS * self.row_step();
        self.clamp_scroll();
        ctx.request_layout();
    }

    fn on_key(&mut self, ctx: &mut Ctx, id: WidgetId, k: Key) -> Outcome {
        match k {
            Key::Up => {
                self.move_selection(ctx.tree, id, -1);
                ctx.request_layout();
                Outcome::Handle
            }
            Key::Down => {
                self.move_selection(ctx.tree, id, 1);
                ctx.request_layout();
                Outcome::Handle
            }
            _ => Outcome::Ignore,
        }
    }

    fn on_pad_move(&mut self, ctx: &mut Ctx, id: WidgetId, dir: Direction) -> Outcome {
        match dir {
            Direction::Up => {
                self.move_selection(ctx.tree, id, -1);
                ctx.request_layout();
                Outcome::Handle
            }
            Direction::Down => {
                self.move_selection(ctx.tree, id, 1);
                ctx.request_layout();
                Outcome::Handle
            }
            _ => Outcome::Ignore,
        }
    }

    fn on_activate_up(&mut self, ctx: &mut Ctx, _id: WidgetId) {
        // Pad confirm activates the selection.
        if let Some(n) = self.selected
            && ctx.tree.contains(n)
            && let Some(f) = self.on_activate.as_mut()
        {
            f(n);
        }
    }

    fn on_focus(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.focused = true;
    }

    fn on_blur(&mut self, _ctx: &mut Ctx, _id: WidgetId) {
        self.focused = false;
        self.armed = None;
    }

    fn draw(&self, tree: &Tree, id: WidgetId, r: &mut Render) -> Result<()> {
        let rect = tree.layout_rect(id);
        r.draw_box(
            self.style.grid_frame,
            rect,
            self.style.frame_corner_size,
            Tint::WHITE,
        )?;
        if self.focused {
            r.draw_box(
                self.style.grid_box_frame_focus,
                rect,
                self.style.frame_corner_size,
                Tint::WHITE,
            )?;
        }
        // Rows outside the viewport are clipped, not skipped.
        let inner = rect.inner(tree.padding(id));
        r.with_scissor(inner, |r| {
            for c in tree.children(id) {
                draw_widget(tree, c, r)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerButton;
    use crate::screen::Screen;
    use crate::tutils::FixedMetrics;

    /// A view with the structure:
    ///   a
    ///   b
    ///     b0
    ///     b1
    ///   c
    fn tree_screen() -> (Screen, WidgetId, Vec<WidgetId>) {
        let style = Style::default();
        let cfg = TreeViewCfg::default();
        let mut s = Screen::new(
            Box::new(TreeView::new(style.clone(), cfg)),
            Expanse::new(300, 300),
            Box::new(FixedMetrics::default()),
        );
        let tv = s.tree().root();
        let node = |s: &mut Screen, parent, text: &str| {
            s.tree_mut()
                .attach(parent, Box::new(TreeNode::new(style.clone(), cfg, text)))
                .unwrap()
        };
        let a = node(&mut s, tv, "a");
        let b = node(&mut s, tv, "b");
        let b0 = node(&mut s, b, "b0");
        let b1 = node(&mut s, b, "b1");
        let c = node(&mut s, tv, "c");
        (s, tv, vec![a, b, b0, b1, c])
    }

    /// Pointer position over a visible row. Rows are 40 high starting after
    /// the 10px padding.
    fn row_point(row: i32) -> Point {
        Point::new(100, 10 + row * 40 + 20)
    }

    #[test]
    fn visible_rows_follow_collapse() -> Result<()> {
        let (mut s, tv, n) = tree_screen();
        s.relayout()?;
        // Expanded: rows are a, b, b0, b1, c.
        s.pointer_moved(row_point(3))?;
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.hovered_node(), Some(n[3]));
        TreeNode::set_collapsed(s.tree_mut(), n[1], true)?;
        // Collapsed: rows are a, b, c, and row 3 is empty.
        s.pointer_moved(row_point(2))?;
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.hovered_node(), Some(n[4]));
        s.pointer_moved(row_point(3))?;
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.hovered_node(), None);
        Ok(())
    }

    #[test]
    fn click_selects_leaf() -> Result<()> {
        let (mut s, tv, n) = tree_screen();
        s.relayout()?;
        s.pointer_down(row_point(0), PointerButton::Left)?;
        s.pointer_up(row_point(0), PointerButton::Left)?;
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.selected(), Some(n[0]));
        Ok(())
    }

    #[test]
    fn click_toggles_container() -> Result<()> {
        let (mut s, tv, n) = tree_screen();
        s.relayout()?;
        s.pointer_down(row_point(1), PointerButton::Left)?;
        s.pointer_up(row_point(1), PointerButton::Left)?;
        assert!(s.tree().widget_ref::<TreeNode>(n[1])?.is_collapsed());
        // The container toggles instead of selecting.
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.selected(), None);
        s.pointer_down(row_point(1), PointerButton::Left)?;
        s.pointer_up(row_point(1), PointerButton::Left)?;
        assert!(!s.tree().widget_ref::<TreeNode>(n[1])?.is_collapsed());
        Ok(())
    }

    #[test]
    fn collapsed_label_counts_subtree() -> Result<()> {
        let (mut s, _, n) = tree_screen();
        TreeNode::set_collapsed(s.tree_mut(), n[1], true)?;
        assert_eq!(s.tree().widget_ref::<TreeNode>(n[1])?.label(), "b (2)");
        let root = s.tree().parent(n[2]).unwrap();
        s.tree_mut().remove(root, n[2])?;
        assert_eq!(s.tree().widget_ref::<TreeNode>(n[1])?.label(), "b (1)");
        Ok(())
    }

    #[test]
    fn collapsed_subtree_is_unhittable() -> Result<()> {
        let (mut s, _, n) = tree_screen();
        TreeNode::set_collapsed(s.tree_mut(), n[1], true)?;
        s.relayout()?;
        assert!(s.tree().hit_box(n[2]).is_empty());
        assert!(s.tree().hit_box(n[3]).is_empty());
        Ok(())
    }

    #[test]
    fn double_click_activates() -> Result<()> {
        use std::cell::Cell;
        use std::rc::Rc;
        let hit = Rc::new(Cell::new(None));
        let h2 = hit.clone();
        let style = Style::default();
        let cfg = TreeViewCfg::default();
        let mut s = Screen::new(
            Box::new(
                TreeView::new(style.clone(), cfg).on_activate(move |n| h2.set(Some(n))),
            ),
            Expanse::new(300, 300),
            Box::new(FixedMetrics::default()),
        );
        let tv = s.tree().root();
        let a = s
            .tree_mut()
            .attach(tv, Box::new(TreeNode::new(style, cfg, "a")))
            .unwrap();
        s.relayout()?;
        let p = row_point(0);
        s.pointer_down(p, PointerButton::Left)?;
        s.pointer_up(p, PointerButton::Left)?;
        s.pointer_down(p, PointerButton::Left)?;
        s.pointer_up(p, PointerButton::Left)?;
        assert_eq!(hit.get(), Some(a));
        Ok(())
    }

    #[test]
    fn wheel_scrolls_and_clamps() -> Result<()> {
        let style = Style::default();
        let cfg = TreeViewCfg::default();
        let mut s = Screen::new(
            Box::new(TreeView::new(style.clone(), cfg)),
            Expanse::new(300, 100),
            Box::new(FixedMetrics::default()),
        );
        let tv = s.tree().root();
        for i in 0..10 {
            s.tree_mut()
                .attach(tv, Box::new(TreeNode::new(style.clone(), cfg, &format!("n{i}"))))
                .unwrap();
        }
        s.relayout()?;
        // 10 rows of 40 in an 80-high interior: max scroll is 320.
        let p = Point::new(100, 50);
        s.wheel(p, -120)?;
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.scroll_offset(), 120);
        for _ in 0..5 {
            s.wheel(p, -120)?;
        }
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.scroll_offset(), 320);
        s.wheel(p, 1200)?;
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.scroll_offset(), 0);
        Ok(())
    }

    #[test]
    fn keys_move_selection() -> Result<()> {
        let (mut s, tv, n) = tree_screen();
        s.relayout()?;
        s.focus(tv)?;
        s.key(Key::Down)?;
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.selected(), Some(n[0]));
        s.key(Key::Down)?;
        s.key(Key::Down)?;
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.selected(), Some(n[2]));
        s.key(Key::Up)?;
        assert_eq!(s.tree().widget_ref::<TreeView>(tv)?.selected(), Some(n[1]));
        Ok(())
    }
}
