//! The widget arena. Widgets are owned by the tree and referred to by
//! [`WidgetId`] handles; parent links and the screen's focus/hover/press
//! references are plain ids, so a destroyed widget shows up as a lookup miss
//! rather than a dangling reference.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    error::{Error, Result},
    geom::{Expanse, Padding, Rect},
    widget::Widget,
};

/// A unique handle for a widget in the tree. Ids are never reused, so a held
/// id for a destroyed widget can't alias a later widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(u64);

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-widget state owned by the engine rather than the widget behavior:
/// tree links and the geometry produced by the layout passes.
struct Node {
    /// Taken out during dispatch so hooks can borrow the tree mutably.
    widget: Option<Box<dyn Widget>>,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    layout_rect: Rect,
    hit_box: Rect,
    content_size: Expanse,
    padding: Padding,
}

/// The widget tree for one screen.
pub struct Tree {
    nodes: HashMap<u64, Node>,
    next_id: u64,
    root: WidgetId,
    needs_layout: bool,
    pending_updates: Vec<WidgetId>,
}

impl Tree {
    pub fn new(root: Box<dyn Widget>) -> Self {
        let padding = root.default_padding();
        let mut nodes = HashMap::new();
        nodes.insert(
            0,
            Node {
                widget: Some(root),
                parent: None,
                children: Vec::new(),
                layout_rect: Rect::ZERO,
                hit_box: Rect::ZERO,
                content_size: Expanse::ZERO,
                padding,
            },
        );
        Tree {
            nodes,
            next_id: 1,
            root: WidgetId(0),
            needs_layout: true,
            pending_updates: Vec::new(),
        }
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(&id.0)
    }

    /// The number of widgets in the tree. Always at least 1; the root cannot
    /// be removed.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Attach a widget as the last child of `parent`, transferring ownership
    /// to the tree. Ancestors that track aggregate counts are notified
    /// inline, and a layout pass is scheduled.
    pub fn attach(&mut self, parent: WidgetId, widget: Box<dyn Widget>) -> Result<WidgetId> {
        if !self.contains(parent) {
            return Err(Error::Tree(format!("attach: no such parent {parent}")));
        }
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        let padding = widget.default_padding();
        self.nodes.insert(
            id.0,
            Node {
                widget: Some(widget),
                parent: Some(parent),
                children: Vec::new(),
                layout_rect: Rect::ZERO,
                hit_box: Rect::ZERO,
                content_size: Expanse::ZERO,
                padding,
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent.0) {
            p.children.push(id);
        }
        debug!("attach {} under {}", id, parent);
        // The parent itself tracks counts too, so walk from the new node.
        for anc in self.ancestors(id) {
            self.with_node_widget(anc, |w, t| w.on_descendant_added(t, anc, id));
        }
        self.needs_layout = true;
        Ok(id)
    }

    /// Detach `id` from `parent` and destroy its whole subtree. The claimed
    /// parent must actually be the widget's parent; anything else is a
    /// programming error and fails fast.
    pub fn remove(&mut self, parent: WidgetId, id: WidgetId) -> Result<()> {
        let node = self
            .nodes
            .get(&id.0)
            .ok_or_else(|| Error::Tree(format!("remove: no such widget {id}")))?;
        if node.parent != Some(parent) {
            return Err(Error::Tree(format!("remove: {id} is not a child of {parent}")));
        }
        if let Some(p) = self.nodes.get_mut(&parent.0) {
            p.children.retain(|c| *c != id);
        }
        let doomed = self.preorder(id);
        for d in &doomed {
            self.nodes.remove(&d.0);
        }
        self.pending_updates.retain(|u| !doomed.contains(u));
        debug!("remove {} ({} widgets) from {}", id, doomed.len(), parent);
        let ancestors = {
            let mut v = vec![parent];
            v.extend(self.ancestors(parent));
            v
        };
        for anc in ancestors {
            for d in &doomed {
                let d = *d;
                self.with_node_widget(anc, |w, t| w.on_descendant_removed(t, anc, d));
            }
        }
        self.needs_layout = true;
        Ok(())
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(&id.0).and_then(|n| n.parent)
    }

    /// The widget's children, in back-to-front draw order. Returns an owned
    /// vector so callers can mutate the tree while iterating.
    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.nodes
            .get(&id.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn child(&self, id: WidgetId, n: usize) -> Option<WidgetId> {
        self.nodes.get(&id.0).and_then(|nd| nd.children.get(n).copied())
    }

    /// The chain of ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent(p);
        }
        out
    }

    /// All ids in the subtree under `id`, parents before children.
    pub fn preorder(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if !self.contains(cur) {
                continue;
            }
            out.push(cur);
            let children = self.children(cur);
            for c in children.into_iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    pub fn layout_rect(&self, id: WidgetId) -> Rect {
        self.nodes.get(&id.0).map(|n| n.layout_rect).unwrap_or_default()
    }

    pub fn hit_box(&self, id: WidgetId) -> Rect {
        self.nodes.get(&id.0).map(|n| n.hit_box).unwrap_or_default()
    }

    pub fn content_size(&self, id: WidgetId) -> Expanse {
        self.nodes.get(&id.0).map(|n| n.content_size).unwrap_or_default()
    }

    pub fn padding(&self, id: WidgetId) -> Padding {
        self.nodes.get(&id.0).map(|n| n.padding).unwrap_or_default()
    }

    /// Record the rectangle a parent assigned during layout. Only meaningful
    /// from within a [`Widget::layout`] implementation.
    pub fn set_layout_rect(&mut self, id: WidgetId, r: Rect) {
        if let Some(n) = self.nodes.get_mut(&id.0) {
            n.layout_rect = r;
        }
    }

    pub fn set_hit_box(&mut self, id: WidgetId, r: Rect) {
        if let Some(n) = self.nodes.get_mut(&id.0) {
            n.hit_box = r;
        }
    }

    pub fn set_padding(&mut self, id: WidgetId, p: Padding) {
        if let Some(n) = self.nodes.get_mut(&id.0) {
            n.padding = p;
            self.needs_layout = true;
        }
    }

    pub(crate) fn set_content_size(&mut self, id: WidgetId, sz: Expanse) {
        if let Some(n) = self.nodes.get_mut(&id.0) {
            n.content_size = sz;
        }
    }

    /// Schedule a full measurement + layout pass before the next hit-test,
    /// update or draw. Any mutation that can change a content size must call
    /// this, directly or via [`crate::widget::Ctx::request_layout`].
    pub fn request_layout(&mut self) {
        self.needs_layout = true;
    }

    pub(crate) fn layout_pending(&self) -> bool {
        self.needs_layout
    }

    pub(crate) fn clear_layout_flag(&mut self) {
        self.needs_layout = false;
    }

    /// Put a widget on the screen's update list for per-frame ticks.
    pub fn request_update(&mut self, id: WidgetId) {
        if !self.pending_updates.contains(&id) {
            self.pending_updates.push(id);
        }
    }

    pub(crate) fn drain_updates(&mut self) -> Vec<WidgetId> {
        std::mem::take(&mut self.pending_updates)
    }

    /// Immutable access to a widget's behavior.
    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.nodes.get(&id.0).and_then(|n| n.widget.as_deref())
    }

    /// Downcast access to a concrete widget type, for mutation APIs like
    /// `Label::set_text`.
    pub fn widget_ref<T: Widget>(&self, id: WidgetId) -> Result<&T> {
        self.widget(id)
            .and_then(|w| w.as_any().downcast_ref::<T>())
            .ok_or_else(|| Error::Tree(format!("no widget of requested type at {id}")))
    }

    pub fn widget_mut<T: Widget>(&mut self, id: WidgetId) -> Result<&mut T> {
        self.nodes
            .get_mut(&id.0)
            .and_then(|n| n.widget.as_deref_mut())
            .and_then(|w| w.as_any_mut().downcast_mut::<T>())
            .ok_or_else(|| Error::Tree(format!("no widget of requested type at {id}")))
    }

    pub(crate) fn take_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.nodes.get_mut(&id.0).and_then(|n| n.widget.take())
    }

    pub(crate) fn put_widget(&mut self, id: WidgetId, w: Box<dyn Widget>) {
        // The node may have been removed while its widget was out for
        // dispatch; the widget is dropped in that case.
        if let Some(n) = self.nodes.get_mut(&id.0) {
            n.widget = Some(w);
        }
    }

    /// Run a closure against a widget's behavior with the tree borrowable,
    /// by temporarily lifting the behavior out of its node. Re-entrant
    /// dispatch to the same widget is a no-op.
    fn with_node_widget<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut Tree) -> R,
    ) -> Option<R> {
        let mut w = self.take_widget(id)?;
        let r = f(w.as_mut(), self);
        self.put_widget(id, w);
        Some(r)
    }

    /// Verify the bidirectional parent/child invariant over the whole tree.
    pub fn check_consistency(&self) -> Result<()> {
        for (raw, node) in &self.nodes {
            let id = WidgetId(*raw);
            for c in &node.children {
                let child = self
                    .nodes
                    .get(&c.0)
                    .ok_or_else(|| Error::Tree(format!("{id} lists missing child {c}")))?;
                if child.parent != Some(id) {
                    return Err(Error::Tree(format!("{c} does not point back at {id}")));
                }
                if node.children.iter().filter(|x| **x == *c).count() != 1 {
                    return Err(Error::Tree(format!("{id} lists {c} more than once")));
                }
            }
            if let Some(p) = node.parent {
                let parent = self
                    .nodes
                    .get(&p.0)
                    .ok_or_else(|| Error::Tree(format!("{id} has missing parent {p}")))?;
                if !parent.children.contains(&id) {
                    return Err(Error::Tree(format!("{p} does not list child {id}")));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutils::TLeaf;

    #[test]
    fn attach_remove() -> Result<()> {
        let mut t = Tree::new(Box::new(TLeaf::new("r")));
        let a = t.attach(t.root(), Box::new(TLeaf::new("a")))?;
        let b = t.attach(a, Box::new(TLeaf::new("b")))?;
        let c = t.attach(a, Box::new(TLeaf::new("c")))?;
        t.check_consistency()?;
        assert_eq!(t.children(a), vec![b, c]);
        assert_eq!(t.parent(b), Some(a));
        assert_eq!(t.len(), 4);

        // Removing a subtree destroys all of it.
        t.remove(t.root(), a)?;
        assert!(!t.contains(a));
        assert!(!t.contains(b));
        assert!(!t.contains(c));
        assert_eq!(t.len(), 1);
        t.check_consistency()?;
        Ok(())
    }

    #[test]
    fn bad_mutations_fail_fast() -> Result<()> {
        let mut t = Tree::new(Box::new(TLeaf::new("r")));
        let a = t.attach(t.root(), Box::new(TLeaf::new("a")))?;
        let b = t.attach(a, Box::new(TLeaf::new("b")))?;

        // Detaching with the wrong claimed parent is an error, and mutates
        // nothing.
        assert!(matches!(t.remove(t.root(), b), Err(Error::Tree(_))));
        assert!(t.contains(b));
        t.check_consistency()?;

        // Attaching under a destroyed parent is an error.
        t.remove(t.root(), a)?;
        assert!(matches!(
            t.attach(a, Box::new(TLeaf::new("x"))),
            Err(Error::Tree(_))
        ));
        Ok(())
    }

    #[test]
    fn attach_notifies_parent_and_ancestors() -> Result<()> {
        use crate::tutils::{get_state, reset_state};
        let mut t = Tree::new(Box::new(TLeaf::new("r")));
        let a = t.attach(t.root(), Box::new(TLeaf::new("a")))?;
        reset_state();
        let b = t.attach(a, Box::new(TLeaf::new("b")))?;
        // Nearest first, starting at the direct parent.
        assert_eq!(get_state(), vec!["a@added", "r@added"]);
        reset_state();
        t.remove(a, b)?;
        assert_eq!(get_state(), vec!["a@removed", "r@removed"]);
        Ok(())
    }

    #[test]
    fn preorder_order() -> Result<()> {
        let mut t = Tree::new(Box::new(TLeaf::new("r")));
        let a = t.attach(t.root(), Box::new(TLeaf::new("a")))?;
        let b = t.attach(t.root(), Box::new(TLeaf::new("b")))?;
        let aa = t.attach(a, Box::new(TLeaf::new("aa")))?;
        assert_eq!(t.preorder(t.root()), vec![t.root(), a, aa, b]);
        Ok(())
    }

    #[test]
    fn stale_ids_are_lookup_misses() -> Result<()> {
        let mut t = Tree::new(Box::new(TLeaf::new("r")));
        let a = t.attach(t.root(), Box::new(TLeaf::new("a")))?;
        t.remove(t.root(), a)?;
        assert!(!t.contains(a));
        assert_eq!(t.layout_rect(a), Rect::ZERO);
        assert!(t.widget(a).is_none());
        // Ids are not reused.
        let b = t.attach(t.root(), Box::new(TLeaf::new("b")))?;
        assert_ne!(a, b);
        Ok(())
    }
}
