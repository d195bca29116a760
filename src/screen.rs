//! The screen: owns the widget tree and the cross-widget interaction state
//! (focus, hover, press, capture), routes normalized input events, and runs
//! the layout, update and draw passes.

use tracing::debug;

use crate::{
    error::{Error, Result},
    event::{InputSnapshot, Key, KeyTranslator, PadEvent, PointerButton, ascii_translator},
    geom::{Direction, Expanse, Point},
    render::{Render, RenderBackend},
    style::TextMetrics,
    tree::{Tree, WidgetId},
    widget::{self, Ctx, Outcome, draw_widget, hit_test_widget, layout_widget, measure_widget},
};

/// Two left presses on the same widget within this interval are a double
/// click.
const DOUBLE_CLICK_INTERVAL: f32 = 0.35;

/// One screenful of UI. All input enters here, already normalized to
/// discrete events or via [`Screen::process_input`] snapshots.
pub struct Screen {
    tree: Tree,
    metrics: Box<dyn TextMetrics>,
    viewport: Expanse,

    focused: Option<WidgetId>,
    hovered: Option<WidgetId>,
    /// Widget in the press phase of an activation cycle.
    pressed: Option<WidgetId>,
    /// Widget that received the last left pointer-down; it owns pointer
    /// moves and the release until the button goes up.
    captured: Option<WidgetId>,

    update_list: Vec<WidgetId>,
    clock: f32,
    last_click: Option<(WidgetId, f32)>,
    prev_input: InputSnapshot,
    key_translator: Box<KeyTranslator>,
}

impl Screen {
    pub fn new(
        root: Box<dyn crate::widget::Widget>,
        viewport: Expanse,
        metrics: Box<dyn TextMetrics>,
    ) -> Self {
        Screen {
            tree: Tree::new(root),
            metrics,
            viewport,
            focused: None,
            hovered: None,
            pressed: None,
            captured: None,
            update_list: Vec::new(),
            clock: 0.0,
            last_click: None,
            prev_input: InputSnapshot::default(),
            key_translator: Box::new(ascii_translator),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    pub fn pressed(&self) -> Option<WidgetId> {
        self.pressed
    }

    pub fn captured(&self) -> Option<WidgetId> {
        self.captured
    }

    pub fn set_viewport(&mut self, viewport: Expanse) {
        self.viewport = viewport;
        self.tree.request_layout();
    }

    /// Install a raw-key translator for the embedding's keyboard layout.
    pub fn set_key_translator(&mut self, t: Box<KeyTranslator>) {
        self.key_translator = t;
    }

    fn dispatch_to<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn crate::widget::Widget, &mut Ctx) -> R,
    ) -> Option<R> {
        let mut ctx = Ctx {
            tree: &mut self.tree,
            metrics: self.metrics.as_ref(),
        };
        widget::dispatch(&mut ctx, id, f)
    }

    /// Drop interaction references to widgets that no longer exist.
    fn validate_refs(&mut self) {
        if self.focused.is_some_and(|id| !self.tree.contains(id)) {
            self.focused = None;
        }
        if self.hovered.is_some_and(|id| !self.tree.contains(id)) {
            self.hovered = None;
        }
        if self.pressed.is_some_and(|id| !self.tree.contains(id)) {
            self.pressed = None;
        }
        if self.captured.is_some_and(|id| !self.tree.contains(id)) {
            self.captured = None;
        }
        if self.last_click.is_some_and(|(id, _)| !self.tree.contains(id)) {
            self.last_click = None;
        }
        self.update_list.retain(|id| self.tree.contains(*id));
    }

    /// Run a full measurement then layout pass over the tree.
    pub fn relayout(&mut self) -> Result<()> {
        let root = self.tree.root();
        let vp = self.viewport.rect();
        let mut ctx = Ctx {
            tree: &mut self.tree,
            metrics: self.metrics.as_ref(),
        };
        measure_widget(&mut ctx, root);
        layout_widget(&mut ctx, root, vp)?;
        self.tree.clear_layout_flag();
        Ok(())
    }

    /// Relayout only if a pass is pending. All geometry consumers go through
    /// here, so hit-testing and drawing never see stale rectangles.
    fn ensure_layout(&mut self) -> Result<()> {
        self.validate_refs();
        if self.tree.layout_pending() {
            self.relayout()?;
        }
        Ok(())
    }

    /// The widget under a point, front-to-back.
    pub fn hit_test(&mut self, p: Point) -> Result<Option<WidgetId>> {
        self.ensure_layout()?;
        Ok(hit_test_widget(&self.tree, self.tree.root(), p))
    }

    /// Move focus to a widget. The previous holder is blurred before the new
    /// holder is focused, so at most one widget ever observes itself as
    /// focused.
    pub fn focus(&mut self, id: WidgetId) -> Result<()> {
        if self.focused == Some(id) {
            return Ok(());
        }
        if !self.tree.contains(id) {
            return Err(Error::Focus(format!("focus: no such widget {id}")));
        }
        if !self.tree.widget(id).is_some_and(|w| w.can_focus()) {
            return Err(Error::Focus(format!("focus: {id} is not focusable")));
        }
        if let Some(old) = self.focused.take() {
            self.dispatch_to(old, |w, ctx| w.on_blur(ctx, old));
        }
        debug!("focus {}", id);
        self.focused = Some(id);
        self.dispatch_to(id, |w, ctx| w.on_focus(ctx, id));
        Ok(())
    }

    /// Clear focus, blurring the current holder if any.
    pub fn blur(&mut self) {
        if let Some(old) = self.focused.take() {
            debug!("blur {}", old);
            self.dispatch_to(old, |w, ctx| w.on_blur(ctx, old));
        }
    }

    fn update_hover(&mut self, p: Point) {
        let hit = hit_test_widget(&self.tree, self.tree.root(), p);
        if hit != self.hovered {
            if let Some(old) = self.hovered {
                self.dispatch_to(old, |w, ctx| w.on_mouse_out(ctx, old, p));
            }
            self.hovered = hit;
            if let Some(new) = hit {
                self.dispatch_to(new, |w, ctx| w.on_mouse_enter(ctx, new, p));
            }
        }
    }

    /// The pointer moved. During capture all moves go to the captor and
    /// hover transitions are suppressed.
    pub fn pointer_moved(&mut self, p: Point) -> Result<()> {
        self.ensure_layout()?;
        if let Some(cap) = self.captured {
            self.dispatch_to(cap, |w, ctx| w.on_mouse_move(ctx, cap, p));
            return Ok(());
        }
        self.update_hover(p);
        if let Some(h) = self.hovered {
            self.dispatch_to(h, |w, ctx| w.on_mouse_move(ctx, h, p));
        }
        Ok(())
    }

    /// A pointer button went down.
    pub fn pointer_down(&mut self, p: Point, btn: PointerButton) -> Result<()> {
        self.ensure_layout()?;
        let hit = hit_test_widget(&self.tree, self.tree.root(), p);

        // A press outside the focused widget offers it a cancel first. If it
        // claims the cancel (e.g. an open drop-down closing), the click is
        // swallowed: no focus change, and nothing underneath sees it.
        if btn == PointerButton::Left
            && let Some(f) = self.focused
            && hit != Some(f)
            && self
                .dispatch_to(f, |w, ctx| w.on_cancel(ctx, f, false))
                .unwrap_or(false)
        {
            return Ok(());
        }

        let Some(h) = hit else {
            return Ok(());
        };
        let can_focus = self.tree.widget(h).is_some_and(|w| w.can_focus());
        if btn == PointerButton::Left && can_focus {
            self.focus(h)?;
        }
        self.dispatch_to(h, |w, ctx| w.on_mouse_down(ctx, h, p, btn));
        if btn == PointerButton::Left {
            self.captured = Some(h);
            if can_focus {
                self.pressed = Some(h);
                self.dispatch_to(h, |w, ctx| w.on_activate_down(ctx, h));
            }
            if self.tree.widget(h).is_some_and(|w| w.accepts_double_click()) {
                let now = self.clock;
                match self.last_click {
                    Some((prev, t)) if prev == h && now - t <= DOUBLE_CLICK_INTERVAL => {
                        self.last_click = None;
                        self.dispatch_to(h, |w, ctx| w.on_double_click(ctx, h, p));
                    }
                    _ => self.last_click = Some((h, now)),
                }
            }
        }
        Ok(())
    }

    /// A pointer button went up. Commits or cancels any press in flight,
    /// then releases capture and recomputes hover.
    pub fn pointer_up(&mut self, p: Point, btn: PointerButton) -> Result<()> {
        self.ensure_layout()?;
        let hit = hit_test_widget(&self.tree, self.tree.root(), p);
        let target = self.captured.or(hit);
        if let Some(t) = target {
            self.dispatch_to(t, |w, ctx| w.on_mouse_up(ctx, t, p, btn));
        }
        if btn == PointerButton::Left {
            if let Some(pr) = self.pressed.take() {
                // Layout may have shifted under the press; re-test.
                let hit = hit_test_widget(&self.tree, self.tree.root(), p);
                if hit == Some(pr) {
                    self.dispatch_to(pr, |w, ctx| w.on_activate_up(ctx, pr));
                } else {
                    self.dispatch_to(pr, |w, ctx| w.on_cancel(ctx, pr, true));
                }
            }
            self.captured = None;
            self.update_hover(p);
        }
        Ok(())
    }

    /// Wheel input, in raw platform units. Delivered to the widget under the
    /// pointer.
    pub fn wheel(&mut self, p: Point, delta: i32) -> Result<()> {
        self.ensure_layout()?;
        if let Some(h) = hit_test_widget(&self.tree, self.tree.root(), p) {
            self.dispatch_to(h, |w, ctx| w.on_mouse_wheel(ctx, h, p, delta));
        }
        Ok(())
    }

    /// A logical key press. Delivered to the focused widget; an ignored Tab
    /// moves focus forward.
    pub fn key(&mut self, k: Key) -> Result<()> {
        self.ensure_layout()?;
        let outcome = match self.focused {
            Some(f) => self
                .dispatch_to(f, |w, ctx| w.on_key(ctx, f, k))
                .unwrap_or(Outcome::Ignore),
            None => Outcome::Ignore,
        };
        if outcome == Outcome::Ignore && k == Key::Tab {
            self.focus_next();
        }
        Ok(())
    }

    /// A raw platform key press, run through the installed translator.
    /// Untranslatable keys are dropped.
    pub fn raw_key(&mut self, raw: crate::event::RawKey) -> Result<()> {
        if let Some(k) = (self.key_translator)(raw) {
            self.key(k)?;
        }
        Ok(())
    }

    /// A gamepad event.
    pub fn pad(&mut self, e: PadEvent) -> Result<()> {
        self.ensure_layout()?;
        match e {
            PadEvent::Move(dir) => {
                let outcome = match self.focused {
                    Some(f) => self
                        .dispatch_to(f, |w, ctx| w.on_pad_move(ctx, f, dir))
                        .unwrap_or(Outcome::Ignore),
                    None => Outcome::Ignore,
                };
                if outcome == Outcome::Ignore {
                    self.shift_focus(dir);
                }
            }
            PadEvent::ConfirmDown => {
                if let Some(f) = self.focused {
                    self.pressed = Some(f);
                    self.dispatch_to(f, |w, ctx| w.on_activate_down(ctx, f));
                }
            }
            PadEvent::ConfirmUp => {
                // Pad confirms can't stray off the widget, so release always
                // commits.
                if let Some(pr) = self.pressed.take() {
                    self.dispatch_to(pr, |w, ctx| w.on_activate_up(ctx, pr));
                }
            }
            PadEvent::Cancel => {
                if let Some(f) = self.focused {
                    let pressed = self.pressed == Some(f);
                    let claimed = self
                        .dispatch_to(f, |w, ctx| w.on_cancel(ctx, f, pressed))
                        .unwrap_or(false);
                    if pressed {
                        self.pressed = None;
                    }
                    if !claimed {
                        self.blur();
                    }
                }
            }
        }
        Ok(())
    }

    fn focusable(&self) -> Vec<WidgetId> {
        self.tree
            .preorder(self.tree.root())
            .into_iter()
            .filter(|id| self.tree.widget(*id).is_some_and(|w| w.can_focus()))
            .collect()
    }

    /// Move focus to the next focusable widget in tree order, wrapping.
    pub fn focus_next(&mut self) {
        let f = self.focusable();
        if f.is_empty() {
            return;
        }
        let next = match self.focused.and_then(|c| f.iter().position(|x| *x == c)) {
            Some(i) => f[(i + 1) % f.len()],
            None => f[0],
        };
        let _ = self.focus(next);
    }

    /// Move focus to the previous focusable widget in tree order, wrapping.
    pub fn focus_prev(&mut self) {
        let f = self.focusable();
        if f.is_empty() {
            return;
        }
        let prev = match self.focused.and_then(|c| f.iter().position(|x| *x == c)) {
            Some(i) => f[(i + f.len() - 1) % f.len()],
            None => f[f.len() - 1],
        };
        let _ = self.focus(prev);
    }

    /// Move focus geometrically: the nearest focusable widget whose center
    /// lies in the given direction from the current holder's center.
    pub fn shift_focus(&mut self, dir: Direction) {
        let Some(cur) = self.focused else {
            self.focus_next();
            return;
        };
        let from = self.tree.layout_rect(cur).center();
        let best = self
            .focusable()
            .into_iter()
            .filter(|id| *id != cur)
            .filter_map(|id| {
                let c = self.tree.layout_rect(id).center();
                let (primary, lateral) = match dir {
                    Direction::Up => (from.y - c.y, (c.x - from.x).abs()),
                    Direction::Down => (c.y - from.y, (c.x - from.x).abs()),
                    Direction::Left => (from.x - c.x, (c.y - from.y).abs()),
                    Direction::Right => (c.x - from.x, (c.y - from.y).abs()),
                };
                (primary > 0).then_some((primary, lateral, id))
            })
            .min_by_key(|(primary, lateral, _)| (*primary, *lateral));
        if let Some((_, _, id)) = best {
            let _ = self.focus(id);
        }
    }

    /// Diff an input snapshot against the previous one and emit exactly one
    /// event per physical occurrence.
    pub fn process_input(&mut self, input: &InputSnapshot) -> Result<()> {
        if input.pointer != self.prev_input.pointer {
            self.pointer_moved(input.pointer)?;
        }
        for b in PointerButton::ALL {
            if input.is_down(b) && !self.prev_input.is_down(b) {
                self.pointer_down(input.pointer, b)?;
            }
        }
        if input.wheel != 0 {
            self.wheel(input.pointer, input.wheel)?;
        }
        for raw in &input.keys {
            self.raw_key(*raw)?;
        }
        if input.pad_direction != self.prev_input.pad_direction
            && let Some(d) = input.pad_direction
        {
            self.pad(PadEvent::Move(d))?;
        }
        if input.pad_confirm && !self.prev_input.pad_confirm {
            self.pad(PadEvent::ConfirmDown)?;
        }
        if !input.pad_confirm && self.prev_input.pad_confirm {
            self.pad(PadEvent::ConfirmUp)?;
        }
        for b in PointerButton::ALL {
            if !input.is_down(b) && self.prev_input.is_down(b) {
                self.pointer_up(input.pointer, b)?;
            }
        }
        self.prev_input = input.clone();
        Ok(())
    }

    /// Advance the frame clock and tick every widget on the update list.
    /// Widgets stay registered for as long as their `update` returns true.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        self.clock += dt;
        self.ensure_layout()?;
        for id in self.tree.drain_updates() {
            if !self.update_list.contains(&id) {
                self.update_list.push(id);
            }
        }
        let list = std::mem::take(&mut self.update_list);
        for id in list {
            if !self.tree.contains(id) {
                continue;
            }
            let keep = self
                .dispatch_to(id, |w, ctx| w.update(ctx, id, dt))
                .unwrap_or(false);
            if keep && !self.update_list.contains(&id) {
                self.update_list.push(id);
            }
        }
        // Ticks may have re-registered widgets through the tree.
        for id in self.tree.drain_updates() {
            if !self.update_list.contains(&id) {
                self.update_list.push(id);
            }
        }
        Ok(())
    }

    /// Draw the frame: the whole tree back-to-front, then a focused overlay
    /// pass so popups composite above everything.
    pub fn draw(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        self.ensure_layout()?;
        let mut r = Render::new(backend, self.viewport.rect());
        draw_widget(&self.tree, self.tree.root(), &mut r)?;
        if let Some(f) = self.focused
            && let Some(w) = self.tree.widget(f)
        {
            w.draw_focused(&self.tree, f, &mut r)?;
        }
        r.check_balanced()
    }
}
