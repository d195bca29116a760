//! The draw context handed to widgets. Wraps a [`RenderBackend`] and manages
//! the scissor stack so clipping always nests and always unwinds.

use crate::{
    error::{Error, Result},
    geom::{Point, Rect},
};

/// A handle to a texture the backend has loaded. Opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A handle to a font the backend has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// An RGBA color multiplier applied to draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Tint {
    pub const WHITE: Tint = Tint {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Tint { r, g, b, a: 1.0 }
    }

    /// This tint with its alpha replaced.
    pub fn alpha(&self, a: f32) -> Tint {
        Tint { a, ..*self }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Tint::WHITE
    }
}

/// The interface the engine draws through. Implementations translate these
/// calls to a real renderer; tests substitute a recording backend.
pub trait RenderBackend {
    /// Draw a nine-sliced box: corners of `corner_size` pixels drawn
    /// unscaled, edges and center stretched to fill `rect`.
    fn draw_box(&mut self, tex: TextureId, rect: Rect, corner_size: i32, tint: Tint) -> Result<()>;

    /// Draw a texture at its natural size.
    fn draw_texture(&mut self, tex: TextureId, pos: Point, tint: Tint) -> Result<()>;

    /// Draw a single line of text with its baseline-left origin at `pos`.
    fn draw_text(&mut self, font: FontId, text: &str, pos: Point, tint: Tint) -> Result<()>;

    /// Replace the active scissor rectangle. `None` disables clipping.
    fn set_scissor(&mut self, rect: Option<Rect>) -> Result<()>;
}

/// The per-frame draw context. Holds the scissor stack; widgets clip through
/// [`Render::with_scissor`] and can't unbalance the stack.
pub struct Render<'a> {
    backend: &'a mut dyn RenderBackend,
    scissors: Vec<Rect>,
    viewport: Rect,
}

impl<'a> Render<'a> {
    pub fn new(backend: &'a mut dyn RenderBackend, viewport: Rect) -> Self {
        Render {
            backend,
            scissors: vec![],
            viewport,
        }
    }

    pub fn draw_box(
        &mut self,
        tex: TextureId,
        rect: Rect,
        corner_size: i32,
        tint: Tint,
    ) -> Result<()> {
        self.backend.draw_box(tex, rect, corner_size, tint)
    }

    pub fn draw_texture(&mut self, tex: TextureId, pos: Point, tint: Tint) -> Result<()> {
        self.backend.draw_texture(tex, pos, tint)
    }

    pub fn draw_text(&mut self, font: FontId, text: &str, pos: Point, tint: Tint) -> Result<()> {
        self.backend.draw_text(font, text, pos, tint)
    }

    /// Run a draw closure with a scissor rectangle pushed. The effective
    /// scissor is the intersection with any enclosing scissor, so nested
    /// clips only ever narrow. The pop happens on every exit path, including
    /// an error return from the closure.
    pub fn with_scissor(
        &mut self,
        rect: Rect,
        f: impl FnOnce(&mut Render) -> Result<()>,
    ) -> Result<()> {
        let clipped = match self.scissors.last() {
            Some(top) => top.intersect(rect),
            None => self.viewport.intersect(rect),
        };
        self.scissors.push(clipped);
        self.backend.set_scissor(Some(clipped))?;
        let mut this = scopeguard::guard(self, |r| {
            r.scissors.pop();
            // Restoration failures can't propagate out of the guard; the
            // draw pass surfaces its own error first.
            let _ = r.backend.set_scissor(r.scissors.last().copied());
        });
        f(&mut **this)
    }

    /// The number of scissors currently pushed. Zero outside of any
    /// [`Render::with_scissor`] call.
    pub fn scissor_depth(&self) -> usize {
        self.scissors.len()
    }

    /// Verify the scissor stack has fully unwound at the end of a frame.
    pub(crate) fn check_balanced(&self) -> Result<()> {
        if self.scissors.is_empty() {
            Ok(())
        } else {
            Err(Error::Render(format!(
                "scissor stack unbalanced: {} left",
                self.scissors.len()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test::TestRender;

    #[test]
    fn scissor_nesting_narrows() -> Result<()> {
        let (_, mut be) = TestRender::create();
        let mut r = Render::new(&mut be, Rect::new(0, 0, 100, 100));
        r.with_scissor(Rect::new(10, 10, 50, 50), |r| {
            assert_eq!(r.scissor_depth(), 1);
            r.with_scissor(Rect::new(0, 0, 20, 20), |r| {
                assert_eq!(r.scissor_depth(), 2);
                Ok(())
            })
        })?;
        assert_eq!(r.scissor_depth(), 0);
        r.check_balanced()
    }

    #[test]
    fn scissor_pops_on_error() {
        let (_, mut be) = TestRender::create();
        let mut r = Render::new(&mut be, Rect::new(0, 0, 100, 100));
        let res = r.with_scissor(Rect::new(0, 0, 10, 10), |_| {
            Err(Error::Render("draw failed".into()))
        });
        assert!(res.is_err());
        assert_eq!(r.scissor_depth(), 0);
        assert!(r.check_balanced().is_ok());
    }
}
