use crate::{
    error::Result,
    geom::{Point, Rect},
    render::{FontId, RenderBackend, TextureId, Tint},
};

/// A backend that discards all draw calls. Useful for headless embeddings
/// that run the tree without presenting it.
#[derive(Debug, Default)]
pub struct Dummy {}

impl Dummy {
    pub fn new() -> Self {
        Dummy {}
    }
}

impl RenderBackend for Dummy {
    fn draw_box(&mut self, _tex: TextureId, _rect: Rect, _corner: i32, _tint: Tint) -> Result<()> {
        Ok(())
    }

    fn draw_texture(&mut self, _tex: TextureId, _pos: Point, _tint: Tint) -> Result<()> {
        Ok(())
    }

    fn draw_text(&mut self, _font: FontId, _text: &str, _pos: Point, _tint: Tint) -> Result<()> {
        Ok(())
    }

    fn set_scissor(&mut self, _rect: Option<Rect>) -> Result<()> {
        Ok(())
    }
}
