use std::sync::{Arc, Mutex};

use crate::{
    error::Result,
    geom::{Point, Rect},
    render::{FontId, RenderBackend, TextureId, Tint},
};

/// A handle to the recorded output of a test render.
#[derive(Default)]
pub struct TestBuf {
    /// One line per draw call, in issue order.
    pub ops: Vec<String>,
    /// Number of scissor changes issued, including restores.
    pub scissor_sets: usize,
    /// The scissor in effect after the last change.
    pub scissor: Option<Rect>,
}

impl TestBuf {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// A render backend for testing, which logs draw calls as strings.
pub struct TestRender {
    pub buf: Arc<Mutex<TestBuf>>,
}

impl TestRender {
    /// Create returns a `TestBuf` protected by a mutex, and a `TestRender`
    /// instance. The `TestBuf` can be used to inspect the result of the
    /// render for testing.
    pub fn create() -> (Arc<Mutex<TestBuf>>, Self) {
        let tb = Arc::new(Mutex::new(TestBuf::default()));
        let tb2 = tb.clone();
        (tb, TestRender { buf: tb2 })
    }

    pub fn ops(&self) -> Vec<String> {
        self.buf.lock().unwrap().ops.clone()
    }

    pub fn buf_empty(&self) -> bool {
        self.buf.lock().unwrap().ops.is_empty()
    }

    /// All text draws, in issue order.
    pub fn texts(&self) -> Vec<String> {
        self.ops()
            .iter()
            .filter_map(|o| o.strip_prefix("text ").map(|s| s.into()))
            .collect()
    }
}

impl RenderBackend for TestRender {
    fn draw_box(&mut self, tex: TextureId, rect: Rect, _corner: i32, _tint: Tint) -> Result<()> {
        self.buf.lock()?.ops.push(format!(
            "box {} {},{} {}x{}",
            tex.0, rect.tl.x, rect.tl.y, rect.w, rect.h
        ));
        Ok(())
    }

    fn draw_texture(&mut self, tex: TextureId, pos: Point, _tint: Tint) -> Result<()> {
        self.buf
            .lock()?
            .ops
            .push(format!("tex {} {},{}", tex.0, pos.x, pos.y));
        Ok(())
    }

    fn draw_text(&mut self, _font: FontId, text: &str, _pos: Point, _tint: Tint) -> Result<()> {
        if !text.is_empty() {
            self.buf.lock()?.ops.push(format!("text {text}"));
        }
        Ok(())
    }

    fn set_scissor(&mut self, rect: Option<Rect>) -> Result<()> {
        let mut buf = self.buf.lock()?;
        buf.scissor_sets += 1;
        buf.scissor = rect;
        Ok(())
    }
}
