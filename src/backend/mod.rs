//! Render backend implementations. The engine only ever talks to the
//! [`RenderBackend`](crate::render::RenderBackend) trait; these are the
//! stand-ins shipped with the crate.

mod dummy;
pub mod test;

pub use dummy::Dummy;
