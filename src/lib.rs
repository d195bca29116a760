mod anim;
mod render;
mod screen;
mod tree;
mod widget;

pub mod backend;
pub mod error;
pub mod event;
pub mod geom;
pub mod style;
pub mod tutils;
pub mod widgets;

pub use anim::{AnimatedValue, Ease};
pub use error::{Error, Result};
pub use render::{FontId, Render, RenderBackend, TextureId, Tint};
pub use screen::Screen;
pub use style::{Style, TextMetrics};
pub use tree::{Tree, WidgetId};
pub use widget::{
    Ctx, Outcome, Widget, WidgetName, draw_widget, hit_test_widget, layout_widget, measure_widget,
};
