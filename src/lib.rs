//! Shimmer loading overlay for placeholder content.
//!
//! Re-exports the scene crate together with the drawing types needed to
//! paint and rasterise it.

pub use engine_core::{
    Brush, Color, DisplayList, LinearGradient, Painter, RasterError, Rasterizer, Rect, Size,
    Transform2D, Viewport, save_png, to_rgba8,
};
pub use shimmer_scene::*;
