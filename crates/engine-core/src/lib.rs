//! engine-core: drawing primitives, display lists and the CPU compositor
//! shared by the scene and the demo.

mod color;
mod display_list;
mod painter;
mod raster;
mod scene;

pub use display_list::*;
pub use painter::*;
pub use raster::{Rasterizer, RasterError, save_png, to_rgba8};
pub use scene::*;

/// Re-export tiny-skia so callers can hold rendered frames without a direct dependency.
pub use tiny_skia;
