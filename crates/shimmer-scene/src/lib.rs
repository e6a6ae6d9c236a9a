//! Shimmer loading overlay.
//!
//! A [`ShimmerOverlay`] wraps placeholder [`Content`] and paints it through a
//! gradient mask that an [`AnimationDriver`] sweeps across the content, over
//! and over, for as long as the overlay is mounted.
//!
//! ```
//! use engine_core::{Color, Painter, Size, Viewport};
//! use shimmer_scene::{AnimationDriver, Content, RoundedBox, ShimmerDirection, ShimmerOverlay};
//!
//! let mut driver = AnimationDriver::new();
//! let mut overlay = ShimmerOverlay::new(RoundedBox::new(20.0, 5.0, Color::rgba(128, 128, 128, 77)))
//!     .with_direction(ShimmerDirection::TopToBottom);
//! overlay.mount(&mut driver);
//! driver.tick(1.0 / 60.0);
//!
//! let mut painter = Painter::begin_frame(Viewport { width: 320, height: 240 });
//! overlay.paint(&mut painter, [0.0, 0.0], Size::new(320.0, 240.0));
//! assert_eq!(painter.finish().layer_bounds().len(), 2);
//! ```

pub mod animation;
pub mod example;
pub mod layout;
pub mod shimmer;

pub use animation::{AnimationDriver, AnimationEvent, AnimationId, AnimationSpec, Animator};
pub use example::{ExampleScreen, LoadState, SkeletonCard};
pub use layout::{Column, Content, Padded, RoundedBox};
pub use shimmer::{
    ShimmerConfig, ShimmerDirection, ShimmerOverlay, TravelExtent, gradient, mask_offset,
    mask_rotation_deg, mask_transform,
};
