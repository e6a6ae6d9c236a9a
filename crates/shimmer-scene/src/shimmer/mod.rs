//! The shimmer overlay and the pure geometry behind its sweep.

mod config;
mod direction;
mod geometry;
mod overlay;

pub use config::{SettingsError, ShimmerConfig};
pub use direction::{
    Anchor, ParseDirectionError, ParseExtentError, ShimmerDirection, TravelExtent,
};
pub use geometry::{
    HIGHLIGHT_OPACITY, MASK_SCALE, ShimmerGradient, gradient, mask_offset, mask_rotation_deg,
    mask_transform,
};
pub use overlay::{ACTIVE_POSITION, REST_POSITION, ShimmerOverlay};
