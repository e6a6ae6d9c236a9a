//! Demo content: skeleton cards inside a scrolling screen.

mod screen;
mod skeleton;

pub use screen::{
    CARD_COUNT, CARD_GAP, DEFAULT_LOAD_DELAY_SECS, ExampleScreen, LoadState, SCREEN_PADDING,
};
pub use skeleton::{
    CARD_PADDING, CARD_SPACING, HERO_HEIGHT, HERO_RADIUS, LINE_COUNT, LINE_HEIGHT, LINE_RADIUS,
    LINE_SPACING, ShimmerPlaceholder, SkeletonCard, placeholder_fill, shimmer_blue,
    shimmer_placeholder,
};
