//! Placeholder shapes shown while the example screen loads.

use engine_core::{Color, Painter, Size};

use crate::animation::Animator;
use crate::layout::{Column, Content, Padded, RoundedBox};
use crate::shimmer::{ShimmerConfig, ShimmerOverlay};

pub const CARD_PADDING: f32 = 16.0;
pub const CARD_SPACING: f32 = 16.0;
pub const HERO_HEIGHT: f32 = 200.0;
pub const HERO_RADIUS: f32 = 10.0;
pub const LINE_COUNT: usize = 3;
pub const LINE_HEIGHT: f32 = 20.0;
pub const LINE_RADIUS: f32 = 5.0;
pub const LINE_SPACING: f32 = 8.0;

/// Grey at 30 % opacity.
pub fn placeholder_fill() -> Color {
    Color::from_srgba(142, 142, 147, 0.3)
}

/// System blue.
pub fn shimmer_blue() -> Color {
    Color::rgba(0, 122, 255, 255)
}

/// One 200-high block above three text lines, each shape with its own sweep.
pub struct SkeletonCard {
    hero: ShimmerOverlay<RoundedBox>,
    lines: Vec<ShimmerOverlay<RoundedBox>>,
}

impl Default for SkeletonCard {
    fn default() -> Self {
        Self::new(ShimmerConfig::default().with_color(shimmer_blue()))
    }
}

impl SkeletonCard {
    pub fn new(config: ShimmerConfig) -> Self {
        let shape = |height, radius| {
            ShimmerOverlay::from_config(
                config.clone(),
                RoundedBox::new(height, radius, placeholder_fill()),
            )
        };
        Self {
            hero: shape(HERO_HEIGHT, HERO_RADIUS),
            lines: (0..LINE_COUNT)
                .map(|_| shape(LINE_HEIGHT, LINE_RADIUS))
                .collect(),
        }
    }

    pub fn overlays(&self) -> impl Iterator<Item = &ShimmerOverlay<RoundedBox>> {
        std::iter::once(&self.hero).chain(self.lines.iter())
    }

    fn overlays_mut(&mut self) -> impl Iterator<Item = &mut ShimmerOverlay<RoundedBox>> {
        std::iter::once(&mut self.hero).chain(self.lines.iter_mut())
    }

    pub fn mount<A: Animator + ?Sized>(&mut self, animator: &mut A) {
        for overlay in self.overlays_mut() {
            overlay.mount(animator);
        }
    }

    pub fn unmount<A: Animator + ?Sized>(&mut self, animator: &mut A) {
        for overlay in self.overlays_mut() {
            overlay.unmount(animator);
        }
    }

    fn lines_height(&self) -> f32 {
        let n = self.lines.len() as f32;
        if n == 0.0 {
            0.0
        } else {
            n * LINE_HEIGHT + (n - 1.0) * LINE_SPACING
        }
    }
}

impl Content for SkeletonCard {
    fn measure(&self, available: Size) -> Size {
        let inner = HERO_HEIGHT + CARD_SPACING + self.lines_height();
        Size::new(available.w.max(0.0), inner + 2.0 * CARD_PADDING)
    }

    fn paint(&self, painter: &mut Painter, origin: [f32; 2], available: Size) {
        let x = origin[0] + CARD_PADDING;
        let inner = Size::new((available.w - 2.0 * CARD_PADDING).max(0.0), available.h);

        let mut y = origin[1] + CARD_PADDING;
        self.hero.paint(painter, [x, y], inner);
        y += HERO_HEIGHT + CARD_SPACING;

        for line in &self.lines {
            line.paint(painter, [x, y], inner);
            y += LINE_HEIGHT + LINE_SPACING;
        }
    }
}

/// A single sweep over a padded stack of three rounded lines.
pub type ShimmerPlaceholder = ShimmerOverlay<Padded<Column>>;

pub fn shimmer_placeholder(color: Color) -> ShimmerPlaceholder {
    let lines = (0..LINE_COUNT).fold(Column::new(10.0), |column, _| {
        column.push(RoundedBox::new(LINE_HEIGHT, 10.0, placeholder_fill()))
    });
    ShimmerOverlay::new(Padded::new(CARD_PADDING, lines)).with_color(color)
}
