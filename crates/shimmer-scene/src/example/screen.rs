//! Scrolling list of skeleton cards that turns into loaded content once a
//! one-shot delay expires.

use engine_core::{Brush, Color, Painter, Rect, RoundedRadii, RoundedRect, Size, Transform2D};
use shimmer_config::ShimmerToml;

use super::skeleton::{SkeletonCard, shimmer_blue};
use crate::animation::Animator;
use crate::layout::Content;
use crate::shimmer::{SettingsError, ShimmerConfig};

pub const CARD_COUNT: usize = 10;
/// Gap below every card.
pub const CARD_GAP: f32 = 16.0;
pub const SCREEN_PADDING: f32 = 16.0;
pub const DEFAULT_LOAD_DELAY_SECS: f32 = 100.0;
const LOADED_HEIGHT: f32 = 52.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
}

pub struct ExampleScreen {
    cards: Vec<SkeletonCard>,
    state: LoadState,
    load_delay_secs: f32,
    remaining_secs: Option<f32>,
    scroll_y: f32,
}

impl Default for ExampleScreen {
    fn default() -> Self {
        Self::new(
            ShimmerConfig::default().with_color(shimmer_blue()),
            DEFAULT_LOAD_DELAY_SECS,
        )
    }
}

impl ExampleScreen {
    pub fn new(config: ShimmerConfig, load_delay_secs: f32) -> Self {
        Self {
            cards: (0..CARD_COUNT)
                .map(|_| SkeletonCard::new(config.clone()))
                .collect(),
            state: LoadState::Loading,
            load_delay_secs: load_delay_secs.max(0.0),
            remaining_secs: None,
            scroll_y: 0.0,
        }
    }

    /// Build from a loaded `shimmer.toml`; the tint stays blue unless set.
    pub fn from_settings(settings: &ShimmerToml) -> Result<Self, SettingsError> {
        let mut config = ShimmerConfig::from_settings(&settings.shimmer)?;
        if settings.shimmer.color.is_none() {
            config.color = shimmer_blue();
        }
        Ok(Self::new(config, settings.demo.load_delay_secs))
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn cards(&self) -> &[SkeletonCard] {
        &self.cards
    }

    /// Seconds left before loading completes, once the countdown has started.
    pub fn remaining_delay(&self) -> Option<f32> {
        self.remaining_secs
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_y
    }

    /// Overlays whose sweep is currently running on `animator`.
    pub fn mounted_overlays<A: Animator + ?Sized>(&self, animator: &A) -> usize {
        self.cards
            .iter()
            .flat_map(SkeletonCard::overlays)
            .filter(|o| o.is_mounted(animator))
            .count()
    }

    /// Mount every overlay and start the load countdown the first time.
    pub fn on_appear<A: Animator + ?Sized>(&mut self, animator: &mut A) {
        if self.state != LoadState::Loading {
            return;
        }
        for card in &mut self.cards {
            card.mount(animator);
        }
        if self.remaining_secs.is_none() {
            self.remaining_secs = Some(self.load_delay_secs);
            log::debug!("loading started, content in {:.1}s", self.load_delay_secs);
        }
    }

    /// Count down the load delay. Returns `true` on the frame loading completes.
    pub fn advance<A: Animator + ?Sized>(&mut self, delta_secs: f32, animator: &mut A) -> bool {
        let Some(remaining) = self.remaining_secs.as_mut() else {
            return false;
        };
        if self.state != LoadState::Loading {
            return false;
        }
        *remaining -= delta_secs.max(0.0);
        if *remaining > 0.0 {
            return false;
        }
        *remaining = 0.0;
        self.finish_loading(animator);
        true
    }

    fn finish_loading<A: Animator + ?Sized>(&mut self, animator: &mut A) {
        for card in &mut self.cards {
            card.unmount(animator);
        }
        self.state = LoadState::Loaded;
        self.scroll_y = 0.0;
        log::info!("content loaded");
    }

    /// Height of everything inside the scroll view for a given width.
    pub fn content_height(&self, width: f32) -> f32 {
        let body = match self.state {
            LoadState::Loading => {
                let inner = Size::new((width - 2.0 * SCREEN_PADDING).max(0.0), f32::INFINITY);
                self.cards
                    .iter()
                    .map(|c| c.measure(inner).h + CARD_GAP)
                    .sum::<f32>()
            }
            LoadState::Loaded => LOADED_HEIGHT,
        };
        body + 2.0 * SCREEN_PADDING
    }

    /// Scroll by `dy`, clamped so the content never leaves the viewport.
    pub fn scroll_by(&mut self, dy: f32, viewport: Size) {
        let max = (self.content_height(viewport.w) - viewport.h).max(0.0);
        self.scroll_y = (self.scroll_y + dy).clamp(0.0, max);
        log::trace!("scroll offset {:.1} of {:.1}", self.scroll_y, max);
    }

    pub fn paint(&self, painter: &mut Painter) {
        let viewport = painter.viewport().size();
        painter.push_clip_rect(Rect::new(0.0, 0.0, viewport.w, viewport.h));
        painter.push_transform(Transform2D::translate(0.0, -self.scroll_y));

        let inner = Size::new((viewport.w - 2.0 * SCREEN_PADDING).max(0.0), viewport.h);
        match self.state {
            LoadState::Loading => {
                let visible_top = self.scroll_y;
                let visible_bottom = self.scroll_y + viewport.h;
                let mut y = SCREEN_PADDING;
                for card in &self.cards {
                    let h = card.measure(inner).h;
                    if y + h >= visible_top && y <= visible_bottom {
                        card.paint(painter, [SCREEN_PADDING, y], inner);
                    }
                    y += h + CARD_GAP;
                }
            }
            LoadState::Loaded => {
                let rect = Rect::new(SCREEN_PADDING, SCREEN_PADDING, inner.w, LOADED_HEIGHT);
                painter.rounded_rect(
                    RoundedRect {
                        rect,
                        radii: RoundedRadii::uniform(10.0),
                    },
                    Brush::Solid(Color::from_srgba(52, 199, 89, 1.0)),
                );
            }
        }

        painter.pop_transform();
        painter.pop_clip();
    }
}
