use engine_core::Color;
use shimmer_config::{ShimmerSettings, is_valid_duration};
use thiserror::Error;

use super::direction::{ParseDirectionError, ParseExtentError, ShimmerDirection, TravelExtent};
use crate::animation::AnimationSpec;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error(transparent)]
    Direction(#[from] ParseDirectionError),
    #[error(transparent)]
    Extent(#[from] ParseExtentError),
    #[error("sweep duration must be a positive number of seconds, got {0}")]
    Duration(f32),
}

/// Appearance and motion of one overlay, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ShimmerConfig {
    pub color: Color,
    pub direction: ShimmerDirection,
    pub animation: AnimationSpec,
    pub extent: TravelExtent,
}

impl Default for ShimmerConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            direction: ShimmerDirection::default(),
            animation: AnimationSpec::shimmer(),
            extent: TravelExtent::default(),
        }
    }
}

impl ShimmerConfig {
    /// Build from the `[shimmer]` table; absent keys keep their defaults.
    pub fn from_settings(settings: &ShimmerSettings) -> Result<Self, SettingsError> {
        let mut config = Self::default();
        if let Some(name) = settings.direction.as_deref() {
            config.direction = name.parse()?;
        }
        if let Some(extent) = settings.extent.as_deref() {
            config.extent = extent.parse()?;
        }
        if let Some(rgba) = settings.color {
            config.color = Color::from_srgba_u8(rgba);
        }
        if !is_valid_duration(settings.duration_secs) {
            return Err(SettingsError::Duration(settings.duration_secs));
        }
        config.animation = config.animation.with_duration(settings.duration_secs);
        Ok(config)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_direction(mut self, direction: ShimmerDirection) -> Self {
        self.direction = direction;
        self
    }
}
