use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Travel direction of the highlight band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShimmerDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

/// Edge midpoints used as gradient anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Right,
    Top,
    Bottom,
}

impl Anchor {
    /// Position in unit space, (0,0) top-left to (1,1) bottom-right.
    pub fn unit(self) -> [f32; 2] {
        match self {
            Self::Left => [0.0, 0.5],
            Self::Right => [1.0, 0.5],
            Self::Top => [0.5, 0.0],
            Self::Bottom => [0.5, 1.0],
        }
    }
}

impl ShimmerDirection {
    pub const ALL: [Self; 4] = [
        Self::LeftToRight,
        Self::RightToLeft,
        Self::TopToBottom,
        Self::BottomToTop,
    ];

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    /// Gradient start and end anchors.
    pub fn anchors(self) -> (Anchor, Anchor) {
        match self {
            Self::LeftToRight => (Anchor::Left, Anchor::Right),
            Self::RightToLeft => (Anchor::Right, Anchor::Left),
            Self::TopToBottom => (Anchor::Top, Anchor::Bottom),
            Self::BottomToTop => (Anchor::Bottom, Anchor::Top),
        }
    }

    /// +1 when travel follows the positive axis, -1 otherwise.
    pub fn sign(self) -> f32 {
        match self {
            Self::LeftToRight | Self::TopToBottom => 1.0,
            Self::RightToLeft | Self::BottomToTop => -1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LeftToRight => "left-to-right",
            Self::RightToLeft => "right-to-left",
            Self::TopToBottom => "top-to-bottom",
            Self::BottomToTop => "bottom-to-top",
        }
    }
}

impl fmt::Display for ShimmerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown shimmer direction {0:?}; expected left-to-right, right-to-left, top-to-bottom or bottom-to-top")]
pub struct ParseDirectionError(pub String);

impl FromStr for ShimmerDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        match key.as_str() {
            "left-to-right" | "lefttoright" | "ltr" => Ok(Self::LeftToRight),
            "right-to-left" | "righttoleft" | "rtl" => Ok(Self::RightToLeft),
            "top-to-bottom" | "toptobottom" | "ttb" => Ok(Self::TopToBottom),
            "bottom-to-top" | "bottomtotop" | "btt" => Ok(Self::BottomToTop),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Which extent scales the mask offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TravelExtent {
    /// The overlay's own measured size.
    #[default]
    Bounds,
    /// The whole rendering surface.
    Viewport,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown travel extent {0:?}; expected bounds or viewport")]
pub struct ParseExtentError(pub String);

impl FromStr for TravelExtent {
    type Err = ParseExtentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bounds" => Ok(Self::Bounds),
            "viewport" | "screen" => Ok(Self::Viewport),
            _ => Err(ParseExtentError(s.to_string())),
        }
    }
}
