//! Pure functions describing the sweep: gradient, rotation and offset.

use engine_core::{Color, LinearGradient, Rect, Size, Transform2D};

use super::direction::{Anchor, ShimmerDirection};

/// Opacity applied to the tint at the centre stop.
pub const HIGHLIGHT_OPACITY: f32 = 0.5;

/// The mask is drawn this much larger than the content so its edges never show.
pub const MASK_SCALE: f32 = 2.0;

/// Three-stop gradient expressed with unit-space anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct ShimmerGradient {
    pub start: Anchor,
    pub end: Anchor,
    pub stops: [(f32, Color); 3],
}

impl ShimmerGradient {
    /// Place the anchors on `bounds`.
    pub fn resolve(&self, bounds: Rect) -> LinearGradient {
        LinearGradient {
            start: bounds.unit_point(self.start.unit()),
            end: bounds.unit_point(self.end.unit()),
            stops: self.stops.to_vec(),
        }
    }
}

/// transparent -> `color` at half opacity -> transparent, anchored per direction.
pub fn gradient(direction: ShimmerDirection, color: Color) -> ShimmerGradient {
    let (start, end) = direction.anchors();
    ShimmerGradient {
        start,
        end,
        stops: [
            (0.0, Color::TRANSPARENT),
            (0.5, color.with_opacity(HIGHLIGHT_OPACITY)),
            (1.0, Color::TRANSPARENT),
        ],
    }
}

pub fn mask_rotation_deg(direction: ShimmerDirection) -> f32 {
    if direction.is_vertical() { 90.0 } else { 0.0 }
}

/// Offset of the mask for `position` along the travel axis; the other axis stays 0.
pub fn mask_offset(direction: ShimmerDirection, position: f32, extent: Size) -> [f32; 2] {
    let travel = direction.sign() * position;
    if direction.is_horizontal() {
        [travel * extent.w, 0.0]
    } else {
        [0.0, travel * extent.h]
    }
}

/// Scale and rotate about the centre of `bounds`, then translate by the offset.
pub fn mask_transform(
    direction: ShimmerDirection,
    position: f32,
    bounds: Rect,
    extent: Size,
) -> Transform2D {
    let local = Transform2D::rotate_deg(mask_rotation_deg(direction))
        .concat(Transform2D::scale(MASK_SCALE, MASK_SCALE))
        .about(bounds.center());
    let [dx, dy] = mask_offset(direction, position, extent);
    Transform2D::translate(dx, dy).concat(local)
}
