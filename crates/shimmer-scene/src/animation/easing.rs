//! Timing curves.
//!
//! A curve maps linear progress through one cycle (0.0 to 1.0) to eased
//! progress. The shimmer sweep only needs `Linear`; the CSS-style curves are
//! there for other consumers of the driver.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    #[default]
    Linear,
    /// `cubic-bezier(0.42, 0, 1, 1)`
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`
    EaseInOut,
    /// Custom curve through control points (x1, y1) and (x2, y2).
    /// x values are clamped into [0, 1] when evaluated.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl EasingFunction {
    /// Evaluate the curve. `t` is clamped into [0, 1] first.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::EaseIn => Bezier::new(0.42, 0.0, 1.0, 1.0).y_for_x(t),
            Self::EaseOut => Bezier::new(0.0, 0.0, 0.58, 1.0).y_for_x(t),
            Self::EaseInOut => Bezier::new(0.42, 0.0, 0.58, 1.0).y_for_x(t),
            Self::CubicBezier { x1, y1, x2, y2 } => Bezier::new(x1, y1, x2, y2).y_for_x(t),
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear)
    }
}

/// Cubic bezier from (0,0) to (1,1) with two free control points.
#[derive(Debug, Clone, Copy)]
struct Bezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl Bezier {
    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    // B(s) = 3(1-s)^2 s p1 + 3(1-s) s^2 p2 + s^3
    fn component(p1: f32, p2: f32, s: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    }

    fn dx(&self, s: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * self.x1 + 6.0 * inv * s * (self.x2 - self.x1) + 3.0 * s * s * (1.0 - self.x2)
    }

    /// Find the curve parameter whose x equals `x`: Newton first, bisection if it stalls.
    fn param_for_x(&self, x: f32) -> f32 {
        let mut s = x;
        for _ in 0..8 {
            let err = Self::component(self.x1, self.x2, s) - x;
            if err.abs() < 1e-6 {
                return s;
            }
            let slope = self.dx(s);
            if slope.abs() < 1e-6 {
                break;
            }
            s = (s - err / slope).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        s = x;
        for _ in 0..32 {
            let cx = Self::component(self.x1, self.x2, s);
            if (cx - x).abs() < 1e-6 {
                break;
            }
            if cx < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }

    fn y_for_x(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::component(self.y1, self.y2, self.param_for_x(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn linear_is_identity() {
        let ease = EasingFunction::Linear;
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!(approx_eq(ease.evaluate(t), t));
        }
    }

    #[test]
    fn curves_pin_their_endpoints() {
        for ease in [
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
            EasingFunction::CubicBezier { x1: 0.4, y1: 0.0, x2: 0.2, y2: 1.0 },
        ] {
            assert!(approx_eq(ease.evaluate(0.0), 0.0), "{ease:?}");
            assert!(approx_eq(ease.evaluate(1.0), 1.0), "{ease:?}");
        }
    }

    #[test]
    fn ease_in_starts_slow_and_ease_out_starts_fast() {
        assert!(EasingFunction::EaseIn.evaluate(0.25) < 0.25);
        assert!(EasingFunction::EaseOut.evaluate(0.25) > 0.25);
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let ease = EasingFunction::EaseInOut;
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(0.2) + ease.evaluate(0.8), 1.0));
    }

    #[test]
    fn diagonal_bezier_matches_linear() {
        let ease = EasingFunction::CubicBezier { x1: 0.0, y1: 0.0, x2: 1.0, y2: 1.0 };
        assert!(approx_eq(ease.evaluate(0.3), 0.3));
    }

    #[test]
    fn input_is_clamped() {
        assert!(approx_eq(EasingFunction::Linear.evaluate(-0.5), 0.0));
        assert!(approx_eq(EasingFunction::EaseIn.evaluate(1.5), 1.0));
    }
}
