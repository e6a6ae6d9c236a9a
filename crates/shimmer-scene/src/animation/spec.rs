//! Animation timing description, independent of what is being animated.
//!
//! ```
//! use shimmer_scene::animation::{AnimationSpec, Repeat};
//!
//! let spec = AnimationSpec::linear(1.5).repeat_forever(false);
//! assert_eq!(spec.repeat, Repeat::Forever);
//! assert!(!spec.sample(1_000.0).finished);
//! ```

use serde::{Deserialize, Serialize};

use super::easing::EasingFunction;

/// How many cycles an animation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Repeat {
    /// Run this many cycles (at least one).
    Count { cycles: u32 },
    Forever,
}

impl Default for Repeat {
    fn default() -> Self {
        Self::Count { cycles: 1 }
    }
}

/// Curve, cycle length, repetition and direction of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub curve: EasingFunction,
    /// Length of one cycle in seconds.
    pub duration_secs: f32,
    pub repeat: Repeat,
    /// Play every other cycle backwards.
    pub autoreverses: bool,
}

/// Where an animation is at a given elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Eased progress from the start value (0.0) to the end value (1.0).
    pub fraction: f32,
    /// Zero-based cycle index.
    pub iteration: u32,
    pub finished: bool,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::shimmer()
    }
}

impl AnimationSpec {
    /// Cycle length of the shimmer sweep.
    pub const SHIMMER_DURATION_SECS: f32 = 1.5;

    /// Single linear cycle.
    pub fn linear(duration_secs: f32) -> Self {
        Self {
            curve: EasingFunction::Linear,
            duration_secs,
            repeat: Repeat::default(),
            autoreverses: false,
        }
    }

    /// Linear, 1.5 s per cycle, repeating forever without reversing.
    pub fn shimmer() -> Self {
        Self::linear(Self::SHIMMER_DURATION_SECS).repeat_forever(false)
    }

    pub fn with_curve(mut self, curve: EasingFunction) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_duration(mut self, duration_secs: f32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn repeat_forever(mut self, autoreverses: bool) -> Self {
        self.repeat = Repeat::Forever;
        self.autoreverses = autoreverses;
        self
    }

    pub fn repeat_count(mut self, cycles: u32, autoreverses: bool) -> Self {
        self.repeat = Repeat::Count {
            cycles: cycles.max(1),
        };
        self.autoreverses = autoreverses;
        self
    }

    pub fn is_infinite(&self) -> bool {
        self.repeat == Repeat::Forever
    }

    fn reversed(&self, iteration: u32) -> bool {
        self.autoreverses && iteration % 2 == 1
    }

    /// Fold `elapsed_secs` into the current cycle.
    pub fn sample(&self, elapsed_secs: f32) -> Sample {
        if self.duration_secs <= 0.0 {
            return Sample {
                fraction: 1.0,
                iteration: 0,
                finished: true,
            };
        }

        let cycles = elapsed_secs.max(0.0) / self.duration_secs;
        if let Repeat::Count { cycles: total } = self.repeat {
            let total = total.max(1);
            if cycles >= total as f32 {
                let last = total - 1;
                let end = if self.reversed(last) { 0.0 } else { 1.0 };
                return Sample {
                    fraction: self.curve.evaluate(end),
                    iteration: last,
                    finished: true,
                };
            }
        }

        let iteration = cycles.floor() as u32;
        let mut raw = cycles.fract();
        if self.reversed(iteration) {
            raw = 1.0 - raw;
        }
        Sample {
            fraction: self.curve.evaluate(raw),
            iteration,
            finished: false,
        }
    }
}
