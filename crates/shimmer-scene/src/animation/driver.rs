//! Frame-driven animation of observable scalars.
//!
//! The host calls [`AnimationDriver::tick`] once per frame with the elapsed
//! time. Each active animation samples its [`AnimationSpec`] and writes the
//! interpolated value into its target, which in turn notifies the target's
//! observers. Targets are held weakly: an animation whose scalar has been
//! dropped is pruned on the next tick.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::events::{AnimationEvent, EventQueue};
use super::observable::{ObservableScalar, WeakScalar};
use super::spec::AnimationSpec;

/// Unique identifier for an animation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything that can take over interpolation of a scalar.
pub trait Animator {
    /// Set `target` to `from`, then animate it towards `to` according to `spec`.
    fn animate(
        &mut self,
        target: &ObservableScalar,
        from: f32,
        to: f32,
        spec: AnimationSpec,
    ) -> AnimationId;

    /// Stop an animation. Returns `false` if `id` is not running.
    fn cancel(&mut self, id: AnimationId) -> bool;

    fn is_running(&self, id: AnimationId) -> bool;
}

#[derive(Debug)]
struct ActiveAnimation {
    target: WeakScalar,
    from: f32,
    to: f32,
    spec: AnimationSpec,
    /// Time into the current period; wrapped for endless specs.
    elapsed_secs: f32,
    /// Cycles folded out of `elapsed_secs` by [`ActiveAnimation::wrap_elapsed`].
    cycle_base: u32,
    iteration: u32,
}

impl ActiveAnimation {
    fn value_at(&self, fraction: f32) -> f32 {
        self.from + (self.to - self.from) * fraction
    }

    /// Keep `elapsed_secs` within one period so f32 steps stay smaller than a frame.
    /// The period covers two cycles when reversing so odd cycles stay odd.
    fn wrap_elapsed(&mut self) {
        let duration = self.spec.duration_secs;
        if !self.spec.is_infinite() || duration.is_nan() || duration <= 0.0 {
            return;
        }
        let cycles_per_period: u32 = if self.spec.autoreverses { 2 } else { 1 };
        let period = duration * cycles_per_period as f32;
        if self.elapsed_secs < period {
            return;
        }
        let periods = self.elapsed_secs.div_euclid(period);
        self.elapsed_secs = (self.elapsed_secs - periods * period).clamp(0.0, period);
        self.cycle_base = self
            .cycle_base
            .saturating_add((periods as u32).saturating_mul(cycles_per_period));
    }
}

/// Owns every running animation.
#[derive(Debug, Default)]
pub struct AnimationDriver {
    animations: HashMap<AnimationId, ActiveAnimation>,
    events: EventQueue,
    dirty: bool,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every animation by `delta_secs`.
    pub fn tick(&mut self, delta_secs: f32) {
        if self.animations.is_empty() {
            return;
        }
        let delta = delta_secs.max(0.0);

        let mut detached = Vec::new();
        let mut ended = Vec::new();
        for (id, anim) in self.animations.iter_mut() {
            if !anim.target.is_alive() {
                detached.push(*id);
                continue;
            }

            anim.elapsed_secs += delta;
            let sample = anim.spec.sample(anim.elapsed_secs);
            let iteration = anim.cycle_base.saturating_add(sample.iteration);
            for completed in anim.iteration..iteration {
                self.events.push(AnimationEvent::Iteration {
                    id: *id,
                    iteration: completed,
                });
            }
            anim.iteration = iteration;
            anim.wrap_elapsed();

            anim.target.set(anim.value_at(sample.fraction));
            self.dirty = true;

            if sample.finished {
                ended.push(*id);
            }
        }

        for id in detached {
            self.animations.remove(&id);
            log::debug!("animation {:?} detached: target dropped", id);
            self.events.push(AnimationEvent::Detached { id });
        }
        for id in ended {
            self.animations.remove(&id);
            self.events.push(AnimationEvent::Ended { id });
        }
    }

    /// Cancel everything, e.g. when the whole scene is torn down.
    pub fn cancel_all(&mut self) {
        let ids: Vec<AnimationId> = self.animations.keys().copied().collect();
        for id in ids {
            self.cancel(id);
        }
    }

    pub fn active_count(&self) -> usize {
        self.animations.len()
    }

    pub fn has_active_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Seconds into the current period of `id`, if it is still running.
    /// Finite animations never wrap, so this is the time since they started.
    pub fn elapsed(&self, id: AnimationId) -> Option<f32> {
        self.animations.get(&id).map(|a| a.elapsed_secs)
    }

    /// Whether any value changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn needs_redraw(&self) -> bool {
        self.dirty || self.has_active_animations()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = AnimationEvent> + '_ {
        self.events.drain()
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn events_for(&self, id: AnimationId) -> Vec<AnimationEvent> {
        self.events.for_animation(id)
    }
}

impl Animator for AnimationDriver {
    fn animate(
        &mut self,
        target: &ObservableScalar,
        from: f32,
        to: f32,
        spec: AnimationSpec,
    ) -> AnimationId {
        target.set(from);
        let id = AnimationId::new();
        self.animations.insert(
            id,
            ActiveAnimation {
                target: target.downgrade(),
                from,
                to,
                spec,
                elapsed_secs: 0.0,
                cycle_base: 0,
                iteration: 0,
            },
        );
        self.events.push(AnimationEvent::Started { id });
        self.dirty = true;
        log::debug!("animation {:?} started: {} -> {} ({:?})", id, from, to, spec);
        id
    }

    fn cancel(&mut self, id: AnimationId) -> bool {
        if self.animations.remove(&id).is_some() {
            self.events.push(AnimationEvent::Cancelled { id });
            self.dirty = true;
            true
        } else {
            false
        }
    }

    fn is_running(&self, id: AnimationId) -> bool {
        self.animations.contains_key(&id)
    }
}
