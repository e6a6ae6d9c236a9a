//! Lifecycle events emitted by the animation driver.
//!
//! Events are queued during [`AnimationDriver::tick`](super::AnimationDriver::tick)
//! and friends, then polled by the host:
//!
//! ```ignore
//! driver.tick(1.0 / 60.0);
//! for event in driver.drain_events() {
//!     if let AnimationEvent::Detached { id } = event {
//!         log::debug!("animation {id:?} lost its target");
//!     }
//! }
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::driver::AnimationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationEvent {
    Started { id: AnimationId },
    /// A cycle completed; `iteration` is the zero-based index of that cycle.
    Iteration { id: AnimationId, iteration: u32 },
    /// A finite animation reached its last frame.
    Ended { id: AnimationId },
    /// Removed by an explicit cancel.
    Cancelled { id: AnimationId },
    /// Removed because the animated value no longer exists.
    Detached { id: AnimationId },
}

impl AnimationEvent {
    pub fn id(&self) -> AnimationId {
        match *self {
            Self::Started { id }
            | Self::Iteration { id, .. }
            | Self::Ended { id }
            | Self::Cancelled { id }
            | Self::Detached { id } => id,
        }
    }

    /// True for events after which the animation is gone.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Ended { .. } | Self::Cancelled { .. } | Self::Detached { .. }
        )
    }
}

/// FIFO of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<AnimationEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: AnimationEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<AnimationEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = AnimationEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events concerning one animation, oldest first.
    pub fn for_animation(&self, id: AnimationId) -> Vec<AnimationEvent> {
        self.events.iter().filter(|e| e.id() == id).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo() {
        let a = AnimationId::new();
        let mut q = EventQueue::new();
        q.push(AnimationEvent::Started { id: a });
        q.push(AnimationEvent::Cancelled { id: a });
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(AnimationEvent::Started { id: a }));
        assert_eq!(q.drain().collect::<Vec<_>>(), vec![AnimationEvent::Cancelled { id: a }]);
        assert!(q.is_empty());
    }

    #[test]
    fn filter_by_animation() {
        let (a, b) = (AnimationId::new(), AnimationId::new());
        let mut q = EventQueue::new();
        q.push(AnimationEvent::Started { id: a });
        q.push(AnimationEvent::Started { id: b });
        q.push(AnimationEvent::Iteration { id: a, iteration: 0 });
        assert_eq!(q.for_animation(a).len(), 2);
        assert!(!q.for_animation(a)[0].is_terminal());
        assert!(AnimationEvent::Detached { id: b }.is_terminal());
    }
}
