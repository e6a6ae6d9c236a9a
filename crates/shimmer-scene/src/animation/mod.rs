//! Animation primitives for the scene.
//!
//! ```text
//! AnimationDriver (Animator)
//!   └── ActiveAnimation ── WeakScalar ──▶ ObservableScalar ──▶ Subscription callbacks
//!                  └── AnimationSpec (curve, duration, repeat, autoreverse)
//! ```

pub mod driver;
pub mod easing;
pub mod events;
pub mod observable;
pub mod spec;

pub use driver::{AnimationDriver, AnimationId, Animator};
pub use easing::EasingFunction;
pub use events::{AnimationEvent, EventQueue};
pub use observable::{ObservableScalar, Subscription, WeakScalar};
pub use spec::{AnimationSpec, Repeat, Sample};
