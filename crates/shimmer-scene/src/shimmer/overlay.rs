//! Shimmer overlay: paints content twice, once hidden to hold its place and
//! once through a moving gradient mask.

use engine_core::{Brush, Color, Mask, Painter, Rect, Size};

use super::config::ShimmerConfig;
use super::direction::{ShimmerDirection, TravelExtent};
use super::geometry::{gradient, mask_transform};
use crate::animation::{AnimationId, AnimationSpec, Animator, ObservableScalar, Subscription};
use crate::layout::Content;

/// Position before the sweep starts.
pub const REST_POSITION: f32 = -1.0;
/// Position the sweep animates towards.
pub const ACTIVE_POSITION: f32 = 1.0;

pub struct ShimmerOverlay<C> {
    content: C,
    config: ShimmerConfig,
    position: ObservableScalar,
    animation: Option<AnimationId>,
    mounts: u32,
}

impl<C: Content> ShimmerOverlay<C> {
    /// White, left-to-right, 1.5 s linear sweep.
    pub fn new(content: C) -> Self {
        Self::from_config(ShimmerConfig::default(), content)
    }

    pub fn from_config(config: ShimmerConfig, content: C) -> Self {
        Self {
            content,
            config,
            position: ObservableScalar::new(REST_POSITION),
            animation: None,
            mounts: 0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.config.color = color;
        self
    }

    pub fn with_direction(mut self, direction: ShimmerDirection) -> Self {
        self.config.direction = direction;
        self
    }

    pub fn with_animation(mut self, animation: AnimationSpec) -> Self {
        self.config.animation = animation;
        self
    }

    pub fn with_extent(mut self, extent: TravelExtent) -> Self {
        self.config.extent = extent;
        self
    }

    pub fn config(&self) -> &ShimmerConfig {
        &self.config
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    /// Reset to rest and hand the position over to `animator`.
    ///
    /// Mounting an overlay whose animation is still running does nothing.
    pub fn mount<A: Animator + ?Sized>(&mut self, animator: &mut A) {
        if let Some(id) = self.animation {
            if animator.is_running(id) {
                log::trace!("shimmer already mounted ({id:?})");
                return;
            }
        }
        self.position.set(REST_POSITION);
        let id = animator.animate(
            &self.position,
            REST_POSITION,
            ACTIVE_POSITION,
            self.config.animation,
        );
        self.animation = Some(id);
        self.mounts += 1;
        log::debug!(
            "shimmer mounted: {} over {:.2}s ({id:?})",
            self.config.direction,
            self.config.animation.duration_secs
        );
    }

    /// Stop the sweep. The position keeps its last value until the next mount.
    pub fn unmount<A: Animator + ?Sized>(&mut self, animator: &mut A) {
        if let Some(id) = self.animation.take() {
            animator.cancel(id);
            log::debug!("shimmer unmounted ({id:?})");
        }
    }

    /// Whether the sweep started by the last mount is still running on `animator`.
    /// Ended, cancelled and detached animations all count as unmounted.
    pub fn is_mounted<A: Animator + ?Sized>(&self, animator: &A) -> bool {
        self.animation.is_some_and(|id| animator.is_running(id))
    }

    /// Number of times the sweep has been started.
    pub fn mount_count(&self) -> u32 {
        self.mounts
    }

    pub fn animation_id(&self) -> Option<AnimationId> {
        self.animation
    }

    pub fn position(&self) -> f32 {
        self.position.get()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(f32) + 'static,
    {
        self.position.subscribe(observer)
    }

    /// Mask for content occupying `bounds`, travelling across `extent`.
    pub fn mask(&self, bounds: Rect, extent: Size) -> Mask {
        let direction = self.config.direction;
        Mask {
            brush: Brush::LinearGradient(gradient(direction, self.config.color).resolve(bounds)),
            rect: bounds,
            transform: mask_transform(direction, self.position.get(), bounds, extent),
        }
    }

    fn travel_extent(&self, painter: &Painter, measured: Size) -> Size {
        match self.config.extent {
            TravelExtent::Bounds => measured,
            TravelExtent::Viewport => painter.viewport().size(),
        }
    }
}

impl<C: Content> Content for ShimmerOverlay<C> {
    fn measure(&self, available: Size) -> Size {
        self.content.measure(available)
    }

    fn paint(&self, painter: &mut Painter, origin: [f32; 2], available: Size) {
        let size = self.content.measure(available);
        let bounds = Rect::from_origin_size(origin, size);

        painter.begin_hidden(bounds);
        self.content.paint(painter, origin, available);
        painter.end_layer();

        let extent = self.travel_extent(painter, size);
        painter.begin_masked(bounds, self.mask(bounds, extent));
        self.content.paint(painter, origin, available);
        painter.end_layer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationDriver;
    use crate::layout::RoundedBox;
    use engine_core::{Command, DisplayList, Layer, Viewport};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records calls instead of animating.
    #[derive(Default)]
    struct RecordingAnimator {
        started: Vec<(f32, f32, AnimationSpec)>,
        cancelled: Vec<AnimationId>,
        running: Vec<AnimationId>,
    }

    impl Animator for RecordingAnimator {
        fn animate(
            &mut self,
            target: &ObservableScalar,
            from: f32,
            to: f32,
            spec: AnimationSpec,
        ) -> AnimationId {
            target.set(from);
            self.started.push((from, to, spec));
            let id = AnimationId::new();
            self.running.push(id);
            id
        }

        fn cancel(&mut self, id: AnimationId) -> bool {
            self.cancelled.push(id);
            let before = self.running.len();
            self.running.retain(|r| *r != id);
            before != self.running.len()
        }

        fn is_running(&self, id: AnimationId) -> bool {
            self.running.contains(&id)
        }
    }

    fn block() -> RoundedBox {
        RoundedBox::new(20.0, 5.0, Color::rgba(128, 128, 128, 77))
    }

    fn paint(overlay: &ShimmerOverlay<RoundedBox>, viewport: Viewport) -> DisplayList {
        let mut painter = Painter::begin_frame(viewport);
        overlay.paint(&mut painter, [10.0, 30.0], Size::new(200.0, 500.0));
        painter.finish()
    }

    fn mask_of(list: &DisplayList) -> Mask {
        list.commands
            .iter()
            .find_map(|c| match c {
                Command::BeginLayer {
                    layer: Layer::Masked(mask),
                    ..
                } => Some(mask.clone()),
                _ => None,
            })
            .expect("masked layer")
    }

    #[test]
    fn starts_at_rest_and_unmounted() {
        let overlay = ShimmerOverlay::new(block());
        assert_eq!(overlay.position(), REST_POSITION);
        assert!(!overlay.is_mounted(&RecordingAnimator::default()));
        assert_eq!(overlay.config().color, Color::WHITE);
    }

    #[test]
    fn mount_animates_rest_to_active_with_sweep_spec() {
        let mut animator = RecordingAnimator::default();
        let mut overlay = ShimmerOverlay::new(block());
        overlay.mount(&mut animator);

        assert!(overlay.is_mounted(&animator));
        assert_eq!(
            animator.started,
            vec![(REST_POSITION, ACTIVE_POSITION, AnimationSpec::shimmer())]
        );
    }

    #[test]
    fn mounting_twice_starts_one_animation() {
        let mut animator = RecordingAnimator::default();
        let mut overlay = ShimmerOverlay::new(block());
        overlay.mount(&mut animator);
        overlay.mount(&mut animator);
        assert_eq!(animator.started.len(), 1);
        assert_eq!(overlay.mount_count(), 1);
    }

    #[test]
    fn unmount_cancels_the_mounted_animation() {
        let mut animator = RecordingAnimator::default();
        let mut overlay = ShimmerOverlay::new(block());
        overlay.unmount(&mut animator);
        assert!(animator.cancelled.is_empty());

        overlay.mount(&mut animator);
        let id = overlay.animation_id().unwrap();
        overlay.unmount(&mut animator);
        assert_eq!(animator.cancelled, vec![id]);
        assert!(!animator.is_running(id));
    }

    #[test]
    fn unmount_cancels_and_remount_resets() {
        let mut driver = AnimationDriver::new();
        let mut overlay = ShimmerOverlay::new(block());
        overlay.mount(&mut driver);
        driver.tick(0.75);
        assert!((overlay.position() - 0.0).abs() < 1e-4);

        overlay.unmount(&mut driver);
        assert!(!overlay.is_mounted(&driver));
        assert_eq!(driver.active_count(), 0);

        overlay.mount(&mut driver);
        assert_eq!(overlay.position(), REST_POSITION);
        assert_eq!(overlay.mount_count(), 2);
    }

    #[test]
    fn finished_sweep_is_no_longer_mounted() {
        let mut driver = AnimationDriver::new();
        let mut overlay = ShimmerOverlay::new(block()).with_animation(AnimationSpec::linear(1.0));
        overlay.mount(&mut driver);
        assert!(overlay.is_mounted(&driver));

        driver.tick(1.5);
        assert_eq!(overlay.position(), ACTIVE_POSITION);
        assert!(!overlay.is_mounted(&driver));

        overlay.mount(&mut driver);
        assert!(overlay.is_mounted(&driver));
        assert_eq!(overlay.mount_count(), 2);
    }

    #[test]
    fn subscribers_see_driver_updates() {
        let mut driver = AnimationDriver::new();
        let mut overlay = ShimmerOverlay::new(block());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = overlay.subscribe(move |p| sink.borrow_mut().push(p));

        overlay.mount(&mut driver);
        driver.tick(0.375);
        assert_eq!(seen.borrow().len(), 1);
        assert!((seen.borrow()[0] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn paint_records_hidden_then_masked_with_equal_bounds() {
        let overlay = ShimmerOverlay::new(block());
        let list = paint(&overlay, Viewport { width: 390, height: 844 });

        let bounds = list.layer_bounds();
        assert_eq!(bounds, vec![Rect::new(10.0, 30.0, 200.0, 20.0); 2]);
        assert!(matches!(
            list.commands[0],
            Command::BeginLayer { layer: Layer::Hidden, .. }
        ));
        assert_eq!(list.layer_contents(0), list.layer_contents(1));
        assert_eq!(list.layer_contents(0).map(<[Command]>::len), Some(1));
    }

    #[test]
    fn mask_offset_follows_position_and_bounds() {
        let overlay = ShimmerOverlay::new(block());
        overlay.position.set(0.5);
        let mask = mask_of(&paint(&overlay, Viewport { width: 390, height: 844 }));

        let centre = [110.0, 40.0];
        let moved = mask.transform.apply(centre);
        assert!((moved[0] - 210.0).abs() < 1e-3);
        assert!((moved[1] - 40.0).abs() < 1e-3);
        assert_eq!(mask.rect, Rect::new(10.0, 30.0, 200.0, 20.0));
    }

    #[test]
    fn viewport_extent_uses_surface_width() {
        let overlay = ShimmerOverlay::new(block()).with_extent(TravelExtent::Viewport);
        overlay.position.set(1.0);
        let mask = mask_of(&paint(&overlay, Viewport { width: 390, height: 844 }));
        let moved = mask.transform.apply([110.0, 40.0]);
        assert!((moved[0] - 500.0).abs() < 1e-3);
    }

    #[test]
    fn every_direction_moves_one_axis_only() {
        for direction in ShimmerDirection::ALL {
            let overlay = ShimmerOverlay::new(block()).with_direction(direction);
            overlay.position.set(0.5);
            let mask = mask_of(&paint(&overlay, Viewport { width: 390, height: 844 }));

            let [dx, dy] = mask.transform.apply([110.0, 40.0]);
            let (dx, dy) = (dx - 110.0, dy - 40.0);
            let expected = match direction {
                ShimmerDirection::LeftToRight => (100.0, 0.0),
                ShimmerDirection::RightToLeft => (-100.0, 0.0),
                ShimmerDirection::TopToBottom => (0.0, 10.0),
                ShimmerDirection::BottomToTop => (0.0, -10.0),
            };
            assert!((dx - expected.0).abs() < 1e-3, "{direction}: dx {dx}");
            assert!((dy - expected.1).abs() < 1e-3, "{direction}: dy {dy}");
        }
    }

    #[test]
    fn vertical_mask_is_rotated() {
        let overlay = ShimmerOverlay::new(block()).with_direction(ShimmerDirection::TopToBottom);
        let mask = mask_of(&paint(&overlay, Viewport { width: 390, height: 844 }));
        // A unit step along x lands two units down after the quarter turn and 2x scale.
        let [x0, y0] = mask.transform.apply([110.0, 40.0]);
        let [x1, y1] = mask.transform.apply([111.0, 40.0]);
        assert!((x1 - x0).abs() < 1e-4);
        assert!((y1 - y0 - 2.0).abs() < 1e-4);
    }
}
