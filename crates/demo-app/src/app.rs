use anyhow::{Context, Result};
use engine_core::tiny_skia::Pixmap;
use engine_core::{Painter, Rasterizer, Viewport};
use shimmer_config::ShimmerToml;
use shimmer_scene::{AnimationDriver, ExampleScreen, LoadState};

/// Example screen plus the driver that animates it.
pub struct DemoState {
    screen: ExampleScreen,
    driver: AnimationDriver,
    rasterizer: Rasterizer,
}

impl DemoState {
    pub fn new(config: &ShimmerToml) -> Result<Self> {
        let mut screen =
            ExampleScreen::from_settings(config).context("invalid [shimmer] settings")?;
        let mut driver = AnimationDriver::new();
        screen.on_appear(&mut driver);
        log::info!(
            "example screen ready: {} overlays mounted, loading for {:.1}s",
            screen.mounted_overlays(&driver),
            config.demo.load_delay_secs
        );
        Ok(Self {
            screen,
            driver,
            rasterizer: Rasterizer::default(),
        })
    }

    /// Advance animations and the load countdown by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.driver.tick(dt);
        if self.screen.advance(dt, &mut self.driver) {
            log::info!("switched to loaded content");
        }
        for event in self.driver.drain_events() {
            log::trace!("{event:?}");
        }
    }

    pub fn scroll_by(&mut self, dy: f32, viewport: Viewport) {
        self.screen.scroll_by(dy, viewport.size());
    }

    pub fn state(&self) -> LoadState {
        self.screen.state()
    }

    pub fn needs_redraw(&self) -> bool {
        self.driver.needs_redraw()
    }

    pub fn render(&mut self, viewport: Viewport) -> Result<Pixmap> {
        let mut painter = Painter::begin_frame(viewport);
        self.screen.paint(&mut painter);
        let list = painter.finish();
        self.driver.clear_dirty();
        self.rasterizer
            .render(&list)
            .with_context(|| format!("rasterising {}x{} frame", viewport.width, viewport.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_after_configured_delay() {
        let mut config = ShimmerToml::default();
        config.demo.load_delay_secs = 0.5;
        let mut state = DemoState::new(&config).unwrap();
        assert_eq!(state.state(), LoadState::Loading);
        for _ in 0..40 {
            state.step(1.0 / 60.0);
        }
        assert_eq!(state.state(), LoadState::Loaded);
    }

    #[test]
    fn bad_direction_is_an_error() {
        let mut config = ShimmerToml::default();
        config.shimmer.direction = Some("upwards".into());
        let err = DemoState::new(&config).err().unwrap();
        assert!(format!("{err:#}").contains("upwards"));
    }

    #[test]
    fn renders_at_viewport_size() {
        let mut state = DemoState::new(&ShimmerToml::default()).unwrap();
        state.step(0.1);
        let pixmap = state.render(Viewport { width: 120, height: 200 }).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (120, 200));
    }
}
