use std::path::PathBuf;

use anyhow::{Context, Result};
use shimmer_config::{DemoMode, ShimmerToml};

mod app;
mod headless;
mod window;

use app::DemoState;

/// Command-line overrides, applied on top of `shimmer.toml` and the environment.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    headless: bool,
    direction: Option<String>,
    config: Option<PathBuf>,
}

impl CliArgs {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut cli = Self::default();
        for arg in args {
            if arg == "--headless" {
                cli.headless = true;
            } else if let Some(name) = arg.strip_prefix("--direction=") {
                cli.direction = Some(name.to_string());
            } else if let Some(path) = arg.strip_prefix("--config=") {
                cli.config = Some(PathBuf::from(path));
            } else {
                log::warn!("ignoring unknown argument {arg:?}");
            }
        }
        cli
    }

    fn load_config(&self) -> Result<ShimmerToml> {
        let mut config = match &self.config {
            Some(path) => ShimmerToml::load_from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ShimmerToml::load_or_default(),
        };
        config.merge_with_env();
        if let Some(direction) = &self.direction {
            config.shimmer.direction = Some(direction.clone());
        }
        if self.headless {
            config.demo.mode = DemoMode::Headless;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = CliArgs::parse(std::env::args().skip(1));
    let config = cli.load_config()?;
    log::debug!("configuration: {config:?}");

    let state = DemoState::new(&config)?;
    match config.demo.mode {
        DemoMode::Headless => headless::run(state, &config.demo).map(|_| ()),
        DemoMode::Window => window::run(state, &config.demo),
    }
}
