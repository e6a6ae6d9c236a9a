use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use engine_core::{Viewport, save_png};
use shimmer_config::DemoConfig;

use crate::app::DemoState;

/// Render `demo.frames` frames at a fixed rate and write them as PNGs.
pub fn run(mut state: DemoState, demo: &DemoConfig) -> Result<Vec<PathBuf>> {
    ensure!(demo.fps > 0.0, "fps must be positive, got {}", demo.fps);
    let viewport = Viewport {
        width: demo.width,
        height: demo.height,
    };
    std::fs::create_dir_all(&demo.output_dir)
        .with_context(|| format!("creating {}", demo.output_dir.display()))?;

    let dt = 1.0 / demo.fps;
    let mut written = Vec::with_capacity(demo.frames as usize);
    for frame in 0..demo.frames {
        if frame > 0 {
            state.step(dt);
        }
        let pixmap = state.render(viewport)?;
        let path = frame_path(&demo.output_dir, frame);
        save_png(&pixmap, &path).with_context(|| format!("writing {}", path.display()))?;
        log::debug!("frame {frame} -> {}", path.display());
        written.push(path);
    }
    log::info!(
        "wrote {} frames ({}x{}) to {}",
        written.len(),
        viewport.width,
        viewport.height,
        demo.output_dir.display()
    );
    Ok(written)
}

fn frame_path(dir: &Path, frame: u32) -> PathBuf {
    dir.join(format!("frame_{frame:04}.png"))
}
