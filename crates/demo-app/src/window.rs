//! Windowed presentation: every frame is rasterised on the CPU and uploaded
//! straight into the swapchain texture.

use std::time::Instant;

use anyhow::{Context, Result, bail};
use engine_core::{Viewport, to_rgba8};
use pollster::FutureExt;
use shimmer_config::DemoConfig;
use winit::dpi::LogicalSize;
use winit::event::{Event, MouseScrollDelta, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use crate::app::DemoState;

/// Points scrolled per wheel line.
const LINE_HEIGHT: f32 = 40.0;

fn make_surface_config(
    adapter: &wgpu::Adapter,
    surface: &wgpu::Surface,
    width: u32,
    height: u32,
) -> Result<wgpu::SurfaceConfiguration> {
    let caps = surface.get_capabilities(adapter);
    if !caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
        bail!("surface does not accept texture uploads; try --headless");
    }
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| {
            matches!(
                f,
                wgpu::TextureFormat::Rgba8UnormSrgb | wgpu::TextureFormat::Bgra8UnormSrgb
            )
        })
        .or_else(|| {
            caps.formats.iter().copied().find(|f| {
                matches!(f, wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Bgra8Unorm)
            })
        })
        .context("no 8-bit RGBA/BGRA surface format")?;
    let present_mode = caps
        .present_modes
        .iter()
        .copied()
        .find(|m| *m == wgpu::PresentMode::Fifo)
        .unwrap_or(wgpu::PresentMode::Fifo);
    let alpha_mode = caps
        .alpha_modes
        .iter()
        .copied()
        .find(|m| *m == wgpu::CompositeAlphaMode::Opaque)
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);
    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
        format,
        width,
        height,
        present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 1,
    })
}

fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// RGBA8 bytes in the channel order of `format`.
fn frame_bytes(mut rgba: Vec<u8>, format: wgpu::TextureFormat) -> Vec<u8> {
    if is_bgra(format) {
        for px in rgba.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
    }
    rgba
}

pub fn run(mut state: DemoState, demo: &DemoConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Shimmer Demo")
        .with_inner_size(LogicalSize::new(demo.width, demo.height))
        .build(&event_loop)?;
    // Leak the window to satisfy wgpu surface lifetime; event loop never returns.
    let window: &'static winit::window::Window = Box::leak(Box::new(window));

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window)?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        })
        .block_on()
        .context("no suitable GPU adapter found")?;
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor::default(), None)
        .block_on()?;

    let mut size = window.inner_size();
    let mut config = make_surface_config(&adapter, &surface, size.width.max(1), size.height.max(1))?;
    surface.configure(&device, &config);
    log::info!("presenting {:?} at {}x{}", config.format, config.width, config.height);

    let mut last_frame = Instant::now();
    let mut failure: Option<anyhow::Error> = None;

    event_loop.run(|event, target| match event {
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            window_id,
        } if window_id == window.id() => target.exit(),
        Event::WindowEvent {
            event: WindowEvent::Resized(new_size),
            window_id,
        } if window_id == window.id() => {
            size = new_size;
            if size.width > 0 && size.height > 0 {
                config.width = size.width;
                config.height = size.height;
                surface.configure(&device, &config);
            }
        }
        Event::WindowEvent {
            event: WindowEvent::MouseWheel { delta, .. },
            window_id,
        } if window_id == window.id() => {
            let dy = match delta {
                MouseScrollDelta::LineDelta(_, lines) => -lines * LINE_HEIGHT,
                MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32),
            };
            let viewport = Viewport {
                width: config.width,
                height: config.height,
            };
            state.scroll_by(dy, viewport);
            window.request_redraw();
        }
        Event::WindowEvent {
            event: WindowEvent::RedrawRequested,
            window_id,
        } if window_id == window.id() => {
            if size.width == 0 || size.height == 0 {
                return;
            }
            let now = Instant::now();
            state.step(now.duration_since(last_frame).as_secs_f32());
            last_frame = now;

            let frame = match surface.get_current_texture() {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("surface lost ({e}); reconfiguring");
                    surface.configure(&device, &config);
                    return;
                }
            };
            let viewport = Viewport {
                width: config.width,
                height: config.height,
            };
            let pixmap = match state.render(viewport) {
                Ok(p) => p,
                Err(e) => {
                    failure = Some(e);
                    target.exit();
                    return;
                }
            };
            let bytes = frame_bytes(to_rgba8(&pixmap), config.format);
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &frame.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &bytes,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(viewport.width * 4),
                    rows_per_image: Some(viewport.height),
                },
                wgpu::Extent3d {
                    width: viewport.width,
                    height: viewport.height,
                    depth_or_array_layers: 1,
                },
            );
            queue.submit(std::iter::empty());
            frame.present();
        }
        Event::AboutToWait => {
            if state.needs_redraw() {
                window.request_redraw();
            }
        }
        _ => {}
    })?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgra_surfaces_get_swapped_channels() {
        let rgba = vec![1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(
            frame_bytes(rgba.clone(), wgpu::TextureFormat::Bgra8UnormSrgb),
            vec![3, 2, 1, 4, 7, 6, 5, 8]
        );
        assert_eq!(frame_bytes(rgba.clone(), wgpu::TextureFormat::Rgba8Unorm), rgba);
    }
}
