//! CPU compositor: turns a [`DisplayList`] into pixels with tiny-skia.
//!
//! Hidden layers are skipped entirely. Masked layers are drawn into an
//! offscreen pixmap covering only the layer's device bounds, multiplied by an
//! alpha mask built by filling the mask rect with the mask brush, then
//! composited onto their parent.

use std::path::Path as FsPath;

use thiserror::Error;
use tiny_skia::{
    FillRule, GradientStop, Mask as SkMask, MaskType, Paint, Path, PathBuilder, Pixmap,
    PixmapPaint, Point, SpreadMode, Transform,
};

use crate::display_list::{Command, DisplayList, Layer, Mask};
use crate::scene::*;

/// Errors produced while rasterising or exporting a frame.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The display list has a zero-sized viewport.
    #[error("cannot rasterise a {width}x{height} viewport")]
    EmptyViewport { width: u32, height: u32 },

    /// `EndLayer` without `BeginLayer`, or a layer left open.
    #[error("unbalanced layer stack: {0}")]
    UnbalancedLayers(&'static str),

    /// Pixel buffer did not match the pixmap dimensions.
    #[error("pixel buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },

    /// Image encoding or file write failed.
    #[error("image export failed: {0}")]
    Export(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RasterError>;

/// Converts a transform from the engine representation.
fn sk_transform(t: Transform2D) -> Transform {
    let [a, b, c, d, e, f] = t.m;
    Transform::from_row(a, b, c, d, e, f)
}

fn sk_color(c: ColorLinPremul) -> tiny_skia::Color {
    let [r, g, b, a] = c.to_srgba_u8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn paint_for(brush: &Brush) -> Option<Paint<'static>> {
    let mut paint = Paint {
        anti_alias: true,
        ..Paint::default()
    };
    match brush {
        Brush::Solid(c) => paint.set_color(sk_color(*c)),
        Brush::LinearGradient(g) => {
            let stops = g
                .stops
                .iter()
                .map(|(pos, c)| GradientStop::new(*pos, sk_color(*c)))
                .collect();
            paint.shader = tiny_skia::LinearGradient::new(
                Point::from_xy(g.start[0], g.start[1]),
                Point::from_xy(g.end[0], g.end[1]),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )?;
        }
    }
    Some(paint)
}

fn rect_path(r: Rect) -> Option<Path> {
    tiny_skia::Rect::from_xywh(r.x, r.y, r.w, r.h).map(PathBuilder::from_rect)
}

fn rounded_rect_path(rr: &RoundedRect) -> Option<Path> {
    let Rect { x, y, w, h } = rr.rect;
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let max = w.min(h) * 0.5;
    let [tl, tr, br, bl] = [rr.radii.tl, rr.radii.tr, rr.radii.br, rr.radii.bl].map(|r| r.clamp(0.0, max));
    // Cubic approximation of a quarter circle.
    const K: f32 = 0.552_284_8;
    let mut pb = PathBuilder::new();
    pb.move_to(x + tl, y);
    pb.line_to(x + w - tr, y);
    pb.cubic_to(x + w - tr + tr * K, y, x + w, y + tr - tr * K, x + w, y + tr);
    pb.line_to(x + w, y + h - br);
    pb.cubic_to(x + w, y + h - br + br * K, x + w - br + br * K, y + h, x + w - br, y + h);
    pb.line_to(x + bl, y + h);
    pb.cubic_to(x + bl - bl * K, y + h, x, y + h - bl + bl * K, x, y + h - bl);
    pb.line_to(x, y + tl);
    pb.cubic_to(x, y + tl - tl * K, x + tl - tl * K, y, x + tl, y);
    pb.close();
    pb.finish()
}

/// Offscreen layer waiting to be composited through `mask`.
struct Target {
    pixmap: Pixmap,
    /// Device position of the pixmap's top-left pixel.
    origin: [u32; 2],
    mask: Mask,
    outer: Transform2D,
}

/// Pixel rect `[x, y, w, h]` covered by `bounds` under `transform`, limited to
/// the viewport. `None` when nothing is visible.
fn device_bounds(bounds: Rect, transform: Transform2D, width: u32, height: u32) -> Option<[u32; 4]> {
    let Rect { x, y, w, h } = bounds;
    let corners = [[x, y], [x + w, y], [x, y + h], [x + w, y + h]].map(|p| transform.apply(p));
    let (mut x0, mut y0) = (f32::INFINITY, f32::INFINITY);
    let (mut x1, mut y1) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for [px, py] in corners {
        x0 = x0.min(px);
        y0 = y0.min(py);
        x1 = x1.max(px);
        y1 = y1.max(py);
    }
    // One pixel of slack for anti-aliased edges.
    let left = (x0.floor() - 1.0).max(0.0);
    let top = (y0.floor() - 1.0).max(0.0);
    let right = (x1.ceil() + 1.0).min(width as f32);
    let bottom = (y1.ceil() + 1.0).min(height as f32);
    if !(right > left && bottom > top) {
        return None;
    }
    Some([left as u32, top as u32, (right - left) as u32, (bottom - top) as u32])
}

/// Copy the part of a viewport-sized clip that lies under a layer pixmap.
fn crop_mask(mask: &SkMask, origin: [u32; 2], width: u32, height: u32) -> Option<SkMask> {
    let mut out = SkMask::new(width, height)?;
    let stride = mask.width() as usize;
    let (x, y, w) = (origin[0] as usize, origin[1] as usize, width as usize);
    for (row, dst) in out.data_mut().chunks_exact_mut(w).enumerate() {
        let start = (y + row) * stride + x;
        if let Some(src) = mask.data().get(start..start + w) {
            dst.copy_from_slice(src);
        }
    }
    Some(out)
}

/// Fill `path` on a canvas whose top-left pixel sits at `origin` in device space.
fn fill_on(
    canvas: &mut Pixmap,
    origin: [u32; 2],
    path: &Path,
    paint: &Paint,
    transform: Transform2D,
    clip: Option<&SkMask>,
) {
    let local = sk_transform(transform).post_translate(-(origin[0] as f32), -(origin[1] as f32));
    let cropped;
    let clip = match clip {
        Some(c) if (c.width(), c.height()) != (canvas.width(), canvas.height()) => {
            cropped = crop_mask(c, origin, canvas.width(), canvas.height());
            cropped.as_ref()
        }
        other => other,
    };
    canvas.fill_path(path, paint, FillRule::Winding, local, clip);
}

/// Software rasteriser for display lists.
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    background: ColorLinPremul,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(ColorLinPremul::rgba(0xff, 0xff, 0xff, 0xff))
    }
}

impl Rasterizer {
    pub fn new(background: ColorLinPremul) -> Self {
        Self { background }
    }

    pub fn background(&self) -> ColorLinPremul {
        self.background
    }

    /// Render `list` into a new pixmap sized to its viewport.
    pub fn render(&self, list: &DisplayList) -> Result<Pixmap> {
        let (width, height) = (list.viewport.width, list.viewport.height);
        let mut root = Pixmap::new(width, height).ok_or(RasterError::EmptyViewport { width, height })?;
        root.fill(sk_color(self.background));

        let mut targets: Vec<Target> = Vec::new();
        let mut transforms = vec![Transform2D::identity()];
        let mut clips: Vec<SkMask> = Vec::new();
        let mut hidden_depth = 0usize;

        for cmd in &list.commands {
            if hidden_depth > 0 {
                match cmd {
                    Command::BeginLayer { .. } => hidden_depth += 1,
                    Command::EndLayer => hidden_depth -= 1,
                    _ => {}
                }
                continue;
            }

            let current = transforms.last().copied().unwrap_or_default();
            let (canvas, origin) = match targets.last_mut() {
                Some(t) => (&mut t.pixmap, t.origin),
                None => (&mut root, [0, 0]),
            };

            match cmd {
                Command::DrawRect { rect, brush, transform } => {
                    if let (Some(path), Some(paint)) = (rect_path(*rect), paint_for(brush)) {
                        fill_on(canvas, origin, &path, &paint, *transform, clips.last());
                    }
                }
                Command::DrawRoundedRect { rrect, brush, transform } => {
                    if let (Some(path), Some(paint)) = (rounded_rect_path(rrect), paint_for(brush)) {
                        fill_on(canvas, origin, &path, &paint, *transform, clips.last());
                    }
                }
                Command::PushClip(ClipRect(rect)) => {
                    let mut clip = match clips.last() {
                        Some(parent) => parent.clone(),
                        None => {
                            let mut m = SkMask::new(width, height)
                                .ok_or(RasterError::EmptyViewport { width, height })?;
                            if let Some(full) = rect_path(Rect::new(0.0, 0.0, width as f32, height as f32)) {
                                m.fill_path(&full, FillRule::Winding, false, Transform::identity());
                            }
                            m
                        }
                    };
                    match rect_path(*rect) {
                        Some(path) => clip.intersect_path(&path, FillRule::Winding, true, sk_transform(current)),
                        None => clip.data_mut().fill(0),
                    }
                    clips.push(clip);
                }
                Command::PopClip => {
                    clips.pop();
                }
                Command::PushTransform(t) => transforms.push(*t),
                Command::PopTransform => {
                    if transforms.len() > 1 {
                        transforms.pop();
                    }
                }
                Command::BeginLayer { layer: Layer::Hidden, .. } => hidden_depth = 1,
                Command::BeginLayer { layer: Layer::Masked(mask), bounds } => {
                    let area = device_bounds(*bounds, current, width, height)
                        .and_then(|[x, y, w, h]| Some(([x, y], Pixmap::new(w, h)?)));
                    match area {
                        Some((origin, pixmap)) => targets.push(Target {
                            pixmap,
                            origin,
                            mask: mask.clone(),
                            outer: current,
                        }),
                        // Off screen: nothing inside can show.
                        None => hidden_depth = 1,
                    }
                }
                Command::EndLayer => {
                    let mut layer = targets
                        .pop()
                        .ok_or(RasterError::UnbalancedLayers("EndLayer without BeginLayer"))?;
                    let alpha = build_mask(&layer)?;
                    layer.pixmap.apply_mask(&alpha);
                    let (parent, parent_origin) = match targets.last_mut() {
                        Some(t) => (&mut t.pixmap, t.origin),
                        None => (&mut root, [0, 0]),
                    };
                    parent.draw_pixmap(
                        layer.origin[0] as i32 - parent_origin[0] as i32,
                        layer.origin[1] as i32 - parent_origin[1] as i32,
                        layer.pixmap.as_ref(),
                        &PixmapPaint::default(),
                        Transform::identity(),
                        None,
                    );
                }
            }
        }

        if !targets.is_empty() || hidden_depth > 0 {
            return Err(RasterError::UnbalancedLayers("layer left open"));
        }
        log::trace!("rasterised {} commands at {}x{}", list.commands.len(), width, height);
        Ok(root)
    }
}

/// Alpha mask for `layer`, sized and positioned like its pixmap.
fn build_mask(layer: &Target) -> Result<SkMask> {
    let (width, height) = (layer.pixmap.width(), layer.pixmap.height());
    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::EmptyViewport { width, height })?;
    let mask = &layer.mask;
    if let (Some(path), Some(paint)) = (rect_path(mask.rect), paint_for(&mask.brush)) {
        fill_on(&mut pixmap, layer.origin, &path, &paint, layer.outer.concat(mask.transform), None);
    }
    Ok(SkMask::from_pixmap(pixmap.as_ref(), MaskType::Alpha))
}

/// Unpremultiplied RGBA8 bytes, row-major.
pub fn to_rgba8(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

/// Write `pixmap` to `path`; the format follows the file extension.
pub fn save_png<P: AsRef<FsPath>>(pixmap: &Pixmap, path: P) -> Result<()> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let img = image::RgbaImage::from_raw(width, height, to_rgba8(pixmap))
        .ok_or(RasterError::BufferSize { width, height })?;
    img.save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::Viewport;
    use crate::painter::Painter;

    fn vp(width: u32, height: u32) -> Viewport {
        Viewport { width, height }
    }

    fn black() -> Brush {
        Brush::Solid(ColorLinPremul::rgba(0, 0, 0, 255))
    }

    fn pixel(p: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let c = p.pixel(x, y).expect("pixel in range").demultiply();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    #[test]
    fn empty_viewport_is_an_error() {
        let list = Painter::begin_frame(vp(0, 10)).finish();
        let err = Rasterizer::default().render(&list).unwrap_err();
        assert!(matches!(err, RasterError::EmptyViewport { width: 0, height: 10 }));
    }

    #[test]
    fn solid_rect_is_drawn() {
        let mut p = Painter::begin_frame(vp(20, 20));
        p.rect(Rect::new(0.0, 0.0, 10.0, 10.0), black());
        let pm = Rasterizer::default().render(&p.finish()).unwrap();
        assert_eq!(pixel(&pm, 5, 5), [0, 0, 0, 255]);
        assert_eq!(pixel(&pm, 15, 15), [255, 255, 255, 255]);
    }

    #[test]
    fn hidden_layer_is_not_drawn() {
        let mut p = Painter::begin_frame(vp(20, 20));
        let bounds = Rect::new(0.0, 0.0, 20.0, 20.0);
        p.begin_hidden(bounds);
        p.rect(bounds, black());
        p.end_layer();
        let pm = Rasterizer::default().render(&p.finish()).unwrap();
        assert_eq!(pixel(&pm, 10, 10), [255, 255, 255, 255]);
    }

    #[test]
    fn masked_layer_only_shows_inside_gradient_band() {
        let mut p = Painter::begin_frame(vp(100, 10));
        let bounds = Rect::new(0.0, 0.0, 100.0, 10.0);
        // Opaque only in the left half of the mask rect.
        let mask = Mask {
            brush: Brush::LinearGradient(LinearGradient {
                start: [0.0, 5.0],
                end: [100.0, 5.0],
                stops: vec![
                    (0.0, ColorLinPremul::WHITE),
                    (0.49, ColorLinPremul::WHITE),
                    (0.51, ColorLinPremul::TRANSPARENT),
                    (1.0, ColorLinPremul::TRANSPARENT),
                ],
            }),
            rect: bounds,
            transform: Transform2D::identity(),
        };
        p.begin_masked(bounds, mask);
        p.rect(bounds, black());
        p.end_layer();
        let pm = Rasterizer::default().render(&p.finish()).unwrap();
        assert_eq!(pixel(&pm, 10, 5), [0, 0, 0, 255]);
        assert_eq!(pixel(&pm, 90, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn masked_layer_is_placed_at_its_bounds() {
        let mut p = Painter::begin_frame(vp(100, 100));
        let bounds = Rect::new(40.0, 60.0, 20.0, 10.0);
        let mask = Mask {
            brush: Brush::Solid(ColorLinPremul::WHITE),
            rect: bounds,
            transform: Transform2D::identity(),
        };
        p.push_transform(Transform2D::translate(5.0, -20.0));
        p.begin_masked(bounds, mask);
        p.rect(bounds, black());
        p.end_layer();
        p.pop_transform();
        let pm = Rasterizer::default().render(&p.finish()).unwrap();
        assert_eq!(pixel(&pm, 55, 45), [0, 0, 0, 255]);
        assert_eq!(pixel(&pm, 55, 65), [255, 255, 255, 255]);
        assert_eq!(pixel(&pm, 40, 45), [255, 255, 255, 255]);
    }

    #[test]
    fn offscreen_masked_layer_is_skipped() {
        let mut p = Painter::begin_frame(vp(20, 20));
        let bounds = Rect::new(50.0, 50.0, 10.0, 10.0);
        let mask = Mask {
            brush: Brush::Solid(ColorLinPremul::WHITE),
            rect: bounds,
            transform: Transform2D::identity(),
        };
        p.begin_masked(bounds, mask);
        p.rect(bounds, black());
        p.end_layer();
        p.rect(Rect::new(0.0, 0.0, 5.0, 5.0), black());
        let pm = Rasterizer::default().render(&p.finish()).unwrap();
        assert_eq!(pixel(&pm, 2, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn clip_applies_inside_masked_layer() {
        let mut p = Painter::begin_frame(vp(40, 20));
        let bounds = Rect::new(10.0, 0.0, 20.0, 20.0);
        let mask = Mask {
            brush: Brush::Solid(ColorLinPremul::WHITE),
            rect: bounds,
            transform: Transform2D::identity(),
        };
        p.push_clip_rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        p.begin_masked(bounds, mask);
        p.rect(bounds, black());
        p.end_layer();
        p.pop_clip();
        let pm = Rasterizer::default().render(&p.finish()).unwrap();
        assert_eq!(pixel(&pm, 15, 10), [0, 0, 0, 255]);
        assert_eq!(pixel(&pm, 25, 10), [255, 255, 255, 255]);
    }

    #[test]
    fn clip_limits_drawing() {
        let mut p = Painter::begin_frame(vp(20, 20));
        p.push_clip_rect(Rect::new(0.0, 0.0, 10.0, 20.0));
        p.rect(Rect::new(0.0, 0.0, 20.0, 20.0), black());
        p.pop_clip();
        let pm = Rasterizer::default().render(&p.finish()).unwrap();
        assert_eq!(pixel(&pm, 5, 5), [0, 0, 0, 255]);
        assert_eq!(pixel(&pm, 15, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn unbalanced_end_layer_is_rejected() {
        let list = DisplayList {
            viewport: vp(4, 4),
            commands: vec![Command::EndLayer],
        };
        assert!(matches!(
            Rasterizer::default().render(&list),
            Err(RasterError::UnbalancedLayers(_))
        ));
    }

    #[test]
    fn rgba_export_matches_pixmap_size() {
        let list = Painter::begin_frame(vp(3, 2)).finish();
        let pm = Rasterizer::default().render(&list).unwrap();
        assert_eq!(to_rgba8(&pm).len(), 3 * 2 * 4);
    }
}
