use crate::scene::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// Alpha mask applied to a layer when it is composited onto its parent.
/// `rect` is filled with `brush` under `transform`; only the brush alpha matters.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    pub brush: Brush,
    pub rect: Rect,
    pub transform: Transform2D,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    /// Laid out and recorded, never rasterised.
    Hidden,
    /// Rendered offscreen, then composited through the mask.
    Masked(Mask),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    DrawRect { rect: Rect, brush: Brush, transform: Transform2D },
    DrawRoundedRect { rrect: RoundedRect, brush: Brush, transform: Transform2D },
    PushClip(ClipRect),
    PopClip,
    PushTransform(Transform2D),
    PopTransform,
    BeginLayer { bounds: Rect, layer: Layer },
    EndLayer,
}

#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    pub viewport: Viewport,
    pub commands: Vec<Command>,
}

impl DisplayList {
    /// Bounds of every layer in recording order.
    pub fn layer_bounds(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::BeginLayer { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .collect()
    }

    /// Commands recorded between the `index`-th `BeginLayer` and its matching `EndLayer`.
    pub fn layer_contents(&self, index: usize) -> Option<&[Command]> {
        let start = self
            .commands
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Command::BeginLayer { .. }))
            .nth(index)?
            .0;
        let mut depth = 0usize;
        for (i, c) in self.commands.iter().enumerate().skip(start) {
            match c {
                Command::BeginLayer { .. } => depth += 1,
                Command::EndLayer => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&self.commands[start + 1..i]);
                    }
                }
                _ => {}
            }
        }
        None
    }
}
