use crate::display_list::{Command, DisplayList, Layer, Mask, Viewport};
use crate::scene::*;

pub struct Painter {
    list: DisplayList,
    transform_stack: Vec<Transform2D>,
    clip_depth: usize,
    layer_depth: usize,
}

impl Painter {
    pub fn begin_frame(viewport: Viewport) -> Self {
        Self {
            list: DisplayList {
                viewport,
                commands: Vec::new(),
            },
            transform_stack: vec![Transform2D::identity()],
            clip_depth: 0,
            layer_depth: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.list.viewport
    }

    pub fn current_transform(&self) -> Transform2D {
        self.transform_stack.last().copied().unwrap_or_default()
    }

    pub fn push_transform(&mut self, t: Transform2D) {
        // Compose with current transform so nested pushes multiply.
        let composed = self.current_transform().concat(t);
        self.list.commands.push(Command::PushTransform(composed));
        self.transform_stack.push(composed);
    }

    pub fn pop_transform(&mut self) {
        // The identity at the bottom of the stack is never popped.
        if self.transform_stack.len() > 1 {
            self.transform_stack.pop();
            self.list.commands.push(Command::PopTransform);
        }
    }

    pub fn push_clip_rect(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.list.commands.push(Command::PushClip(ClipRect(rect)));
    }

    pub fn pop_clip(&mut self) {
        if self.clip_depth > 0 {
            self.clip_depth -= 1;
            self.list.commands.push(Command::PopClip);
        }
    }

    /// Open a layer whose contents reserve `bounds` but are never drawn.
    pub fn begin_hidden(&mut self, bounds: Rect) {
        self.begin_layer(bounds, Layer::Hidden);
    }

    /// Open a layer composited through `mask` when it ends.
    pub fn begin_masked(&mut self, bounds: Rect, mask: Mask) {
        self.begin_layer(bounds, Layer::Masked(mask));
    }

    fn begin_layer(&mut self, bounds: Rect, layer: Layer) {
        self.layer_depth += 1;
        self.list.commands.push(Command::BeginLayer { bounds, layer });
    }

    pub fn end_layer(&mut self) {
        if self.layer_depth > 0 {
            self.layer_depth -= 1;
            self.list.commands.push(Command::EndLayer);
        }
    }

    pub fn layer_depth(&self) -> usize {
        self.layer_depth
    }

    pub fn rect(&mut self, rect: Rect, brush: Brush) {
        let t = self.current_transform();
        self.list.commands.push(Command::DrawRect {
            rect,
            brush,
            transform: t,
        });
    }

    pub fn rounded_rect(&mut self, rrect: RoundedRect, brush: Brush) {
        let t = self.current_transform();
        self.list.commands.push(Command::DrawRoundedRect {
            rrect,
            brush,
            transform: t,
        });
    }

    /// Get a reference to the display list recorded so far.
    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    /// Close anything still open and hand over the list.
    pub fn finish(mut self) -> DisplayList {
        if self.layer_depth > 0 || self.clip_depth > 0 {
            log::warn!(
                "painter finished with {} open layer(s), {} open clip(s)",
                self.layer_depth,
                self.clip_depth
            );
        }
        while self.layer_depth > 0 {
            self.end_layer();
        }
        while self.clip_depth > 0 {
            self.pop_clip();
        }
        while self.transform_stack.len() > 1 {
            self.pop_transform();
        }
        self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp() -> Viewport {
        Viewport {
            width: 100,
            height: 50,
        }
    }

    #[test]
    fn nested_transforms_compose() {
        let mut p = Painter::begin_frame(vp());
        p.push_transform(Transform2D::translate(10.0, 0.0));
        p.push_transform(Transform2D::translate(0.0, 5.0));
        p.rect(Rect::new(0.0, 0.0, 1.0, 1.0), Brush::Solid(Color::WHITE));
        let list = p.finish();
        let Some(Command::DrawRect { transform, .. }) = list
            .commands
            .iter()
            .find(|c| matches!(c, Command::DrawRect { .. }))
        else {
            panic!("rect not recorded");
        };
        assert_eq!(transform.offset(), [10.0, 5.0]);
    }

    #[test]
    fn finish_balances_open_layers() {
        let mut p = Painter::begin_frame(vp());
        p.begin_hidden(Rect::new(0.0, 0.0, 10.0, 10.0));
        p.push_clip_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(p.layer_depth(), 1);
        let list = p.finish();
        let begins = list
            .commands
            .iter()
            .filter(|c| matches!(c, Command::BeginLayer { .. }))
            .count();
        let ends = list
            .commands
            .iter()
            .filter(|c| matches!(c, Command::EndLayer))
            .count();
        assert_eq!(begins, ends);
        assert_eq!(list.commands.last(), Some(&Command::PopClip));
    }

    #[test]
    fn unmatched_pops_are_ignored() {
        let mut p = Painter::begin_frame(vp());
        p.end_layer();
        p.pop_clip();
        p.pop_transform();
        assert!(p.finish().commands.is_empty());
    }

    #[test]
    fn layer_contents_returns_inner_commands() {
        let mut p = Painter::begin_frame(vp());
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        p.begin_hidden(bounds);
        p.rect(bounds, Brush::Solid(Color::WHITE));
        p.end_layer();
        let list = p.finish();
        assert_eq!(list.layer_bounds(), vec![bounds]);
        let inner = list.layer_contents(0).expect("layer recorded");
        assert_eq!(inner.len(), 1);
        assert!(list.layer_contents(1).is_none());
    }
}
