//! Minimal layout: content measures itself against the width it is offered
//! and paints at the origin its parent assigns.

use engine_core::{Brush, Color, Painter, Rect, RoundedRadii, RoundedRect, Size};

/// Anything that can be measured and painted.
pub trait Content {
    /// Size this content occupies when offered `available`.
    fn measure(&self, available: Size) -> Size;

    /// Record drawing commands for the content placed at `origin`.
    fn paint(&self, painter: &mut Painter, origin: [f32; 2], available: Size);
}

impl<T: Content + ?Sized> Content for Box<T> {
    fn measure(&self, available: Size) -> Size {
        (**self).measure(available)
    }

    fn paint(&self, painter: &mut Painter, origin: [f32; 2], available: Size) {
        (**self).paint(painter, origin, available)
    }
}

impl<T: Content + ?Sized> Content for &T {
    fn measure(&self, available: Size) -> Size {
        (**self).measure(available)
    }

    fn paint(&self, painter: &mut Painter, origin: [f32; 2], available: Size) {
        (**self).paint(painter, origin, available)
    }
}

/// Filled rounded rectangle spanning the offered width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedBox {
    pub height: f32,
    pub radius: f32,
    pub fill: Color,
}

impl RoundedBox {
    pub fn new(height: f32, radius: f32, fill: Color) -> Self {
        Self {
            height,
            radius,
            fill,
        }
    }
}

impl Content for RoundedBox {
    fn measure(&self, available: Size) -> Size {
        Size::new(available.w.max(0.0), self.height.max(0.0))
    }

    fn paint(&self, painter: &mut Painter, origin: [f32; 2], available: Size) {
        let rect = Rect::from_origin_size(origin, self.measure(available));
        if rect.is_empty() {
            return;
        }
        painter.rounded_rect(
            RoundedRect {
                rect,
                radii: RoundedRadii::uniform(self.radius),
            },
            Brush::Solid(self.fill),
        );
    }
}

/// Leading-aligned vertical stack.
#[derive(Default)]
pub struct Column {
    pub spacing: f32,
    pub children: Vec<Box<dyn Content>>,
}

impl Column {
    pub fn new(spacing: f32) -> Self {
        Self {
            spacing,
            children: Vec::new(),
        }
    }

    pub fn push<C: Content + 'static>(mut self, child: C) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Content for Column {
    fn measure(&self, available: Size) -> Size {
        let mut height = 0.0;
        let mut width: f32 = 0.0;
        for (i, child) in self.children.iter().enumerate() {
            let s = child.measure(available);
            if i > 0 {
                height += self.spacing;
            }
            height += s.h;
            width = width.max(s.w);
        }
        Size::new(width, height)
    }

    fn paint(&self, painter: &mut Painter, origin: [f32; 2], available: Size) {
        let mut y = origin[1];
        for child in &self.children {
            let s = child.measure(available);
            child.paint(painter, [origin[0], y], available);
            y += s.h + self.spacing;
        }
    }
}

/// Uniform inset around a child.
pub struct Padded<C> {
    pub padding: f32,
    pub content: C,
}

impl<C: Content> Padded<C> {
    pub fn new(padding: f32, content: C) -> Self {
        Self { padding, content }
    }

    fn inner(&self, available: Size) -> Size {
        Size::new(
            (available.w - 2.0 * self.padding).max(0.0),
            (available.h - 2.0 * self.padding).max(0.0),
        )
    }
}

impl<C: Content> Content for Padded<C> {
    fn measure(&self, available: Size) -> Size {
        let s = self.content.measure(self.inner(available));
        Size::new(s.w + 2.0 * self.padding, s.h + 2.0 * self.padding)
    }

    fn paint(&self, painter: &mut Painter, origin: [f32; 2], available: Size) {
        let p = self.padding;
        self.content
            .paint(painter, [origin[0] + p, origin[1] + p], self.inner(available));
    }
}
