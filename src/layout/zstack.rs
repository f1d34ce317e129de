//! ZStack: children drawn on top of each other with alpha compositing.

use crate::geometry::{LogicalSize, Offset, Size};
use crate::render::Canvas;
use crate::view::{IntoView, View};

use super::{place, Align, Container, Gravity};

/// Layers every child over the full slot, first child at the bottom.
pub struct ZStack {
    children: Vec<Box<dyn View>>,
    gravity: Gravity,
    size: LogicalSize,
    position: Offset,
    rendered: Size,
}

impl ZStack {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            gravity: Gravity::CENTER,
            size: LogicalSize::FLOATING,
            position: Offset::ZERO,
            rendered: Size::ZERO,
        }
    }

    /// Add a layer on top of the existing ones.
    pub fn child(mut self, view: impl IntoView) -> Self {
        self.children.push(view.into_view());
        self
    }

    pub fn gravity(mut self, horizontal: Align, vertical: Align) -> Self {
        self.gravity = Gravity::new(horizontal, vertical);
        self
    }

    pub fn set_size(mut self, width: i32, height: i32) -> Self {
        self.size = LogicalSize::new(width, height);
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for ZStack {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ZStack {
    fn logical_size(&self) -> LogicalSize {
        self.size
    }

    fn actual_size(&self) -> Size {
        self.rendered
    }

    fn position(&self) -> Offset {
        self.position
    }

    fn set_position(&mut self, position: Offset) {
        self.position = position;
    }

    fn render(&mut self, width: i32, height: i32) -> Canvas {
        self.rendered = Size::new(width.max(0), height.max(0));
        let mut canvas = Canvas::new(width, height);
        for child in &mut self.children {
            let layer = place(child.as_mut(), self.gravity, width, height, Offset::ZERO);
            canvas.composite(&layer);
        }
        canvas
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        Some(self)
    }
}

impl Container for ZStack {
    fn children(&self) -> &[Box<dyn View>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn View>] {
        &mut self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;
    use crate::view::Text;

    #[test]
    fn opaque_top_layer_hides_bottom() {
        let mut z = ZStack::new()
            .child(Text::new("").background(Color::WHITE).set_size(-1, -1))
            .child(Text::new("hi").background(Color::RED));
        let canvas = z.render(4, 1);
        assert_eq!(canvas.row_text(0), " hi ");
        assert_eq!(canvas.get(0, 0).map(|c| c.bg), Some(Color::WHITE));
        assert_eq!(canvas.get(1, 0).map(|c| c.bg), Some(Color::RED));
    }

    #[test]
    fn transparent_cells_show_lower_layer() {
        let mut z = ZStack::new()
            .child(Text::new("abcd").background(Color::BLUE))
            .child(Text::new("").set_size(-1, -1));
        let canvas = z.render(4, 1);
        assert_eq!(canvas.row_text(0), "abcd");
        assert_eq!(canvas.get(2, 0).map(|c| c.bg), Some(Color::BLUE));
    }

    #[test]
    fn children_are_positioned_inside_zstack_canvas() {
        let mut z = ZStack::new().child(Text::new("x")).gravity(Align::Right, Align::TOP);
        z.render(10, 3);
        assert_eq!(z.children()[0].position(), Offset::new(9, 0));
        assert_eq!(z.actual_size(), Size::new(10, 3));
        assert_eq!(z.len(), 1);
    }
}
