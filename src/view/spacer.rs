//! Spacer: empty space, floating on both axes unless sized.

use crate::geometry::{LogicalSize, Offset, Size};
use crate::render::Canvas;

use super::View;

/// Takes up room and draws nothing.
#[derive(Debug, Clone)]
pub struct Spacer {
    size: LogicalSize,
    position: Offset,
    rendered: Size,
}

impl Spacer {
    pub fn new() -> Self {
        Self { size: LogicalSize::FLOATING, position: Offset::ZERO, rendered: Size::ZERO }
    }

    /// Fix either dimension. Negative values keep it floating.
    pub fn set_size(mut self, width: i32, height: i32) -> Self {
        self.size = LogicalSize::new(width, height);
        self
    }
}

impl Default for Spacer {
    fn default() -> Self {
        Self::new()
    }
}

impl View for Spacer {
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
        Canvas::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Dim;
    use crate::render::Cell;

    #[test]
    fn floating_by_default_and_blank() {
        let mut spacer = Spacer::new();
        assert_eq!(spacer.logical_size(), LogicalSize::FLOATING);
        let canvas = spacer.render(3, 2);
        assert!(canvas.cells().all(|(_, _, cell)| *cell == Cell::BLANK));
        assert_eq!(spacer.actual_size(), Size::new(3, 2));
    }

    #[test]
    fn partially_fixed() {
        let spacer = Spacer::new().set_size(2, -1);
        assert_eq!(spacer.logical_size().width, Dim::Fixed(2));
        assert!(spacer.logical_size().height.is_floating());
    }
}
