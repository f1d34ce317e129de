//! BoxView: a single-child container that aligns its child by gravity.

use crate::geometry::{LogicalSize, Offset, Size};
use crate::render::Canvas;
use crate::view::{IntoView, View};

use super::{place, Align, Container, Gravity};

/// Wraps one child and aligns it inside whatever slot the box is given.
///
/// The box declares its child's logical size until [`BoxView::set_size`]
/// overrides it.
pub struct BoxView {
    child: Box<dyn View>,
    gravity: Gravity,
    size: LogicalSize,
    position: Offset,
    rendered: Size,
}

impl BoxView {
    pub fn new(child: impl IntoView) -> Self {
        let child = child.into_view();
        let size = child.logical_size();
        Self {
            child,
            gravity: Gravity::CENTER,
            size,
            position: Offset::ZERO,
            rendered: Size::ZERO,
        }
    }

    pub fn gravity(mut self, horizontal: Align, vertical: Align) -> Self {
        self.gravity = Gravity::new(horizontal, vertical);
        self
    }

    pub fn set_size(mut self, width: i32, height: i32) -> Self {
        self.size = LogicalSize::new(width, height);
        self
    }

    pub fn child(&self) -> &dyn View {
        self.child.as_ref()
    }
}

impl View for BoxView {
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
        place(self.child.as_mut(), self.gravity, width, height, Offset::ZERO)
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        Some(self)
    }
}

impl Container for BoxView {
    fn children(&self) -> &[Box<dyn View>] {
        std::slice::from_ref(&self.child)
    }

    fn children_mut(&mut self) -> &mut [Box<dyn View>] {
        std::slice::from_mut(&mut self.child)
    }
}
