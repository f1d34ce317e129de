//! The view tree: the `View` trait and the leaf widgets.
//!
//! A view declares a [`LogicalSize`], is told its position by the container
//! that placed it, and renders itself into a fresh [`Canvas`] of the size the
//! container decided. Containers live in [`crate::layout`].

pub mod button;
pub mod spacer;
pub mod text;
pub mod text_field;

use crate::geometry::{LogicalSize, Offset, Size};
use crate::gesture::Gesture;
use crate::layout::Container;
use crate::render::Canvas;

pub use button::Button;
pub use spacer::Spacer;
pub use text::Text;
pub use text_field::{TextField, TextFieldHandle};

/// A node in the view tree.
///
/// Object-safe: windows hold the tree as `Box<dyn View>`.
pub trait View: Send {
    /// The declared size, possibly floating on either axis.
    fn logical_size(&self) -> LogicalSize;

    /// The size after the last layout. Never negative.
    fn actual_size(&self) -> Size;

    /// Position relative to the canvas of the enclosing container.
    fn position(&self) -> Offset;

    fn set_position(&mut self, position: Offset);

    /// Render at exactly `width` x `height` cells.
    fn render(&mut self, width: i32, height: i32) -> Canvas;

    fn gesture(&self) -> Option<&Gesture> {
        None
    }

    fn gesture_mut(&mut self) -> Option<&mut Gesture> {
        None
    }

    fn has_gesture(&self) -> bool {
        self.gesture().is_some()
    }

    /// The container capability, for views that have children.
    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        None
    }
}

/// Convert anything view-like into a boxed trait object.
pub trait IntoView {
    fn into_view(self) -> Box<dyn View>;
}

impl<V: View + 'static> IntoView for V {
    fn into_view(self) -> Box<dyn View> {
        Box::new(self)
    }
}

impl IntoView for Box<dyn View> {
    fn into_view(self) -> Box<dyn View> {
        self
    }
}
