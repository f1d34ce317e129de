//! Layout containers and the placement rules they share.
//!
//! Containers decide the size each child renders at and where the child's
//! canvas lands inside their own canvas. Every child position is relative to
//! the canvas of its container; absolute (window) coordinates are obtained by
//! accumulating positions from the root down, which is what
//! [`collect_gestures`] does when it rebuilds the hit index.

pub mod boxed;
pub mod stack;
pub mod zstack;

use crate::geometry::{Offset, Region, Size};
use crate::gesture::{GestureDescriptor, GesturePath};
use crate::render::Canvas;
use crate::view::View;

pub use boxed::BoxView;
pub use stack::{HStack, Stack, VStack};
pub use zstack::ZStack;

// ---------------------------------------------------------------------------
// Align
// ---------------------------------------------------------------------------

/// Alignment along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// `Top` reads better on the vertical axis.
    pub const TOP: Align = Align::Left;
    /// `Bottom` reads better on the vertical axis.
    pub const BOTTOM: Align = Align::Right;

    /// Offset of content of length `content` inside `available` cells.
    /// Negative when the content overflows.
    pub fn shift(self, available: i32, content: i32) -> i32 {
        match self {
            Align::Left => 0,
            Align::Center => (available - content) / 2,
            Align::Right => available - content,
        }
    }
}

/// Horizontal and vertical alignment of a child inside its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gravity {
    pub horizontal: Align,
    pub vertical: Align,
}

impl Gravity {
    pub const CENTER: Gravity = Gravity::new(Align::Center, Align::Center);

    pub const fn new(horizontal: Align, vertical: Align) -> Self {
        Self { horizontal, vertical }
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::CENTER
    }
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// A view with children.
pub trait Container: View {
    fn children(&self) -> &[Box<dyn View>];

    fn children_mut(&mut self) -> &mut [Box<dyn View>];

    /// Append a descriptor for every gesture in the subtree below this
    /// container. `origin` is the window position of this container's canvas.
    fn collect_child_gestures(&mut self, origin: Offset, path: &GesturePath, out: &mut Vec<GestureDescriptor>) {
        for (index, child) in self.children_mut().iter_mut().enumerate() {
            collect_view(child.as_mut(), origin, path.child(index), out);
        }
    }
}

/// Place `child` in a `width` x `height` slot according to `gravity`.
///
/// The child renders at its logical size resolved against the slot, its
/// position is set to `origin` plus the non-negative part of the alignment
/// shift, and the returned canvas is exactly the slot size with the child's
/// canvas copied in at the (possibly negative) shift.
pub fn place(child: &mut dyn View, gravity: Gravity, width: i32, height: i32, origin: Offset) -> Canvas {
    let mut slot = Canvas::new(width, height);
    let content = child.logical_size().resolve(Size::new(width, height));
    let shift = Offset::new(
        gravity.horizontal.shift(width, content.width),
        gravity.vertical.shift(height, content.height),
    );
    child.set_position(origin + Offset::new(shift.x.max(0), shift.y.max(0)));
    let rendered = child.render(content.width, content.height);
    let clip = slot.region();
    slot.blit(&rendered, shift, clip);
    slot
}

// ---------------------------------------------------------------------------
// Gesture collection
// ---------------------------------------------------------------------------

/// Walk the tree under `root` (whose canvas sits at the window origin), bind
/// every gesture to its window rectangle, and return the descriptors in
/// painter's order.
pub fn collect_gestures(root: &mut dyn View) -> Vec<GestureDescriptor> {
    let mut out = Vec::new();
    collect_view(root, Offset::ZERO, GesturePath::root(), &mut out);
    out
}

fn collect_view(view: &mut dyn View, parent_origin: Offset, path: GesturePath, out: &mut Vec<GestureDescriptor>) {
    let origin = parent_origin + view.position();
    let region = Region::from_parts(origin, view.actual_size());
    if let Some(gesture) = view.gesture_mut() {
        gesture.bind_region(region);
        out.push(GestureDescriptor::new(region, path.clone()));
    }
    if let Some(container) = view.as_container_mut() {
        container.collect_child_gestures(origin, &path, out);
    }
}

/// The view at `path` below `view`.
pub fn view_at_path<'a>(view: &'a mut dyn View, path: &[usize]) -> Option<&'a mut dyn View> {
    let Some((first, rest)) = path.split_first() else {
        return Some(view);
    };
    let child = view.as_container_mut()?.children_mut().get_mut(*first)?;
    view_at_path(child.as_mut(), rest)
}

// ===========================================================================
// Tests
// ===========================================================================
