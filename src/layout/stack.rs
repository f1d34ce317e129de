//! Linear stacks: [`HStack`] lays children out left to right, [`VStack`] top
//! to bottom.
//!
//! Both share one algorithm parameterized by an [`Axis`]. On the main axis
//! fixed children get their declared length and the remaining space is split
//! evenly between floating children (`Fixed(0)` counts as fixed). On the
//! cross axis every child gets the full cross size of the stack and is
//! aligned inside that slot by the stack's gravity.
//!
//! Padding is inserted before every child. A horizontal stack also reserves
//! a trailing gap when it computes the floating share; a vertical stack does
//! not, so its last child ends flush with the bottom edge.

use std::marker::PhantomData;

use crate::geometry::{Dim, LogicalSize, Offset, Region, Size};
use crate::render::Canvas;
use crate::view::{IntoView, View};

use super::{place, Align, Container, Gravity};

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// The main axis of a [`Stack`].
pub trait Axis: Send + 'static {
    /// Whether the floating share reserves a padding after the last child.
    const TRAILING_GAP: bool;

    fn main(size: Size) -> i32;
    fn cross(size: Size) -> i32;
    fn main_dim(size: LogicalSize) -> Dim;
    fn cross_dim(size: LogicalSize) -> Dim;
    /// Build a size from main and cross lengths.
    fn size(main: i32, cross: i32) -> Size;
    /// Build an offset from main and cross coordinates.
    fn offset(main: i32, cross: i32) -> Offset;
}

/// Left to right.
#[derive(Debug, Clone, Copy)]
pub struct Horizontal;

/// Top to bottom.
#[derive(Debug, Clone, Copy)]
pub struct Vertical;

impl Axis for Horizontal {
    const TRAILING_GAP: bool = true;

    fn main(size: Size) -> i32 {
        size.width
    }
    fn cross(size: Size) -> i32 {
        size.height
    }
    fn main_dim(size: LogicalSize) -> Dim {
        size.width
    }
    fn cross_dim(size: LogicalSize) -> Dim {
        size.height
    }
    fn size(main: i32, cross: i32) -> Size {
        Size::new(main, cross)
    }
    fn offset(main: i32, cross: i32) -> Offset {
        Offset::new(main, cross)
    }
}

impl Axis for Vertical {
    const TRAILING_GAP: bool = false;

    fn main(size: Size) -> i32 {
        size.height
    }
    fn cross(size: Size) -> i32 {
        size.width
    }
    fn main_dim(size: LogicalSize) -> Dim {
        size.height
    }
    fn cross_dim(size: LogicalSize) -> Dim {
        size.width
    }
    fn size(main: i32, cross: i32) -> Size {
        Size::new(cross, main)
    }
    fn offset(main: i32, cross: i32) -> Offset {
        Offset::new(cross, main)
    }
}

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

/// A linear container along axis `A`.
pub struct Stack<A: Axis> {
    children: Vec<Box<dyn View>>,
    padding: i32,
    gravity: Gravity,
    size: LogicalSize,
    position: Offset,
    rendered: Size,
    _axis: PhantomData<A>,
}

pub type HStack = Stack<Horizontal>;
pub type VStack = Stack<Vertical>;

impl<A: Axis> Stack<A> {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            padding: 0,
            gravity: Gravity::CENTER,
            size: LogicalSize::FLOATING,
            position: Offset::ZERO,
            rendered: Size::ZERO,
            _axis: PhantomData,
        }
    }

    /// Append a child.
    pub fn child(mut self, view: impl IntoView) -> Self {
        self.children.push(view.into_view());
        self
    }

    /// Gap before each child, in cells. Negative values are treated as 0.
    pub fn padding(mut self, padding: i32) -> Self {
        self.padding = padding.max(0);
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

impl<A: Axis> Default for Stack<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Axis> View for Stack<A> {
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
        let requested = Size::new(width, height);
        let main = A::main(requested);
        let mut cross = A::cross(requested);

        let mut fixed_total = 0;
        let mut floating = 0;
        let mut max_cross = 0;
        for child in &self.children {
            let logical = child.logical_size();
            match A::main_dim(logical) {
                Dim::Fixed(n) => fixed_total += n,
                Dim::Floating => floating += 1,
            }
            if let Dim::Fixed(n) = A::cross_dim(logical) {
                max_cross = max_cross.max(n);
            }
        }
        if cross < 0 {
            cross = max_cross;
        }

        let count = self.children.len() as i32;
        let gaps = if A::TRAILING_GAP { count + 1 } else { count };
        let reserved = gaps * self.padding;
        let share = if floating > 0 { ((main - fixed_total - reserved) / floating).max(0) } else { 0 };
        let extent = main.min(fixed_total + floating * share + reserved);

        let size = A::size(main, cross);
        self.rendered = Size::new(size.width.max(0), size.height.max(0));
        let mut canvas = Canvas::new(size.width, size.height);
        let clip = Region::from_parts(Offset::ZERO, A::size(extent, cross));

        let mut cursor = self.padding;
        for child in &mut self.children {
            let length = A::main_dim(child.logical_size()).resolve(share);
            let origin = A::offset(cursor, 0);
            let slot = A::size(length, cross);
            let sub = place(child.as_mut(), self.gravity, slot.width, slot.height, origin);
            canvas.blit(&sub, origin, clip);
            cursor += length + self.padding;
        }
        canvas
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        Some(self)
    }
}

impl<A: Axis> Container for Stack<A> {
    fn children(&self) -> &[Box<dyn View>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn View>] {
        &mut self.children
    }
}

// ===========================================================================
// Tests
// ===========================================================================
