//! Core geometry types: Offset, Size, Region, Dim, LogicalSize.
//!
//! These are the coordinate types used throughout fws-ui for positioning,
//! sizing, and hit-testing views in the character-cell grid. All values are
//! signed cell counts; a [`Dim`] is the only place where "floating" (size left
//! to the enclosing layout) is representable.

use std::ops::{Add, Neg, Sub};

// ---------------------------------------------------------------------------
// Offset
// ---------------------------------------------------------------------------

/// A 2D displacement or position in terminal cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    /// The origin.
    pub const ZERO: Offset = Offset { x: 0, y: 0 };

    /// Create a new offset.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Offset {
    type Output = Offset;
    #[inline]
    fn add(self, rhs: Offset) -> Offset {
        Offset { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Offset {
    type Output = Offset;
    #[inline]
    fn sub(self, rhs: Offset) -> Offset {
        Offset { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Offset {
    type Output = Offset;
    #[inline]
    fn neg(self) -> Offset {
        Offset { x: -self.x, y: -self.y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A concrete 2D size in terminal cells (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0, height: 0 };

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Grow (or shrink) by a translation.
    #[inline]
    pub const fn translate(self, by: Offset) -> Size {
        Size { width: self.width + by.x, height: self.height + by.y }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A rectangular region in terminal cells defined by position and size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// An empty region at the origin.
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    /// Create a new region.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a region from a top-left corner and a size.
    #[inline]
    pub const fn from_parts(origin: Offset, size: Size) -> Self {
        Self { x: origin.x, y: origin.y, width: size.width, height: size.height }
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// The top-left corner as an [`Offset`].
    #[inline]
    pub const fn offset(self) -> Offset {
        Offset { x: self.x, y: self.y }
    }

    /// The dimensions as a [`Size`].
    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Whether the point (x, y) lies inside this region.
    #[inline]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the point lies inside this region.
    #[inline]
    pub const fn contains_point(self, point: Offset) -> bool {
        self.contains(point.x, point.y)
    }

    /// Translate the region by an [`Offset`].
    #[inline]
    pub const fn translate(self, offset: Offset) -> Region {
        Region { x: self.x + offset.x, y: self.y + offset.y, width: self.width, height: self.height }
    }
}

// ---------------------------------------------------------------------------
// Dim / LogicalSize
// ---------------------------------------------------------------------------

/// One declared dimension of a view.
///
/// `Floating` means the dimension is decided by the parent's available space
/// at layout time. Any negative integer converts to `Floating`, so builder
/// calls like `set_size(-1, 1)` read the same as the window server's own
/// sentinel convention.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dim {
    Fixed(i32),
    #[default]
    Floating,
}

impl Dim {
    /// The fixed value, or `None` when floating.
    #[inline]
    pub const fn fixed(self) -> Option<i32> {
        match self {
            Dim::Fixed(n) => Some(n),
            Dim::Floating => None,
        }
    }

    /// Whether the dimension is floating.
    #[inline]
    pub const fn is_floating(self) -> bool {
        matches!(self, Dim::Floating)
    }

    /// Resolve against the space the parent makes available.
    #[inline]
    pub const fn resolve(self, available: i32) -> i32 {
        match self {
            Dim::Fixed(n) => n,
            Dim::Floating => available,
        }
    }
}

impl From<i32> for Dim {
    fn from(value: i32) -> Self {
        if value < 0 {
            Dim::Floating
        } else {
            Dim::Fixed(value)
        }
    }
}

/// The declared (pre-layout) size of a view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LogicalSize {
    pub width: Dim,
    pub height: Dim,
}

impl LogicalSize {
    /// Both dimensions floating.
    pub const FLOATING: LogicalSize = LogicalSize { width: Dim::Floating, height: Dim::Floating };

    /// Create a logical size from anything convertible to [`Dim`].
    #[inline]
    pub fn new(width: impl Into<Dim>, height: impl Into<Dim>) -> Self {
        Self { width: width.into(), height: height.into() }
    }

    /// A fully fixed logical size.
    #[inline]
    pub const fn fixed(width: i32, height: i32) -> Self {
        Self { width: Dim::Fixed(width), height: Dim::Fixed(height) }
    }

    /// Resolve both dimensions against the available space.
    #[inline]
    pub const fn resolve(self, available: Size) -> Size {
        Size {
            width: self.width.resolve(available.width),
            height: self.height.resolve(available.height),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Offset
    // -----------------------------------------------------------------------

    #[test]
    fn offset_new_and_default() {
        assert_eq!(Offset::new(3, -7), Offset { x: 3, y: -7 });
        assert_eq!(Offset::default(), Offset::ZERO);
    }

    #[test]
    fn offset_add_sub() {
        let a = Offset::new(1, 2);
        let b = Offset::new(3, 4);
        assert_eq!(a + b, Offset::new(4, 6));
        assert_eq!(b - a, Offset::new(2, 2));
    }

    #[test]
    fn offset_neg() {
        assert_eq!(-Offset::new(5, -3), Offset::new(-5, 3));
    }

    // -----------------------------------------------------------------------
    // Size
    // -----------------------------------------------------------------------

    #[test]
    fn size_translate() {
        assert_eq!(Size::new(50, 18).translate(Offset::new(20, 10)), Size::new(70, 28));
        assert_eq!(Size::new(50, 18).translate(Offset::new(-40, -15)), Size::new(10, 3));
    }

    // -----------------------------------------------------------------------
    // Region
    // -----------------------------------------------------------------------

    #[test]
    fn region_edges() {
        let r = Region::new(2, 3, 10, 5);
        assert_eq!(r.right(), 12);
        assert_eq!(r.bottom(), 8);
        assert_eq!(r.offset(), Offset::new(2, 3));
        assert_eq!(r.size(), Size::new(10, 5));
    }

    #[test]
    fn region_contains_is_half_open() {
        let r = Region::new(0, 0, 3, 1);
        assert!(r.contains(0, 0));
        assert!(r.contains(2, 0));
        assert!(!r.contains(3, 0));
        assert!(!r.contains(0, 1));
        assert!(!r.contains(-1, 0));
    }

    #[test]
    fn region_empty_contains_nothing() {
        assert!(!Region::EMPTY.contains(0, 0));
    }

    #[test]
    fn region_from_parts_and_translate() {
        let r = Region::from_parts(Offset::new(1, 1), Size::new(4, 2));
        assert_eq!(r, Region::new(1, 1, 4, 2));
        assert_eq!(r.translate(Offset::new(2, -1)), Region::new(3, 0, 4, 2));
        assert!(r.contains_point(Offset::new(4, 2)));
    }

    // -----------------------------------------------------------------------
    // Dim / LogicalSize
    // -----------------------------------------------------------------------

    #[test]
    fn negative_integers_are_floating() {
        assert_eq!(Dim::from(-1), Dim::Floating);
        assert_eq!(Dim::from(-42), Dim::Floating);
        assert_eq!(Dim::from(0), Dim::Fixed(0));
        assert_eq!(Dim::from(7), Dim::Fixed(7));
    }

    #[test]
    fn dim_resolve() {
        assert_eq!(Dim::Fixed(3).resolve(50), 3);
        assert_eq!(Dim::Floating.resolve(50), 50);
        assert_eq!(Dim::Floating.fixed(), None);
        assert!(Dim::default().is_floating());
    }

    #[test]
    fn logical_size_resolve() {
        let size = LogicalSize::new(-1, 1);
        assert_eq!(size.resolve(Size::new(50, 18)), Size::new(50, 1));
        assert_eq!(LogicalSize::FLOATING.resolve(Size::new(4, 4)), Size::new(4, 4));
        assert_eq!(LogicalSize::fixed(3, 1).resolve(Size::new(9, 9)), Size::new(3, 1));
    }
}
