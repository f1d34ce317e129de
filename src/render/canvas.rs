//! Canvas: a column-major grid of cells.
//!
//! Every view renders into a freshly allocated `Canvas`; containers copy the
//! visible part of each child canvas into their own, and the window ships the
//! root canvas to the server. `canvas.get(x, y)` is the cell at column x,
//! row y.

use crate::geometry::{Offset, Region, Size};

use super::cell::Cell;

/// A fixed-size 2D grid of [`Cell`]s stored as columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    /// `columns[x][y]` is the cell at column x, row y.
    columns: Vec<Vec<Cell>>,
    width: i32,
    height: i32,
}

impl Canvas {
    /// Create a blank canvas. Negative dimensions are treated as 0.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Cell::BLANK)
    }

    /// Create a canvas with every cell set to `cell`.
    pub fn filled(width: i32, height: i32, cell: Cell) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            columns: vec![vec![cell; height as usize]; width as usize],
            width,
            height,
        }
    }

    /// Build a canvas from columns. Returns `None` if the columns are ragged.
    pub fn from_columns(columns: Vec<Vec<Cell>>) -> Option<Self> {
        let height = columns.first().map_or(0, Vec::len);
        if columns.iter().any(|column| column.len() != height) {
            return None;
        }
        let width = i32::try_from(columns.len()).ok()?;
        let height = i32::try_from(height).ok()?;
        Some(Self { columns, width, height })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The full extent of the canvas, anchored at the origin.
    #[inline]
    pub fn region(&self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }

    /// The columns, left to right.
    pub fn columns(&self) -> &[Vec<Cell>] {
        &self.columns
    }

    /// The cell at (x, y), or `None` when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        if !self.region().contains(x, y) {
            return None;
        }
        self.columns.get(x as usize)?.get(y as usize)
    }

    /// Overwrite the cell at (x, y). Out-of-bounds writes are ignored and
    /// return `false`.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if !self.region().contains(x, y) {
            return false;
        }
        match self.columns.get_mut(x as usize).and_then(|c| c.get_mut(y as usize)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Iterate all cells column by column as `(x, y, cell)`.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, &Cell)> + '_ {
        self.columns.iter().enumerate().flat_map(|(x, column)| {
            column.iter().enumerate().map(move |(y, cell)| (x as i32, y as i32, cell))
        })
    }

    /// Apply `f` to every cell in place.
    pub fn map_cells(&mut self, mut f: impl FnMut(Cell) -> Cell) {
        for column in &mut self.columns {
            for cell in column.iter_mut() {
                *cell = f(*cell);
            }
        }
    }

    /// Copy cells from `src` into `self`, with `src`'s origin placed at `at`.
    ///
    /// Only destination cells inside `clip`, inside `self`, and backed by a
    /// source cell are written.
    pub fn blit(&mut self, src: &Canvas, at: Offset, clip: Region) {
        let x0 = clip.x.max(0).max(at.x);
        let y0 = clip.y.max(0).max(at.y);
        let x1 = clip.right().min(self.width).min(at.x + src.width);
        let y1 = clip.bottom().min(self.height).min(at.y + src.height);

        for x in x0..x1 {
            for y in y0..y1 {
                if let Some(cell) = src.get(x - at.x, y - at.y) {
                    self.set(x, y, *cell);
                }
            }
        }
    }

    /// Composite `layer` over this canvas cell by cell, where sizes overlap.
    pub fn composite(&mut self, layer: &Canvas) {
        let width = self.width.min(layer.width);
        let height = self.height.min(layer.height);
        for x in 0..width {
            for y in 0..height {
                if let (Some(top), Some(bottom)) = (layer.get(x, y), self.get(x, y)) {
                    let out = top.over(*bottom);
                    self.set(x, y, out);
                }
            }
        }
    }

    /// The characters of row `y`, left to right.
    pub fn row_text(&self, y: i32) -> String {
        (0..self.width).filter_map(|x| self.get(x, y).map(|cell| cell.ch)).collect()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Attr, Color};
    use pretty_assertions::assert_eq;

    fn glyph(ch: char) -> Cell {
        Cell::new(ch, Color::BLACK, Color::WHITE, Attr::empty())
    }

    #[test]
    fn negative_dimensions_become_zero() {
        let canvas = Canvas::new(-3, 4);
        assert_eq!(canvas.size(), Size::new(0, 4));
        assert!(canvas.columns().is_empty());

        let canvas = Canvas::new(2, -1);
        assert_eq!(canvas.size(), Size::new(2, 0));
        assert_eq!(canvas.columns().len(), 2);
        assert!(canvas.columns()[0].is_empty());
    }

    #[test]
    fn new_canvas_is_blank() {
        let canvas = Canvas::new(3, 2);
        assert!(canvas.cells().all(|(_, _, cell)| *cell == Cell::BLANK));
        assert_eq!(canvas.cells().count(), 6);
    }

    #[test]
    fn get_and_set_respect_bounds() {
        let mut canvas = Canvas::new(2, 2);
        assert!(canvas.set(1, 1, glyph('a')));
        assert!(!canvas.set(2, 0, glyph('b')));
        assert!(!canvas.set(-1, 0, glyph('b')));
        assert_eq!(canvas.get(1, 1), Some(&glyph('a')));
        assert_eq!(canvas.get(0, 5), None);
    }

    #[test]
    fn cells_iterate_column_major() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set(1, 0, glyph('x'));
        let order: Vec<(i32, i32)> = canvas.cells().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn from_columns_rejects_ragged_input() {
        assert!(Canvas::from_columns(vec![vec![Cell::BLANK; 2], vec![Cell::BLANK; 1]]).is_none());
        let canvas = Canvas::from_columns(vec![vec![Cell::BLANK; 3]; 2]).unwrap();
        assert_eq!(canvas.size(), Size::new(2, 3));
    }

    #[test]
    fn blit_clips_to_destination_and_region() {
        let src = Canvas::filled(4, 1, glyph('s'));
        let mut dst = Canvas::new(5, 1);
        dst.blit(&src, Offset::new(2, 0), Region::new(0, 0, 4, 1));
        assert_eq!(dst.row_text(0), "  ss ");
    }

    #[test]
    fn blit_with_negative_offset_shows_tail() {
        let mut src = Canvas::new(4, 1);
        for (x, ch) in "abcd".chars().enumerate() {
            src.set(x as i32, 0, glyph(ch));
        }
        let mut dst = Canvas::new(2, 1);
        dst.blit(&src, Offset::new(-2, 0), dst.region());
        assert_eq!(dst.row_text(0), "cd");
    }

    #[test]
    fn composite_applies_over() {
        let mut base = Canvas::filled(2, 1, glyph('b'));
        let mut layer = Canvas::new(2, 1);
        layer.set(0, 0, glyph('t'));
        base.composite(&layer);
        assert_eq!(base.row_text(0), "tb");
    }

    #[test]
    fn map_cells_touches_every_cell() {
        let mut canvas = Canvas::filled(2, 2, glyph('a'));
        canvas.map_cells(Cell::darkened);
        assert!(canvas.cells().all(|(_, _, c)| c.bg == Color::WHITE.darkened()));
    }
}
