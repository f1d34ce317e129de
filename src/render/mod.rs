//! Rendering primitives: cells, colors, attributes, and the canvas.

pub mod canvas;
pub mod cell;

pub use canvas::Canvas;
pub use cell::{Attr, Cell, Color};
