//! Text: a styled single line of characters.

use crate::geometry::{Dim, LogicalSize, Offset, Size};
use crate::gesture::Gesture;
use crate::layout::Align;
use crate::render::{Attr, Canvas, Cell, Color};

use super::View;

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// A line of text drawn on the middle row of its canvas.
///
/// Every cell of the canvas gets the text's colors and attributes; the
/// characters are written over that background starting at the column chosen
/// by the alignment. Characters that fall outside the canvas are dropped.
///
/// # Examples
///
/// ```ignore
/// let title = Text::new("fws").align(Align::Center).bold(true).set_size(-1, 1);
/// ```
#[derive(Debug)]
pub struct Text {
    text: String,
    align: Align,
    attr: Attr,
    foreground: Color,
    background: Color,
    size: LogicalSize,
    position: Offset,
    rendered: Size,
    gesture: Option<Gesture>,
}

impl Text {
    /// Create left-aligned text sized to its character count and one row.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let width = char_count(&text);
        Self {
            text,
            align: Align::Left,
            attr: Attr::empty(),
            foreground: Color::TRANSPARENT,
            background: Color::TRANSPARENT,
            size: LogicalSize::fixed(width, 1),
            position: Offset::ZERO,
            rendered: Size::ZERO,
            gesture: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn bold(self, on: bool) -> Self {
        self.with_attr(Attr::BOLD, on)
    }

    pub fn blink(self, on: bool) -> Self {
        self.with_attr(Attr::BLINK, on)
    }

    pub fn hidden(self, on: bool) -> Self {
        self.with_attr(Attr::HIDDEN, on)
    }

    pub fn dim(self, on: bool) -> Self {
        self.with_attr(Attr::DIM, on)
    }

    pub fn underline(self, on: bool) -> Self {
        self.with_attr(Attr::UNDERLINE, on)
    }

    pub fn cursive(self, on: bool) -> Self {
        self.with_attr(Attr::CURSIVE, on)
    }

    pub fn reverse(self, on: bool) -> Self {
        self.with_attr(Attr::REVERSE, on)
    }

    fn with_attr(mut self, flag: Attr, on: bool) -> Self {
        self.attr.set(flag, on);
        self
    }

    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Override the logical size. Negative values mean floating.
    pub fn set_size(mut self, width: i32, height: i32) -> Self {
        self.size = LogicalSize::new(width, height);
        self
    }

    /// Replace the content and reset the width to the new character count.
    pub fn set_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self.size.width = Dim::Fixed(char_count(&self.text));
        self
    }

    /// Attach a gesture, replacing any previous one.
    pub fn with_gesture(mut self, gesture: impl Into<Gesture>) -> Self {
        self.gesture = Some(gesture.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attributes(&self) -> Attr {
        self.attr
    }

    pub fn colors(&self) -> (Color, Color) {
        (self.foreground, self.background)
    }

    /// Replace the content in place, keeping the logical size.
    pub(crate) fn replace_content(&mut self, text: String) {
        self.text = text;
    }

    pub(crate) fn set_foreground(&mut self, color: Color) {
        self.foreground = color;
    }

    fn blank(&self) -> Cell {
        Cell::new(' ', self.foreground, self.background, self.attr)
    }
}

fn char_count(text: &str) -> i32 {
    i32::try_from(text.chars().count()).unwrap_or(i32::MAX)
}

impl View for Text {
    fn logical_size(&self) -> LogicalSize {
        self.size
    }

    fn actual_size(&self) -> Size {
        match (self.size.width, self.size.height) {
            (Dim::Fixed(w), Dim::Fixed(h)) if w > 0 && h > 0 => Size::new(w, h),
            _ => self.rendered,
        }
    }

    fn position(&self) -> Offset {
        self.position
    }

    fn set_position(&mut self, position: Offset) {
        self.position = position;
    }

    fn render(&mut self, width: i32, height: i32) -> Canvas {
        self.rendered = Size::new(width.max(0), height.max(0));
        let blank = self.blank();
        let mut canvas = Canvas::filled(width, height, blank);

        let start = self.align.shift(width, char_count(&self.text));
        let row = height / 2;
        for (i, ch) in self.text.chars().enumerate() {
            let x = start.saturating_add(i32::try_from(i).unwrap_or(i32::MAX));
            if x >= width {
                break;
            }
            canvas.set(x, row, Cell { ch, ..blank });
        }
        canvas
    }

    fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    fn gesture_mut(&mut self) -> Option<&mut Gesture> {
        self.gesture.as_mut()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::ClickGesture;

    #[test]
    fn default_size_is_char_count_by_one() {
        let text = Text::new("héllo");
        assert_eq!(text.logical_size(), LogicalSize::fixed(5, 1));
        assert_eq!(text.actual_size(), Size::new(5, 1));
        assert!(!text.has_gesture());
    }

    #[test]
    fn alignment_on_middle_row() {
        let mut text = Text::new("ab").align(Align::Center);
        let canvas = text.render(6, 3);
        assert_eq!(canvas.row_text(0), "      ");
        assert_eq!(canvas.row_text(1), "  ab  ");

        let mut text = Text::new("ab").align(Align::Right);
        assert_eq!(text.render(5, 1).row_text(0), "   ab");
    }

    #[test]
    fn every_cell_carries_the_style() {
        let mut text = Text::new("x").foreground(Color::WHITE).background(Color::RED).bold(true).underline(true);
        let canvas = text.render(3, 2);
        for (_, _, cell) in canvas.cells() {
            assert_eq!(cell.fg, Color::WHITE);
            assert_eq!(cell.bg, Color::RED);
            assert_eq!(cell.attr, Attr::BOLD | Attr::UNDERLINE);
        }
    }

    #[test]
    fn attribute_flags_toggle() {
        let text = Text::new("").bold(true).dim(true).bold(false);
        assert_eq!(text.attributes(), Attr::DIM);
        let text = Text::new("").blink(true).hidden(true).cursive(true).reverse(true);
        assert_eq!(text.attributes(), Attr::BLINK | Attr::HIDDEN | Attr::CURSIVE | Attr::REVERSE);
    }

    #[test]
    fn text_is_cut_at_both_edges() {
        let mut text = Text::new("abcdef").align(Align::Center);
        assert_eq!(text.render(2, 1).row_text(0), "cd");
        let mut text = Text::new("abcdef");
        assert_eq!(text.render(3, 1).row_text(0), "abc");
    }

    #[test]
    fn floating_text_reports_rendered_size() {
        let mut text = Text::new("t").set_size(-1, 1);
        assert_eq!(text.actual_size(), Size::ZERO);
        text.render(12, 1);
        assert_eq!(text.actual_size(), Size::new(12, 1));
    }

    #[test]
    fn set_text_resets_width_only() {
        let text = Text::new("a").set_size(-1, 3).set_text("four");
        assert_eq!(text.logical_size(), LogicalSize::fixed(4, 3));
        assert_eq!(text.text(), "four");
    }

    #[test]
    fn gesture_is_exposed() {
        let text = Text::new("ok").with_gesture(ClickGesture::left(1));
        assert!(text.has_gesture());
    }

    #[test]
    fn degenerate_sizes_render_empty() {
        let mut text = Text::new("abc");
        assert_eq!(text.render(0, 0).size(), Size::ZERO);
        assert_eq!(text.render(-3, 2).size(), Size::new(0, 2));
    }
}
