//! Cell: one character with colors and attributes.
//!
//! A [`Cell`] is the atomic unit of every [`Canvas`](super::Canvas). Colors
//! carry an alpha channel so that stacked layers can be composited with
//! [`Cell::over`].

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREY: Color = Color::rgb(127, 127, 127);
    pub const LIGHT_GREY: Color = Color::rgb(192, 192, 192);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    /// Create a color with an explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Halve every color channel, keeping alpha. Used for pressed widgets.
    pub const fn darkened(self) -> Self {
        Self { r: self.r / 2, g: self.g / 2, b: self.b / 2, a: self.a }
    }

    /// Alpha-composite `self` on top of `below`.
    ///
    /// out_a = src_a + dst_a * (1 - src_a)
    /// out_rgb = (src_rgb * src_a + dst_rgb * dst_a * (1 - src_a)) / out_a
    pub fn over(self, below: Color) -> Color {
        match self.a {
            255 => return self,
            0 => return below,
            _ => {}
        }

        let sa = i32::from(self.a);
        let da = i32::from(below.a);
        let inv_sa = 255 - sa;
        let out_a = sa + da * inv_sa / 255;
        if out_a == 0 {
            return Color::TRANSPARENT;
        }

        let channel = |src: u8, dst: u8| -> u8 {
            let value = (i32::from(src) * sa + i32::from(dst) * da * inv_sa / 255) / out_a;
            value.clamp(0, 255) as u8
        };

        Color {
            r: channel(self.r, below.r),
            g: channel(self.g, below.g),
            b: channel(self.b, below.b),
            a: out_a.clamp(0, 255) as u8,
        }
    }
}

// ---------------------------------------------------------------------------
// Attr
// ---------------------------------------------------------------------------

bitflags::bitflags! {
    /// Text attributes understood by the window server's terminal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u8 {
        const BOLD = 1 << 0;
        const BLINK = 1 << 1;
        const HIDDEN = 1 << 2;
        const DIM = 1 << 3;
        const UNDERLINE = 1 << 4;
        const CURSIVE = 1 << 5;
        const REVERSE = 1 << 6;
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single terminal cell: one character with colors and attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub attr: Attr,
}

impl Cell {
    /// A blank cell: a space with transparent colors.
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::TRANSPARENT,
        bg: Color::TRANSPARENT,
        attr: Attr::empty(),
    };

    /// Create a new cell.
    pub const fn new(ch: char, fg: Color, bg: Color, attr: Attr) -> Self {
        Self { ch, fg, bg, attr }
    }

    /// The cell's alpha channel (its background alpha).
    pub const fn alpha(&self) -> u8 {
        self.bg.a
    }

    /// Same cell with both colors darkened.
    pub const fn darkened(self) -> Self {
        Self { fg: self.fg.darkened(), bg: self.bg.darkened(), ..self }
    }

    /// Composite this cell over `below`.
    ///
    /// Alpha 0 yields `below` unchanged and alpha 255 yields `self` unchanged.
    /// In between, backgrounds are blended; a blank glyph lets the glyph below
    /// show through, tinted by this cell's foreground.
    pub fn over(self, below: Cell) -> Cell {
        match self.alpha() {
            0 => return below,
            255 => return self,
            _ => {}
        }

        let bg = self.bg.over(below.bg);
        if self.ch == ' ' {
            Cell { ch: below.ch, fg: self.fg.over(below.fg), bg, attr: below.attr }
        } else {
            Cell { ch: self.ch, fg: self.fg, bg, attr: self.attr }
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

// ===========================================================================
// Tests
// ===========================================================================
