//! Snapshot rendering helpers.
//!
//! Functions for converting rendered canvases into plain-text strings
//! suitable for snapshot testing and assertions.

use crate::render::Canvas;
use crate::view::View;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render a view into a `width` x `height` canvas and convert it to text.
///
/// # Examples
///
/// ```ignore
/// use fws_ui::testing::render_to_string;
/// use fws_ui::view::Text;
///
/// let output = render_to_string(&mut Text::new("Hello"), 20, 1);
/// assert_eq!(output, "Hello");
/// ```
pub fn render_to_string(view: &mut dyn View, width: i32, height: i32) -> String {
    canvas_to_string(&view.render(width, height))
}

/// Convert a canvas to a plain text string.
///
/// Each row becomes one line with trailing spaces trimmed. Lines are
/// separated by `'\n'`; the final line has no trailing newline.
pub fn canvas_to_string(canvas: &Canvas) -> String {
    if canvas.width() == 0 || canvas.height() == 0 {
        return String::new();
    }

    let lines: Vec<String> = (0..canvas.height())
        .map(|y| canvas.row_text(y).trim_end().to_owned())
        .collect();
    lines.join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================
