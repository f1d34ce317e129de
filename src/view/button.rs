//! Button: a clickable label.
//!
//! The label is centered, two cells wider than its text, white on grey.
//! While a left press is held inside the button its colors are darkened; a
//! completed click that ends inside runs the action.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::geometry::{LogicalSize, Offset, Size};
use crate::gesture::{ClickGesture, EventContext, Gesture};
use crate::layout::Align;
use crate::render::{Canvas, Cell, Color};

use super::{Text, View};

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A one-row button.
///
/// # Examples
///
/// ```ignore
/// let quit = Button::new("Quit", |ctx| ctx.quit());
/// ```
#[derive(Debug)]
pub struct Button {
    label: Text,
    pressed: Arc<AtomicBool>,
}

impl Button {
    /// Create a button whose `action` runs when a click ends inside it.
    pub fn new(label: impl Into<String>, action: impl FnMut(&mut EventContext) + Send + 'static) -> Self {
        let label = label.into();
        let width = i32::try_from(label.chars().count()).unwrap_or(i32::MAX - 2) + 2;
        let pressed = Arc::new(AtomicBool::new(false));

        let on_press = Arc::clone(&pressed);
        let on_release = Arc::clone(&pressed);
        let mut action = action;
        let click = ClickGesture::left(1)
            .on_changed(move |inside, _| on_press.store(inside, Ordering::Relaxed))
            .on_ended(move |inside, ctx| {
                on_release.store(false, Ordering::Relaxed);
                if inside {
                    action(ctx);
                }
            });

        let label = Text::new(label)
            .align(Align::Center)
            .foreground(Color::WHITE)
            .background(Color::GREY)
            .set_size(width, 1)
            .with_gesture(click);
        Self { label, pressed }
    }

    pub fn foreground(mut self, color: Color) -> Self {
        self.label = self.label.foreground(color);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.label = self.label.background(color);
        self
    }

    pub fn set_size(mut self, width: i32, height: i32) -> Self {
        self.label = self.label.set_size(width, height);
        self
    }

    pub fn label(&self) -> &str {
        self.label.text()
    }

    /// Whether a press is currently held inside the button.
    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Relaxed)
    }
}

impl View for Button {
    fn logical_size(&self) -> LogicalSize {
        self.label.logical_size()
    }

    fn actual_size(&self) -> Size {
        self.label.actual_size()
    }

    fn position(&self) -> Offset {
        self.label.position()
    }

    fn set_position(&mut self, position: Offset) {
        self.label.set_position(position);
    }

    fn render(&mut self, width: i32, height: i32) -> Canvas {
        let mut canvas = self.label.render(width, height);
        if self.is_pressed() {
            canvas.map_cells(Cell::darkened);
        }
        canvas
    }

    fn gesture(&self) -> Option<&Gesture> {
        self.label.gesture()
    }

    fn gesture_mut(&mut self) -> Option<&mut Gesture> {
        self.label.gesture_mut()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{MouseAction, MouseBtn, MouseEvent};
    use crate::geometry::Region;
    use crate::gesture::WindowCommand;

    fn press(x: i32) -> MouseEvent {
        MouseEvent::new(MouseAction::Down(MouseBtn::Left), x, 0)
    }

    fn release(x: i32) -> MouseEvent {
        MouseEvent::new(MouseAction::Release, x, 0)
    }

    fn bound(mut button: Button) -> Button {
        button.render(3, 1);
        if let Some(g) = button.gesture_mut() {
            g.bind_region(Region::new(0, 0, 3, 1));
        }
        button
    }

    #[test]
    fn label_is_padded_centered_white_on_grey() {
        let mut button = Button::new("X", |_| {});
        assert_eq!(button.logical_size(), LogicalSize::fixed(3, 1));
        let canvas = button.render(3, 1);
        assert_eq!(canvas.row_text(0), " X ");
        assert_eq!(canvas.get(1, 0).map(|c| (c.fg, c.bg)), Some((Color::WHITE, Color::GREY)));
        assert_eq!(button.label(), "X");
    }

    #[test]
    fn held_press_darkens_until_release() {
        let mut button = bound(Button::new("X", |_| {}).background(Color::RED));
        let mut ctx = EventContext::default();
        let gesture = button.gesture_mut().unwrap();
        gesture.update(&press(1), &mut ctx);
        assert!(button.is_pressed());
        let canvas = button.render(3, 1);
        assert_eq!(canvas.get(0, 0).unwrap().bg, Color::RED.darkened());

        button.gesture_mut().unwrap().update(&release(1), &mut ctx);
        assert!(!button.is_pressed());
        assert_eq!(button.render(3, 1).get(0, 0).unwrap().bg, Color::RED);
    }

    #[test]
    fn click_inside_runs_action_with_context() {
        let mut button = bound(Button::new("X", |ctx| ctx.close_window()));
        let mut ctx = EventContext::default();
        let gesture = button.gesture_mut().unwrap();
        gesture.update(&press(0), &mut ctx);
        gesture.update(&release(2), &mut ctx);
        assert!(matches!(ctx.commands(), [WindowCommand::Close]));
    }

    #[test]
    fn release_outside_does_not_run_action() {
        let mut button = bound(Button::new("X", |ctx| ctx.close_window()));
        let mut ctx = EventContext::default();
        let gesture = button.gesture_mut().unwrap();
        gesture.update(&press(0), &mut ctx);
        gesture.update(&MouseEvent::new(MouseAction::Drag(MouseBtn::Left), 9, 0), &mut ctx);
        assert!(!button.is_pressed());
        button.gesture_mut().unwrap().update(&release(9), &mut ctx);
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn label_gesture_is_exposed_through_view() {
        let mut button = Button::new("X", |_| {});
        assert!(button.has_gesture());
        assert!(View::gesture(&button).is_some());
        assert!(View::gesture_mut(&mut button).is_some());
    }
}
