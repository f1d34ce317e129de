//! TextField: a one-line editable input.
//!
//! The field is a floating-width, one-row [`Text`] label on a light grey
//! background. Dragging across it activates the field, routes the
//! application's keyboard input to it through a [`TextFieldHandle`], and
//! selects the dragged range of characters. Indices are character positions
//! and always satisfy `type_index <= select_index <= len`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::event::{Key, KeyEvent, Modifiers};
use crate::geometry::{LogicalSize, Offset, Size};
use crate::gesture::{DragGesture, EventContext, Gesture, KeySink};
use crate::render::{Canvas, Cell, Color};

use super::{Text, View};

type FinishCallback = Box<dyn FnMut(&str, &mut EventContext) + Send>;

// ---------------------------------------------------------------------------
// FieldState
// ---------------------------------------------------------------------------

struct FieldState {
    text: Vec<char>,
    prompt: String,
    active: bool,
    type_index: usize,
    select_index: usize,
    on_finish: Option<FinishCallback>,
}

impl FieldState {
    fn value(&self) -> String {
        self.text.iter().collect()
    }

    fn clamp(&mut self) {
        let len = self.text.len();
        self.select_index = self.select_index.min(len);
        self.type_index = self.type_index.min(self.select_index);
    }

    fn activate(&mut self) {
        self.active = true;
        self.type_index = 0;
        self.select_index = 0;
    }

    /// Replace the selection with `ch` and put the caret after it.
    fn insert(&mut self, ch: char) {
        self.clamp();
        self.text.splice(self.type_index..self.select_index, [ch]);
        self.type_index += 1;
        self.select_index = self.type_index;
    }

    /// Delete the selection, or the character before the caret.
    fn delete_backward(&mut self) {
        self.clamp();
        if self.type_index != self.select_index {
            self.text.drain(self.type_index..self.select_index);
        } else if self.type_index > 0 {
            self.type_index -= 1;
            self.text.remove(self.type_index);
        }
        self.select_index = self.type_index;
    }

    /// Move the selection end by one. Crossing the start drags it along.
    fn move_end(&mut self, forward: bool) {
        if forward {
            self.select_index = (self.select_index + 1).min(self.text.len());
        } else {
            self.select_index = self.select_index.saturating_sub(1);
            self.type_index = self.type_index.min(self.select_index);
        }
    }

    /// Move the selection start by one. Crossing the end pushes it along.
    fn move_start(&mut self, forward: bool) {
        if forward {
            self.type_index = (self.type_index + 1).min(self.text.len());
            self.select_index = self.select_index.max(self.type_index);
        } else {
            self.type_index = self.type_index.saturating_sub(1);
        }
    }
}

fn lock(state: &Mutex<FieldState>) -> MutexGuard<'_, FieldState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// TextField
// ---------------------------------------------------------------------------

/// A one-line text input.
///
/// # Examples
///
/// ```ignore
/// let field = TextField::new("name").on_finish(|value, _| tracing::info!(value, "entered"));
/// let handle = field.handle();
/// ```
pub struct TextField {
    label: Text,
    state: Arc<Mutex<FieldState>>,
}

impl TextField {
    /// An empty field showing `prompt` until something is typed.
    pub fn new(prompt: impl Into<String>) -> Self {
        let state = Arc::new(Mutex::new(FieldState {
            text: Vec::new(),
            prompt: prompt.into(),
            active: false,
            type_index: 0,
            select_index: 0,
            on_finish: None,
        }));

        let shared = Arc::clone(&state);
        let select = DragGesture::new().on_changed(move |value, ctx| {
            let mut field = lock(&shared);
            if !field.active {
                field.activate();
                ctx.capture_keys(Arc::new(TextFieldHandle { state: Arc::clone(&shared) }));
            }
            let left = ctx.region().x;
            let len = field.text.len() as i32;
            let a = (value.start.x - left).clamp(0, len) as usize;
            let b = (value.location.x - left).clamp(0, len) as usize;
            field.type_index = a.min(b);
            field.select_index = a.max(b);
        });

        let label = Text::new("")
            .background(Color::LIGHT_GREY)
            .foreground(Color::GREY)
            .set_size(-1, 1)
            .with_gesture(select);
        Self { label, state }
    }

    /// Start with `text` as the value.
    pub fn with_text(self, text: impl AsRef<str>) -> Self {
        lock(&self.state).text = text.as_ref().chars().collect();
        self
    }

    /// Called with the value when the user presses Enter.
    pub fn on_finish(self, f: impl FnMut(&str, &mut EventContext) + Send + 'static) -> Self {
        lock(&self.state).on_finish = Some(Box::new(f));
        self
    }

    /// A handle sharing this field's state.
    pub fn handle(&self) -> TextFieldHandle {
        TextFieldHandle { state: Arc::clone(&self.state) }
    }
}

impl fmt::Debug for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextField").field("handle", &self.handle()).finish_non_exhaustive()
    }
}

impl View for TextField {
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
        let field = lock(&self.state);
        let visible = usize::try_from(width).unwrap_or(0);
        let skip = field.text.len().saturating_sub(visible);

        if !field.active && field.text.is_empty() {
            self.label.replace_content(field.prompt.clone());
            self.label.set_foreground(Color::GREY);
        } else {
            self.label.replace_content(field.text[skip..].iter().collect());
            self.label.set_foreground(Color::BLACK);
        }
        let mut canvas = self.label.render(width, height);
        if !field.active {
            return canvas;
        }

        let row = height / 2;
        let column = |index: usize| i32::try_from(index.saturating_sub(skip)).unwrap_or(i32::MAX);
        if field.type_index == field.select_index {
            if field.type_index >= skip {
                let x = column(field.type_index);
                if let Some(cell) = canvas.get(x, row).copied() {
                    canvas.set(x, row, Cell { ch: '|', ..cell });
                }
            }
        } else {
            for index in field.type_index.max(skip)..field.select_index {
                let x = column(index);
                if let Some(cell) = canvas.get(x, row).copied() {
                    canvas.set(x, row, Cell { fg: Color::WHITE, bg: Color::BLUE, ..cell });
                }
            }
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

// ---------------------------------------------------------------------------
// TextFieldHandle
// ---------------------------------------------------------------------------

/// Shared access to a [`TextField`]'s value; also its keyboard sink.
#[derive(Clone)]
pub struct TextFieldHandle {
    state: Arc<Mutex<FieldState>>,
}

impl TextFieldHandle {
    pub fn value(&self) -> String {
        lock(&self.state).value()
    }

    pub fn set_value(&self, text: impl AsRef<str>) {
        let mut field = lock(&self.state);
        field.text = text.as_ref().chars().collect();
        field.clamp();
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).active
    }

    /// `(start, end)` of the selection; equal when it is just a caret.
    pub fn selection(&self) -> (usize, usize) {
        let field = lock(&self.state);
        (field.type_index, field.select_index)
    }

    fn finish(&self, ctx: &mut EventContext) {
        let (callback, value) = {
            let mut field = lock(&self.state);
            field.active = false;
            (field.on_finish.take(), field.value())
        };
        ctx.release_keys();
        if let Some(mut callback) = callback {
            callback(&value, ctx);
            let mut field = lock(&self.state);
            if field.on_finish.is_none() {
                field.on_finish = Some(callback);
            }
        }
    }
}

impl KeySink for TextFieldHandle {
    fn handle_key(&self, key: KeyEvent, ctx: &mut EventContext) {
        let alt = key.modifiers.contains(Modifiers::ALT);
        match key.code {
            Key::Enter => return self.finish(ctx),
            Key::Escape => {
                lock(&self.state).active = false;
                ctx.release_keys();
                return;
            }
            _ => {}
        }

        let mut field = lock(&self.state);
        match key.code {
            Key::Char(ch) => field.insert(ch),
            Key::Backspace => field.delete_backward(),
            Key::Left if alt => field.move_start(false),
            Key::Right if alt => field.move_start(true),
            Key::Left => field.move_end(false),
            Key::Right => field.move_end(true),
            _ => tracing::trace!(?key, "text field ignores key"),
        }
    }
}

impl fmt::Debug for TextFieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = lock(&self.state);
        f.debug_struct("TextFieldHandle")
            .field("value", &field.value())
            .field("active", &field.active)
            .field("selection", &(field.type_index, field.select_index))
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
