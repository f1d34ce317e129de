//! Input event types carried by the window server's event frames.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseEvent`] and supporting types.
//! Coordinates are window-relative cells. Crossterm events convert via
//! `TryFrom` or [`try_from_crossterm`] so a window server built on crossterm can produce
//! the same payloads without the toolkit depending on crossterm elsewhere.

use std::ops::{BitAnd, BitOr};

use crate::geometry::Offset;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key. Space arrives as `Char(' ')`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key event with no modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

// ---------------------------------------------------------------------------
// MouseBtn / MouseAction / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// Mouse action kind.
///
/// The window server reports which button is held on press and drag, but a
/// release carries no button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseBtn),
    Drag(MouseBtn),
    Release,
    ScrollUp,
    ScrollDown,
    Moved,
}

impl MouseAction {
    /// The held button, if the action is a press or a drag.
    pub fn held(self) -> Option<MouseBtn> {
        match self {
            MouseAction::Down(btn) | MouseAction::Drag(btn) => Some(btn),
            _ => None,
        }
    }

    /// Whether a button is held during this action.
    pub fn holds_button(self) -> bool {
        self.held().is_some()
    }
}

/// A mouse event with action, window-relative position, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// A mouse event with no modifiers.
    pub fn new(kind: MouseAction, x: i32, y: i32) -> Self {
        Self { kind, x, y, modifiers: Modifiers::NONE }
    }

    /// The pointer position.
    pub fn position(&self) -> Offset {
        Offset::new(self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// An input event delivered to one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        InputEvent::Key(event)
    }
}

impl From<MouseEvent> for InputEvent {
    fn from(event: MouseEvent) -> Self {
        InputEvent::Mouse(event)
    }
}

// ---------------------------------------------------------------------------
// crossterm conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key_code(code: crossterm::event::KeyCode) -> Option<Key> {
    use crossterm::event::KeyCode;

    let key = match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(key)
}

impl From<crossterm::event::MouseButton> for MouseBtn {
    fn from(b: crossterm::event::MouseButton) -> Self {
        match b {
            crossterm::event::MouseButton::Left => MouseBtn::Left,
            crossterm::event::MouseButton::Right => MouseBtn::Right,
            crossterm::event::MouseButton::Middle => MouseBtn::Middle,
        }
    }
}

/// Convert a crossterm key event. Key releases and keys without a
/// counterpart in [`Key`] yield `None`.
pub fn key_from_crossterm(ct: crossterm::event::KeyEvent) -> Option<KeyEvent> {
    if ct.kind == crossterm::event::KeyEventKind::Release {
        return None;
    }
    let code = convert_key_code(ct.code)?;
    Some(KeyEvent::new(code, convert_modifiers(ct.modifiers)))
}

/// Convert a crossterm mouse event, translating its position by `origin`
/// (the window's top-left corner on screen). Horizontal scrolling yields
/// `None`.
pub fn mouse_from_crossterm(ct: crossterm::event::MouseEvent, origin: Offset) -> Option<MouseEvent> {
    use crossterm::event::MouseEventKind;

    let kind = match ct.kind {
        MouseEventKind::Down(b) => MouseAction::Down(b.into()),
        MouseEventKind::Drag(b) => MouseAction::Drag(b.into()),
        MouseEventKind::Up(_) => MouseAction::Release,
        MouseEventKind::Moved => MouseAction::Moved,
        MouseEventKind::ScrollUp => MouseAction::ScrollUp,
        MouseEventKind::ScrollDown => MouseAction::ScrollDown,
        _ => return None,
    };
    Some(MouseEvent {
        kind,
        x: i32::from(ct.column) - origin.x,
        y: i32::from(ct.row) - origin.y,
        modifiers: convert_modifiers(ct.modifiers),
    })
}

/// Try to convert a crossterm `Event` into an [`InputEvent`] for a window
/// whose top-left corner sits at `origin`.
///
/// Resize, focus and paste events have no window-level counterpart.
pub fn try_from_crossterm(event: crossterm::event::Event, origin: Offset) -> Option<InputEvent> {
    match event {
        crossterm::event::Event::Key(ke) => key_from_crossterm(ke).map(InputEvent::Key),
        crossterm::event::Event::Mouse(me) => mouse_from_crossterm(me, origin).map(InputEvent::Mouse),
        _ => None,
    }
}

/// A crossterm event with no window-level counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("crossterm event has no window-level counterpart")]
pub struct UnsupportedEvent;

impl TryFrom<crossterm::event::KeyEvent> for KeyEvent {
    type Error = UnsupportedEvent;

    fn try_from(ct: crossterm::event::KeyEvent) -> Result<Self, Self::Error> {
        key_from_crossterm(ct).ok_or(UnsupportedEvent)
    }
}

/// Positions are taken as already window-relative. Use
/// [`mouse_from_crossterm`] to translate screen coordinates.
impl TryFrom<crossterm::event::MouseEvent> for MouseEvent {
    type Error = UnsupportedEvent;

    fn try_from(ct: crossterm::event::MouseEvent) -> Result<Self, Self::Error> {
        mouse_from_crossterm(ct, Offset::ZERO).ok_or(UnsupportedEvent)
    }
}

impl TryFrom<crossterm::event::Event> for InputEvent {
    type Error = UnsupportedEvent;

    fn try_from(event: crossterm::event::Event) -> Result<Self, Self::Error> {
        try_from_crossterm(event, Offset::ZERO).ok_or(UnsupportedEvent)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        Event, KeyCode, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEventKind,
    };

    fn ct_key(code: KeyCode, modifiers: KeyModifiers) -> crossterm::event::KeyEvent {
        crossterm::event::KeyEvent::new(code, modifiers)
    }

    fn ct_mouse(kind: MouseEventKind, column: u16, row: u16) -> crossterm::event::MouseEvent {
        crossterm::event::MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_none_is_empty() {
        assert!(Modifiers::NONE.is_empty());
        assert!(Modifiers::CTRL.contains(Modifiers::NONE));
    }

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
    }

    // ── MouseAction ──────────────────────────────────────────────────

    #[test]
    fn held_button_only_for_press_and_drag() {
        assert_eq!(MouseAction::Down(MouseBtn::Right).held(), Some(MouseBtn::Right));
        assert_eq!(MouseAction::Drag(MouseBtn::Left).held(), Some(MouseBtn::Left));
        assert!(!MouseAction::Release.holds_button());
        assert!(!MouseAction::Moved.holds_button());
        assert!(!MouseAction::ScrollUp.holds_button());
    }

    // ── crossterm keys ───────────────────────────────────────────────

    #[test]
    fn key_char_with_modifiers() {
        let ke = key_from_crossterm(ct_key(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(ke.code, Key::Char('c'));
        assert!(ke.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn key_navigation_codes() {
        for (code, expected) in [
            (KeyCode::Left, Key::Left),
            (KeyCode::Right, Key::Right),
            (KeyCode::Enter, Key::Enter),
            (KeyCode::Esc, Key::Escape),
            (KeyCode::Backspace, Key::Backspace),
            (KeyCode::F(5), Key::F(5)),
        ] {
            let ke = key_from_crossterm(ct_key(code, KeyModifiers::NONE)).unwrap();
            assert_eq!(ke.code, expected);
        }
    }

    #[test]
    fn unsupported_key_and_release_are_dropped() {
        assert!(key_from_crossterm(ct_key(KeyCode::Insert, KeyModifiers::NONE)).is_none());
        let release = crossterm::event::KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(key_from_crossterm(release).is_none());
    }

    // ── crossterm mouse ──────────────────────────────────────────────

    #[test]
    fn mouse_position_is_window_relative() {
        let me = mouse_from_crossterm(
            ct_mouse(MouseEventKind::Down(MouseButton::Left), 10, 7),
            Offset::new(5, 5),
        )
        .unwrap();
        assert_eq!(me.kind, MouseAction::Down(MouseBtn::Left));
        assert_eq!(me.position(), Offset::new(5, 2));
    }

    #[test]
    fn mouse_up_becomes_release() {
        let me = mouse_from_crossterm(ct_mouse(MouseEventKind::Up(MouseButton::Middle), 0, 0), Offset::ZERO)
            .unwrap();
        assert_eq!(me.kind, MouseAction::Release);
    }

    #[test]
    fn horizontal_scroll_is_dropped() {
        assert!(mouse_from_crossterm(ct_mouse(MouseEventKind::ScrollLeft, 0, 0), Offset::ZERO).is_none());
    }

    #[test]
    fn event_level_conversion() {
        let ev = Event::Mouse(ct_mouse(MouseEventKind::Drag(MouseButton::Right), 3, 7));
        assert_eq!(
            try_from_crossterm(ev, Offset::ZERO),
            Some(InputEvent::Mouse(MouseEvent::new(MouseAction::Drag(MouseBtn::Right), 3, 7)))
        );
        assert_eq!(try_from_crossterm(Event::Resize(80, 24), Offset::ZERO), None);
        assert_eq!(try_from_crossterm(Event::FocusGained, Offset::ZERO), None);
    }

    // ── TryFrom impls ────────────────────────────────────────────────

    #[test]
    fn try_from_event_converts_keys_and_mouse() {
        let key = Event::Key(ct_key(KeyCode::Char('q'), KeyModifiers::ALT));
        assert_eq!(
            InputEvent::try_from(key),
            Ok(InputEvent::Key(KeyEvent::new(Key::Char('q'), Modifiers::ALT)))
        );
        let mouse = Event::Mouse(ct_mouse(MouseEventKind::Down(MouseButton::Left), 4, 2));
        assert_eq!(
            InputEvent::try_from(mouse),
            Ok(InputEvent::Mouse(MouseEvent::new(MouseAction::Down(MouseBtn::Left), 4, 2)))
        );
    }

    #[test]
    fn try_from_rejects_events_without_counterpart() {
        assert_eq!(InputEvent::try_from(Event::Resize(80, 24)), Err(UnsupportedEvent));
        assert_eq!(KeyEvent::try_from(ct_key(KeyCode::Insert, KeyModifiers::NONE)), Err(UnsupportedEvent));
        assert_eq!(
            MouseEvent::try_from(ct_mouse(MouseEventKind::ScrollRight, 0, 0)),
            Err(UnsupportedEvent)
        );
    }

    #[test]
    fn try_from_mouse_keeps_coordinates() {
        let me = MouseEvent::try_from(ct_mouse(MouseEventKind::Up(MouseButton::Left), 9, 5)).unwrap();
        assert_eq!(me, MouseEvent::new(MouseAction::Release, 9, 5));
    }
}
