//! Input events: mouse and keyboard payloads routed to windows.

pub mod input;

pub use input::{
    key_from_crossterm, mouse_from_crossterm, try_from_crossterm, InputEvent, Key, KeyEvent,
    Modifiers, MouseAction, MouseBtn, MouseEvent, UnsupportedEvent,
};
