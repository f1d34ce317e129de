//! Event context: the side channel from gesture callbacks to their window.
//!
//! Callbacks run synchronously inside the window's task and cannot borrow the
//! window itself. Instead they queue [`WindowCommand`]s on the
//! [`EventContext`]; the window applies them in order once dispatch returns.

use std::fmt;
use std::sync::Arc;

use crate::event::KeyEvent;
use crate::geometry::{Offset, Region};

/// Receiver of keyboard input, registered as the application's key sink.
pub trait KeySink: Send + Sync {
    /// Handle one key event. Runs inside the window task that received it.
    fn handle_key(&self, key: KeyEvent, ctx: &mut EventContext);
}

/// A request from a callback to the window that dispatched it.
#[derive(Clone)]
pub enum WindowCommand {
    /// Close the window.
    Close,
    /// Move by the drag translation accumulated so far.
    Move(Offset),
    /// The move drag ended.
    MoveEnded,
    /// Resize by the drag translation accumulated so far.
    Resize(Offset),
    /// The resize drag ended.
    ResizeEnded,
    /// Route keyboard input to `sink`.
    CaptureKeys(Arc<dyn KeySink>),
    /// Stop routing keyboard input to the current sink.
    ReleaseKeys,
    /// Quit the application.
    Quit,
}

impl fmt::Debug for WindowCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Close => f.write_str("Close"),
            Self::Move(t) => f.debug_tuple("Move").field(t).finish(),
            Self::MoveEnded => f.write_str("MoveEnded"),
            Self::Resize(t) => f.debug_tuple("Resize").field(t).finish(),
            Self::ResizeEnded => f.write_str("ResizeEnded"),
            Self::CaptureKeys(_) => f.write_str("CaptureKeys(..)"),
            Self::ReleaseKeys => f.write_str("ReleaseKeys"),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

/// Per-dispatch context handed to gesture callbacks and key sinks.
#[derive(Debug, Default)]
pub struct EventContext {
    region: Region,
    commands: Vec<WindowCommand>,
}

impl EventContext {
    /// A context for a gesture bound to `region` (window coordinates).
    pub fn new(region: Region) -> Self {
        Self { region, commands: Vec::new() }
    }

    /// The region of the gesture being dispatched. Empty for key events.
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn push(&mut self, command: WindowCommand) {
        self.commands.push(command);
    }

    pub fn close_window(&mut self) {
        self.push(WindowCommand::Close);
    }

    pub fn move_window(&mut self, translation: Offset) {
        self.push(WindowCommand::Move(translation));
    }

    pub fn move_ended(&mut self) {
        self.push(WindowCommand::MoveEnded);
    }

    pub fn resize_window(&mut self, translation: Offset) {
        self.push(WindowCommand::Resize(translation));
    }

    pub fn resize_ended(&mut self) {
        self.push(WindowCommand::ResizeEnded);
    }

    pub fn capture_keys(&mut self, sink: Arc<dyn KeySink>) {
        self.push(WindowCommand::CaptureKeys(sink));
    }

    pub fn release_keys(&mut self) {
        self.push(WindowCommand::ReleaseKeys);
    }

    pub fn quit(&mut self) {
        self.push(WindowCommand::Quit);
    }

    /// Commands queued so far, in order.
    pub fn commands(&self) -> &[WindowCommand] {
        &self.commands
    }

    /// Take the queued commands, leaving the context empty.
    pub fn take_commands(&mut self) -> Vec<WindowCommand> {
        std::mem::take(&mut self.commands)
    }
}
