//! Drag recognition with start/location/translation tracking.

use crate::event::{MouseAction, MouseBtn, MouseEvent};
use crate::geometry::Offset;

use super::context::EventContext;

type DragCallback = Box<dyn FnMut(&DragValue, &mut EventContext) + Send>;

/// Positions reported by a drag, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragValue {
    /// Where the pointer was when the drag began.
    pub start: Offset,
    /// Current pointer position.
    pub location: Offset,
    /// `location - start`.
    pub translation: Offset,
}

/// Tracks a left-button drag.
#[derive(Default)]
pub struct DragGesture {
    value: DragValue,
    matched: bool,
    in_progress: bool,
    on_changed: Option<DragCallback>,
    on_ended: Option<DragCallback>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on every held-button event.
    pub fn on_changed(mut self, f: impl FnMut(&DragValue, &mut EventContext) + Send + 'static) -> Self {
        self.on_changed = Some(Box::new(f));
        self
    }

    /// Called on release with the final value.
    pub fn on_ended(mut self, f: impl FnMut(&DragValue, &mut EventContext) + Send + 'static) -> Self {
        self.on_ended = Some(Box::new(f));
        self
    }

    /// The last reported value. Retained after the drag ends.
    pub fn value(&self) -> DragValue {
        self.value
    }

    pub fn is_dragging(&self) -> bool {
        self.in_progress
    }

    fn track(&mut self, location: Offset) {
        self.value.location = location;
        self.value.translation = location - self.value.start;
    }

    /// Feed one event. Returns `false` if the event is not for this gesture.
    pub(crate) fn handle(&mut self, event: &MouseEvent, ctx: &mut EventContext) -> bool {
        match event.kind {
            kind if kind.held() == Some(MouseBtn::Left) => {
                self.matched = true;
                if !self.in_progress {
                    self.value.start = event.position();
                    self.in_progress = true;
                }
                self.track(event.position());
                if let Some(f) = self.on_changed.as_mut() {
                    f(&self.value, ctx);
                }
                true
            }
            MouseAction::Release if self.matched => {
                self.matched = false;
                self.in_progress = false;
                self.track(event.position());
                if let Some(f) = self.on_ended.as_mut() {
                    f(&self.value, ctx);
                }
                true
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for DragGesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragGesture")
            .field("value", &self.value)
            .field("matched", &self.matched)
            .field("in_progress", &self.in_progress)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn at(kind: MouseAction, x: i32, y: i32) -> MouseEvent {
        MouseEvent::new(kind, x, y)
    }

    #[test]
    fn translation_is_relative_to_first_press() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut drag = DragGesture::new().on_changed(move |v, _| sink.lock().unwrap().push(v.translation));
        let mut ctx = EventContext::default();

        drag.handle(&at(MouseAction::Down(MouseBtn::Left), 10, 4), &mut ctx);
        drag.handle(&at(MouseAction::Drag(MouseBtn::Left), 12, 4), &mut ctx);
        drag.handle(&at(MouseAction::Drag(MouseBtn::Left), 15, 2), &mut ctx);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Offset::ZERO, Offset::new(2, 0), Offset::new(5, -2)]
        );
        assert_eq!(drag.value().start, Offset::new(10, 4));
    }

    #[test]
    fn release_ends_and_keeps_value_until_next_press() {
        let ended = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&ended);
        let mut drag = DragGesture::new().on_ended(move |v, _| *sink.lock().unwrap() = Some(*v));
        let mut ctx = EventContext::default();

        drag.handle(&at(MouseAction::Down(MouseBtn::Left), 1, 1), &mut ctx);
        drag.handle(&at(MouseAction::Release, 4, 3), &mut ctx);
        assert!(!drag.is_dragging());
        assert_eq!(ended.lock().unwrap().unwrap().translation, Offset::new(3, 2));
        assert_eq!(drag.value().translation, Offset::new(3, 2));

        drag.handle(&at(MouseAction::Down(MouseBtn::Left), 8, 8), &mut ctx);
        assert_eq!(drag.value().start, Offset::new(8, 8));
        assert_eq!(drag.value().translation, Offset::ZERO);
    }

    #[test]
    fn non_left_and_stray_release_are_not_consumed() {
        let mut drag = DragGesture::new();
        let mut ctx = EventContext::default();
        assert!(!drag.handle(&at(MouseAction::Release, 0, 0), &mut ctx));
        assert!(!drag.handle(&at(MouseAction::Down(MouseBtn::Right), 0, 0), &mut ctx));
        assert!(!drag.handle(&at(MouseAction::ScrollDown, 0, 0), &mut ctx));
        assert!(!drag.is_dragging());
    }
}
