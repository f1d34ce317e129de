//! Click recognition with run counting.

use crate::event::{MouseAction, MouseBtn, MouseEvent};
use crate::geometry::Region;

use super::context::EventContext;

type ClickCallback = Box<dyn FnMut(bool, &mut EventContext) + Send>;

/// Recognizes `required` consecutive press/release cycles of one button.
///
/// Every held event of the configured button reports whether the pointer is
/// inside the bound region to `on_changed`; leaving the region while held
/// abandons the run. A release completes one cycle; when the run reaches the
/// required count, `on_ended` fires with the final inside flag.
pub struct ClickGesture {
    button: MouseBtn,
    required: u32,
    count: u32,
    matched: bool,
    inside: bool,
    on_changed: Option<ClickCallback>,
    on_ended: Option<ClickCallback>,
}

impl ClickGesture {
    /// A click gesture for `button` needing `count` cycles (at least 1).
    pub fn new(button: MouseBtn, count: u32) -> Self {
        Self {
            button,
            required: count.max(1),
            count: 0,
            matched: false,
            inside: false,
            on_changed: None,
            on_ended: None,
        }
    }

    pub fn left(count: u32) -> Self {
        Self::new(MouseBtn::Left, count)
    }

    pub fn right(count: u32) -> Self {
        Self::new(MouseBtn::Right, count)
    }

    pub fn middle(count: u32) -> Self {
        Self::new(MouseBtn::Middle, count)
    }

    /// Called on every held event with the inside flag.
    pub fn on_changed(mut self, f: impl FnMut(bool, &mut EventContext) + Send + 'static) -> Self {
        self.on_changed = Some(Box::new(f));
        self
    }

    /// Called when the run completes, with the inside flag at release.
    pub fn on_ended(mut self, f: impl FnMut(bool, &mut EventContext) + Send + 'static) -> Self {
        self.on_ended = Some(Box::new(f));
        self
    }

    pub fn button(&self) -> MouseBtn {
        self.button
    }

    /// Completed cycles in the current run.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Whether a press of the configured button is being tracked.
    pub fn is_tracking(&self) -> bool {
        self.matched
    }

    /// Feed one event. Returns `false` if the event is not for this gesture.
    pub(crate) fn handle(&mut self, event: &MouseEvent, region: Region, ctx: &mut EventContext) -> bool {
        match event.kind {
            kind if kind.held() == Some(self.button) => {
                self.matched = true;
                self.inside = region.contains_point(event.position());
                if !self.inside {
                    self.count = 0;
                }
                if let Some(f) = self.on_changed.as_mut() {
                    f(self.inside, ctx);
                }
                true
            }
            MouseAction::Release if self.matched => {
                self.matched = false;
                self.inside = region.contains_point(event.position());
                self.count += 1;
                if self.count >= self.required {
                    self.count = 0;
                    if let Some(f) = self.on_ended.as_mut() {
                        f(self.inside, ctx);
                    }
                }
                true
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for ClickGesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickGesture")
            .field("button", &self.button)
            .field("required", &self.required)
            .field("count", &self.count)
            .field("matched", &self.matched)
            .field("inside", &self.inside)
            .finish_non_exhaustive()
    }
}
