//! Hit-testing for gestures.
//!
//! [`HitIndex`] holds the gesture rectangles collected after a redraw in
//! painter's order: later entries come from deeper or later-declared views
//! and win over earlier ones. [`PointerMemo`] keeps a press/drag/release
//! sequence attached to the gesture it started on, even when the pointer
//! leaves that gesture's rectangle.

use crate::event::{MouseAction, MouseEvent};
use crate::geometry::{Offset, Region};

/// Child indices from the window root down to a view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GesturePath(Vec<usize>);

impl GesturePath {
    /// The path of the root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// This path extended by one child index.
    pub fn child(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    pub fn steps(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<usize>> for GesturePath {
    fn from(steps: Vec<usize>) -> Self {
        Self(steps)
    }
}

/// A gesture's rectangle in window coordinates and the path to its view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureDescriptor {
    pub region: Region,
    pub path: GesturePath,
}

impl GestureDescriptor {
    pub fn new(region: Region, path: GesturePath) -> Self {
        Self { region, path }
    }
}

/// Z-ordered list of gesture descriptors.
#[derive(Debug, Clone, Default)]
pub struct HitIndex {
    /// Entries in painter's order (last = frontmost).
    entries: Vec<GestureDescriptor>,
}

impl HitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents. The order of `entries` defines priority.
    pub fn rebuild(&mut self, entries: Vec<GestureDescriptor>) {
        self.entries = entries;
    }

    pub fn push(&mut self, descriptor: GestureDescriptor) {
        self.entries.push(descriptor);
    }

    /// The frontmost descriptor containing `point`.
    pub fn gesture_at(&self, point: Offset) -> Option<&GestureDescriptor> {
        self.entries.iter().rev().find(|d| d.region.contains_point(point))
    }

    pub fn descriptors(&self) -> &[GestureDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The gesture matched by the previous pointer event.
#[derive(Debug, Clone, Default)]
pub struct PointerMemo {
    last: Option<MouseAction>,
    path: Option<GesturePath>,
}

impl PointerMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `event` continues the sequence of the previous event: the
    /// previous one held a button, and this one holds a button or releases.
    pub fn continues(&self, event: &MouseEvent) -> bool {
        let held_before = self.last.is_some_and(MouseAction::holds_button);
        let continues_now = event.kind.holds_button() || event.kind == MouseAction::Release;
        held_before && continues_now
    }

    /// Resolve the gesture for `event` and remember the result.
    pub fn resolve(&mut self, event: &MouseEvent, index: &HitIndex) -> Option<GesturePath> {
        let path = if self.continues(event) {
            self.path.clone()
        } else {
            index.gesture_at(event.position()).map(|d| d.path.clone())
        };
        self.last = Some(event.kind);
        self.path = path.clone();
        path
    }

    pub fn clear(&mut self) {
        self.last = None;
        self.path = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseBtn;

    fn descriptor(region: Region, step: usize) -> GestureDescriptor {
        GestureDescriptor::new(region, GesturePath::root().child(step))
    }

    fn index() -> HitIndex {
        let mut index = HitIndex::new();
        index.rebuild(vec![
            descriptor(Region::new(0, 0, 10, 10), 0),
            descriptor(Region::new(5, 5, 10, 10), 1),
        ]);
        index
    }

    // ── HitIndex ─────────────────────────────────────────────────────

    #[test]
    fn later_descriptor_wins_on_overlap() {
        let index = index();
        assert_eq!(index.gesture_at(Offset::new(6, 6)).unwrap().path.steps(), &[1]);
        assert_eq!(index.gesture_at(Offset::new(1, 1)).unwrap().path.steps(), &[0]);
        assert!(index.gesture_at(Offset::new(20, 20)).is_none());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn empty_index_matches_nothing() {
        let index = HitIndex::new();
        assert!(index.is_empty());
        assert!(index.gesture_at(Offset::ZERO).is_none());
    }

    #[test]
    fn path_building() {
        let path = GesturePath::root().child(1).child(0).child(2);
        assert_eq!(path.steps(), &[1, 0, 2]);
        assert_eq!(path.depth(), 3);
        assert_eq!(GesturePath::from(vec![1, 0, 2]), path);
    }

    // ── PointerMemo ──────────────────────────────────────────────────

    #[test]
    fn drag_keeps_gesture_outside_its_region() {
        let index = index();
        let mut memo = PointerMemo::new();
        let down = MouseEvent::new(MouseAction::Down(MouseBtn::Left), 1, 1);
        let drag = MouseEvent::new(MouseAction::Drag(MouseBtn::Left), 40, 40);
        let release = MouseEvent::new(MouseAction::Release, 41, 41);

        let first = memo.resolve(&down, &index);
        assert_eq!(first.as_ref().map(GesturePath::steps), Some(&[0][..]));
        assert_eq!(memo.resolve(&drag, &index), first);
        assert_eq!(memo.resolve(&release, &index), first);

        // After a release the next event is hit-tested again.
        let moved = MouseEvent::new(MouseAction::Moved, 40, 40);
        assert_eq!(memo.resolve(&moved, &index), None);
    }

    #[test]
    fn press_after_move_is_hit_tested() {
        let index = index();
        let mut memo = PointerMemo::new();
        memo.resolve(&MouseEvent::new(MouseAction::Moved, 1, 1), &index);
        let path = memo.resolve(&MouseEvent::new(MouseAction::Down(MouseBtn::Right), 7, 7), &index);
        assert_eq!(path.unwrap().steps(), &[1]);
    }

    #[test]
    fn press_outside_everything_remembers_none() {
        let index = index();
        let mut memo = PointerMemo::new();
        assert!(memo.resolve(&MouseEvent::new(MouseAction::Down(MouseBtn::Left), 50, 50), &index).is_none());
        // Dragging back over a gesture does not capture it mid-sequence.
        assert!(memo.resolve(&MouseEvent::new(MouseAction::Drag(MouseBtn::Left), 1, 1), &index).is_none());
        memo.clear();
        assert!(!memo.continues(&MouseEvent::new(MouseAction::Release, 0, 0)));
    }
}
