//! Gesture engine: click and drag recognition, fallback chains, hit-testing.
//!
//! A [`Gesture`] is attached to one view. After each redraw the window walks
//! its view tree, binds every gesture to the rectangle its view occupies, and
//! records a [`GestureDescriptor`] per gesture in a [`HitIndex`]. Pointer
//! events are matched against the index and fed to the gesture; events the
//! gesture does not consume travel down its alternate chain.

pub mod click;
pub mod context;
pub mod drag;
pub mod hit;

use crate::event::MouseEvent;
use crate::geometry::Region;

pub use click::ClickGesture;
pub use context::{EventContext, KeySink, WindowCommand};
pub use drag::{DragGesture, DragValue};
pub use hit::{GestureDescriptor, GesturePath, HitIndex, PointerMemo};

/// The recognizer a gesture runs.
#[derive(Debug)]
pub enum Interaction {
    Click(ClickGesture),
    Drag(DragGesture),
}

/// A recognizer bound to a view, with an optional fallback.
#[derive(Debug)]
pub struct Gesture {
    interaction: Interaction,
    region: Region,
    alternate: Option<Box<Gesture>>,
}

impl Gesture {
    pub fn new(interaction: Interaction) -> Self {
        Self { interaction, region: Region::EMPTY, alternate: None }
    }

    /// Append `alternate` at the end of the fallback chain.
    pub fn with_alternate(mut self, alternate: impl Into<Gesture>) -> Self {
        self.push_alternate(alternate.into());
        self
    }

    fn push_alternate(&mut self, alternate: Gesture) {
        match self.alternate.as_mut() {
            Some(next) => next.push_alternate(alternate),
            None => self.alternate = Some(Box::new(alternate)),
        }
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut Interaction {
        &mut self.interaction
    }

    pub fn alternate(&self) -> Option<&Gesture> {
        self.alternate.as_deref()
    }

    /// Number of gestures in the chain, this one included.
    pub fn chain_len(&self) -> usize {
        1 + self.alternate.as_ref().map_or(0, |alt| alt.chain_len())
    }

    /// The rectangle, in window coordinates, the gesture was last bound to.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Bind `region` to this gesture and every alternate.
    pub fn bind_region(&mut self, region: Region) {
        self.region = region;
        if let Some(alt) = self.alternate.as_mut() {
            alt.bind_region(region);
        }
    }

    /// Feed a pointer event through the chain. Returns `true` if some gesture
    /// in the chain consumed it.
    pub fn update(&mut self, event: &MouseEvent, ctx: &mut EventContext) -> bool {
        let consumed = match &mut self.interaction {
            Interaction::Click(click) => click.handle(event, self.region, ctx),
            Interaction::Drag(drag) => drag.handle(event, ctx),
        };
        if consumed {
            return true;
        }
        match self.alternate.as_mut() {
            Some(alt) => alt.update(event, ctx),
            None => false,
        }
    }
}

impl From<ClickGesture> for Gesture {
    fn from(click: ClickGesture) -> Self {
        Self::new(Interaction::Click(click))
    }
}

impl From<DragGesture> for Gesture {
    fn from(drag: DragGesture) -> Self {
        Self::new(Interaction::Drag(drag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{MouseAction, MouseBtn};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[test]
    fn alternates_append_at_end_and_share_region() {
        let mut gesture = Gesture::from(ClickGesture::left(1))
            .with_alternate(ClickGesture::right(1))
            .with_alternate(DragGesture::new());
        assert_eq!(gesture.chain_len(), 3);
        assert!(matches!(
            gesture.alternate().and_then(Gesture::alternate).map(Gesture::interaction),
            Some(Interaction::Drag(_))
        ));

        gesture.bind_region(Region::new(1, 1, 4, 2));
        assert_eq!(gesture.alternate().unwrap().region(), Region::new(1, 1, 4, 2));
        assert_eq!(
            gesture.alternate().unwrap().alternate().unwrap().region(),
            Region::new(1, 1, 4, 2)
        );
    }

    #[test]
    fn unconsumed_events_fall_through_to_alternate() {
        let left = counter();
        let right = counter();
        let (l, r) = (Arc::clone(&left), Arc::clone(&right));
        let mut gesture = Gesture::from(ClickGesture::left(1).on_ended(move |_, _| {
            l.fetch_add(1, Ordering::SeqCst);
        }))
        .with_alternate(ClickGesture::right(1).on_ended(move |_, _| {
            r.fetch_add(1, Ordering::SeqCst);
        }));
        gesture.bind_region(Region::new(0, 0, 5, 5));
        let mut ctx = EventContext::default();

        assert!(gesture.update(&MouseEvent::new(MouseAction::Down(MouseBtn::Right), 1, 1), &mut ctx));
        // The left click is not tracking, so the release reaches the right click.
        assert!(gesture.update(&MouseEvent::new(MouseAction::Release, 1, 1), &mut ctx));
        assert_eq!(left.load(Ordering::SeqCst), 0);
        assert_eq!(right.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn chain_without_match_ignores_event() {
        let mut gesture = Gesture::from(ClickGesture::left(1));
        let mut ctx = EventContext::default();
        assert!(!gesture.update(&MouseEvent::new(MouseAction::ScrollUp, 0, 0), &mut ctx));
    }
}
