//! Scene registry: routes inbound events to the window that owns a layer.
//!
//! Each open window registers the sending half of its inbound channel under
//! its [`LayerId`]. The classification loop reads the map for every event;
//! windows write to it on open and close. Locks are never held across an
//! await point.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};

use crate::protocol::{EventPayload, EventRequest, LayerId};

/// Message delivered to a window's event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowMessage {
    /// An input event addressed to the window's layer.
    Event(EventPayload),
    /// Close the window from outside its loop.
    Close,
}

/// Map of live layers to their window inboxes.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    scenes: RwLock<HashMap<LayerId, UnboundedSender<WindowMessage>>>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a window. Replaces any previous registration for `id`.
    pub fn register(&self, id: LayerId, inbox: UnboundedSender<WindowMessage>) {
        let mut scenes = self.scenes.write().unwrap_or_else(PoisonError::into_inner);
        if scenes.insert(id, inbox).is_some() {
            debug!(%id, "replaced existing scene registration");
        }
    }

    /// Remove a window. Returns `true` if it was registered.
    pub fn unregister(&self, id: LayerId) -> bool {
        let mut scenes = self.scenes.write().unwrap_or_else(PoisonError::into_inner);
        scenes.remove(&id).is_some()
    }

    /// The inbox for `id`, if registered.
    pub fn sender(&self, id: LayerId) -> Option<UnboundedSender<WindowMessage>> {
        let scenes = self.scenes.read().unwrap_or_else(PoisonError::into_inner);
        scenes.get(&id).cloned()
    }

    /// Forward an event to its target window.
    ///
    /// Returns `false` when the layer is unknown or its window has gone away;
    /// the event is dropped in both cases.
    pub fn dispatch(&self, event: EventRequest) -> bool {
        let Some(inbox) = self.sender(event.target) else {
            debug!(target_layer = %event.target, "dropping event for unknown layer");
            return false;
        };
        match inbox.send(WindowMessage::Event(event.payload)) {
            Ok(()) => {
                trace!(target_layer = %event.target, "event routed");
                true
            }
            Err(_) => {
                debug!(target_layer = %event.target, "dropping event for closed window");
                false
            }
        }
    }

    /// Ask a window to close. Returns `false` if it is not registered.
    pub fn request_close(&self, id: LayerId) -> bool {
        self.sender(id).is_some_and(|inbox| inbox.send(WindowMessage::Close).is_ok())
    }

    pub fn contains(&self, id: LayerId) -> bool {
        let scenes = self.scenes.read().unwrap_or_else(PoisonError::into_inner);
        scenes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        let scenes = self.scenes.read().unwrap_or_else(PoisonError::into_inner);
        scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the registered layer ids.
    pub fn layers(&self) -> Vec<LayerId> {
        let scenes = self.scenes.read().unwrap_or_else(PoisonError::into_inner);
        scenes.keys().copied().collect()
    }
}
