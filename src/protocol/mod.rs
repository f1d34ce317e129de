//! Wire protocol boundary: requests, replies and the codec.
//!
//! The toolkit sends [`Request`]s to the window server and receives
//! [`Reply`]s, which are either acknowledgements of a request or
//! asynchronous input events addressed to a layer.

pub mod codec;

use std::fmt;

use crate::event::InputEvent;
use crate::render::Canvas;

pub use codec::{
    decode_reply, decode_request, encode_reply, encode_request, read_frame, write_frame,
    DecodeError, MAX_FRAME_LEN,
};

/// Payload of an inbound event frame.
pub type EventPayload = InputEvent;

/// Identifier the window server assigns to a window's layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Outbound request to the window server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Create a layer; answered with [`Reply::Created`].
    NewWindow { pid: u32, x: i32, y: i32, width: i32, height: i32 },
    /// Move a layer by a delta.
    Move { id: LayerId, dx: i32, dy: i32 },
    /// Resize a layer.
    Resize { id: LayerId, width: i32, height: i32 },
    /// Replace a layer's contents.
    DrawFill { id: LayerId, width: i32, height: i32, canvas: Canvas },
    /// Present the layer.
    Render { id: LayerId },
    /// Destroy the layer.
    Delete { id: LayerId },
}

impl Request {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Request::NewWindow { .. } => "new-window",
            Request::Move { .. } => "move",
            Request::Resize { .. } => "resize",
            Request::DrawFill { .. } => "draw-fill",
            Request::Render { .. } => "render",
            Request::Delete { .. } => "delete",
        }
    }

    /// Target layer, if the request addresses an existing one.
    pub fn layer(&self) -> Option<LayerId> {
        match self {
            Request::NewWindow { .. } => None,
            Request::Move { id, .. }
            | Request::Resize { id, .. }
            | Request::DrawFill { id, .. }
            | Request::Render { id }
            | Request::Delete { id } => Some(*id),
        }
    }
}

/// An input event addressed to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRequest {
    pub target: LayerId,
    pub payload: EventPayload,
}

/// Inbound frame from the window server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The server could not process the last request; send it again.
    Repeat,
    /// A request on an existing layer succeeded.
    Ack(LayerId),
    /// A new layer was created.
    Created(LayerId),
    /// Asynchronous input event.
    Event(EventRequest),
}

impl Reply {
    /// The layer id carried by an acknowledgement.
    pub fn acknowledged(&self) -> Option<LayerId> {
        match self {
            Reply::Ack(id) | Reply::Created(id) => Some(*id),
            _ => None,
        }
    }
}
