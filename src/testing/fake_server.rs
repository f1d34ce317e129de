//! FakeServer: an in-memory window server for tests.
//!
//! The server answers the handshake, records every request it receives and
//! acknowledges it. Tests can queue `Repeat` replies, push input events to a
//! layer, and hang up the connection.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::event::InputEvent;
use crate::protocol::{decode_request, encode_reply, read_frame, write_frame, EventRequest, LayerId, Reply, Request};
use crate::transport::READY_TOKEN;

/// Capacity of the in-memory pipe in each direction.
const PIPE_CAPACITY: usize = 1 << 20;

#[derive(Debug, Default)]
struct ServerState {
    pid: Option<u32>,
    requests: Vec<Request>,
    repeats: u32,
    next_layer: u32,
}

impl ServerState {
    /// Record `request` and pick the reply for it.
    fn answer(&mut self, request: Request) -> Reply {
        let reply = if self.repeats > 0 {
            self.repeats -= 1;
            Reply::Repeat
        } else {
            match &request {
                Request::NewWindow { .. } => {
                    self.next_layer += 1;
                    Reply::Created(LayerId(self.next_layer))
                }
                other => Reply::Ack(other.layer().unwrap_or_default()),
            }
        };
        self.requests.push(request);
        reply
    }
}

// ---------------------------------------------------------------------------
// FakeServer
// ---------------------------------------------------------------------------

/// An in-memory window server.
///
/// # Examples
///
/// ```ignore
/// let (server, stream) = FakeServer::start();
/// let app = Application::with_stream(stream, AppConfig::new()).await?;
/// app.open_window(Window::new("demo", Text::new("hi"))).await?;
/// assert_eq!(server.requests().len(), 3);
/// ```
pub struct FakeServer {
    state: Arc<Mutex<ServerState>>,
    events: mpsc::UnboundedSender<EventRequest>,
    hangup: watch::Sender<bool>,
}

impl FakeServer {
    /// Spawn the server on the current runtime. Returns the server handle and
    /// the client end of the connection.
    pub fn start() -> (Self, DuplexStream) {
        let (client, server_end) = tokio::io::duplex(PIPE_CAPACITY);
        let state = Arc::new(Mutex::new(ServerState::default()));
        let (events, events_rx) = mpsc::unbounded_channel();
        let (hangup, hangup_rx) = watch::channel(false);

        tokio::spawn(serve(server_end, Arc::clone(&state), events_rx, hangup_rx));
        (Self { state, events, hangup }, client)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// The pid announced in the handshake, once it has arrived.
    pub fn pid(&self) -> Option<u32> {
        self.lock().pid
    }

    /// Answer the next `count` requests with `Repeat`.
    pub fn repeat_next(&self, count: u32) {
        self.lock().repeats = count;
    }

    /// Send an input event addressed to `target`.
    pub fn inject(&self, target: LayerId, event: impl Into<InputEvent>) {
        let event = EventRequest { target, payload: event.into() };
        if self.events.send(event).is_err() {
            debug!(%target, "fake server stopped; event dropped");
        }
    }

    /// Close the connection.
    pub fn hang_up(&self) {
        self.hangup.send_replace(true);
    }

    /// Poll until `predicate` holds for the recorded requests. Returns
    /// `false` if `timeout` elapses first.
    pub async fn wait_for(&self, timeout: Duration, predicate: impl Fn(&[Request]) -> bool) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if predicate(&self.lock().requests) {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        lock(&self.state)
    }
}

impl std::fmt::Debug for FakeServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeServer").field("state", &*self.lock()).finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Server task
// ---------------------------------------------------------------------------

fn lock(state: &Mutex<ServerState>) -> MutexGuard<'_, ServerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn answer(state: &Mutex<ServerState>, request: Request) -> Reply {
    lock(state).answer(request)
}

async fn serve(
    stream: DuplexStream,
    state: Arc<Mutex<ServerState>>,
    mut events: mpsc::UnboundedReceiver<EventRequest>,
    mut hangup: watch::Receiver<bool>,
) {
    let (mut reader, mut writer) = tokio::io::split(stream);

    let mut pid = [0u8; 4];
    if reader.read_exact(&mut pid).await.is_err() {
        return;
    }
    lock(&state).pid = Some(u32::from_le_bytes(pid));
    if writer.write_all(READY_TOKEN).await.is_err() {
        return;
    }

    // Frames are read on their own task so a partially read frame is never
    // lost to a cancelled select branch.
    let (requests_tx, mut requests) = mpsc::unbounded_channel();
    let reading = tokio::spawn(async move {
        while let Ok(Some(frame)) = read_frame(&mut reader).await {
            if requests_tx.send(frame).is_err() {
                break;
            }
        }
    });

    loop {
        let reply = tokio::select! {
            frame = requests.recv() => {
                let Some(frame) = frame else { break };
                match decode_request(&frame) {
                    Ok(request) => answer(&state, request),
                    Err(err) => {
                        warn!(%err, "fake server got an undecodable request");
                        Reply::Repeat
                    }
                }
            }
            Some(event) = events.recv() => Reply::Event(event),
            changed = hangup.changed() => {
                if changed.is_err() || *hangup.borrow() {
                    break;
                }
                continue;
            }
        };
        if write_frame(&mut writer, &encode_reply(&reply)).await.is_err() {
            break;
        }
    }

    debug!("fake server hanging up");
    let _ = writer.shutdown().await;
    reading.abort();
}
